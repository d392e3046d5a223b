//! Numeric column extraction from margin rows.
//!
//! Margins are signed in the logs (negative on the low side); every consumer
//! works on magnitudes, so values are absolute-valued here.

use crate::parser::schema::MarginRow;
use crate::utils::error::StatisticsError;

/// Parse one raw margin token into its absolute value
///
/// # Errors
/// * `StatisticsError::NonNumeric` - Token is not a finite number
pub fn parse_margin_value(label: &str, token: &str) -> Result<f64, StatisticsError> {
    token
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .map(f64::abs)
        .ok_or_else(|| StatisticsError::NonNumeric {
            label: label.to_string(),
            token: token.to_string(),
        })
}

/// Absolute values of variable `column` (0-based, label excluded) over `rows`
///
/// # Errors
/// * `StatisticsError::MissingColumn` - A row is shorter than `column`
/// * `StatisticsError::NonNumeric` - A token cannot be coerced to a number
pub fn extract_column(rows: &[MarginRow], column: usize) -> Result<Vec<f64>, StatisticsError> {
    rows.iter()
        .map(|row| {
            let token = row
                .values
                .get(column)
                .ok_or_else(|| StatisticsError::MissingColumn {
                    label: row.label.clone(),
                    column,
                })?;
            parse_margin_value(&row.label, token)
        })
        .collect()
}
