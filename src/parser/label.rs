//! Lane-margin row label grammar.
//!
//! ```text
//! label      := series "." lane-token
//! series     := tab-group rest          ; everything before the final "."
//! tab-group  := { not "C" } "C" char char
//! lane-token := char digit+ char        ; e.g. "L07:"
//! ```
//!
//! Example: `N0.C01.D0.R1.L07:` has tab group `N0.C01`, series
//! `N0.C01.D0.R1` and lane index 7. What the tab group and series denote
//! physically is left to the log producer; this module only enforces the
//! shape so rows that do not fit are rejected instead of mis-grouped.

use crate::utils::error::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Grouping key of a lane-margin row
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AggregationKey {
    pub tab_group: String,
    pub series_id: String,
}

impl fmt::Display for AggregationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.tab_group, self.series_id)
    }
}

/// A parsed lane-margin label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaneLabel {
    pub key: AggregationKey,
    pub lane: usize,
}

fn invalid(label: &str, reason: &str) -> ParseError {
    ParseError::InvalidLabel {
        label: label.to_string(),
        reason: reason.to_string(),
    }
}

/// Parse a row label into its grouping key and lane index
///
/// # Errors
/// * `ParseError::InvalidLabel` - The label does not follow the grammar
pub fn parse_lane_label(label: &str) -> Result<LaneLabel, ParseError> {
    let dot = label
        .rfind('.')
        .ok_or_else(|| invalid(label, "no '.' before the lane token"))?;

    let series = &label[..dot];
    if series.is_empty() {
        return Err(invalid(label, "empty series"));
    }

    let lane = parse_lane_token(&label[dot + 1..]).ok_or_else(|| {
        invalid(label, "lane token must be one character, digits, one character")
    })?;

    let tab_group = tab_group(series).ok_or_else(|| {
        invalid(label, "series needs a 'C' followed by two characters")
    })?;

    Ok(LaneLabel {
        key: AggregationKey {
            tab_group: tab_group.to_string(),
            series_id: series.to_string(),
        },
        lane,
    })
}

/// Digits between the first and last character of the lane token
fn parse_lane_token(token: &str) -> Option<usize> {
    let mut chars = token.char_indices();
    let (_, first) = chars.next()?;
    let (last_idx, _) = chars.next_back()?;

    let digits = &token[first.len_utf8()..last_idx];
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Series prefix up to and including the second character after the first 'C'
fn tab_group(series: &str) -> Option<&str> {
    let c = series.find('C')?;
    let after = &series[c + 1..];
    let width: usize = after.chars().take(2).map(char::len_utf8).sum();
    if after.chars().count() < 2 {
        return None;
    }
    Some(&series[..c + 1 + width])
}
