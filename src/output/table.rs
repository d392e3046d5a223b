//! Plain-text tables printed by the analyze command.

use crate::aggregator::AveragedSeries;
use crate::parser::AggregationKey;
use crate::report::{MarginReport, MarginSection, VendorStatistics};
use crate::stats::StatSummary;

const LABEL_WIDTH: usize = 10;
const CELL_WIDTH: usize = 12;

/// Statistics of every variable, one table per (section, vendor)
///
/// Rows are the summary figures, columns the variables. Entries whose
/// statistics failed show `n/a`.
pub fn render_vendor_table(report: &MarginReport) -> String {
    let mut lines = Vec::new();

    for section in &report.sections {
        for vendor in &section.statistics {
            lines.push(format!("  {} - {}", section.title, vendor.vendor));
            lines.push(header_row("", section.variables.iter()));
            lines.push(rule(section.variables.len()));

            for (row, label) in STAT_LABELS.iter().enumerate() {
                let cells = vendor
                    .variables
                    .iter()
                    .map(|v| v.summary.as_ref().map(|s| s.table_rows()[row].1));
                lines.push(value_row(label, cells));
            }
            lines.push(String::new());
        }
    }

    lines.join("\n")
}

/// Mean and standard deviation of every vendor, one table per (section, variable)
pub fn render_variable_table(report: &MarginReport) -> String {
    let mut lines = Vec::new();

    for section in &report.sections {
        for variable in section.variables.iter() {
            lines.push(format!("  {} - {}", section.title, variable));
            lines.push(header_row("", section.statistics.iter().map(|s| s.vendor.as_str())));
            lines.push(rule(section.statistics.len()));

            let summaries: Vec<Option<&StatSummary>> = section
                .statistics
                .iter()
                .map(|vendor| vendor_summary(vendor, variable))
                .collect();

            lines.push(value_row("Mean", summaries.iter().map(|s| s.map(|s| s.mean))));
            lines.push(value_row("SD", summaries.iter().map(|s| s.map(|s| s.std_dev))));
            lines.push(String::new());
        }
    }

    lines.join("\n")
}

/// Weakest averaged lane of every vendor, per (lane section, series, variable)
///
/// Sections without lane averages are skipped.
pub fn render_comparator_table(report: &MarginReport) -> String {
    let mut lines = Vec::new();

    for section in report.sections.iter().filter(|s| !s.lane_averages.is_empty()) {
        lines.push(format!("  {} - weakest lane", section.title));
        lines.push(header_row(
            "",
            section.lane_averages.iter().map(|v| v.vendor.as_str()),
        ));
        lines.push(rule(section.lane_averages.len()));

        for key in series_keys(section) {
            lines.push(format!("  {}", key));
            for variable in section.variables.iter() {
                let cells = section.lane_averages.iter().map(|vendor| {
                    vendor
                        .averages
                        .get(&key)
                        .and_then(|series| weakest_lane(series, variable))
                        .map(|(lane, value)| format!("{:.2} L{:02}", value, lane))
                        .unwrap_or_else(|| "n/a".to_string())
                });
                lines.push(text_row(variable, cells));
            }
        }
        lines.push(String::new());
    }

    lines.join("\n")
}

const STAT_LABELS: [&str; 7] = [
    "Mean", "Median", "SD", "IQR", "Mean-1SD", "Mean-2SD", "Mean-3SD",
];

fn vendor_summary<'a>(vendor: &'a VendorStatistics, variable: &str) -> Option<&'a StatSummary> {
    vendor.variable(variable).and_then(|v| v.summary.as_ref())
}

/// Series keys of the first vendor, in key order
fn series_keys(section: &MarginSection) -> Vec<AggregationKey> {
    section
        .lane_averages
        .first()
        .map(|vendor| vendor.averages.series.iter().map(|s| s.key.clone()).collect())
        .unwrap_or_default()
}

/// Lowest averaged value of a variable and the lane it occurs on
pub fn weakest_lane(series: &AveragedSeries, variable: &str) -> Option<(usize, f64)> {
    series
        .variable(variable)?
        .values
        .iter()
        .copied()
        .enumerate()
        .min_by(|a, b| a.1.total_cmp(&b.1))
}

fn header_row<'a>(label: &str, names: impl Iterator<Item = &'a str>) -> String {
    let cells: String = names.map(|n| format!(" {:>w$}", n, w = CELL_WIDTH)).collect();
    format!("  {:<w$}{}", label, cells, w = LABEL_WIDTH)
}

fn rule(columns: usize) -> String {
    format!("  {}", "-".repeat(LABEL_WIDTH + columns * (CELL_WIDTH + 1)))
}

fn value_row(label: &str, cells: impl Iterator<Item = Option<f64>>) -> String {
    text_row(
        label,
        cells.map(|c| c.map_or_else(|| "n/a".to_string(), |v| format!("{:.4}", v))),
    )
}

fn text_row(label: &str, cells: impl Iterator<Item = String>) -> String {
    let cells: String = cells.map(|c| format!(" {:>w$}", c, w = CELL_WIDTH)).collect();
    format!("  {:<w$}{}", label, cells, w = LABEL_WIDTH)
}
