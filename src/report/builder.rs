//! Assemble the report from ingested vendor runs.
//!
//! Statistics are computed once per (section, vendor, variable). A
//! statistics failure only affects its own entry; lane averaging failures
//! abort the report.

use super::schema::{
    MarginReport, MarginSection, VariableChart, VariableStatistics, VendorColumn, VendorInfo,
    VendorLaneAverages, VendorStatistics,
};
use crate::aggregator::{average_row_set, AggregationConfig};
use crate::parser::ingest::VendorRun;
use crate::parser::schema::{MarginKind, MarginType, VariableList};
use crate::stats::{
    box_plot_stats, compute_stat_summary, extract_column, prepare_column, unit_histogram,
    BootstrapConfig, StatSummary,
};
use crate::utils::config::{OutputToggles, RunConfig, REPORT_SCHEMA_VERSION};
use crate::utils::error::{ReportError, StatisticsError};
use chrono::Utc;
use log::{debug, info, warn};

/// Options that shape the report
#[derive(Debug, Clone, Default)]
pub struct ReportOptions {
    /// Resample columns before statistics
    pub bootstrap: Option<BootstrapConfig>,
    pub margin_line: Option<f64>,
    pub outputs: OutputToggles,
    pub aggregation: AggregationConfig,
}

impl From<&RunConfig> for ReportOptions {
    fn from(config: &RunConfig) -> Self {
        Self {
            bootstrap: config.bootstrap.then(BootstrapConfig::default),
            margin_line: config.margin_line(),
            outputs: config.outputs.clone(),
            aggregation: AggregationConfig {
                lane_capacity: config.lane_capacity,
                expected_lanes: config.expected_lanes,
            },
        }
    }
}

/// Build the full report
///
/// **Public** - main entry point for report assembly
///
/// Callers are expected to have run `check_vendor_runs` first so vendors
/// share file counts and variable lists.
///
/// # Errors
/// * `ReportError` - Lane averaging failed for a vendor
pub fn build_report(runs: &[VendorRun], options: &ReportOptions) -> Result<MarginReport, ReportError> {
    let sections = MarginKind::ALL
        .iter()
        .map(|&kind| build_section(runs, kind, options))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(MarginReport {
        version: REPORT_SCHEMA_VERSION.to_string(),
        generated_at: Utc::now().to_rfc3339(),
        bootstrap: options.bootstrap.is_some(),
        margin_line: options.margin_line,
        vendors: runs
            .iter()
            .map(|run| VendorInfo {
                name: run.vendor.clone(),
                folder: run.folder.display().to_string(),
                file_count: run.file_count(),
            })
            .collect(),
        sections,
    })
}

/// Analysed column and its summary for one (vendor, variable)
struct ColumnResult {
    values: Vec<f64>,
    summary: Result<StatSummary, StatisticsError>,
}

fn analyze_column(run: &VendorRun, kind: MarginKind, index: usize, options: &ReportOptions) -> ColumnResult {
    let prepared = extract_column(run.rows(kind), index)
        .and_then(|column| prepare_column(&column, options.bootstrap.as_ref()));

    match prepared {
        Ok(values) => {
            let summary = compute_stat_summary(&values);
            ColumnResult { values, summary }
        }
        Err(e) => ColumnResult {
            values: Vec::new(),
            summary: Err(e),
        },
    }
}

fn build_section(
    runs: &[VendorRun],
    kind: MarginKind,
    options: &ReportOptions,
) -> Result<MarginSection, ReportError> {
    let title = kind.title();
    let variables = runs
        .first()
        .and_then(|run| run.variables(kind.cpu))
        .cloned()
        .unwrap_or_default();

    info!("{}: {} variables across {} vendors", title, variables.len(), runs.len());

    let mut statistics = Vec::with_capacity(runs.len());
    // columns[variable][vendor]
    let mut columns: Vec<Vec<VendorColumn>> = vec![Vec::new(); variables.len()];

    for run in runs {
        let mut vendor_stats = Vec::with_capacity(variables.len());

        for (index, variable) in variables.iter().enumerate() {
            let result = analyze_column(run, kind, index, options);

            let entry = match result.summary {
                Ok(summary) => VariableStatistics {
                    variable: variable.to_string(),
                    summary: Some(summary),
                    error: None,
                },
                Err(e) => {
                    warn!("{} {} {}: statistics skipped: {}", run.vendor, title, variable, e);
                    VariableStatistics {
                        variable: variable.to_string(),
                        summary: None,
                        error: Some(e.to_string()),
                    }
                }
            };
            vendor_stats.push(entry);

            if options.outputs.wants_charts() {
                columns[index].push(chart_column(&run.vendor, result.values, &options.outputs));
            }
        }

        statistics.push(VendorStatistics {
            vendor: run.vendor.clone(),
            variables: vendor_stats,
        });
    }

    let charts = if options.outputs.wants_charts() {
        variables
            .iter()
            .zip(columns)
            .map(|(variable, vendors)| VariableChart {
                variable: variable.to_string(),
                vendors,
            })
            .collect()
    } else {
        Vec::new()
    };

    let lane_averages = match kind.margin_type {
        MarginType::Lane => average_lanes(runs, kind, &variables, options)?,
        MarginType::Rank => Vec::new(),
    };

    Ok(MarginSection {
        kind,
        title,
        variables,
        statistics,
        charts,
        lane_averages,
    })
}

fn chart_column(vendor: &str, values: Vec<f64>, outputs: &OutputToggles) -> VendorColumn {
    let histogram = if outputs.histogram {
        unit_histogram(&values)
    } else {
        None
    };
    let box_plot = if outputs.box_plot {
        box_plot_stats(&values)
    } else {
        None
    };

    VendorColumn {
        vendor: vendor.to_string(),
        values: if outputs.bit_margin { values } else { Vec::new() },
        histogram,
        box_plot,
    }
}

fn average_lanes(
    runs: &[VendorRun],
    kind: MarginKind,
    variables: &VariableList,
    options: &ReportOptions,
) -> Result<Vec<VendorLaneAverages>, ReportError> {
    let mut averages = Vec::with_capacity(runs.len());

    for run in runs {
        let Some(rows) = run.row_set(kind) else {
            continue;
        };

        let vendor_averages =
            average_row_set(rows, variables, options.aggregation).map_err(|source| ReportError {
                vendor: run.vendor.clone(),
                section: kind.title(),
                source,
            })?;

        debug!(
            "{} {}: {} averaged lane series",
            run.vendor,
            kind.title(),
            vendor_averages.series.len()
        );

        averages.push(VendorLaneAverages {
            vendor: run.vendor.clone(),
            averages: vendor_averages,
        });
    }

    Ok(averages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::schema::{Cpu, CpuMargins, MarginRow, MarginTable};

    fn margins(cpu: Cpu, rank: &[(&str, [&str; 2])], lane: &[(&str, [&str; 2])]) -> CpuMargins {
        let rows = |data: &[(&str, [&str; 2])]| {
            data.iter()
                .map(|(label, values)| {
                    MarginRow::new(*label, values.iter().map(|v| v.to_string()).collect())
                })
                .collect()
        };
        CpuMargins {
            cpu,
            variables: VariableList::new(vec!["RxDqs-".into(), "RxV-".into()]),
            rank: MarginTable {
                kind: MarginKind::new(cpu, MarginType::Rank),
                rows: rows(rank),
            },
            lane: MarginTable {
                kind: MarginKind::new(cpu, MarginType::Lane),
                rows: rows(lane),
            },
        }
    }

    fn run(vendor: &str, lane_values: &[[&str; 2]]) -> VendorRun {
        let mut run = VendorRun::new(vendor, format!("/runs/{}", vendor));
        for (i, values) in lane_values.iter().enumerate() {
            let file = vec![
                margins(
                    Cpu::Cpu0,
                    &[("N0.C00.D0.R0", ["-10", "20"]), ("N0.C00.D0.R1", ["12", "-22"])],
                    &[("N0.C00.D0.R0.L00:", *values)],
                ),
                margins(
                    Cpu::Cpu1,
                    &[("N1.C00.D0.R0", ["9", "19"])],
                    &[("N1.C00.D0.R0.L00:", *values)],
                ),
            ];
            run.add_file(format!("{}.log", i), file).unwrap();
        }
        run
    }

    #[test]
    fn test_build_report_sections() {
        let runs = vec![run("Hynix", &[["4", "8"], ["-6", "10"]])];
        let report = build_report(&runs, &ReportOptions::default()).unwrap();

        assert_eq!(report.sections.len(), 4);
        assert_eq!(report.vendors[0].file_count, 2);
        assert!(!report.bootstrap);

        let rank = report.section(MarginKind::new(Cpu::Cpu0, MarginType::Rank)).unwrap();
        let stats = rank.vendor_statistics("Hynix").unwrap();
        let summary = stats.variable("RxDqs-").unwrap().summary.unwrap();
        assert_eq!(summary.sample_count, 4);
        assert_eq!(summary.mean, 11.0);
        assert!(rank.charts.is_empty());
        assert!(rank.lane_averages.is_empty());

        let lane = report.section(MarginKind::new(Cpu::Cpu0, MarginType::Lane)).unwrap();
        let series = &lane.lane_averages[0].averages.series[0];
        assert_eq!(series.variables[0].values, vec![5.0]);
        assert_eq!(series.variables[1].values, vec![9.0]);
    }

    #[test]
    fn test_singleton_statistics_error_is_local() {
        // CPU1 rank has one row per file; with one file stdev is undefined
        let runs = vec![run("Micron", &[["4", "8"]])];
        let report = build_report(&runs, &ReportOptions::default()).unwrap();

        let rank1 = report.section(MarginKind::new(Cpu::Cpu1, MarginType::Rank)).unwrap();
        let entry = rank1.statistics[0].variable("RxDqs-").unwrap();
        assert!(entry.summary.is_none());
        assert!(entry.error.as_deref().unwrap().contains("Not enough observations"));

        // one file still averages (divides by 1)
        let lane0 = report.section(MarginKind::new(Cpu::Cpu0, MarginType::Lane)).unwrap();
        assert_eq!(lane0.lane_averages[0].averages.series[0].variables[0].values, vec![4.0]);

        let rank0 = report.section(MarginKind::new(Cpu::Cpu0, MarginType::Rank)).unwrap();
        assert!(rank0.statistics[0].variables[0].summary.is_some());
    }

    #[test]
    fn test_chart_toggles() {
        let runs = vec![run("Hynix", &[["4", "8"], ["-6", "10"]])];
        let options = ReportOptions {
            outputs: OutputToggles {
                histogram: true,
                bit_margin: true,
                ..Default::default()
            },
            ..Default::default()
        };
        let report = build_report(&runs, &options).unwrap();
        let rank = report.section(MarginKind::new(Cpu::Cpu0, MarginType::Rank)).unwrap();

        assert_eq!(rank.charts.len(), 2);
        let column = &rank.charts[0].vendors[0];
        assert_eq!(column.values, vec![10.0, 12.0, 10.0, 12.0]);
        assert_eq!(column.histogram.as_ref().unwrap().counts, vec![2, 0, 2]);
        assert!(column.box_plot.is_none());
    }
}
