//! Average lane margins across the files of one vendor run.
//!
//! Lane-margin rows are grouped by the (tab group, series) key parsed from
//! their label and placed at their lane index. Each file adds the absolute
//! value of every variable into its lane's running sum; finishing divides
//! by the file count.
//!
//! Memory is proportional to series x variables x lanes, independent of the
//! number of files, so files can be fed one at a time in any order.

use crate::parser::ingest::RowSet;
use crate::parser::label::{parse_lane_label, AggregationKey};
use crate::parser::schema::{MarginRow, VariableList};
use crate::stats::columns::parse_margin_value;
use crate::utils::config::DEFAULT_LANE_CAPACITY;
use crate::utils::error::{AggregationError, AssumptionViolation, ParseError};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Lane bounds applied while averaging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregationConfig {
    /// Lane indices must be below this value
    pub lane_capacity: usize,
    /// Every series must expose exactly this many lanes (None = any count)
    pub expected_lanes: Option<usize>,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            lane_capacity: DEFAULT_LANE_CAPACITY,
            expected_lanes: None,
        }
    }
}

/// Per-lane averages of one variable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableSeries {
    pub variable: String,
    /// Indexed by lane
    pub values: Vec<f64>,
}

/// Averaged series of one aggregation key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AveragedSeries {
    pub key: AggregationKey,
    pub file_count: usize,
    pub variables: Vec<VariableSeries>,
}

impl AveragedSeries {
    pub fn lane_count(&self) -> usize {
        self.variables.first().map_or(0, |v| v.values.len())
    }

    pub fn variable(&self, name: &str) -> Option<&VariableSeries> {
        self.variables.iter().find(|v| v.variable == name)
    }
}

/// All averaged series of a vendor, ordered by key
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LaneAverages {
    pub series: Vec<AveragedSeries>,
}

impl LaneAverages {
    pub fn get(&self, key: &AggregationKey) -> Option<&AveragedSeries> {
        self.series.iter().find(|s| &s.key == key)
    }

    /// Series grouped under their tab group
    pub fn by_tab_group(&self) -> BTreeMap<&str, Vec<&AveragedSeries>> {
        let mut groups: BTreeMap<&str, Vec<&AveragedSeries>> = BTreeMap::new();
        for series in &self.series {
            groups.entry(series.key.tab_group.as_str()).or_default().push(series);
        }
        groups
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

/// Running sums of one series
#[derive(Debug)]
struct SeriesAccumulator {
    /// sums[variable][lane]
    sums: Vec<Vec<f64>>,
    /// Rows contributed per lane
    seen: Vec<usize>,
}

impl SeriesAccumulator {
    fn new(variables: usize) -> Self {
        Self {
            sums: vec![Vec::new(); variables],
            seen: Vec::new(),
        }
    }

    fn add(&mut self, lane: usize, values: &[f64]) {
        if self.seen.len() <= lane {
            self.seen.resize(lane + 1, 0);
            for lanes in &mut self.sums {
                lanes.resize(lane + 1, 0.0);
            }
        }
        self.seen[lane] += 1;
        for (lanes, value) in self.sums.iter_mut().zip(values) {
            lanes[lane] += value;
        }
    }
}

/// Streaming lane averager for one vendor and one CPU
///
/// **Public** - main entry point for aggregation
///
/// # Example
/// ```ignore
/// let mut averager = LaneAverager::new(variables, AggregationConfig::default());
/// for rows in lane_rows.files() {
///     averager.add_file(rows)?;
/// }
/// let averages = averager.finish()?;
/// ```
#[derive(Debug)]
pub struct LaneAverager {
    variables: VariableList,
    config: AggregationConfig,
    series: BTreeMap<AggregationKey, SeriesAccumulator>,
    files: usize,
}

impl LaneAverager {
    pub fn new(variables: VariableList, config: AggregationConfig) -> Self {
        Self {
            variables,
            config,
            series: BTreeMap::new(),
            files: 0,
        }
    }

    /// Accumulate the lane rows of one file
    pub fn add_file(&mut self, rows: &[MarginRow]) -> Result<(), AggregationError> {
        self.add_rows(rows)?;
        self.files += 1;
        Ok(())
    }

    /// Accumulate rows without counting a file
    ///
    /// # Errors
    /// * `ParseError::InvalidLabel` / `ParseError::LaneOutOfRange` - Bad label
    /// * `StatisticsError::NonNumeric` - A value cannot be coerced
    /// * `AssumptionViolation::ColumnCountMismatch` - Row width differs from the variable list
    pub fn add_rows(&mut self, rows: &[MarginRow]) -> Result<(), AggregationError> {
        for row in rows {
            let label = parse_lane_label(&row.label)?;
            if label.lane >= self.config.lane_capacity {
                return Err(ParseError::LaneOutOfRange {
                    label: row.label.clone(),
                    lane: label.lane,
                    capacity: self.config.lane_capacity,
                }
                .into());
            }

            if row.values.len() != self.variables.len() {
                return Err(AssumptionViolation::ColumnCountMismatch {
                    expected: self.variables.len(),
                    found: row.values.len(),
                }
                .into());
            }

            let values = row
                .values
                .iter()
                .map(|token| parse_margin_value(&row.label, token))
                .collect::<Result<Vec<f64>, _>>()?;

            let variable_count = self.variables.len();
            self.series
                .entry(label.key)
                .or_insert_with(|| SeriesAccumulator::new(variable_count))
                .add(label.lane, &values);
        }
        Ok(())
    }

    /// Files added so far
    pub fn file_count(&self) -> usize {
        self.files
    }

    /// Divide by the number of files added
    pub fn finish(self) -> Result<LaneAverages, AggregationError> {
        let files = self.files;
        self.finish_with(files)
    }

    /// Divide by an explicit file count
    ///
    /// # Errors
    /// * `AssumptionViolation::LaneCoverage` - A lane is missing from, or
    ///   repeated in, some file, or a series has a gap in its lanes
    /// * `AssumptionViolation::LaneCountMismatch` - A series' lane count
    ///   differs from `expected_lanes`
    pub fn finish_with(self, file_count: usize) -> Result<LaneAverages, AggregationError> {
        let mut series = Vec::with_capacity(self.series.len());

        for (key, acc) in self.series {
            let lanes = acc.seen.len();

            if let Some((lane, &seen)) = acc
                .seen
                .iter()
                .enumerate()
                .find(|&(_, &seen)| seen != file_count)
            {
                return Err(AssumptionViolation::LaneCoverage {
                    series: key.to_string(),
                    lane,
                    seen,
                    files: file_count,
                }
                .into());
            }

            if let Some(expected) = self.config.expected_lanes {
                if lanes != expected {
                    return Err(AssumptionViolation::LaneCountMismatch {
                        series: key.to_string(),
                        expected,
                        found: lanes,
                    }
                    .into());
                }
            }

            let divisor = file_count as f64;
            let variables = self
                .variables
                .iter()
                .zip(acc.sums)
                .map(|(name, sums)| VariableSeries {
                    variable: name.to_string(),
                    values: sums.into_iter().map(|sum| sum / divisor).collect(),
                })
                .collect();

            series.push(AveragedSeries {
                key,
                file_count,
                variables,
            });
        }

        debug!("Averaged {} lane series over {} files", series.len(), file_count);

        Ok(LaneAverages { series })
    }
}

/// Average a vendor's lane rows given the total file count
pub fn average_lane_rows(
    rows: &[MarginRow],
    file_count: usize,
    variables: &VariableList,
    config: AggregationConfig,
) -> Result<LaneAverages, AggregationError> {
    let mut averager = LaneAverager::new(variables.clone(), config);
    averager.add_rows(rows)?;
    averager.finish_with(file_count)
}

/// Average a vendor's lane rows file by file
pub fn average_row_set(
    rows: &RowSet,
    variables: &VariableList,
    config: AggregationConfig,
) -> Result<LaneAverages, AggregationError> {
    let mut averager = LaneAverager::new(variables.clone(), config);
    for file_rows in rows.files() {
        averager.add_file(file_rows)?;
    }
    averager.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(names: &[&str]) -> VariableList {
        VariableList::new(names.iter().map(|n| n.to_string()).collect())
    }

    fn row(label: &str, values: &[&str]) -> MarginRow {
        MarginRow::new(label, values.iter().map(|v| v.to_string()).collect())
    }

    #[test]
    fn test_two_files_two_lanes() {
        let mut averager = LaneAverager::new(vars(&["RxDqs-"]), AggregationConfig::default());
        averager
            .add_file(&[row("N0.C00.D0.R0.L00:", &["10"]), row("N0.C00.D0.R0.L01:", &["-20"])])
            .unwrap();
        averager
            .add_file(&[row("N0.C00.D0.R0.L01:", &["40"]), row("N0.C00.D0.R0.L00:", &["-30"])])
            .unwrap();

        let averages = averager.finish().unwrap();
        assert_eq!(averages.series.len(), 1);
        let series = &averages.series[0];
        assert_eq!(series.key.tab_group, "N0.C00");
        assert_eq!(series.file_count, 2);
        assert_eq!(series.variables[0].values, vec![20.0, 30.0]);
    }

    #[test]
    fn test_missing_lane_in_one_file() {
        let mut averager = LaneAverager::new(vars(&["v"]), AggregationConfig::default());
        averager
            .add_file(&[row("N0.C00.R0.L00:", &["1"]), row("N0.C00.R0.L01:", &["1"])])
            .unwrap();
        averager.add_file(&[row("N0.C00.R0.L00:", &["1"])]).unwrap();

        let err = averager.finish().unwrap_err();
        assert_eq!(
            err,
            AggregationError::Assumption(AssumptionViolation::LaneCoverage {
                series: "N0.C00/N0.C00.R0".to_string(),
                lane: 1,
                seen: 1,
                files: 2,
            })
        );
    }

    #[test]
    fn test_lane_gap_is_violation() {
        let err = average_lane_rows(
            &[row("N0.C00.R0.L00:", &["1"]), row("N0.C00.R0.L02:", &["1"])],
            1,
            &vars(&["v"]),
            AggregationConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            AggregationError::Assumption(AssumptionViolation::LaneCoverage { lane: 1, seen: 0, .. })
        ));
    }

    #[test]
    fn test_expected_lane_count() {
        let config = AggregationConfig {
            lane_capacity: 40,
            expected_lanes: Some(40),
        };
        let err = average_lane_rows(&[row("N0.C00.R0.L00:", &["1"])], 1, &vars(&["v"]), config)
            .unwrap_err();
        assert!(matches!(
            err,
            AggregationError::Assumption(AssumptionViolation::LaneCountMismatch {
                expected: 40,
                found: 1,
                ..
            })
        ));
    }

    #[test]
    fn test_lane_beyond_capacity() {
        let err = average_lane_rows(
            &[row("N0.C00.R0.L40:", &["1"])],
            1,
            &vars(&["v"]),
            AggregationConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            AggregationError::Parse(ParseError::LaneOutOfRange { lane: 40, capacity: 40, .. })
        ));
    }

    #[test]
    fn test_invalid_label_rejected() {
        let err = average_lane_rows(&[row("garbage", &["1"])], 1, &vars(&["v"]), AggregationConfig::default())
            .unwrap_err();
        assert!(matches!(err, AggregationError::Parse(ParseError::InvalidLabel { .. })));
    }

    #[test]
    fn test_by_tab_group() {
        let rows = [
            row("N0.C00.R0.L00:", &["2"]),
            row("N0.C00.R1.L00:", &["4"]),
            row("N0.C01.R0.L00:", &["6"]),
        ];
        let averages = average_lane_rows(&rows, 1, &vars(&["v"]), AggregationConfig::default()).unwrap();
        let groups = averages.by_tab_group();

        assert_eq!(groups.len(), 2);
        assert_eq!(groups["N0.C00"].len(), 2);
        assert_eq!(groups["N0.C01"][0].variables[0].values, vec![6.0]);
    }
}
