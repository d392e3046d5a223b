mod common;

use common::{write_vendor, LANES, RANKS};
use pretty_assertions::assert_eq;
use rmt_margin_studio::aggregator::{average_lane_rows, average_row_set, AggregationConfig, LaneAverager};
use rmt_margin_studio::parser::{
    ingest_vendor, AggregationKey, Cpu, MarginKind, MarginRow, MarginType, VariableList,
};
use rmt_margin_studio::utils::{AggregationError, AssumptionViolation, ParseError};

fn vars(names: &[&str]) -> VariableList {
    VariableList::new(names.iter().map(|n| n.to_string()).collect())
}

fn row(label: &str, values: &[&str]) -> MarginRow {
    MarginRow::new(label, values.iter().map(|v| v.to_string()).collect())
}

fn key(tab_group: &str, series_id: &str) -> AggregationKey {
    AggregationKey {
        tab_group: tab_group.to_string(),
        series_id: series_id.to_string(),
    }
}

#[test]
fn test_two_file_average() {
    let rows = vec![
        row("N0.C00.D0.R0.L00:", &["10"]),
        row("N0.C00.D0.R0.L01:", &["20"]),
        row("N0.C00.D0.R0.L00:", &["30"]),
        row("N0.C00.D0.R0.L01:", &["40"]),
    ];

    let averages = average_lane_rows(&rows, 2, &vars(&["RxDqs-"]), AggregationConfig::default()).unwrap();

    let series = averages.get(&key("N0.C00", "N0.C00.D0.R0")).unwrap();
    assert_eq!(series.file_count, 2);
    assert_eq!(series.variable("RxDqs-").unwrap().values, vec![20.0, 30.0]);
}

#[test]
fn test_averages_from_ingested_logs() {
    let root = tempfile::tempdir().unwrap();
    let folder = write_vendor(root.path(), "DDR5_RMT_Hynix_2023_07", &[0, 2]);
    let run = ingest_vendor(&folder, "Hynix", None).unwrap();

    let kind = MarginKind::new(Cpu::Cpu1, MarginType::Lane);
    let config = AggregationConfig {
        expected_lanes: Some(LANES),
        ..Default::default()
    };
    let averages = average_row_set(
        run.row_set(kind).unwrap(),
        run.variables(Cpu::Cpu1).unwrap(),
        config,
    )
    .unwrap();

    assert_eq!(averages.series.len(), RANKS);
    let groups = averages.by_tab_group();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups["N1.C00"].len(), RANKS);

    let r1 = averages.get(&key("N1.C00", "N1.C00.D0.R1")).unwrap();
    assert_eq!(r1.lane_count(), LANES);
    // |-(10 + lane + offset)| averaged over offsets 0 and 2
    assert_eq!(r1.variable("RxDqs-").unwrap().values, vec![11.0, 12.0, 13.0, 14.0]);
    assert_eq!(r1.variable("RxV-").unwrap().values, vec![31.0; LANES]);
}

#[test]
fn test_missing_lane_in_one_file() {
    let rows_a = vec![row("N0.C01.D0.R0.L00:", &["1"]), row("N0.C01.D0.R0.L01:", &["1"])];
    let rows_b = vec![row("N0.C01.D0.R0.L00:", &["1"])];

    let mut averager = LaneAverager::new(vars(&["v"]), AggregationConfig::default());
    averager.add_file(&rows_a).unwrap();
    averager.add_file(&rows_b).unwrap();

    let err = averager.finish().unwrap_err();
    assert_eq!(
        err,
        AggregationError::Assumption(AssumptionViolation::LaneCoverage {
            series: "N0.C01/N0.C01.D0.R0".to_string(),
            lane: 1,
            seen: 1,
            files: 2,
        })
    );
}

#[test]
fn test_lane_beyond_capacity() {
    let config = AggregationConfig {
        lane_capacity: 4,
        expected_lanes: None,
    };
    let err = average_lane_rows(&[row("N0.C00.D0.R0.L04:", &["1"])], 1, &vars(&["v"]), config)
        .unwrap_err();

    assert!(matches!(
        err,
        AggregationError::Parse(ParseError::LaneOutOfRange { lane: 4, capacity: 4, .. })
    ));
}

#[test]
fn test_label_outside_grammar() {
    let err = average_lane_rows(&[row("garbage", &["1"])], 1, &vars(&["v"]), AggregationConfig::default())
        .unwrap_err();
    assert!(matches!(err, AggregationError::Parse(ParseError::InvalidLabel { .. })));
}

#[test]
fn test_empty_rows_give_no_series() {
    let averages = average_lane_rows(&[], 3, &vars(&["v"]), AggregationConfig::default()).unwrap();
    assert!(averages.is_empty());
}
