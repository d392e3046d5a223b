mod common;

use common::{write_vendor, LANES};
use rmt_margin_studio::commands::{execute_analyze, validate_args, AnalyzeArgs};
use rmt_margin_studio::output::read_report;
use rmt_margin_studio::parser::{Cpu, MarginKind, MarginType};
use rmt_margin_studio::utils::config::{OutputToggles, RunConfig};

fn run_config(expected_lanes: Option<usize>) -> RunConfig {
    RunConfig {
        bootstrap: true,
        include_margin_line: true,
        expected_lanes,
        outputs: OutputToggles {
            histogram: true,
            vendor_table: true,
            variable_table: true,
            comparator: true,
            ..Default::default()
        },
        ..Default::default()
    }
}

#[test]
fn test_analyze_two_vendors() {
    let root = tempfile::tempdir().unwrap();
    let hynix = write_vendor(root.path(), "DDR5_RMT_Hynix_2023_07", &[0, 2]);
    let micron = write_vendor(root.path(), "DDR5_RMT_Micron_2023_07", &[1, 3]);

    let args = AnalyzeArgs {
        folders: vec![hynix, micron],
        config: run_config(Some(LANES)),
        csv_dir: root.path().join("csv"),
        output_json: root.path().join("report.json"),
        ..Default::default()
    };
    validate_args(&args).unwrap();

    let report = execute_analyze(args).unwrap();
    let names: Vec<&str> = report.vendors.iter().map(|v| v.name.as_str()).collect();
    assert_eq!(names, ["Hynix", "Micron"]);
    assert!(report.bootstrap);
    assert_eq!(report.margin_line, Some(6.0));

    let loaded = read_report(root.path().join("report.json")).unwrap();
    let lane = loaded
        .section(MarginKind::new(Cpu::Cpu1, MarginType::Lane))
        .unwrap();
    assert_eq!(lane.lane_averages.len(), 2);
    assert_eq!(lane.statistics[0].variables[0].summary.unwrap().sample_count, 1000);
    assert!(lane.charts[0].vendors[1].histogram.is_some());

    assert!(root.path().join("csv/Micron_CPU1LaneMargin.csv").exists());
}

#[test]
fn test_analyze_rejects_unequal_file_counts() {
    let root = tempfile::tempdir().unwrap();
    let hynix = write_vendor(root.path(), "DDR5_RMT_Hynix_2023_07", &[0, 2]);
    let micron = write_vendor(root.path(), "DDR5_RMT_Micron_2023_07", &[1]);

    let args = AnalyzeArgs {
        folders: vec![hynix, micron],
        config: run_config(None),
        csv_dir: root.path().join("csv"),
        output_json: root.path().join("report.json"),
        ..Default::default()
    };

    let err = execute_analyze(args).unwrap_err();
    assert!(format!("{:#}", err).contains("different file counts"));
    assert!(!root.path().join("report.json").exists());
    assert!(!root.path().join("csv").exists());
}

#[test]
fn test_analyze_lane_count_mismatch() {
    let root = tempfile::tempdir().unwrap();
    let hynix = write_vendor(root.path(), "DDR5_RMT_Hynix_2023_07", &[0]);

    // default config expects 40 lanes per series; the logs carry 4
    let args = AnalyzeArgs {
        folders: vec![hynix],
        config: run_config(Some(40)),
        output_json: root.path().join("report.json"),
        csv_dir: root.path().join("csv"),
        ..Default::default()
    };

    let err = execute_analyze(args).unwrap_err();
    assert!(format!("{:#}", err).contains("has 4 lanes, expected 40"));
    assert!(!root.path().join("csv").exists());
}

#[test]
fn test_analyze_parse_failure_writes_no_rows() {
    let root = tempfile::tempdir().unwrap();
    let hynix = write_vendor(root.path(), "DDR5_RMT_Hynix_2023_07", &[0]);
    let micron = write_vendor(root.path(), "DDR5_RMT_Micron_2023_07", &[1]);
    std::fs::write(micron.join("rmt_99.log"), "no markers here\n").unwrap();

    let args = AnalyzeArgs {
        folders: vec![hynix, micron],
        config: run_config(None),
        csv_dir: root.path().join("csv"),
        output_json: root.path().join("report.json"),
        ..Default::default()
    };

    let err = execute_analyze(args).unwrap_err();
    assert!(format!("{:#}", err).contains("START_RMT_N0"));
    assert!(!root.path().join("csv").exists());
}

#[test]
fn test_analyze_explicit_vendor_names_without_csv() {
    let root = tempfile::tempdir().unwrap();
    let folder = write_vendor(root.path(), "run", &[0, 1]);

    let mut config = run_config(None);
    config.write_raw_csv = false;

    let args = AnalyzeArgs {
        folders: vec![folder],
        vendors: vec!["Samsung".to_string()],
        config,
        csv_dir: root.path().join("csv"),
        output_json: root.path().join("report.json"),
        print_summary: true,
    };

    let report = execute_analyze(args).unwrap();
    assert_eq!(report.vendors[0].name, "Samsung");
    assert!(!root.path().join("csv").exists());
}
