use assert_cmd::cargo::cargo_bin_cmd;
use serde::Deserialize;
use std::{error::Error, fs, path::PathBuf};

#[derive(Deserialize)]
struct Stats {
    length: usize,
    mean: f64,
    std: f64,
    min: f64,
    max: f64,
}

#[derive(Deserialize)]
struct Event {
    start_time: f64,
    end_time: f64,
    duration: f64,
    start_index: usize,
    end_index: usize,
    severity: String,
}

#[derive(Deserialize)]
struct ProbPoint {
    time: f64,
    probability: f64,
}

#[derive(Deserialize)]
struct AnalysisOutput {
    apnea_count: usize,
    ahi: f64,
    severity: String,
    duration_hours: f64,
    apnea_events: Vec<Event>,
    probability_data: Vec<ProbPoint>,
    signal_stats: Stats,
}

#[derive(Deserialize)]
struct UploadOutput {
    analysis: AnalysisOutput,
    signal_data: Vec<ProbTimeValue>,
}

#[derive(Deserialize)]
struct ProbTimeValue {
    time: f64,
    value: f64,
}

#[test]
fn analyze_csv_reports_full_statistics() -> Result<(), Box<dyn Error>> {
    let mut cmd = cargo_bin_cmd!("somnus");
    cmd.args([
        "analyze",
        "--input",
        &sample_path("test_data/ecg_sample.csv"),
        "--seed",
        "7",
    ]);
    let output = cmd.assert().success().get_output().stdout.clone();
    let actual: AnalysisOutput = serde_json::from_slice(&output)?;

    assert_eq!(actual.signal_stats.length, 500);
    assert!(actual.signal_stats.min <= actual.signal_stats.mean);
    assert!(actual.signal_stats.mean <= actual.signal_stats.max);
    assert!(actual.signal_stats.std >= 0.0);
    // 500 samples at 250 Hz is exactly two full windows.
    assert_eq!(actual.probability_data.len(), 2);
    assert!(actual
        .probability_data
        .iter()
        .all(|p| (0.0..=1.0).contains(&p.probability) && p.time >= 0.0));
    assert!(actual.apnea_events.len() <= 50);
    assert!(actual.ahi >= 0.0);
    assert!((actual.duration_hours - 500.0 / (250.0 * 3600.0)).abs() < 1e-9);
    assert!(["Normal", "Mild", "Moderate", "Severe"].contains(&actual.severity.as_str()));
    for event in &actual.apnea_events {
        assert_eq!(event.start_index % 250, 0);
        assert_eq!(event.end_index % 250, 0);
        assert!(event.end_time > event.start_time);
        assert!((event.duration - (event.end_time - event.start_time)).abs() < 1e-9);
        assert!(["mild", "moderate", "severe"].contains(&event.severity.as_str()));
    }
    Ok(())
}

#[test]
fn same_seed_runs_are_reproducible() -> Result<(), Box<dyn Error>> {
    let input = sample_path("test_data/ecg_sample.csv");
    let run = || {
        let mut cmd = cargo_bin_cmd!("somnus");
        cmd.args([
            "analyze",
            "--input",
            &input,
            "--sensitivity",
            "0.8",
            "--seed",
            "42",
        ]);
        cmd.assert().success().get_output().stdout.clone()
    };
    assert_eq!(run(), run());
    Ok(())
}

#[test]
fn zero_sensitivity_yields_normal() -> Result<(), Box<dyn Error>> {
    let mut cmd = cargo_bin_cmd!("somnus");
    cmd.args([
        "analyze",
        "--input",
        &sample_path("test_data/ecg_sample.csv"),
        "--sensitivity",
        "0",
    ]);
    let output = cmd.assert().success().get_output().stdout.clone();
    let actual: AnalysisOutput = serde_json::from_slice(&output)?;
    assert_eq!(actual.apnea_count, 0);
    assert!(actual.apnea_events.is_empty());
    assert_eq!(actual.ahi, 0.0);
    assert_eq!(actual.severity, "Normal");
    Ok(())
}

#[test]
fn extract_plain_text_counts_samples() -> Result<(), Box<dyn Error>> {
    let mut cmd = cargo_bin_cmd!("somnus");
    cmd.args(["extract", "--input", &sample_path("test_data/ecg_sample.txt")]);
    let output = cmd.assert().success().get_output().stdout.clone();
    let samples: Vec<f64> = serde_json::from_slice(&output)?;
    assert_eq!(samples.len(), 300);
    Ok(())
}

#[test]
fn structured_payload_analyzes() -> Result<(), Box<dyn Error>> {
    let mut cmd = cargo_bin_cmd!("somnus");
    cmd.args([
        "analyze",
        "--input",
        &sample_path("test_data/ecg_sample.json"),
        "--seed",
        "3",
    ]);
    let output = cmd.assert().success().get_output().stdout.clone();
    let actual: AnalysisOutput = serde_json::from_slice(&output)?;
    assert_eq!(actual.signal_stats.length, 250);
    assert_eq!(actual.probability_data.len(), 1);
    assert!(actual.apnea_count <= 1);
    Ok(())
}

#[test]
fn tagged_payload_extracts_last_tokens() -> Result<(), Box<dyn Error>> {
    let mut cmd = cargo_bin_cmd!("somnus");
    cmd.args(["extract", "--input", &sample_path("test_data/ecg_sample.apn")]);
    let output = cmd.assert().success().get_output().stdout.clone();
    let samples: Vec<f64> = serde_json::from_slice(&output)?;
    assert_eq!(samples.len(), 250);
    assert_eq!(samples[0], 0.0);
    Ok(())
}

#[test]
fn format_flag_overrides_extension() -> Result<(), Box<dyn Error>> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("export.dat");
    fs::write(&path, "signal\n0.1\n0.2\n0.3\n")?;
    let mut cmd = cargo_bin_cmd!("somnus");
    cmd.args([
        "extract",
        "--input",
        path.to_str().expect("utf8 path"),
        "--format",
        "delimited",
    ]);
    let output = cmd.assert().success().get_output().stdout.clone();
    let samples: Vec<f64> = serde_json::from_slice(&output)?;
    assert_eq!(samples, vec![0.1, 0.2, 0.3]);
    Ok(())
}

#[test]
fn non_numeric_payload_fails() {
    let mut cmd = cargo_bin_cmd!("somnus");
    cmd.args([
        "analyze",
        "--input",
        &sample_path("test_data/nonnumeric_sample.txt"),
    ]);
    cmd.assert().failure();
}

#[test]
fn empty_payload_fails_without_a_result() -> Result<(), Box<dyn Error>> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("empty.txt");
    fs::write(&path, "")?;
    let mut cmd = cargo_bin_cmd!("somnus");
    cmd.args(["analyze", "--input", path.to_str().expect("utf8 path")]);
    let failed = cmd.assert().failure();
    assert!(failed.get_output().stdout.is_empty());
    Ok(())
}

#[test]
fn include_signal_emits_bounded_curve() -> Result<(), Box<dyn Error>> {
    let mut cmd = cargo_bin_cmd!("somnus");
    cmd.args([
        "analyze",
        "--input",
        &sample_path("test_data/ecg_sample.csv"),
        "--seed",
        "1",
        "--include-signal",
    ]);
    let output = cmd.assert().success().get_output().stdout.clone();
    let actual: UploadOutput = serde_json::from_slice(&output)?;
    // Under the 5000-point cap the curve passes through unchanged.
    assert_eq!(actual.signal_data.len(), 500);
    assert_eq!(actual.signal_data[0].time, 0.0);
    assert!(actual.signal_data[1].time > 0.0);
    assert!(actual.signal_data.iter().all(|p| p.value.is_finite()));
    assert_eq!(actual.analysis.signal_stats.length, 500);
    Ok(())
}

fn workspace_root() -> PathBuf {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent()
        .expect("crates dir")
        .parent()
        .expect("workspace root")
        .to_path_buf()
}

fn sample_path(relative: &str) -> String {
    workspace_root()
        .join(relative)
        .to_string_lossy()
        .to_string()
}
