use serde_json::Value;
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

const WORKSPACE_DOCUMENT: &str = r#"
{
  "title": "run 42",
  "spectrumNumber": 7,
  "detectorIds": [12, 11],
  "xMode": "binEdges",
  "yMode": "counts",
  "x": [0.0, 1.0, 3.0, 6.0],
  "y": [2.0, 4.0, 6.0],
  "e": [1.0, 2.0, 3.0]
}
"#;

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("parent directory should be created");
    }
    fs::write(path, content).expect("file should be written");
}

fn run_histo(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_histo"))
        .args(args)
        .output()
        .expect("histo binary should run")
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).expect("output should be readable"))
        .expect("output JSON should parse")
}

fn numbers(value: &Value) -> Vec<f64> {
    value
        .as_array()
        .expect("value should be an array")
        .iter()
        .map(|item| item.as_f64().expect("item should be a number"))
        .collect()
}

fn workspace_file(temp: &TempDir) -> std::path::PathBuf {
    let path = temp.path().join("inputs/run42.json");
    write_file(&path, WORKSPACE_DOCUMENT);
    path
}

#[test]
fn inspect_prints_modes_and_sizes() {
    let temp = TempDir::new().expect("tempdir should be created");
    let input = workspace_file(&temp);

    let output = run_histo(&["inspect", input.to_str().expect("utf-8 path")]);

    assert!(
        output.status.success(),
        "inspect should succeed, stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Title: run 42"), "stdout: {stdout}");
    assert!(stdout.contains("Detector IDs: [11, 12]"), "stdout: {stdout}");
    assert!(stdout.contains("X mode: BinEdges"), "stdout: {stdout}");
    assert!(stdout.contains("Y mode: Counts"), "stdout: {stdout}");
    assert!(stdout.contains("Size: 3"), "stdout: {stdout}");
    assert!(stdout.contains("Blocksize: 3"), "stdout: {stdout}");
}

#[test]
fn inspect_reports_unbounded_blocksize_for_empty_workspaces() {
    let temp = TempDir::new().expect("tempdir should be created");
    let input = temp.path().join("empty.json");
    write_file(
        &input,
        r#"{ "xMode": "points", "yMode": "frequencies", "x": [], "y": [], "e": [] }"#,
    );

    let output = run_histo(&["inspect", input.to_str().expect("utf-8 path")]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Size: 0"), "stdout: {stdout}");
    assert!(stdout.contains("Blocksize: 1000000000"), "stdout: {stdout}");
}

#[test]
fn mask_writes_a_new_document_and_leaves_the_input_alone() {
    let temp = TempDir::new().expect("tempdir should be created");
    let input = workspace_file(&temp);
    let masked = temp.path().join("outputs/masked.json");

    let output = run_histo(&[
        "mask",
        input.to_str().expect("utf-8 path"),
        "--bin",
        "1",
        "--weight",
        "0.5",
        "--output",
        masked.to_str().expect("utf-8 path"),
    ]);

    assert!(
        output.status.success(),
        "mask should succeed, stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let written = read_json(&masked);
    assert_eq!(numbers(&written["y"]), vec![2.0, 2.0, 6.0]);
    assert_eq!(numbers(&written["e"]), vec![1.0, 1.0, 3.0]);
    assert_eq!(written["spectrumNumber"], Value::from(7));

    let original = read_json(&input);
    assert_eq!(numbers(&original["y"]), vec![2.0, 4.0, 6.0]);
}

#[test]
fn mask_out_of_range_bin_exits_with_out_of_range_code() {
    let temp = TempDir::new().expect("tempdir should be created");
    let input = workspace_file(&temp);

    let output = run_histo(&[
        "mask",
        input.to_str().expect("utf-8 path"),
        "--bin",
        "3",
        "--weight",
        "1",
    ]);

    assert_eq!(output.status.code(), Some(5));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("ERROR: [HISTOGRAM.BIN_INDEX]"),
        "stderr: {stderr}"
    );
}

#[test]
fn mask_rejects_weights_outside_unit_interval() {
    let temp = TempDir::new().expect("tempdir should be created");
    let input = workspace_file(&temp);

    let output = run_histo(&[
        "mask",
        input.to_str().expect("utf-8 path"),
        "--bin",
        "0",
        "--weight",
        "-0.25",
    ]);

    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("HISTOGRAM.BIN_WEIGHT"));
}

#[test]
fn clear_rewrites_the_input_in_place() {
    let temp = TempDir::new().expect("tempdir should be created");
    let input = workspace_file(&temp);

    let output = run_histo(&["clear", input.to_str().expect("utf-8 path")]);

    assert!(output.status.success());
    let written = read_json(&input);
    assert_eq!(numbers(&written["x"]), vec![0.0, 1.0, 3.0, 6.0]);
    assert_eq!(numbers(&written["y"]), vec![0.0, 0.0, 0.0]);
    assert_eq!(numbers(&written["e"]), vec![0.0, 0.0, 0.0]);
}

#[test]
fn convert_divides_by_bin_width() {
    let temp = TempDir::new().expect("tempdir should be created");
    let input = workspace_file(&temp);
    let converted = temp.path().join("frequencies.json");

    let output = run_histo(&[
        "convert",
        input.to_str().expect("utf-8 path"),
        "--to",
        "frequencies",
        "--output",
        converted.to_str().expect("utf-8 path"),
    ]);

    assert!(
        output.status.success(),
        "convert should succeed, stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let written = read_json(&converted);
    assert_eq!(written["yMode"], Value::from("frequencies"));
    assert_eq!(numbers(&written["y"]), vec![2.0, 2.0, 2.0]);
    assert_eq!(numbers(&written["e"]), vec![1.0, 1.0, 1.0]);
}

#[test]
fn convert_rejects_unknown_modes_as_usage_errors() {
    let temp = TempDir::new().expect("tempdir should be created");
    let input = workspace_file(&temp);

    let output = run_histo(&[
        "convert",
        input.to_str().expect("utf-8 path"),
        "--to",
        "uninitialized",
    ]);

    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("ERROR: [CLI.USAGE]"));
}

#[test]
fn missing_input_exits_with_io_code() {
    let temp = TempDir::new().expect("tempdir should be created");
    let missing = temp.path().join("missing.json");

    let output = run_histo(&["inspect", missing.to_str().expect("utf-8 path")]);

    assert_eq!(output.status.code(), Some(3));
    assert!(String::from_utf8_lossy(&output.stderr).contains("ERROR: [DOCUMENT.READ]"));
}

#[test]
fn debug_log_level_writes_to_stderr_only() {
    let temp = TempDir::new().expect("tempdir should be created");
    let input = workspace_file(&temp);

    let output = run_histo(&[
        "--log-level",
        "debug",
        "inspect",
        input.to_str().expect("utf-8 path"),
    ]);

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("loaded workspace"), "stderr: {stderr}");
    assert!(!String::from_utf8_lossy(&output.stdout).contains("loaded workspace"));
}
