//! End-to-end benchstat tests over fixture benchmark files

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const OLD: &str = "\
goos: linux
goarch: amd64
pkg: example.com/codec
BenchmarkDecode-8 1000 100.0 ns/op
BenchmarkDecode-8 1000 101.0 ns/op
BenchmarkDecode-8 1000 100.0 ns/op
BenchmarkDecode-8 1000 102.0 ns/op
BenchmarkDecode-8 1000 100.0 ns/op
BenchmarkEncode-8 1000 50.0 ns/op
BenchmarkEncode-8 1000 50.0 ns/op
BenchmarkEncode-8 1000 51.0 ns/op
BenchmarkEncode-8 1000 50.0 ns/op
BenchmarkEncode-8 1000 50.0 ns/op
";

const NEW: &str = "\
goos: linux
goarch: amd64
pkg: example.com/codec
BenchmarkDecode-8 1000 80.0 ns/op
BenchmarkDecode-8 1000 81.0 ns/op
BenchmarkDecode-8 1000 80.0 ns/op
BenchmarkDecode-8 1000 82.0 ns/op
BenchmarkDecode-8 1000 80.0 ns/op
BenchmarkEncode-8 1000 50.0 ns/op
BenchmarkEncode-8 1000 51.0 ns/op
BenchmarkEncode-8 1000 50.0 ns/op
BenchmarkEncode-8 1000 50.0 ns/op
BenchmarkEncode-8 1000 50.0 ns/op
";

fn write_fixtures(dir: &TempDir) -> (String, String) {
    let old = dir.path().join("old.txt");
    let new = dir.path().join("new.txt");
    fs::write(&old, OLD).unwrap();
    fs::write(&new, NEW).unwrap();
    (
        old.to_string_lossy().into_owned(),
        new.to_string_lossy().into_owned(),
    )
}

#[test]
fn test_benchstat_classifies_signal_and_noise() {
    let dir = TempDir::new().unwrap();
    let (old, new) = write_fixtures(&dir);
    let output = Command::cargo_bin("perftuner")
        .unwrap()
        .args(["benchstat", "--no-color", &old, &new])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let text = String::from_utf8(output).unwrap();

    // ~20% improvement on Decode is a signal; Encode moved within epsilon.
    let decode = text.lines().find(|l| l.contains("Decode-8")).unwrap();
    assert!(decode.contains("-19.88%"), "expected an improvement: {decode}");
    let encode = text.lines().find(|l| l.contains("Encode-8")).unwrap();
    assert!(encode.trim_end().ends_with('~'), "expected noise: {encode}");

    assert!(text.contains("pkg: example.com/codec"));
    assert!(text.contains("old ns/op"));
    assert!(text.contains("new ns/op"));
}

#[test]
fn test_benchstat_colors_on_by_default() {
    let dir = TempDir::new().unwrap();
    let (old, new) = write_fixtures(&dir);
    Command::cargo_bin("perftuner")
        .unwrap()
        .args(["benchstat", &old, &new])
        .assert()
        .success()
        // Decode improvement painted green.
        .stdout(predicate::str::contains("\x1b[32m"));
}

#[test]
fn test_benchstat_geomean_row() {
    let dir = TempDir::new().unwrap();
    let (old, new) = write_fixtures(&dir);
    Command::cargo_bin("perftuner")
        .unwrap()
        .args(["benchstat", "--geomean", "--no-color", &old, &new])
        .assert()
        .success()
        .stdout(predicate::str::contains("[Geo mean]"));
}

#[test]
fn test_benchstat_geomean_pruned_below_noise_floor() {
    let dir = TempDir::new().unwrap();
    let tiny = dir.path().join("tiny.txt");
    fs::write(
        &tiny,
        "BenchmarkNop-8 1000000000 0.002 ns/op\nBenchmarkNop-8 1000000000 0.002 ns/op\n",
    )
    .unwrap();
    let tiny = tiny.to_string_lossy().into_owned();
    Command::cargo_bin("perftuner")
        .unwrap()
        .args(["benchstat", "--geomean", "--no-color", &tiny, &tiny])
        .assert()
        .success()
        .stdout(predicate::str::contains("[Geo mean]").not());
}

#[test]
fn test_benchstat_json_output() {
    let dir = TempDir::new().unwrap();
    let (old, new) = write_fixtures(&dir);
    let output = Command::cargo_bin("perftuner")
        .unwrap()
        .args(["--json", "benchstat", &old, &new])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let parsed: serde_json::Value = serde_json::from_slice(&output).unwrap();
    let tables = parsed.as_array().unwrap();
    assert_eq!(tables.len(), 1);
    assert_eq!(tables[0]["unit"], "ns/op");
    let rows = tables[0]["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["benchmark"], "Decode-8");
    assert_eq!(rows[1]["delta"], "~");
}

#[test]
fn test_benchstat_invalid_sort_argument_fails() {
    let dir = TempDir::new().unwrap();
    let (old, _) = write_fixtures(&dir);
    Command::cargo_bin("perftuner")
        .unwrap()
        .args(["benchstat", "--sort", "speed", &old])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid sort argument"));
}

#[test]
fn test_benchstat_missing_file_reports_path() {
    Command::cargo_bin("perftuner")
        .unwrap()
        .args(["benchstat", "/definitely/missing/bench.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("/definitely/missing/bench.txt"));
}
