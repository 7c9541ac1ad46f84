//! Go `testing` benchmark output parsing
//!
//! Accepts the line format produced by `go test -bench`: lowercase
//! `key: value` configuration lines (goos, goarch, pkg, ...) followed by
//! result lines like
//!
//! ```text
//! BenchmarkDecode-8   1000000   123.4 ns/op   45 B/op   2 allocs/op
//! ```
//!
//! Lines that match neither shape are skipped; parsing never fails.

use std::collections::BTreeMap;

/// One benchmark result line
#[derive(Debug, Clone, PartialEq)]
pub struct BenchResult {
    /// Benchmark name with the `Benchmark` prefix stripped (e.g. `Decode-8`)
    pub name: String,
    /// Configuration labels in effect when the line appeared
    pub labels: BTreeMap<String, String>,
    /// (value, unit) pairs, e.g. `(123.4, "ns/op")`
    pub values: Vec<(f64, String)>,
}

/// Parse one benchmark output file's contents
pub fn parse(text: &str) -> Vec<BenchResult> {
    let mut labels: BTreeMap<String, String> = BTreeMap::new();
    let mut results = Vec::new();

    for line in text.lines() {
        if let Some(result) = parse_result_line(line, &labels) {
            results.push(result);
        } else if let Some((key, value)) = parse_config_line(line) {
            labels.insert(key.to_string(), value.to_string());
        }
    }

    results
}

fn parse_config_line(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once(':')?;
    // Config keys are lowercase identifiers; anything else is benchmark
    // chatter (timings, PASS/FAIL, file paths).
    if key.is_empty()
        || !key
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
    {
        return None;
    }
    Some((key, value.trim()))
}

fn parse_result_line(line: &str, labels: &BTreeMap<String, String>) -> Option<BenchResult> {
    let name = line.strip_prefix("Benchmark")?;
    let mut fields = line.split_whitespace();
    let full_name = fields.next()?;
    // The benchmark name proper starts with an uppercase letter after the
    // prefix (`Benchmarks: ...` summary lines do not).
    if !name.starts_with(|c: char| c.is_ascii_uppercase()) {
        return None;
    }
    // The iteration count itself is unused downstream, but a line without
    // an integer in that slot is not a benchmark result.
    let _: u64 = fields.next()?.parse().ok()?;

    let mut values = Vec::new();
    loop {
        let Some(raw) = fields.next() else { break };
        let value: f64 = raw.parse().ok()?;
        let unit = fields.next()?;
        values.push((value, unit.to_string()));
    }
    if values.is_empty() {
        return None;
    }

    Some(BenchResult {
        name: full_name.trim_start_matches("Benchmark").to_string(),
        labels: labels.clone(),
        values,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
goos: linux
goarch: amd64
pkg: example.com/codec
BenchmarkDecode-8   1000000   123.4 ns/op   45 B/op   2 allocs/op
BenchmarkDecode-8   1200000   119.8 ns/op   45 B/op   2 allocs/op
PASS
ok  \texample.com/codec\t2.143s
";

    #[test]
    fn test_parse_result_lines() {
        let results = parse(SAMPLE);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].name, "Decode-8");
        assert_eq!(results[0].values.len(), 3);
        assert_eq!(results[0].values[0], (123.4, "ns/op".to_string()));
        assert_eq!(results[0].values[1], (45.0, "B/op".to_string()));
    }

    #[test]
    fn test_config_labels_attach_to_results() {
        let results = parse(SAMPLE);
        assert_eq!(results[0].labels.get("goos").map(String::as_str), Some("linux"));
        assert_eq!(
            results[0].labels.get("pkg").map(String::as_str),
            Some("example.com/codec")
        );
    }

    #[test]
    fn test_labels_change_mid_file() {
        let text = "\
pkg: example.com/a
BenchmarkX-4 100 10.0 ns/op
pkg: example.com/b
BenchmarkX-4 100 20.0 ns/op
";
        let results = parse(text);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].labels.get("pkg").map(String::as_str), Some("example.com/a"));
        assert_eq!(results[1].labels.get("pkg").map(String::as_str), Some("example.com/b"));
    }

    #[test]
    fn test_non_matching_lines_are_skipped() {
        let results = parse("PASS\nok\ttotal 1.2s\nrandom noise\n");
        assert!(results.is_empty());
    }

    #[test]
    fn test_malformed_result_line_is_skipped() {
        // Missing unit after the value.
        let results = parse("BenchmarkX-4 100 10.0\n");
        assert!(results.is_empty());
    }

    #[test]
    fn test_non_integer_iteration_count_is_skipped() {
        let results = parse("BenchmarkX-4 lots 10.0 ns/op\n");
        assert!(results.is_empty());
    }
}
