//! Benchstat-style text rendering of classified tables
//!
//! The classifier decides the verdict; this module only lays the rows out
//! and paints the delta column: red for regressions, green for
//! improvements, yellow for noise.

use crate::bench::table::{DeltaClass, Table};
use console::Style;
use std::fmt::Write;

/// Render all tables as aligned text, one block per (group, unit)
pub fn format_tables(tables: &[Table], colors: bool) -> String {
    let mut out = String::new();
    for table in tables {
        if table.rows.is_empty() {
            continue;
        }
        if !out.is_empty() {
            out.push('\n');
        }
        format_table(&mut out, table, colors);
    }
    out
}

fn format_table(out: &mut String, table: &Table, colors: bool) {
    if !table.group.is_empty() {
        let _ = writeln!(out, "{}", table.group);
    }

    let two_columns = table.columns.len() == 2;
    let name_width = table
        .rows
        .iter()
        .map(|r| r.benchmark.len())
        .chain(["name".len()])
        .max()
        .unwrap_or(0);

    let headers: Vec<String> = if two_columns {
        vec![
            format!("old {}", table.unit),
            format!("new {}", table.unit),
        ]
    } else {
        table
            .columns
            .iter()
            .map(|c| format!("{} {}", c, table.unit))
            .collect()
    };
    let cell_width = headers.iter().map(String::len).max().unwrap_or(0).max(12);

    let _ = write!(out, "{:<name_width$}", "name");
    for header in &headers {
        let _ = write!(out, "  {:>cell_width$}", header);
    }
    if two_columns {
        let _ = write!(out, "  delta");
    }
    out.push('\n');

    for row in &table.rows {
        let _ = write!(out, "{:<name_width$}", row.benchmark);
        for metric in &row.metrics {
            let _ = write!(out, "  {:>cell_width$}", format_value(metric.mean));
        }
        if two_columns {
            let _ = write!(out, "  {}", paint(&row.delta, row.class, colors));
        }
        out.push('\n');
    }
}

/// Means span nanoseconds to allocation counts; three significant-ish
/// decimals for small values, none for large ones
fn format_value(v: f64) -> String {
    if v == 0.0 {
        "0".to_string()
    } else if v.abs() >= 1000.0 {
        format!("{:.0}", v)
    } else if v.abs() >= 1.0 {
        format!("{:.2}", v)
    } else {
        format!("{:.3}", v)
    }
}

fn paint(delta: &str, class: DeltaClass, colors: bool) -> String {
    if !colors {
        return delta.to_string();
    }
    let style = match class {
        DeltaClass::Regression => Style::new().red(),
        DeltaClass::Improvement => Style::new().green(),
        DeltaClass::Neutral => Style::new().yellow(),
    };
    style.force_styling(true).apply_to(delta).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bench::table::{Metric, Row};

    fn sample_table() -> Table {
        Table {
            group: "pkg: example.com/codec".to_string(),
            unit: "ns/op".to_string(),
            columns: vec!["old.txt".to_string(), "new.txt".to_string()],
            rows: vec![Row {
                benchmark: "Decode-8".to_string(),
                metrics: vec![
                    Metric::from_values("ns/op", vec![102.0]),
                    Metric::from_values("ns/op", vec![92.0]),
                ],
                pct_delta: -9.8,
                delta: "-9.80%".to_string(),
                class: DeltaClass::Improvement,
            }],
        }
    }

    #[test]
    fn test_plain_output_layout() {
        let text = format_tables(&[sample_table()], false);
        assert!(text.starts_with("pkg: example.com/codec\n"));
        assert!(text.contains("old ns/op"));
        assert!(text.contains("new ns/op"));
        assert!(text.contains("delta"));
        assert!(text.contains("Decode-8"));
        assert!(text.contains("-9.80%"));
        assert!(!text.contains("\x1b["));
    }

    #[test]
    fn test_colored_delta() {
        let text = format_tables(&[sample_table()], true);
        // Improvement paints green (SGR 32).
        assert!(text.contains("\x1b[32m-9.80%\x1b[0m"));
    }

    #[test]
    fn test_empty_tables_render_nothing() {
        let mut table = sample_table();
        table.rows.clear();
        assert_eq!(format_tables(&[table], false), "");
    }

    #[test]
    fn test_format_value_precision() {
        assert_eq!(format_value(0.0), "0");
        assert_eq!(format_value(0.1234), "0.123");
        assert_eq!(format_value(12.345), "12.35");
        assert_eq!(format_value(12345.6), "12346");
    }
}
