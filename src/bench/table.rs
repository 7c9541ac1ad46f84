//! Benchmark comparison table construction
//!
//! Groups parsed benchmark results by split labels, one table per
//! (split group, unit), one column per input file, and computes the
//! per-cell mean/min/max the significance classifier consumes. Row order
//! follows first appearance in the input and is never changed afterwards
//! except by explicit sorting here.

use crate::bench::parse::BenchResult;
use anyhow::{bail, Result};
use serde::Serialize;
use std::collections::HashMap;

/// Synthetic row name carrying the geometric-mean summary of a table
pub const GEO_MEAN: &str = "[Geo mean]";

/// Aggregated samples for one benchmark in one comparison column
#[derive(Debug, Clone, Default, Serialize)]
pub struct Metric {
    pub unit: String,
    /// Raw samples, one per benchmark run
    pub values: Vec<f64>,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

impl Metric {
    pub fn from_values(unit: &str, values: Vec<f64>) -> Self {
        let mut metric = Self {
            unit: unit.to_string(),
            values,
            ..Self::default()
        };
        if !metric.values.is_empty() {
            metric.mean = metric.values.iter().sum::<f64>() / metric.values.len() as f64;
            metric.min = metric.values.iter().copied().fold(f64::INFINITY, f64::min);
            metric.max = metric.values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        }
        metric
    }
}

/// Noise/signal verdict the classifier attaches to a row's delta
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeltaClass {
    /// Delta within the estimated noise band, or no delta at all
    Neutral,
    /// Metric went up (a `+` delta; worse for cost-like units)
    Regression,
    /// Metric went down
    Improvement,
}

/// One benchmark across all comparison columns
#[derive(Debug, Clone, Serialize)]
pub struct Row {
    pub benchmark: String,
    pub metrics: Vec<Metric>,
    /// Percentage change between the first and last column means
    pub pct_delta: f64,
    /// Formatted delta label, e.g. `"+3.12%"`; the classifier may rewrite
    /// it to `"~"`
    pub delta: String,
    pub class: DeltaClass,
}

/// All rows for one (split group, unit) pair
#[derive(Debug, Clone, Serialize)]
pub struct Table {
    /// Split group description, e.g. `"pkg: example.com/codec goos: linux"`
    pub group: String,
    pub unit: String,
    /// Column headers, one per input file
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

/// Row ordering applied before the geo-mean row is appended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    None,
    Name,
    Delta,
}

/// Parse a `[-]name|[-]delta|none` sort argument into (order, reverse)
pub fn parse_order(arg: &str) -> Result<(Order, bool)> {
    let (reverse, name) = match arg.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, arg),
    };
    let order = match name {
        "none" => Order::None,
        "name" => Order::Name,
        "delta" => Order::Delta,
        _ => bail!("invalid sort argument: {:?}", arg),
    };
    Ok((order, reverse))
}

/// Accumulates benchmark files and produces comparison tables
#[derive(Debug)]
pub struct Collection {
    split_by: Vec<String>,
    add_geo_mean: bool,
    order: Order,
    reverse: bool,
    files: Vec<(String, Vec<BenchResult>)>,
}

impl Collection {
    pub fn new(split_by: Vec<String>, add_geo_mean: bool, order: Order, reverse: bool) -> Self {
        Self {
            split_by,
            add_geo_mean,
            order,
            reverse,
            files: Vec::new(),
        }
    }

    /// Add one benchmark file as the next comparison column
    pub fn add_file(&mut self, label: &str, results: Vec<BenchResult>) {
        self.files.push((label.to_string(), results));
    }

    /// Build one table per (split group, unit), columns in file order
    pub fn tables(&self) -> Vec<Table> {
        let columns: Vec<String> = self.files.iter().map(|(label, _)| label.clone()).collect();

        // (group, unit) -> table index; (group, unit, benchmark) -> row
        // samples per column. Insertion order drives output order.
        let mut table_keys: Vec<(String, String)> = Vec::new();
        let mut row_keys: HashMap<(String, String), Vec<String>> = HashMap::new();
        let mut samples: HashMap<(String, String, String), Vec<Vec<f64>>> = HashMap::new();

        for (col, (_, results)) in self.files.iter().enumerate() {
            for result in results {
                let group = self.group_key(result);
                for (value, unit) in &result.values {
                    let table_key = (group.clone(), unit.clone());
                    if !table_keys.contains(&table_key) {
                        table_keys.push(table_key.clone());
                    }
                    let rows = row_keys.entry(table_key).or_default();
                    if !rows.contains(&result.name) {
                        rows.push(result.name.clone());
                    }
                    let cells = samples
                        .entry((group.clone(), unit.clone(), result.name.clone()))
                        .or_insert_with(|| vec![Vec::new(); self.files.len()]);
                    cells[col].push(*value);
                }
            }
        }

        let mut tables = Vec::new();
        for (group, unit) in table_keys {
            let mut rows = Vec::new();
            for benchmark in &row_keys[&(group.clone(), unit.clone())] {
                let cells = &samples[&(group.clone(), unit.clone(), benchmark.clone())];
                let metrics: Vec<Metric> = cells
                    .iter()
                    .map(|values| Metric::from_values(&unit, values.clone()))
                    .collect();
                let (pct_delta, delta) = compute_delta(&metrics);
                rows.push(Row {
                    benchmark: benchmark.clone(),
                    metrics,
                    pct_delta,
                    delta,
                    class: DeltaClass::Neutral,
                });
            }

            self.sort_rows(&mut rows);
            if self.add_geo_mean {
                if let Some(row) = geo_mean_row(&unit, &rows, self.files.len()) {
                    rows.push(row);
                }
            }

            tables.push(Table {
                group,
                unit,
                columns: columns.clone(),
                rows,
            });
        }
        tables
    }

    fn group_key(&self, result: &BenchResult) -> String {
        let mut parts = Vec::new();
        for label in &self.split_by {
            if let Some(value) = result.labels.get(label) {
                parts.push(format!("{}: {}", label, value));
            }
        }
        parts.join(" ")
    }

    fn sort_rows(&self, rows: &mut [Row]) {
        match self.order {
            Order::None => return,
            Order::Name => rows.sort_by(|a, b| a.benchmark.cmp(&b.benchmark)),
            Order::Delta => rows.sort_by(|a, b| {
                a.pct_delta
                    .partial_cmp(&b.pct_delta)
                    .unwrap_or(std::cmp::Ordering::Equal)
            }),
        }
        if self.reverse {
            rows.reverse();
        }
    }
}

/// Percent delta between the first and last column, formatted for display
///
/// Only a two-column comparison gets a delta; anything else stays neutral
/// for the classifier to confirm via the combined spread rule.
fn compute_delta(metrics: &[Metric]) -> (f64, String) {
    if metrics.len() != 2 {
        return (0.0, "~".to_string());
    }
    let (old, new) = (&metrics[0], &metrics[1]);
    if old.values.is_empty() || new.values.is_empty() || old.mean == 0.0 {
        return (0.0, "~".to_string());
    }
    let pct = (new.mean - old.mean) / old.mean * 100.0;
    (pct, format!("{:+.2}%", pct))
}

/// Synthetic `[Geo mean]` row over each column's row means
fn geo_mean_row(unit: &str, rows: &[Row], columns: usize) -> Option<Row> {
    if rows.is_empty() {
        return None;
    }
    let mut metrics = Vec::with_capacity(columns);
    for col in 0..columns {
        let mut log_sum = 0.0;
        let mut count = 0usize;
        for row in rows {
            let mean = row.metrics.get(col).map_or(0.0, |m| m.mean);
            if mean > 0.0 {
                log_sum += mean.ln();
                count += 1;
            }
        }
        let geo_mean = if count == 0 {
            0.0
        } else {
            (log_sum / count as f64).exp()
        };
        let mut metric = Metric::from_values(unit, Vec::new());
        metric.mean = geo_mean;
        metric.min = geo_mean;
        metric.max = geo_mean;
        metrics.push(metric);
    }
    let (pct_delta, delta) = geo_delta(&metrics);
    Some(Row {
        benchmark: GEO_MEAN.to_string(),
        metrics,
        pct_delta,
        delta,
        class: DeltaClass::Neutral,
    })
}

fn geo_delta(metrics: &[Metric]) -> (f64, String) {
    if metrics.len() != 2 || metrics[0].mean == 0.0 {
        return (0.0, "~".to_string());
    }
    let pct = (metrics[1].mean - metrics[0].mean) / metrics[0].mean * 100.0;
    (pct, format!("{:+.2}%", pct))
}
