//! Benchmark delta significance classifier
//!
//! Decides, per table row, whether the observed percentage delta is real
//! change or measurement noise, and prunes geometric-mean rows whose unit
//! hit the sub-hundredth noise floor anywhere in the table set. Pure pass
//! over in-memory tables; it has no error conditions and a row with zero
//! metrics passes through unmodified.

use crate::bench::table::{DeltaClass, Metric, Row, Table, GEO_MEAN};
use std::collections::HashSet;

/// Below this mean (in the metric's natural unit, e.g. ns) a percentage
/// delta needs twice the precision before it is trustworthy
const TINY_VALUE_THRESHOLD: f64 = 32.0;

/// A raw sample below this makes the geometric mean meaningless for its unit
const NOISE_FLOOR: f64 = 0.01;

/// Advisory minimum sample count per row
const MIN_SAMPLES: usize = 5;

/// Classify every row of every table and prune degenerate geo-mean rows
///
/// Row order is preserved except for dropped geo-mean rows; no row is ever
/// reordered relative to others.
pub fn classify_tables(tables: &mut [Table]) {
    let disabled_units = noise_floor_units(tables);

    for table in tables.iter_mut() {
        table.rows.retain(|row| {
            if row.benchmark != GEO_MEAN {
                return true;
            }
            match row.metrics.first() {
                Some(metric) => !disabled_units.contains(&metric.unit),
                None => true,
            }
        });

        for row in &mut table.rows {
            if row.benchmark != GEO_MEAN {
                if let Some(metric) = row.metrics.first() {
                    if metric.values.len() < MIN_SAMPLES {
                        tracing::warn!(
                            "{} needs more samples, re-run with -count=5 or higher?",
                            row.benchmark
                        );
                    }
                }
            }
            classify_row(row);
        }
    }
}

/// Units whose geometric mean is disabled: at least one raw sample across
/// the whole table set fell below the noise floor
fn noise_floor_units(tables: &[Table]) -> HashSet<String> {
    let mut disabled = HashSet::new();
    for table in tables {
        for row in &table.rows {
            for metric in &row.metrics {
                if metric.values.iter().any(|&v| v < NOISE_FLOOR) {
                    disabled.insert(metric.unit.clone());
                }
            }
        }
    }
    disabled
}

fn classify_row(row: &mut Row) {
    if row.metrics.is_empty() {
        return;
    }

    // Sometimes a zero delta is formatted as +0.00%, which would read as a
    // regression. Neutralize it before anything else.
    if row.pct_delta == 0.0 && row.delta.contains("0.00%") {
        row.delta = "~".to_string();
    }

    if is_epsilon_delta(&row.metrics) {
        neutralize(row);
        return;
    }

    let mut noise_band = combined_mean_diff(&row.metrics);
    if is_tiny_value(&row.metrics) {
        // For tiny values, require x2 precision.
        noise_band *= 2.0;
    }
    noise_band += 1.0;

    if row.pct_delta.abs() < noise_band {
        neutralize(row);
        return;
    }

    row.class = if row.delta.starts_with('+') {
        DeltaClass::Regression
    } else if row.delta.starts_with('-') {
        DeltaClass::Improvement
    } else {
        DeltaClass::Neutral
    };
}

fn neutralize(row: &mut Row) {
    row.delta = "~".to_string();
    row.class = DeltaClass::Neutral;
}

/// Two-column rule: absolute mean difference within a magnitude-banded
/// epsilon is noise regardless of the percentage it amounts to
fn is_epsilon_delta(metrics: &[Metric]) -> bool {
    if metrics.len() != 2 {
        return false;
    }
    let eps = value_epsilon(avg_mean(metrics));
    (metrics[0].mean - metrics[1].mean).abs() <= eps
}

fn avg_mean(metrics: &[Metric]) -> f64 {
    metrics.iter().map(|m| m.mean).sum::<f64>() / metrics.len() as f64
}

fn value_epsilon(avg: f64) -> f64 {
    match avg {
        a if a < 10.0 => 1.0,
        a if a < 32.0 => 2.0,
        a if a < 80.0 => 3.0,
        _ => 4.0,
    }
}

/// Intra-sample spread accumulated across metrics, as a percentage: how far
/// min/max stray from the mean estimates the noise band of the measurement
fn combined_mean_diff(metrics: &[Metric]) -> f64 {
    metrics
        .iter()
        .filter(|m| m.max != m.min)
        .map(|m| 100.0 * mean_diff(m))
        .sum()
}

/// Every mean below the tiny-value threshold: percentage deltas on such
/// small absolute values need twice the precision before they count
fn is_tiny_value(metrics: &[Metric]) -> bool {
    metrics.iter().all(|m| m.mean < TINY_VALUE_THRESHOLD)
}

fn mean_diff(metric: &Metric) -> f64 {
    if metric.mean == 0.0 || metric.max == 0.0 {
        return 0.0;
    }
    let low = 1.0 - metric.min / metric.mean;
    let high = metric.max / metric.mean - 1.0;
    low.max(high)
}
