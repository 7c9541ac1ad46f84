// Benchmark comparison pipeline: parse result files, build per-group
// comparison tables, classify deltas as signal or noise, render.
//
// The classifier (classify.rs) is the decision core; parse/table are the
// collaborators that feed it already-aggregated statistics.

pub mod classify;
pub mod format;
pub mod parse;
pub mod table;

pub use classify::classify_tables;
pub use format::format_tables;
pub use parse::{parse, BenchResult};
pub use table::{parse_order, Collection, DeltaClass, Metric, Order, Row, Table, GEO_MEAN};
