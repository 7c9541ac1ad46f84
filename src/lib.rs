//! Perftuner - Go performance tuning helper
//!
//! This library provides the core functionality for aggregating Go compiler
//! diagnostics: a pattern-driven scanner that turns `go build` output into
//! typed records, and a significance classifier that separates real
//! benchmark deltas from measurement noise.

pub mod bench;
pub mod cli;
pub mod output;
pub mod pattern;
pub mod record;
pub mod scanner;
pub mod toolchain;
