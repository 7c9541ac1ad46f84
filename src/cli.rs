//! CLI argument parsing for Perftuner

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "perftuner")]
#[command(version)]
#[command(about = "Go performance tuning helper", long_about = None)]
pub struct Cli {
    /// -mod compiler flag (readonly|vendor)
    #[arg(long = "mod", value_name = "MODE", global = true)]
    pub module_mode: Option<String>,

    /// -tags compiler flag
    #[arg(long, value_name = "TAGS", global = true)]
    pub tags: Option<String>,

    /// Return results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable trace-level debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: CommandKind,
}

#[derive(Subcommand, Debug)]
pub enum CommandKind {
    /// Find functions that cross the inlining threshold just barely
    #[command(visible_alias = "inl")]
    AlmostInlined {
        /// Max inliner budget overflow to report (0 = unlimited)
        #[arg(long, value_name = "N", default_value_t = 10)]
        threshold: i64,

        /// Package patterns to build (defaults to ".")
        packages: Vec<String>,
    },

    /// Find variables that are escaped to the heap
    #[command(visible_alias = "esc")]
    EscapedVars {
        /// Package patterns to build (defaults to ".")
        packages: Vec<String>,
    },

    /// Find slice/array accesses that keep their bound checks
    #[command(visible_alias = "bce")]
    BoundChecks {
        /// Package patterns to build (defaults to ".")
        packages: Vec<String>,
    },

    /// Report machine code size of compiled functions
    #[command(visible_alias = "fns")]
    FuncSize {
        /// Regex to filter the reported function names
        #[arg(long, value_name = "REGEX")]
        filter: Option<String>,

        /// Package patterns to build (defaults to ".")
        packages: Vec<String>,
    },

    /// Compare benchmark result files and highlight significant deltas
    #[command(visible_alias = "bst")]
    Benchstat {
        /// Print the geometric mean of each file
        #[arg(long)]
        geomean: bool,

        /// Split benchmarks by labels
        #[arg(long, value_name = "LABELS", default_value = "pkg,goos,goarch")]
        split: String,

        /// Sort rows by order: [-]delta, [-]name, none
        #[arg(long, value_name = "ORDER", default_value = "none")]
        sort: String,

        /// Disable the colored output
        #[arg(long = "no-color")]
        no_color: bool,

        /// Benchmark result files to compare
        #[arg(required = true)]
        files: Vec<String>,
    },
}

/// A threshold of 0 on the command line means "report every overflow"; the
/// unlimited case is an explicit `None` internally rather than a sentinel.
pub fn threshold_option(threshold: i64) -> Option<i64> {
    if threshold == 0 {
        None
    } else {
        Some(threshold)
    }
}
