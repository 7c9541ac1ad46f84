//! Structured diagnostic records extracted from compiler output
//!
//! One record per matched compiler message, kept in the order the compiler
//! emitted them. Records are never merged or deduplicated.

use serde::Serialize;

/// One extracted compiler diagnostic fact
///
/// The JSON key set depends on which pattern produced the record: the
/// inlining record carries `loc`/`fn`/`cost`/`diff`, the escape record
/// `loc`/`var`, the bound-check record `loc` alone, and the function-size
/// record `fn`/`size`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DiagnosticRecord {
    /// A function that overflowed the inliner cost budget
    AlmostInlined {
        loc: String,
        #[serde(rename = "fn")]
        function: String,
        cost: i64,
        /// Budget overflow (cost - budget)
        diff: i64,
    },
    /// A variable or expression that escapes to the heap
    EscapedVar {
        loc: String,
        #[serde(rename = "var")]
        variable: String,
    },
    /// A slice/array access that kept its bound check
    BoundCheck { loc: String },
    /// Machine code size of one compiled function
    FuncSize {
        #[serde(rename = "fn")]
        function: String,
        size: u64,
    },
}

impl DiagnosticRecord {
    /// Human-readable one-line form, `"<location>: <message>"`
    pub fn render_text(&self) -> String {
        match self {
            Self::AlmostInlined {
                loc,
                function,
                diff,
                ..
            } => format!("{}: {}: budget exceeded by {}", loc, function, diff),
            Self::EscapedVar { loc, variable } => format!("{}: {}", loc, variable),
            Self::BoundCheck { loc } => format!("{}: slice/array has bound checks", loc),
            Self::FuncSize { function, size } => format!("{}: {} bytes", function, size),
        }
    }
}
