//! Generic diagnostic scanner
//!
//! One scanner serves all four message shapes: it applies a
//! `DiagnosticPattern` over the full compiler output and builds the
//! pattern-specific payload for every non-overlapping match, in document
//! order. Pure function of (text, pattern); zero matches is a valid, empty
//! result, not an error.

use crate::pattern::{DiagnosticKind, DiagnosticPattern};
use crate::record::DiagnosticRecord;
use regex::Captures;

/// Extract every diagnostic record the pattern recognizes in `text`
///
/// Records come back in source order, mirroring the compiler's own
/// file/line-ordered emission. Non-matching lines and interleaved unrelated
/// diagnostics are skipped.
pub fn scan(text: &str, pattern: &DiagnosticPattern) -> Vec<DiagnosticRecord> {
    pattern
        .message()
        .captures_iter(text)
        .filter_map(|caps| build_record(pattern, &caps))
        .collect()
}

fn build_record(pattern: &DiagnosticPattern, caps: &Captures) -> Option<DiagnosticRecord> {
    match pattern.kind() {
        DiagnosticKind::AlmostInlined => {
            let cost = group_int(caps, 3);
            let budget = group_int(caps, 4);
            let diff = cost - budget;
            if !pattern.within_threshold(diff) {
                return None;
            }
            Some(DiagnosticRecord::AlmostInlined {
                loc: group_str(caps, 1),
                function: group_str(caps, 2),
                cost,
                diff,
            })
        }
        DiagnosticKind::EscapedVar => Some(DiagnosticRecord::EscapedVar {
            loc: group_str(caps, 1),
            variable: group_str(caps, 2).trim_end().to_string(),
        }),
        DiagnosticKind::BoundCheck => Some(DiagnosticRecord::BoundCheck {
            loc: group_str(caps, 1),
        }),
        DiagnosticKind::FuncSize => {
            let function = group_str(caps, 1);
            if !pattern.passes_name_filter(&function) {
                return None;
            }
            let size = group_int(caps, 2).max(0) as u64;
            Some(DiagnosticRecord::FuncSize { function, size })
        }
    }
}

fn group_str(caps: &Captures, idx: usize) -> String {
    caps.get(idx).map_or("", |m| m.as_str()).to_string()
}

/// Numeric sub-match slot; group regexes only admit digits, so a parse
/// failure can only mean overflow and degrades to 0
fn group_int(caps: &Captures, idx: usize) -> i64 {
    caps.get(idx)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}
