//! Diagnostic message patterns for `go build` output
//!
//! Each compiler message shape the tool understands is described by one
//! `DiagnosticPattern`: a compiled regex plus the filters that decide which
//! matches become records. Patterns are immutable once constructed; the
//! overflow threshold and name filter are resolved from configuration before
//! any text is scanned.

use anyhow::{Context, Result};
use regex::Regex;

/// `file:line:col` prefix shared by location-bearing compiler messages
const LOCATION: &str = r"(.*:\d+:\d+)";
/// Function identifier, possibly package-qualified
const FUNCTION: &str = r"((?:\S*)?\w+)";

/// The diagnostic message shapes the scanner understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// `function too complex: cost N exceeds budget M` (from `-m=2`)
    AlmostInlined,
    /// `... escapes to heap` (from `-m -m`)
    EscapedVar,
    /// `Found IsInBounds` / `Found IsSliceInBounds` (from check_bce debug)
    BoundCheck,
    /// `SYMBOL STEXT ... size=N` assembly listing lines (from `-S`)
    FuncSize,
}

impl DiagnosticKind {
    /// The `-gcflags` value that makes the compiler emit this message shape
    pub fn gcflags(self) -> &'static str {
        match self {
            Self::AlmostInlined => "-m=2",
            Self::EscapedVar => "-m -m",
            Self::BoundCheck => "-d=ssa/check_bce/debug=1",
            Self::FuncSize => "-S",
        }
    }
}

/// A named, fixed specification of how to recognize one class of compiler
/// message and which matches to keep
#[derive(Debug, Clone)]
pub struct DiagnosticPattern {
    kind: DiagnosticKind,
    message: Regex,
    /// Max inliner budget overflow to keep; `None` keeps every overflow
    threshold: Option<i64>,
    /// Keep a function-size record only when its name matches
    name_filter: Option<Regex>,
}

impl DiagnosticPattern {
    /// Pattern for functions that barely crossed the inlining budget
    ///
    /// `threshold` of `None` reports every overflow, no matter how large.
    pub fn almost_inlined(threshold: Option<i64>) -> Result<Self> {
        let pat = format!(
            "{LOCATION}: .*? {FUNCTION}: function too complex: cost (\\d+) exceeds budget (\\d+)"
        );
        Ok(Self {
            kind: DiagnosticKind::AlmostInlined,
            message: Regex::new(&pat).context("inlining message pattern")?,
            threshold,
            name_filter: None,
        })
    }

    /// Pattern for variables the escape analysis moved to the heap
    pub fn escaped_var() -> Result<Self> {
        let pat = format!("{LOCATION}: (.*)escapes to heap");
        Ok(Self {
            kind: DiagnosticKind::EscapedVar,
            message: Regex::new(&pat).context("escape message pattern")?,
            threshold: None,
            name_filter: None,
        })
    }

    /// Pattern for slice/array accesses that kept their bound checks
    pub fn bound_check() -> Result<Self> {
        let pat = format!("{LOCATION}: Found Is(?:Slice)?InBounds");
        Ok(Self {
            kind: DiagnosticKind::BoundCheck,
            message: Regex::new(&pat).context("bound check message pattern")?,
            threshold: None,
            name_filter: None,
        })
    }

    /// Pattern for per-function machine code size from the assembly listing
    ///
    /// `filter` restricts the report to function names matching the given
    /// regex; an invalid expression is a configuration error.
    pub fn func_size(filter: Option<&str>) -> Result<Self> {
        let name_filter = match filter {
            Some(expr) => Some(Regex::new(expr).context("function name filter")?),
            None => None,
        };
        Ok(Self {
            kind: DiagnosticKind::FuncSize,
            message: Regex::new(r"(.*) STEXT.* size=(\d+)").context("func size message pattern")?,
            threshold: None,
            name_filter,
        })
    }

    pub fn kind(&self) -> DiagnosticKind {
        self.kind
    }

    pub(crate) fn message(&self) -> &Regex {
        &self.message
    }

    /// Inclusion filter for the inlining pattern: keep overflows at or below
    /// the threshold, or everything when no threshold is set
    pub(crate) fn within_threshold(&self, diff: i64) -> bool {
        match self.threshold {
            None => true,
            Some(t) => diff <= t,
        }
    }

    /// Inclusion filter for the size pattern
    pub(crate) fn passes_name_filter(&self, function: &str) -> bool {
        match &self.name_filter {
            None => true,
            Some(re) => re.is_match(function),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_unlimited_keeps_everything() {
        let pat = DiagnosticPattern::almost_inlined(None).unwrap();
        assert!(pat.within_threshold(5));
        assert!(pat.within_threshold(5000));
    }

    #[test]
    fn test_threshold_bounds() {
        let pat = DiagnosticPattern::almost_inlined(Some(4)).unwrap();
        assert!(!pat.within_threshold(5));

        let pat = DiagnosticPattern::almost_inlined(Some(5)).unwrap();
        assert!(pat.within_threshold(5));
    }

    #[test]
    fn test_name_filter() {
        let pat = DiagnosticPattern::func_size(Some(r"^pkg\.")).unwrap();
        assert!(pat.passes_name_filter("pkg.Foo"));
        assert!(!pat.passes_name_filter("other.Foo"));

        let pat = DiagnosticPattern::func_size(None).unwrap();
        assert!(pat.passes_name_filter("anything"));
    }

    #[test]
    fn test_invalid_name_filter_is_an_error() {
        assert!(DiagnosticPattern::func_size(Some("(unclosed")).is_err());
    }

    #[test]
    fn test_gcflags_per_kind() {
        assert_eq!(DiagnosticKind::AlmostInlined.gcflags(), "-m=2");
        assert_eq!(DiagnosticKind::EscapedVar.gcflags(), "-m -m");
        assert_eq!(DiagnosticKind::BoundCheck.gcflags(), "-d=ssa/check_bce/debug=1");
        assert_eq!(DiagnosticKind::FuncSize.gcflags(), "-S");
    }
}
