//! Go toolchain invocation
//!
//! Runs `go build` with the diagnostic flags a pattern needs and hands the
//! merged stdout/stderr text back to the scanner. A non-zero exit that still
//! produced output is not an invocation failure: the compiler routinely
//! exits non-zero while emitting the very diagnostics we are after, so the
//! text is scanned and the exit status reported alongside the results. Only
//! a process that cannot start, or that exits non-zero with nothing to show,
//! is a hard error for its target.

use std::process::{Command, ExitStatus};
use thiserror::Error;

/// External tool could not run or produced no usable output
///
/// Fatal for the current target, never for the overall run: the caller
/// reports it against the target's identifier and moves on.
#[derive(Debug, Error)]
pub enum InvocationError {
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{program} exited with {status} and produced no output")]
    NoOutput { program: String, status: ExitStatus },
}

/// Build flags forwarded verbatim to `go build`
///
/// These do not affect scanning logic, only which diagnostics appear.
#[derive(Debug, Clone, Default)]
pub struct BuildConfig {
    /// `-mod` compiler flag (readonly|vendor)
    pub module_mode: Option<String>,
    /// `-tags` compiler flag
    pub tags: Option<String>,
}

/// Output of one toolchain invocation
#[derive(Debug)]
pub struct ToolOutput {
    /// Merged stdout + stderr (compiler diagnostics arrive on stderr)
    pub text: String,
    /// Set when the process exited non-zero but still produced output
    pub failure: Option<ExitStatus>,
}

/// Handle on the `go` binary
#[derive(Debug, Clone)]
pub struct Toolchain {
    program: String,
}

impl Default for Toolchain {
    fn default() -> Self {
        Self::new("go")
    }
}

impl Toolchain {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Argument vector for `go build` with the given diagnostic gcflags
    pub fn build_args(&self, gcflags: &str, config: &BuildConfig, pkg: &str) -> Vec<String> {
        let mut args = vec!["build".to_string(), "-gcflags".to_string(), gcflags.to_string()];
        if let Some(mode) = &config.module_mode {
            args.push("-mod".to_string());
            args.push(mode.clone());
        }
        if let Some(tags) = &config.tags {
            args.push("-tags".to_string());
            args.push(tags.clone());
        }
        args.push(pkg.to_string());
        args
    }

    /// Run `go build` for one package pattern, blocking until it exits
    ///
    /// Invoked exactly once per target; there is no retry and no timeout
    /// beyond the tool's own runtime.
    pub fn build(
        &self,
        gcflags: &str,
        config: &BuildConfig,
        pkg: &str,
    ) -> Result<ToolOutput, InvocationError> {
        let args = self.build_args(gcflags, config, pkg);
        tracing::debug!("running {} {}", self.program, args.join(" "));

        let output = Command::new(&self.program)
            .args(&args)
            .output()
            .map_err(|source| InvocationError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));

        if output.status.success() {
            Ok(ToolOutput {
                text,
                failure: None,
            })
        } else if text.trim().is_empty() {
            Err(InvocationError::NoOutput {
                program: self.program.clone(),
                status: output.status,
            })
        } else {
            Ok(ToolOutput {
                text,
                failure: Some(output.status),
            })
        }
    }
}
