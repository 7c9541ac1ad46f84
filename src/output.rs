//! Record and table rendering
//!
//! Structured output is a pretty-printed JSON array whose key set depends on
//! the pattern that produced the records; human output is one line per
//! record.

use crate::record::DiagnosticRecord;
use anyhow::Result;
use serde::Serialize;
use std::io::Write;

/// Output rendering selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_json_flag(json: bool) -> Self {
        if json {
            Self::Json
        } else {
            Self::Text
        }
    }
}

/// Write one scan's records in the selected format
pub fn write_records<W: Write>(
    writer: &mut W,
    records: &[DiagnosticRecord],
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Json => write_json(writer, records),
        OutputFormat::Text => {
            for record in records {
                writeln!(writer, "{}", record.render_text())?;
            }
            Ok(())
        }
    }
}

/// Write any serializable value as pretty JSON followed by a newline
pub fn write_json<W: Write, T: Serialize + ?Sized>(writer: &mut W, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, value)?;
    writeln!(writer)?;
    Ok(())
}
