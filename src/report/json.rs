//! JSON report

use std::io::Write;

use anyhow::Result;

use crate::compare::ComparisonResult;

use super::ReportSink;

/// JSON report: the full comparison result serialized via serde.
pub struct JsonReport {
    pretty: bool,
}

impl JsonReport {
    pub fn new() -> Self {
        Self { pretty: true }
    }

    pub fn compact() -> Self {
        Self { pretty: false }
    }
}

impl Default for JsonReport {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportSink for JsonReport {
    fn render(&self, result: &ComparisonResult, writer: &mut dyn Write) -> Result<()> {
        if self.pretty {
            serde_json::to_writer_pretty(&mut *writer, result)?;
        } else {
            serde_json::to_writer(&mut *writer, result)?;
        }
        writeln!(writer)?;
        Ok(())
    }
}
