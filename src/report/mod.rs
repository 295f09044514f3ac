//! Report sinks for comparison results

mod json;
mod text;

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::compare::ComparisonResult;

pub use json::JsonReport;
pub use text::TextReport;

/// Report output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            other => Err(format!("unknown report format: {other}")),
        }
    }
}

/// Trait for rendering a [`ComparisonResult`].
pub trait ReportSink {
    fn render(&self, result: &ComparisonResult, writer: &mut dyn Write) -> Result<()>;
}

/// Factory for report sinks.
pub struct ReportFactory;

impl ReportFactory {
    pub fn create(format: ReportFormat) -> Box<dyn ReportSink> {
        match format {
            ReportFormat::Text => Box::new(TextReport::new()),
            ReportFormat::Json => Box::new(JsonReport::new()),
        }
    }
}

/// Render the result to a file, creating parent directories as needed.
pub fn write_report(result: &ComparisonResult, path: &Path, format: ReportFormat) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create report directory {}", parent.display()))?;
        }
    }
    let mut file = std::fs::File::create(path)
        .with_context(|| format!("failed to create report file {}", path.display()))?;
    ReportFactory::create(format).render(result, &mut file)
}

/// Render the result to stdout.
pub fn render_to_stdout(result: &ComparisonResult, format: ReportFormat) -> Result<()> {
    let mut stdout = std::io::stdout();
    ReportFactory::create(format).render(result, &mut stdout)
}
