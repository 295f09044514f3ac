//! YAML run configuration

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::loader::SourceOptions;
use crate::report::ReportFormat;

/// Full run configuration as loaded from a YAML file.
#[derive(Debug, Clone, Deserialize)]
pub struct RunConfig {
    pub source_a: SourceConfig,
    pub source_b: SourceConfig,
    pub comparison: ComparisonConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

impl RunConfig {
    /// Load and parse a YAML configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        serde_yaml::from_str(&text)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }
}

/// One data source: a file path (or directory/glob pattern) plus options.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    pub path: String,
    #[serde(default = "default_separator")]
    pub sep: char,
    #[serde(default = "default_quote")]
    pub quotechar: char,
    #[serde(default)]
    pub encoding: Option<String>,
    #[serde(default)]
    pub sheet: Option<String>,
}

impl SourceConfig {
    pub fn options(&self) -> SourceOptions {
        SourceOptions {
            separator: self.sep,
            quote: self.quotechar,
            encoding: self.encoding.clone(),
            sheet: self.sheet.clone(),
        }
    }
}

fn default_separator() -> char {
    ';'
}

fn default_quote() -> char {
    '"'
}

/// Key and ignore-column settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ComparisonConfig {
    pub key: KeyColumns,
    #[serde(default)]
    pub ignore_columns: Vec<String>,
}

/// Key columns, given either as a list or as one comma-separated string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum KeyColumns {
    Single(String),
    List(Vec<String>),
}

impl KeyColumns {
    pub fn into_columns(self) -> Vec<String> {
        match self {
            KeyColumns::Single(s) => s
                .split(',')
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty())
                .collect(),
            KeyColumns::List(columns) => columns,
        }
    }
}

/// Report destination and format.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    #[serde(default = "default_output_file")]
    pub output_file: String,
    #[serde(default)]
    pub format: ReportFormat,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_file: default_output_file(),
            format: ReportFormat::default(),
        }
    }
}

fn default_output_file() -> String {
    "comparison_report.txt".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_config() {
        let yaml = r#"
source_a:
  path: "data/a.csv"
  sep: ","
  encoding: "latin1"
source_b:
  path: "data/b.xlsx"
  sheet: "Plan1"
comparison:
  key: ["ID", "REGION"]
  ignore_columns: ["UPDATED_AT"]
report:
  output_file: "out/report.json"
  format: json
"#;
        let config: RunConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.source_a.sep, ',');
        assert_eq!(config.source_a.encoding.as_deref(), Some("latin1"));
        assert_eq!(config.source_b.sheet.as_deref(), Some("Plan1"));
        assert_eq!(
            config.comparison.key.into_columns(),
            vec!["ID".to_string(), "REGION".to_string()]
        );
        assert_eq!(config.report.format, ReportFormat::Json);
    }

    #[test]
    fn key_accepts_comma_separated_string() {
        let yaml = r#"
source_a: { path: "a.csv" }
source_b: { path: "b.csv" }
comparison:
  key: "ID, REGION"
"#;
        let config: RunConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(
            config.comparison.key.into_columns(),
            vec!["ID".to_string(), "REGION".to_string()]
        );
        assert!(config.comparison.ignore_columns.is_empty());
    }

    #[test]
    fn defaults_apply_when_sections_are_omitted() {
        let yaml = r#"
source_a: { path: "a.csv" }
source_b: { path: "b.csv" }
comparison: { key: "ID" }
"#;
        let config: RunConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.source_a.sep, ';');
        assert_eq!(config.source_a.quotechar, '"');
        assert_eq!(config.report.output_file, "comparison_report.txt");
        assert_eq!(config.report.format, ReportFormat::Text);
    }
}
