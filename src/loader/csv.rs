//! Delimited text loader (csv, txt, tsv)

use std::path::Path;

use anyhow::{bail, Context, Result};
use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};
use log::debug;

use crate::model::{Row, Table};

use super::normalize::normalize_column;
use super::{Loader, SourceOptions};

/// Loader for separator-delimited text files.
///
/// Every cell is loaded as a string; short records are padded with empty
/// strings so missing cells and empty cells are indistinguishable downstream.
#[derive(Debug)]
pub struct CsvLoader;

impl Loader for CsvLoader {
    fn load(&self, path: &Path, options: &SourceOptions) -> Result<Table> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("failed to read file: {}", path.display()))?;
        let text = decode(&bytes, options.encoding.as_deref())
            .with_context(|| format!("failed to decode file: {}", path.display()))?;

        // .tsv is always tab-separated regardless of configuration.
        let is_tsv = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("tsv"))
            .unwrap_or(false);
        let delimiter = if is_tsv { b'\t' } else { options.separator as u8 };

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .delimiter(delimiter)
            .quote(options.quote as u8)
            .from_reader(text.as_bytes());

        let columns: Vec<String> = reader
            .headers()
            .context("failed to read header row")?
            .iter()
            .map(normalize_column)
            .collect();

        let mut table = Table::new(columns);
        for (record_num, result) in reader.records().enumerate() {
            // +2 accounts for 1-based numbering and the header line.
            let record = result
                .with_context(|| format!("failed to read record at line {}", record_num + 2))?;

            let mut row = Row::new();
            for (idx, column) in table.columns.iter().enumerate() {
                row.insert(column.clone(), record.get(idx).unwrap_or(""));
            }
            table.rows.push(row);
        }

        debug!(
            "loaded {} rows x {} columns from {}",
            table.row_count(),
            table.column_count(),
            path.display()
        );
        Ok(table)
    }

    fn supports_extension(&self, ext: &str) -> bool {
        matches!(ext.to_lowercase().as_str(), "csv" | "txt" | "tsv")
    }
}

/// Decode raw bytes to text.
///
/// With an explicit label only that encoding is tried. Otherwise UTF-8 is
/// tried strictly first (BOM-aware), then windows-1252, which also covers
/// ISO-8859-1 and never fails for single-byte input.
fn decode(bytes: &[u8], label: Option<&str>) -> Result<String> {
    if let Some(label) = label {
        let Some(encoding) = Encoding::for_label(label.as_bytes()) else {
            bail!("unknown encoding label '{label}'");
        };
        let (text, _, had_errors) = encoding.decode(bytes);
        if had_errors {
            bail!("file is not valid {}", encoding.name());
        }
        return Ok(text.into_owned());
    }

    let (text, _, had_errors) = UTF_8.decode(bytes);
    if !had_errors {
        return Ok(text.into_owned());
    }
    let (text, _, _) = WINDOWS_1252.decode(bytes);
    Ok(text.into_owned())
}
