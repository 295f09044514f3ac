//! Source loading: files in, normalized [`Table`]s out

mod csv;
mod excel;
mod normalize;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use crate::model::Table;

pub use self::csv::CsvLoader;
pub use self::excel::ExcelLoader;
pub use normalize::{normalize_column, normalize_columns};

/// File extensions any loader in the factory accepts.
const SUPPORTED_EXTENSIONS: &[&str] = &["csv", "txt", "tsv", "xls", "xlsx", "xlsm", "ods"];

/// Per-source loading options, typically taken from the run configuration.
#[derive(Debug, Clone)]
pub struct SourceOptions {
    /// Field separator for delimited text; `.tsv` always uses a tab.
    pub separator: char,
    /// Quote character for delimited text.
    pub quote: char,
    /// Explicit encoding label; when absent a fallback chain is tried.
    pub encoding: Option<String>,
    /// Sheet name for spreadsheet sources; first sheet when absent.
    pub sheet: Option<String>,
}

impl Default for SourceOptions {
    fn default() -> Self {
        Self {
            separator: ';',
            quote: '"',
            encoding: None,
            sheet: None,
        }
    }
}

/// Trait for loading a tabular file into a normalized [`Table`].
///
/// Loaders guarantee the output contract of the comparator: column names
/// normalized via [`normalize_column`], every value a string, and short rows
/// padded with empty strings.
pub trait Loader: Send + Sync + std::fmt::Debug {
    fn load(&self, path: &Path, options: &SourceOptions) -> Result<Table>;

    fn supports_extension(&self, ext: &str) -> bool;
}

/// Factory dispatching to the loader that handles a file's extension.
pub struct LoaderFactory {
    loaders: Vec<Box<dyn Loader>>,
}

impl Default for LoaderFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl LoaderFactory {
    pub fn new() -> Self {
        Self {
            loaders: vec![Box::new(CsvLoader), Box::new(ExcelLoader)],
        }
    }

    pub fn get_loader(&self, path: &Path) -> Result<&dyn Loader> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        for loader in &self.loaders {
            if loader.supports_extension(&ext) {
                return Ok(loader.as_ref());
            }
        }

        bail!(
            "unsupported file type '{}' for {} (supported: {})",
            if ext.is_empty() { "<none>" } else { &ext },
            path.display(),
            SUPPORTED_EXTENSIONS.join(", ")
        )
    }

    /// Load a file using the loader matching its extension.
    pub fn load(&self, path: &Path, options: &SourceOptions) -> Result<Table> {
        let loader = self.get_loader(path)?;
        loader.load(path, options)
    }
}

/// Expand a source path into concrete files.
///
/// Accepts a single file, a directory (all supported files inside, sorted),
/// or a glob pattern. Fails when nothing matches.
pub fn expand_sources(pattern: &str) -> Result<Vec<PathBuf>> {
    let path = Path::new(pattern);

    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    if path.is_dir() {
        let mut files: Vec<PathBuf> = std::fs::read_dir(path)
            .with_context(|| format!("failed to read directory {}", path.display()))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| {
                p.is_file()
                    && p.extension()
                        .and_then(|e| e.to_str())
                        .map(|e| SUPPORTED_EXTENSIONS.contains(&e.to_lowercase().as_str()))
                        .unwrap_or(false)
            })
            .collect();
        files.sort();
        if files.is_empty() {
            bail!("no supported files found in directory {}", path.display());
        }
        return Ok(files);
    }

    let mut files: Vec<PathBuf> = glob::glob(pattern)
        .with_context(|| format!("invalid source pattern '{pattern}'"))?
        .filter_map(|entry| entry.ok())
        .filter(|p| p.is_file())
        .collect();
    files.sort();
    if files.is_empty() {
        bail!("no files matched source pattern '{pattern}'");
    }
    Ok(files)
}
