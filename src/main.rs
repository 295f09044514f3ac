//! tabrecon - Key-based reconciliation of tabular data sources

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};

use tabrecon::compare::Comparator;
use tabrecon::config::{ReportConfig, RunConfig, SourceConfig};
use tabrecon::loader::{expand_sources, normalize_columns, LoaderFactory};
use tabrecon::model::{KeySpec, Table};
use tabrecon::report::{render_to_stdout, write_report, ReportFormat};

/// Compare two tabular data sources on a key and report the differences
#[derive(Parser, Debug)]
#[command(name = "tabrecon")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// First source: file, directory, or glob pattern
    #[arg(required_unless_present = "config")]
    source_a: Option<String>,

    /// Second source: file, directory, or glob pattern
    #[arg(required_unless_present = "config")]
    source_b: Option<String>,

    /// Column(s) forming the match key (comma-separated)
    #[arg(short, long, value_delimiter = ',', required_unless_present = "config")]
    key: Vec<String>,

    /// Column(s) excluded from field comparison (comma-separated)
    #[arg(long, value_delimiter = ',')]
    ignore_column: Vec<String>,

    /// Field separator for delimited text files
    #[arg(long, default_value = ";")]
    sep: char,

    /// Quote character for delimited text files
    #[arg(long, default_value = "\"")]
    quote: char,

    /// Encoding label (e.g. utf-8, latin1); auto-detected when omitted
    #[arg(long)]
    encoding: Option<String>,

    /// Sheet name for spreadsheet sources
    #[arg(long)]
    sheet: Option<String>,

    /// Report format
    #[arg(short, long, default_value = "text")]
    format: ReportFormat,

    /// Write the report to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Read the whole run setup from a YAML config file instead of flags
    #[arg(short, long, conflicts_with_all = ["source_a", "source_b", "key"])]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run() {
        Ok(has_differences) => {
            if has_differences {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(2)
        }
    }
}

fn run() -> Result<bool> {
    let cli = Cli::parse();
    let (config, output_to_stdout) = resolve_config(cli)?;

    let factory = LoaderFactory::new();
    let table_a = load_source(&factory, &config.source_a).context("failed to load source A")?;
    let table_b = load_source(&factory, &config.source_b).context("failed to load source B")?;

    if table_a.row_count() == 0 {
        warn!("source A has no data rows");
    }
    if table_b.row_count() == 0 {
        warn!("source B has no data rows");
    }

    // User-supplied names go through the same normalization as loaded headers.
    let key = KeySpec::new(normalize_columns(
        &config.comparison.key.clone().into_columns(),
    ));
    let ignore = normalize_columns(&config.comparison.ignore_columns);

    let result = Comparator::new(key, &ignore).compare(&table_a, &table_b)?;

    info!(
        "summary: only A: {}, only B: {}, differing: {}, unchanged: {}",
        result.stats.only_in_a,
        result.stats.only_in_b,
        result.stats.differing,
        result.stats.matched_unchanged
    );
    if result.has_ambiguous_keys() {
        warn!(
            "ambiguous keys excluded from field comparison: {} in A, {} in B",
            result.stats.ambiguous_in_a, result.stats.ambiguous_in_b
        );
    }

    if output_to_stdout {
        render_to_stdout(&result, config.report.format)?;
    } else if result.has_differences() {
        let path = Path::new(&config.report.output_file);
        write_report(&result, path, config.report.format)?;
        info!("report written to {}", path.display());
    } else {
        warn!("no differences found, report file not written");
    }

    Ok(result.has_differences())
}

/// Build the run configuration from either the YAML file or the CLI flags.
/// Returns the config plus whether the report goes to stdout.
fn resolve_config(cli: Cli) -> Result<(RunConfig, bool)> {
    if let Some(config_path) = &cli.config {
        let config = RunConfig::load(config_path)?;
        return Ok((config, false));
    }

    let source = |path: Option<String>| SourceConfig {
        path: path.unwrap_or_default(),
        sep: cli.sep,
        quotechar: cli.quote,
        encoding: cli.encoding.clone(),
        sheet: cli.sheet.clone(),
    };
    let source_a = source(cli.source_a.clone());
    let source_b = source(cli.source_b.clone());

    let report = ReportConfig {
        output_file: cli
            .output
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default(),
        format: cli.format,
    };
    let output_to_stdout = cli.output.is_none();

    let config = RunConfig {
        source_a,
        source_b,
        comparison: tabrecon::config::ComparisonConfig {
            key: tabrecon::config::KeyColumns::List(cli.key),
            ignore_columns: cli.ignore_column,
        },
        report,
    };
    Ok((config, output_to_stdout))
}

/// Expand the source path and load the first matching file.
fn load_source(factory: &LoaderFactory, source: &SourceConfig) -> Result<Table> {
    let files = expand_sources(&source.path)?;
    if files.len() > 1 {
        info!(
            "{} files matched '{}', using {}",
            files.len(),
            source.path,
            files[0].display()
        );
    }
    info!("loading {}", files[0].display());
    factory.load(&files[0], &source.options())
}
