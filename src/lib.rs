//! tabrecon - Key-based reconciliation of tabular data sources
//!
//! Compares two tabular sources (CSV, TSV, Excel) on a configurable composite
//! key and reports records unique to each side plus field-level differences
//! on shared keys. Loading and reporting are thin collaborators around the
//! pure comparison engine in [`compare`].

pub mod compare;
pub mod config;
pub mod loader;
pub mod model;
pub mod report;

pub use compare::{CompareError, Comparator, ComparisonResult};
pub use config::RunConfig;
pub use model::{KeySpec, KeyValue, Row, Table};
