//! Composite key handling

use std::fmt;

use serde::Serialize;

use super::table::Row;

/// Ordered list of column names that identify a row for matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeySpec {
    columns: Vec<String>,
}

impl KeySpec {
    pub fn new(columns: Vec<String>) -> Self {
        Self { columns }
    }

    /// Parse a comma-separated key specification, trimming each component.
    pub fn parse(spec: &str) -> Self {
        Self {
            columns: spec
                .split(',')
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty())
                .collect(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Extract the key value of `row`, component-wise in key-column order.
    ///
    /// A key column the row does not carry contributes an empty string, the
    /// same convention the comparator uses for missing cells.
    pub fn extract(&self, row: &Row) -> KeyValue {
        KeyValue(
            self.columns
                .iter()
                .map(|c| row.get(c).to_string())
                .collect(),
        )
    }
}

/// Tuple of string values extracted from a row at the key columns.
///
/// Two rows match iff their key values are component-wise equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct KeyValue(Vec<String>);

impl KeyValue {
    pub fn new(components: Vec<String>) -> Self {
        Self(components)
    }

    pub fn components(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for KeyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("|"))
    }
}
