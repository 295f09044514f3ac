//! Comparison engine for matching two tables on a composite key

mod index;

use indexmap::IndexMap;
use rustc_hash::FxHashSet;
use serde::Serialize;
use thiserror::Error;

use crate::model::{KeySpec, KeyValue, Row, Table};

use index::{KeyEntry, KeyIndex};

/// Errors that abort a comparison. Ambiguous keys are not errors; they are
/// reported inside [`ComparisonResult`].
#[derive(Debug, Error)]
pub enum CompareError {
    #[error("key specification is empty; at least one key column is required")]
    EmptyKey,

    #[error(
        "key column(s) [{}] not found in both tables\navailable in A: [{}]\navailable in B: [{}]",
        .missing.join(", "),
        .columns_a.join(", "),
        .columns_b.join(", ")
    )]
    SchemaMismatch {
        /// Key columns absent from at least one table.
        missing: Vec<String>,
        columns_a: Vec<String>,
        columns_b: Vec<String>,
    },
}

/// The two values of one differing field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDiff {
    pub a: String,
    pub b: String,
}

/// One matched key whose rows differ in at least one non-ignored column.
#[derive(Debug, Clone, Serialize)]
pub struct DiffEntry {
    pub key: KeyValue,
    /// Full row from table A, ignored columns included.
    pub row_a: Row,
    /// Full row from table B, ignored columns included.
    pub row_b: Row,
    /// Differing column name mapped to both values, in A's column order.
    pub differences: IndexMap<String, FieldDiff>,
}

/// Summary counters for one comparison.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CompareStats {
    pub rows_a: usize,
    pub rows_b: usize,
    pub only_in_a: usize,
    pub only_in_b: usize,
    pub differing: usize,
    pub matched_unchanged: usize,
    pub ambiguous_in_a: usize,
    pub ambiguous_in_b: usize,
}

/// Output of one comparison call.
///
/// Carries both tables' column lists so a report sink can render the row
/// sections without holding onto the input tables.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonResult {
    pub columns_a: Vec<String>,
    pub columns_b: Vec<String>,
    /// Rows of A whose key value is absent from B, in A's row order.
    pub only_in_a: Vec<Row>,
    /// Rows of B whose key value is absent from A, in B's row order.
    pub only_in_b: Vec<Row>,
    /// Matched keys with field differences, in the order the keys are first
    /// encountered while scanning table A.
    pub diffs: Vec<DiffEntry>,
    /// Key values duplicated within A, in first-encounter order.
    pub ambiguous_in_a: Vec<KeyValue>,
    /// Key values duplicated within B, in first-encounter order.
    pub ambiguous_in_b: Vec<KeyValue>,
    pub stats: CompareStats,
}

impl ComparisonResult {
    /// True when either side has unmatched rows or any matched key differs.
    pub fn has_differences(&self) -> bool {
        !self.only_in_a.is_empty() || !self.only_in_b.is_empty() || !self.diffs.is_empty()
    }

    /// True when duplicated keys were excluded from diffing on either side.
    pub fn has_ambiguous_keys(&self) -> bool {
        !self.ambiguous_in_a.is_empty() || !self.ambiguous_in_b.is_empty()
    }
}

/// Key-based table comparator.
///
/// Pure and synchronous: no I/O, no shared state, identical inputs always
/// produce identical output.
pub struct Comparator {
    key: KeySpec,
    ignore: FxHashSet<String>,
}

impl Comparator {
    pub fn new(key: KeySpec, ignore_columns: &[String]) -> Self {
        Self {
            key,
            ignore: ignore_columns.iter().cloned().collect(),
        }
    }

    /// Compare two tables on the configured key.
    ///
    /// Fails with [`CompareError::SchemaMismatch`] when a key column is
    /// missing from either table. A table with no columns at all passes the
    /// check vacuously, so comparing against an empty source reports every
    /// row of the other side as unmatched instead of erroring out.
    pub fn compare(&self, a: &Table, b: &Table) -> Result<ComparisonResult, CompareError> {
        if self.key.is_empty() {
            return Err(CompareError::EmptyKey);
        }
        self.check_key_columns(a, b)?;

        let index_a = KeyIndex::build(a, &self.key);
        let index_b = KeyIndex::build(b, &self.key);

        // Membership: duplicated keys still count, and every row sharing an
        // unmatched key is included, in source order.
        let only_in_a: Vec<Row> = a
            .rows
            .iter()
            .filter(|row| !index_b.contains(&self.key.extract(row)))
            .cloned()
            .collect();
        let only_in_b: Vec<Row> = b
            .rows
            .iter()
            .filter(|row| !index_a.contains(&self.key.extract(row)))
            .cloned()
            .collect();

        let mut diffs = Vec::new();
        let mut matched_unchanged = 0usize;
        for (key_value, entry_a) in index_a.iter() {
            let KeyEntry::Unique(idx_a) = entry_a else {
                continue;
            };
            let Some(KeyEntry::Unique(idx_b)) = index_b.get(key_value) else {
                continue;
            };

            let row_a = &a.rows[*idx_a];
            let row_b = &b.rows[*idx_b];
            let differences = self.diff_fields(row_a, row_b);
            if differences.is_empty() {
                matched_unchanged += 1;
            } else {
                diffs.push(DiffEntry {
                    key: key_value.clone(),
                    row_a: row_a.clone(),
                    row_b: row_b.clone(),
                    differences,
                });
            }
        }

        let ambiguous_in_a = index_a.ambiguous_keys();
        let ambiguous_in_b = index_b.ambiguous_keys();
        let stats = CompareStats {
            rows_a: a.row_count(),
            rows_b: b.row_count(),
            only_in_a: only_in_a.len(),
            only_in_b: only_in_b.len(),
            differing: diffs.len(),
            matched_unchanged,
            ambiguous_in_a: ambiguous_in_a.len(),
            ambiguous_in_b: ambiguous_in_b.len(),
        };

        Ok(ComparisonResult {
            columns_a: a.columns.clone(),
            columns_b: b.columns.clone(),
            only_in_a,
            only_in_b,
            diffs,
            ambiguous_in_a,
            ambiguous_in_b,
            stats,
        })
    }

    fn check_key_columns(&self, a: &Table, b: &Table) -> Result<(), CompareError> {
        let mut missing: Vec<String> = Vec::new();
        for column in self.key.columns() {
            let absent_a = !a.columns.is_empty() && !a.has_column(column);
            let absent_b = !b.columns.is_empty() && !b.has_column(column);
            if absent_a || absent_b {
                missing.push(column.clone());
            }
        }
        if missing.is_empty() {
            Ok(())
        } else {
            Err(CompareError::SchemaMismatch {
                missing,
                columns_a: a.columns.clone(),
                columns_b: b.columns.clone(),
            })
        }
    }

    /// Walk A's columns minus the ignore set and compare each against B's
    /// value for the same name, with a column absent from B reading as empty.
    fn diff_fields(&self, row_a: &Row, row_b: &Row) -> IndexMap<String, FieldDiff> {
        let mut differences = IndexMap::new();
        for (column, value_a) in row_a.iter() {
            if self.ignore.contains(column) {
                continue;
            }
            let value_b = row_b.get(column);
            if value_a != value_b {
                differences.insert(
                    column.to_string(),
                    FieldDiff {
                        a: value_a.to_string(),
                        b: value_b.to_string(),
                    },
                );
            }
        }
        differences
    }
}

/// Convenience wrapper for one-shot comparisons.
pub fn compare(
    a: &Table,
    b: &Table,
    key: &KeySpec,
    ignore_columns: &[String],
) -> Result<ComparisonResult, CompareError> {
    Comparator::new(key.clone(), ignore_columns).compare(a, b)
}
