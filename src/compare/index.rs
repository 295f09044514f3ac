//! Key index with duplicate detection

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;

use crate::model::{KeySpec, KeyValue, Table};

/// How a key value resolves within a single table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyEntry {
    /// Exactly one row carries this key value; holds the row index.
    Unique(usize),
    /// More than one row carries this key value; holds the row count.
    /// Such keys still count for membership but are excluded from diffing.
    Ambiguous(usize),
}

/// Index from key value to row, built in first-encounter order.
///
/// Insertion order is the order key values first appear while scanning the
/// table top to bottom, which is what makes the comparator's diff output
/// deterministic.
#[derive(Debug)]
pub struct KeyIndex {
    entries: IndexMap<KeyValue, KeyEntry, FxBuildHasher>,
}

impl KeyIndex {
    pub fn build(table: &Table, key: &KeySpec) -> Self {
        let mut entries: IndexMap<KeyValue, KeyEntry, FxBuildHasher> =
            IndexMap::with_capacity_and_hasher(table.row_count(), FxBuildHasher::default());

        for (idx, row) in table.rows.iter().enumerate() {
            let value = key.extract(row);
            entries
                .entry(value)
                .and_modify(|e| {
                    *e = match *e {
                        KeyEntry::Unique(_) => KeyEntry::Ambiguous(2),
                        KeyEntry::Ambiguous(n) => KeyEntry::Ambiguous(n + 1),
                    }
                })
                .or_insert(KeyEntry::Unique(idx));
        }

        Self { entries }
    }

    pub fn contains(&self, value: &KeyValue) -> bool {
        self.entries.contains_key(value)
    }

    pub fn get(&self, value: &KeyValue) -> Option<&KeyEntry> {
        self.entries.get(value)
    }

    /// Key values in first-encounter order.
    pub fn iter(&self) -> impl Iterator<Item = (&KeyValue, &KeyEntry)> {
        self.entries.iter()
    }

    /// Key values that map to more than one row, in first-encounter order.
    pub fn ambiguous_keys(&self) -> Vec<KeyValue> {
        self.entries
            .iter()
            .filter(|(_, e)| matches!(e, KeyEntry::Ambiguous(_)))
            .map(|(k, _)| k.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Row;

    fn table(rows: &[&[(&str, &str)]]) -> Table {
        let columns = rows
            .first()
            .map(|r| r.iter().map(|(c, _)| c.to_string()).collect())
            .unwrap_or_default();
        let mut t = Table::new(columns);
        for row in rows {
            t.push_row(Row::from_pairs(row.iter().copied()));
        }
        t
    }

    #[test]
    fn unique_keys_keep_row_indices() {
        let t = table(&[&[("ID", "1")], &[("ID", "2")]]);
        let index = KeyIndex::build(&t, &KeySpec::parse("ID"));
        assert_eq!(
            index.get(&KeyValue::new(vec!["2".into()])),
            Some(&KeyEntry::Unique(1))
        );
        assert!(index.ambiguous_keys().is_empty());
    }

    #[test]
    fn duplicates_become_ambiguous_with_count() {
        let t = table(&[&[("ID", "1")], &[("ID", "1")], &[("ID", "1")]]);
        let index = KeyIndex::build(&t, &KeySpec::parse("ID"));
        assert_eq!(
            index.get(&KeyValue::new(vec!["1".into()])),
            Some(&KeyEntry::Ambiguous(3))
        );
        assert_eq!(index.ambiguous_keys().len(), 1);
        assert_eq!(index.iter().count(), 1);
    }

    #[test]
    fn iteration_follows_first_encounter_order() {
        let t = table(&[
            &[("ID", "b")],
            &[("ID", "a")],
            &[("ID", "b")],
            &[("ID", "c")],
        ]);
        let index = KeyIndex::build(&t, &KeySpec::parse("ID"));
        let order: Vec<String> = index.iter().map(|(k, _)| k.to_string()).collect();
        assert_eq!(order, vec!["b", "a", "c"]);
    }
}
