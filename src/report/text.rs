//! Sectioned plain-text report

use std::io::Write;

use anyhow::{Context, Result};

use crate::compare::ComparisonResult;
use crate::model::{KeyValue, Row};

use super::ReportSink;

/// Plain-text report: only-A rows as CSV, only-B rows as CSV, then one block
/// per differing key listing both values of each changed field.
pub struct TextReport;

impl TextReport {
    pub fn new() -> Self {
        Self
    }

    fn write_rows_csv(
        &self,
        columns: &[String],
        rows: &[Row],
        writer: &mut dyn Write,
    ) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(Vec::new());
        csv_writer
            .write_record(columns)
            .context("failed to write report header")?;
        for row in rows {
            csv_writer
                .write_record(columns.iter().map(|c| row.get(c)))
                .context("failed to write report row")?;
        }
        let bytes = csv_writer
            .into_inner()
            .context("failed to flush report rows")?;
        writer.write_all(&bytes)?;
        Ok(())
    }
}

impl Default for TextReport {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportSink for TextReport {
    fn render(&self, result: &ComparisonResult, writer: &mut dyn Write) -> Result<()> {
        writeln!(writer, "### Records only in source A:")?;
        self.write_rows_csv(&result.columns_a, &result.only_in_a, writer)?;

        writeln!(writer)?;
        writeln!(writer, "### Records only in source B:")?;
        self.write_rows_csv(&result.columns_b, &result.only_in_b, writer)?;

        writeln!(writer)?;
        writeln!(writer, "### Records with differences on shared keys:")?;
        for entry in &result.diffs {
            writeln!(writer, "Key: {}", format_key(&entry.key))?;
            writeln!(writer, "Differences:")?;
            for (column, diff) in &entry.differences {
                writeln!(
                    writer,
                    " - {}: source A = '{}', source B = '{}'",
                    column, diff.a, diff.b
                )?;
            }
            writeln!(writer)?;
        }

        if result.has_ambiguous_keys() {
            writeln!(writer, "### Ambiguous keys (duplicated within one source, excluded from field comparison):")?;
            if !result.ambiguous_in_a.is_empty() {
                writeln!(writer, "source A: {}", format_key_list(&result.ambiguous_in_a))?;
            }
            if !result.ambiguous_in_b.is_empty() {
                writeln!(writer, "source B: {}", format_key_list(&result.ambiguous_in_b))?;
            }
        }

        Ok(())
    }
}

fn format_key(key: &KeyValue) -> String {
    key.components().join(", ")
}

fn format_key_list(keys: &[KeyValue]) -> String {
    keys.iter()
        .map(|k| format!("({})", format_key(k)))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::{compare, Comparator};
    use crate::model::{KeySpec, Table};

    fn render(result: &ComparisonResult) -> String {
        let mut buffer = Vec::new();
        TextReport::new().render(result, &mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    fn table(columns: &[&str], rows: &[&[(&str, &str)]]) -> Table {
        let mut t = Table::new(columns.iter().map(|c| c.to_string()).collect());
        for row in rows {
            t.push_row(Row::from_pairs(row.iter().copied()));
        }
        t
    }

    #[test]
    fn report_contains_all_three_sections() {
        let a = table(
            &["ID", "NAME"],
            &[
                &[("ID", "1"), ("NAME", "Bob")],
                &[("ID", "9"), ("NAME", "Zoe")],
            ],
        );
        let b = table(&["ID", "NAME"], &[&[("ID", "1"), ("NAME", "Bobby")]]);
        let result = compare(&a, &b, &KeySpec::parse("ID"), &[]).unwrap();
        let text = render(&result);

        assert!(text.contains("### Records only in source A:"));
        assert!(text.contains("9,Zoe"));
        assert!(text.contains("### Records only in source B:"));
        assert!(text.contains("### Records with differences on shared keys:"));
        assert!(text.contains("Key: 1"));
        assert!(text.contains(" - NAME: source A = 'Bob', source B = 'Bobby'"));
    }

    #[test]
    fn composite_keys_print_comma_separated() {
        let a = table(
            &["ID", "REGION", "V"],
            &[&[("ID", "1"), ("REGION", "n"), ("V", "x")]],
        );
        let b = table(
            &["ID", "REGION", "V"],
            &[&[("ID", "1"), ("REGION", "n"), ("V", "y")]],
        );
        let result = compare(&a, &b, &KeySpec::parse("ID,REGION"), &[]).unwrap();
        assert!(render(&result).contains("Key: 1, n"));
    }

    #[test]
    fn ambiguous_keys_get_a_notes_section() {
        let a = table(
            &["ID", "V"],
            &[&[("ID", "1"), ("V", "x")], &[("ID", "1"), ("V", "y")]],
        );
        let b = table(&["ID", "V"], &[&[("ID", "1"), ("V", "z")]]);
        let result = Comparator::new(KeySpec::parse("ID"), &[])
            .compare(&a, &b)
            .unwrap();
        let text = render(&result);
        assert!(text.contains("### Ambiguous keys"));
        assert!(text.contains("source A: (1)"));
    }
}
