//! Spreadsheet loader (xlsx, xls, xlsm, ods)

use std::path::Path;

use anyhow::{bail, Context, Result};
use calamine::{open_workbook_auto, Data, Range, Reader};
use log::debug;

use crate::model::{Row, Table};

use super::normalize::normalize_column;
use super::{Loader, SourceOptions};

/// Loader for spreadsheet files via calamine.
///
/// The first row is the header; every cell is rendered to a string, so the
/// table reaching the comparator has the same shape as one loaded from CSV.
#[derive(Debug)]
pub struct ExcelLoader;

impl Loader for ExcelLoader {
    fn load(&self, path: &Path, options: &SourceOptions) -> Result<Table> {
        let mut workbook = open_workbook_auto(path)
            .with_context(|| format!("failed to open spreadsheet: {}", path.display()))?;

        let sheet_name = match &options.sheet {
            Some(name) => name.clone(),
            None => {
                let sheets = workbook.sheet_names();
                let Some(first) = sheets.first() else {
                    bail!("no sheets found in {}", path.display());
                };
                first.clone()
            }
        };

        let range: Range<Data> = workbook
            .worksheet_range(&sheet_name)
            .with_context(|| format!("failed to read sheet '{sheet_name}'"))?;

        let table = range_to_table(&range)?;
        debug!(
            "loaded {} rows x {} columns from {} (sheet '{}')",
            table.row_count(),
            table.column_count(),
            path.display(),
            sheet_name
        );
        Ok(table)
    }

    fn supports_extension(&self, ext: &str) -> bool {
        matches!(ext.to_lowercase().as_str(), "xlsx" | "xls" | "xlsm" | "ods")
    }
}

fn range_to_table(range: &Range<Data>) -> Result<Table> {
    let mut rows_iter = range.rows();
    let Some(header_row) = rows_iter.next() else {
        bail!("sheet is empty");
    };

    let columns: Vec<String> = header_row
        .iter()
        .enumerate()
        .map(|(i, cell)| {
            let name = cell_to_string(cell);
            if name.trim().is_empty() {
                format!("COLUMN{}", i + 1)
            } else {
                normalize_column(&name)
            }
        })
        .collect();

    let mut table = Table::new(columns);
    for cells in rows_iter {
        let mut row = Row::new();
        for (idx, column) in table.columns.iter().enumerate() {
            let value = cells.get(idx).map(cell_to_string).unwrap_or_default();
            row.insert(column.clone(), value);
        }
        table.rows.push(row);
    }
    Ok(table)
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => {
            // Whole floats print without the trailing ".0" so numeric IDs
            // survive the spreadsheet round-trip as the same key strings.
            if f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
                (*f as i64).to_string()
            } else {
                f.to_string()
            }
        }
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt.to_string(),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(e) => format!("#{e:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floats_with_no_fraction_render_as_integers() {
        assert_eq!(cell_to_string(&Data::Float(42.0)), "42");
        assert_eq!(cell_to_string(&Data::Float(1.5)), "1.5");
    }

    #[test]
    fn empty_cells_render_as_empty_strings() {
        assert_eq!(cell_to_string(&Data::Empty), "");
    }

    #[test]
    fn bools_and_ints_render_plainly() {
        assert_eq!(cell_to_string(&Data::Bool(true)), "true");
        assert_eq!(cell_to_string(&Data::Int(7)), "7");
    }
}
