//! End-to-end reconciliation through the public API: load, compare, report.

use std::fs;
use std::path::Path;

use tabrecon::compare::Comparator;
use tabrecon::loader::{normalize_columns, LoaderFactory, SourceOptions};
use tabrecon::model::KeySpec;
use tabrecon::report::{ReportFactory, ReportFormat};

fn load(path: &Path) -> tabrecon::Table {
    LoaderFactory::new()
        .load(path, &SourceOptions::default())
        .unwrap()
}

#[test]
fn csv_to_text_report_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let path_a = dir.path().join("a.csv");
    let path_b = dir.path().join("b.csv");
    fs::write(
        &path_a,
        "id;nome;updated at\n1;Bob;2024-01-01\n2;Ana;2024-01-01\n",
    )
    .unwrap();
    fs::write(
        &path_b,
        "id;nome;updated at\n1;Bobby;2024-06-30\n3;Carla;2024-01-01\n",
    )
    .unwrap();

    let table_a = load(&path_a);
    let table_b = load(&path_b);
    assert_eq!(table_a.columns, vec!["ID", "NOME", "UPDATED_AT"]);

    // Key and ignore lists are given un-normalized, as a user would.
    let key = KeySpec::new(normalize_columns(&["id".into()]));
    let ignore = normalize_columns(&["updated at".into()]);
    let result = Comparator::new(key, &ignore)
        .compare(&table_a, &table_b)
        .unwrap();

    assert_eq!(result.stats.only_in_a, 1);
    assert_eq!(result.stats.only_in_b, 1);
    assert_eq!(result.stats.differing, 1);
    assert_eq!(result.stats.matched_unchanged, 0);

    let mut buffer = Vec::new();
    ReportFactory::create(ReportFormat::Text)
        .render(&result, &mut buffer)
        .unwrap();
    let text = String::from_utf8(buffer).unwrap();

    assert!(text.contains("2,Ana"));
    assert!(text.contains("3,Carla"));
    assert!(text.contains(" - NOME: source A = 'Bob', source B = 'Bobby'"));
    // The timestamp column was ignored and must not be reported.
    assert!(!text.contains("2024-06-30',"));
    assert!(!text.contains("- UPDATED_AT"));
}

#[test]
fn repeated_runs_produce_identical_reports() {
    let dir = tempfile::tempdir().unwrap();
    let path_a = dir.path().join("a.csv");
    let path_b = dir.path().join("b.csv");
    fs::write(&path_a, "ID;V\n2;x\n1;y\n3;z\n").unwrap();
    fs::write(&path_b, "ID;V\n1;y2\n2;x2\n").unwrap();

    let key = KeySpec::parse("ID");
    let comparator = Comparator::new(key, &[]);

    let mut reports = Vec::new();
    for _ in 0..2 {
        let result = comparator.compare(&load(&path_a), &load(&path_b)).unwrap();
        let mut buffer = Vec::new();
        ReportFactory::create(ReportFormat::Json)
            .render(&result, &mut buffer)
            .unwrap();
        reports.push(String::from_utf8(buffer).unwrap());
    }
    assert_eq!(reports[0], reports[1]);

    // Diff order follows table A's scan order: key 2 before key 1.
    let parsed: serde_json::Value = serde_json::from_str(&reports[0]).unwrap();
    assert_eq!(parsed["diffs"][0]["key"][0], "2");
    assert_eq!(parsed["diffs"][1]["key"][0], "1");
}

#[test]
fn mismatched_schemas_abort_with_both_column_lists() {
    let dir = tempfile::tempdir().unwrap();
    let path_a = dir.path().join("a.csv");
    let path_b = dir.path().join("b.csv");
    fs::write(&path_a, "ID;V\n1;x\n").unwrap();
    fs::write(&path_b, "CODE;V\n1;x\n").unwrap();

    let err = Comparator::new(KeySpec::parse("ID"), &[])
        .compare(&load(&path_a), &load(&path_b))
        .unwrap_err();
    let message = err.to_string();
    assert!(message.contains("[ID]"));
    assert!(message.contains("available in B: [CODE, V]"));
}
