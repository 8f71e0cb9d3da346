use smart_search::filter::{FilterOptions, QueryFilter};
use smart_search::records::{RecordsError, collect_field_names, load_records};
use std::fs;
use std::path::Path;

use tempfile::tempdir;

fn write_file(path: &Path, content: &str) {
    fs::write(path, content).expect("failed to write test file");
}

#[test]
fn test_load_json_array_file() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("people.json");
    write_file(
        &path,
        r#"[
            {"name": "Ada Lovelace", "city": "London"},
            {"name": "Grace Hopper", "city": "New York"}
        ]"#,
    );

    let records = load_records(&path).expect("records should load");
    assert_eq!(records.len(), 2);
    assert_eq!(records[1]["city"], "New York");
}

#[test]
fn test_load_ndjson_and_filter() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("people.ndjson");
    write_file(
        &path,
        "{\"name\":\"Ada Lovelace\",\"city\":\"London\"}\n\
         {\"name\":\"Alan Turing\",\"city\":\"London\"}\n\
         {\"name\":\"Grace Hopper\",\"city\":\"New York\"}\n",
    );

    let records = load_records(&path).expect("records should load");
    let filter = QueryFilter::new(
        "city:london -alan",
        collect_field_names(&records),
        FilterOptions::new(),
    );
    let matched = filter.filter(&records);

    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0]["name"], "Ada Lovelace");
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempdir().expect("temp dir");
    let err = load_records(&dir.path().join("missing.json")).unwrap_err();
    assert!(matches!(err, RecordsError::Io { .. }));
    assert!(err.to_string().contains("missing.json"));
}

#[test]
fn test_invalid_array_is_reported() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("broken.json");
    write_file(&path, "[{\"name\": ");

    let err = load_records(&path).unwrap_err();
    assert!(matches!(err, RecordsError::Json5 { .. }));
}
