//! End-to-end tests: files on disk through loading, filtering and export.

use record_filter::apply_filters_at;
use record_filter_cli::export::{write_records, OutputFormat};
use record_filter_cli::input::{load_filter_set, load_records, parse_now};
use record_filter_cli::CliError;
use std::path::PathBuf;
use std::process::Command;
use tempfile::TempDir;

const RECORDS_JSON: &str = r#"[
    {"id": 1, "name": "Alice", "department": "Engineering", "salary": 95000, "hiredAt": "2024-06-25", "skills": ["React", "SQL"]},
    {"id": 2, "name": "Bob", "department": "Sales", "salary": 40000, "hiredAt": "2023-11-02", "skills": ["SQL"]},
    {"id": 3, "name": "Carol", "department": "Sales", "salary": 60000, "hiredAt": "2024-05-10", "skills": ["Go"]}
]"#;

const FILTERS_YAML: &str = r#"
fields:
  - key: name
    label: Name
    type: text
  - key: department
    label: Department
    type: singleSelect
    options:
      - { label: Sales, value: Sales }
      - { label: Engineering, value: Engineering }
  - key: salary
    label: Salary
    type: number
  - key: hiredAt
    label: Hired
    type: date
conditions:
  - id: filter-1
    fieldKey: department
    operator: is
    value: Sales
  - id: filter-2
    fieldKey: salary
    operator: numberBetween
    value: { min: 50000, max: "" }
  - id: filter-3
    fieldKey: ""
    operator: ""
    value: ""
"#;

fn write_fixture(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_load_apply_and_export_csv() {
    let dir = TempDir::new().unwrap();
    let records_path = write_fixture(&dir, "people.json", RECORDS_JSON);
    let filters_path = write_fixture(&dir, "filters.yaml", FILTERS_YAML);

    let records = load_records(&records_path).unwrap();
    let set = load_filter_set(&filters_path).unwrap();
    assert_eq!(set.active_count(), 2);

    let now = parse_now(Some("2024-06-30")).unwrap();
    let filtered = apply_filters_at(&records, &set.conditions, &set.fields, now);
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0]["name"], "Carol");

    let mut out = Vec::new();
    write_records(&filtered, &set.fields, OutputFormat::Csv, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert_eq!(text, "Name,Department,Salary,Hired\nCarol,Sales,60000,2024-05-10\n");
}

#[test]
fn test_json_filter_set_matches_yaml() {
    let dir = TempDir::new().unwrap();
    let yaml_path = write_fixture(&dir, "filters.yml", FILTERS_YAML);
    let from_yaml = load_filter_set(&yaml_path).unwrap();

    let json_path = write_fixture(&dir, "filters.json", &serde_json::to_string(&from_yaml).unwrap());
    let from_json = load_filter_set(&json_path).unwrap();
    assert_eq!(from_json, from_yaml);
}

#[test]
fn test_input_errors() {
    let dir = TempDir::new().unwrap();

    let toml_path = write_fixture(&dir, "filters.toml", "fields = []");
    let err = load_filter_set(&toml_path).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<CliError>(),
        Some(CliError::UnsupportedExtension(_))
    ));

    let object_path = write_fixture(&dir, "object.json", r#"{"id": 1}"#);
    let err = load_records(&object_path).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<CliError>(),
        Some(CliError::RecordsNotArray(_))
    ));

    let mixed_path = write_fixture(&dir, "mixed.json", r#"[{"id": 1}, 2]"#);
    let err = load_records(&mixed_path).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<CliError>(),
        Some(CliError::RecordNotObject { index: 1, .. })
    ));

    let missing = dir.path().join("missing.json");
    let err = load_records(&missing).unwrap_err();
    assert!(err.to_string().contains("missing.json"));
}

#[test]
fn test_binary_apply_writes_output_file() {
    let dir = TempDir::new().unwrap();
    let records_path = write_fixture(&dir, "people.json", RECORDS_JSON);
    let filters_path = write_fixture(&dir, "filters.yaml", FILTERS_YAML);
    let output_path = dir.path().join("out.json");

    let status = Command::new(env!("CARGO_BIN_EXE_rfilter"))
        .arg("apply")
        .arg("--records")
        .arg(&records_path)
        .arg("--filters")
        .arg(&filters_path)
        .arg("--now")
        .arg("2024-06-30")
        .arg("--output")
        .arg(&output_path)
        .status()
        .unwrap();
    assert!(status.success());

    let written: Vec<serde_json::Value> =
        serde_json::from_str(&std::fs::read_to_string(&output_path).unwrap()).unwrap();
    assert_eq!(written.len(), 1);
    assert_eq!(written[0]["id"], 3);
}

#[test]
fn test_binary_rejects_bad_now() {
    let dir = TempDir::new().unwrap();
    let records_path = write_fixture(&dir, "people.json", RECORDS_JSON);
    let filters_path = write_fixture(&dir, "filters.yaml", FILTERS_YAML);

    let output = Command::new(env!("CARGO_BIN_EXE_rfilter"))
        .args(["apply", "--now", "whenever", "--records"])
        .arg(&records_path)
        .arg("--filters")
        .arg(&filters_path)
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid --now value"));
}
