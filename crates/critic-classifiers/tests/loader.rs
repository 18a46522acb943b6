//! Integration tests for reading labelled tables from disk.

use critic_classifiers::data_handling::LabelSet;
use critic_classifiers::io::{read_instances_csv, read_instances_csv_with_config, LoaderConfig};
use critic_classifiers::ClassifierError;

fn write(dir: &tempfile::TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn tsv_extension_selects_tab_delimiter() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(&dir, "reviews.tsv", "id\tgood\tbad\tlabel\nr1\t3\t0\t3\nr2\t0\t2\t0\n");
    let data = read_instances_csv(&path).unwrap();
    assert_eq!(data.num_features(), 2);
    assert_eq!(data.instances[0].features.get(0), 3.0);
    assert_eq!(data.instances[1].label, 0);
}

#[test]
fn custom_label_column_and_ignored_columns() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(
        &dir,
        "reviews.csv",
        "review_id,text_len,plot,acting,rating\n1,120,2,1,2\n2,80,0,4,1\n",
    );
    let config = LoaderConfig {
        label_column: "rating".to_string(),
        ignore_columns: vec!["review_id".to_string(), "text_len".to_string()],
        ..LoaderConfig::default()
    };
    let data = read_instances_csv_with_config(&path, &config).unwrap();
    assert_eq!(data.feature_names, vec!["plot", "acting"]);
    assert_eq!(data.instances[1].features.get(1), 4.0);
    assert_eq!(data.instances[0].label, 2);
}

#[test]
fn explicit_delimiter_overrides_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(&dir, "reviews.csv", "a;b;label\n1;2;1\n");
    let config = LoaderConfig {
        delimiter: Some(';'),
        label_set: LabelSet::Binary,
        ..LoaderConfig::default()
    };
    let data = read_instances_csv_with_config(&path, &config).unwrap();
    assert_eq!(data.instances.len(), 1);
    assert_eq!(data.instances[0].features.total_weight(), 3.0);
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = read_instances_csv(dir.path().join("absent.csv")).unwrap_err();
    assert!(matches!(err, ClassifierError::Io(_)));
}

#[test]
fn malformed_row_reports_its_line() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(&dir, "reviews.csv", "a,label\n1,0\n2,1\n3,seven\n");
    let err = read_instances_csv(&path).unwrap_err();
    assert!(matches!(err, ClassifierError::ParseError { line: 4, .. }));
}
