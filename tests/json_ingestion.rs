use data_detective_ingest::config::IngestionConfig;
use data_detective_ingest::ingestion::json::read_json_from_str;
use data_detective_ingest::ingestion::{DataIngestor, IngestionFormat, IngestionOptions, SourceFile};
use data_detective_ingest::types::{ColumnType, Value};
use data_detective_ingest::IngestionError;

#[test]
fn parse_json_array_fixture_from_path() {
    let ds = DataIngestor::default().parse_path("tests/fixtures/people.json").unwrap();

    assert_eq!(ds.row_count(), 2);
    assert_eq!(
        ds.column_names().collect::<Vec<_>>(),
        vec!["id", "user.name", "score", "active"]
    );
    assert_eq!(ds.value(0, "id"), Some(&Value::Int64(1)));
    assert_eq!(ds.value(1, "user.name"), Some(&Value::from("Grace")));
    assert_eq!(ds.columns()[3].column_type, ColumnType::Boolean);
    assert_eq!(
        ds.summary().possible_user_id_columns,
        Some(vec!["id".to_string(), "user.name".to_string()])
    );
}

#[test]
fn single_object_becomes_one_row() {
    let ds = DataIngestor::default()
        .parse_file(&SourceFile::new("one.json", r#"{"a":1,"b":2}"#))
        .unwrap();
    assert_eq!(ds.row_count(), 1);
    assert_eq!(ds.column_names().collect::<Vec<_>>(), vec!["a", "b"]);
}

#[test]
fn empty_array_is_an_empty_dataset() {
    let err = DataIngestor::default()
        .parse_file(&SourceFile::new("empty.json", "[]"))
        .unwrap_err();
    assert!(matches!(err, IngestionError::EmptyDataset));
}

#[test]
fn objects_without_keys_have_no_columns() {
    let err = DataIngestor::default()
        .parse_file(&SourceFile::new("blank.json", "[{}, {}]"))
        .unwrap_err();
    assert!(matches!(err, IngestionError::NoColumns));
}

#[test]
fn deep_nesting_is_rejected() {
    let options = IngestionOptions::from(IngestionConfig {
        max_json_depth: 1,
        ..Default::default()
    });
    let input = r#"[{"a":{"b":{"c":1}}}]"#;
    let err = DataIngestor::new(options)
        .parse_file(&SourceFile::new("deep.json", input))
        .unwrap_err();
    assert!(matches!(err, IngestionError::InvalidJsonStructure { .. }));
    assert!(err.to_string().contains("a.b"));
}

#[test]
fn malformed_json_reports_the_format() {
    let err = DataIngestor::default()
        .parse_file(&SourceFile::new("bad.json", r#"[{"a":1},"#))
        .unwrap_err();
    match err {
        IngestionError::Parse { format, .. } => assert_eq!(format, IngestionFormat::Json),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn json_numbers_keep_native_types() {
    let table = read_json_from_str(r#"[{"n":1,"f":1.25,"big":18446744073709551615}]"#, 3).unwrap();
    assert_eq!(table.rows[0][0], Value::Int64(1));
    assert_eq!(table.rows[0][1], Value::Float64(1.25));
    assert!(matches!(table.rows[0][2], Value::Float64(_)));
}
