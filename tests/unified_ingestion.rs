use data_detective_ingest::config::IngestionConfig;
use data_detective_ingest::export::to_csv_string;
use data_detective_ingest::ingestion::{
    ingest_from_path, DataIngestor, IngestionFormat, IngestionOptions, SourceFile,
};
use data_detective_ingest::types::{ColumnType, ParsedData, Value};
use data_detective_ingest::IngestionError;

#[test]
fn txt_fixture_is_read_as_csv_with_sniffed_delimiter() {
    let ds = ingest_from_path("tests/fixtures/events.txt", &IngestionOptions::default()).unwrap();

    assert_eq!(ds.row_count(), 3);
    assert_eq!(
        ds.column_names().collect::<Vec<_>>(),
        vec!["user_id", "event", "timestamp"]
    );
    assert_eq!(ds.columns()[2].column_type, ColumnType::Date);

    let summary = ds.summary();
    assert_eq!(summary.total_rows, 3);
    assert_eq!(summary.total_columns, 3);
    assert_eq!(summary.possible_user_id_columns, Some(vec!["user_id".to_string()]));
    assert_eq!(summary.possible_event_columns, Some(vec!["event".to_string()]));
    assert_eq!(summary.possible_timestamp_columns, Some(vec!["timestamp".to_string()]));
}

#[test]
fn oversized_declared_size_is_rejected_without_parsing() {
    let ingestor = DataIngestor::new(IngestionConfig::default().with_max_file_size(8).into());
    let file = SourceFile {
        name: "huge.csv".to_string(),
        declared_size: 9,
        // Content is never looked at.
        bytes: b"not even csv".to_vec(),
    };
    let err = ingestor.parse_file(&file).unwrap_err();
    assert!(matches!(err, IngestionError::FileTooLarge { size: 9, max: 8 }));
}

#[test]
fn queue_results_are_independent() {
    let ingestor = DataIngestor::default();
    let files = vec![
        SourceFile::new("a.csv", "x,y\n1,2\n"),
        SourceFile::new("b.pdf", "%PDF"),
        SourceFile::new("c.json", r#"[{"k":"v"}]"#),
    ];

    let results = ingestor.parse_queue(&files);
    assert_eq!(results.len(), 3);
    assert_eq!(results[0].as_ref().unwrap().row_count(), 1);
    assert!(matches!(
        results[1],
        Err(IngestionError::UnsupportedFormat { .. })
    ));
    assert_eq!(results[2].as_ref().unwrap().columns()[0].name, "k");
}

#[test]
fn pasted_text_and_synthetic_records_have_zero_size() {
    let ingestor = DataIngestor::default();

    let pasted = ingestor.parse_text("a,b\n1,2\n").unwrap();
    assert_eq!(pasted.file_size(), 0);
    assert_eq!(pasted.row_count(), 1);

    let generated = ingestor
        .from_records(
            vec!["session".to_string(), "duration".to_string()],
            vec![
                vec![Value::from("s1"), Value::Int64(30)],
                vec![Value::from("s2"), Value::Int64(45)],
            ],
        )
        .unwrap();
    assert_eq!(generated.file_size(), 0);
    assert_eq!(generated.columns()[1].column_type, ColumnType::Number);

    assert!(matches!(ingestor.parse_text(""), Err(IngestionError::EmptyFile)));
}

#[test]
fn text_upload_falls_back_to_json() {
    let ds = DataIngestor::default()
        .parse_file(&SourceFile::new(
            "export.txt",
            "{\n  \"event\": \"login\",\n  \"at\": \"2024-01-01\"\n}\n",
        ))
        .unwrap();
    assert_eq!(ds.row_count(), 1);
    assert_eq!(ds.column_names().collect::<Vec<_>>(), vec!["event", "at"]);
}

#[test]
fn failed_parse_leaves_previous_result_untouched() {
    let ingestor = DataIngestor::default();
    let accepted = ingestor.parse_file(&SourceFile::new("good.csv", "a\n1\n")).unwrap();
    let snapshot = accepted.clone();

    assert!(ingestor.parse_file(&SourceFile::new("bad.json", "{")).is_err());
    assert_eq!(accepted, snapshot);
}

#[test]
fn parsed_data_survives_a_json_snapshot() {
    let ds = DataIngestor::default()
        .parse_file(&SourceFile::new("people.csv", "name,age\nAlice,30\nBob,\n"))
        .unwrap();

    let snapshot = serde_json::to_string(&ds).unwrap();
    let restored: ParsedData = serde_json::from_str(&snapshot).unwrap();
    assert_eq!(restored, ds);

    let record = serde_json::to_value(ds.to_record("people.csv", 10)).unwrap();
    assert_eq!(record["rowCount"], 2);
    assert_eq!(record["sampleRows"][1]["name"], "Bob");
    assert_eq!(record["columns"][1]["type"], "number");
}

#[test]
fn csv_export_parses_back() {
    let ds = DataIngestor::default()
        .parse_file(&SourceFile::new("q.csv", "name,note\n\"Smith, J\",\"said \"\"hi\"\"\"\n"))
        .unwrap();

    let text = to_csv_string(&ds).unwrap();
    let back = DataIngestor::new(IngestionOptions {
        format: Some(IngestionFormat::Csv),
        ..Default::default()
    })
    .parse_file(&SourceFile::new("export", text))
    .unwrap();

    assert_eq!(back.rows(), ds.rows());
}

#[test]
fn single_column_export_keeps_empty_rows() {
    let ingestor = DataIngestor::default();
    let original = ingestor
        .from_records(
            vec!["name".to_string()],
            vec![vec![Value::from("a")], vec![Value::Null], vec![Value::from("b")]],
        )
        .unwrap();

    let text = to_csv_string(&original).unwrap();
    let back = ingestor.parse_file(&SourceFile::new("rt.csv", text)).unwrap();

    assert_eq!(back.row_count(), 3);
    assert_eq!(back.value(1, "name"), Some(&Value::from("")));
}

#[test]
fn pasted_ragged_text_is_read_as_csv() {
    let data = DataIngestor::default()
        .parse_text("user;event;ts\nu1;login\nu2;logout;2024-01-02;extra\n")
        .unwrap();
    assert_eq!(data.row_count(), 2);
    assert_eq!(data.value(0, "ts"), Some(&Value::Null));
    assert_eq!(data.columns()[2].column_type, ColumnType::Date);
}
