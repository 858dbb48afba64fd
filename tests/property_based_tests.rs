use data_detective_ingest::config::IngestionConfig;
use data_detective_ingest::export::to_csv_string;
use data_detective_ingest::ingestion::{DataIngestor, SourceFile};
use data_detective_ingest::processing::{build_summary, infer_column_type};
use data_detective_ingest::types::Value;
use data_detective_ingest::IngestionError;
use proptest::prelude::*;

fn header_strategy() -> impl Strategy<Value = Vec<String>> {
    // Distinct, already-trimmed names so normalisation leaves them unchanged.
    prop::collection::hash_set("[a-z][a-z0-9_]{0,8}", 1..6).prop_map(|set| set.into_iter().collect())
}

fn cell_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        Just(Value::from("")),
        "[A-Za-z0-9 ;,\"]{1,10}".prop_map(|s| Value::from(s.as_str())),
    ]
}

fn csv_escape(field: &str) -> String {
    if field.is_empty() || field.contains([',', '"', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

proptest! {
    #[test]
    fn csv_shape_matches_input(
        headers in header_strategy(),
        cells in prop::collection::vec(prop::collection::vec("([A-Za-z0-9][A-Za-z0-9 ,\"]{0,9})?", 6), 1..40),
    ) {
        let mut text = headers.join(",");
        text.push('\n');
        for row in &cells {
            let line: Vec<String> = row.iter().take(headers.len()).map(|c| csv_escape(c)).collect();
            text.push_str(&line.join(","));
            text.push('\n');
        }

        let ingestor = DataIngestor::new(IngestionConfig::default().with_delimiter(',').into());
        let ds = ingestor.parse_file(&SourceFile::new("gen.csv", text)).unwrap();

        prop_assert_eq!(ds.row_count(), cells.len());
        prop_assert_eq!(ds.rows().len(), ds.row_count());
        prop_assert_eq!(ds.columns().len(), headers.len());
        prop_assert_eq!(ds.column_names().collect::<Vec<_>>(), headers.iter().map(String::as_str).collect::<Vec<_>>());
    }

    #[test]
    fn export_then_parse_preserves_rows_and_columns(
        headers in header_strategy(),
        cells in prop::collection::vec(prop::collection::vec(cell_strategy(), 6), 1..20),
    ) {
        let rows: Vec<Vec<Value>> = cells
            .into_iter()
            .map(|r| r.into_iter().take(headers.len()).collect())
            .collect();
        let ingestor = DataIngestor::new(IngestionConfig::default().with_delimiter(',').into());
        let original = ingestor.from_records(headers.clone(), rows).unwrap();

        let text = to_csv_string(&original).unwrap();
        let back = ingestor.parse_file(&SourceFile::new("roundtrip.csv", text)).unwrap();

        prop_assert_eq!(back.row_count(), original.row_count());
        prop_assert_eq!(
            back.column_names().collect::<Vec<_>>(),
            original.column_names().collect::<Vec<_>>()
        );
    }

    #[test]
    fn oversized_files_never_produce_data(extra in 1u64..10_000, max in 1u64..10_000) {
        let ingestor = DataIngestor::new(IngestionConfig::default().with_max_file_size(max).into());
        let file = SourceFile {
            name: "big.csv".to_string(),
            declared_size: max + extra,
            bytes: b"a\n1\n".to_vec(),
        };
        let is_too_large = matches!(ingestor.parse_file(&file), Err(IngestionError::FileTooLarge { .. }));
        prop_assert!(is_too_large);
    }

    #[test]
    fn type_inference_is_stable(first in "[^\\s]\\PC{0,11}", rest in prop::collection::vec("\\PC{0,12}", 0..10)) {
        let mut values = vec![Value::Utf8(first.clone())];
        values.extend(rest.into_iter().map(Value::Utf8));

        let once = infer_column_type(&values);
        prop_assert_eq!(once, infer_column_type(&values));
        prop_assert_eq!(once, infer_column_type(&values[..1]));
    }

    #[test]
    fn summary_is_idempotent(headers in header_strategy(), n in 1usize..20) {
        let rows = vec![vec![Value::from("x"); headers.len()]; n];
        let ingestor = DataIngestor::default();
        let ds = ingestor.from_records(headers, rows).unwrap();

        let a = build_summary(ds.rows(), ds.columns());
        let b = build_summary(ds.rows(), ds.columns());
        prop_assert_eq!(&a, &b);
        prop_assert_eq!(&a, ds.summary());
    }
}
