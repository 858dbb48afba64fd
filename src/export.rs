//! CSV export of a [`ParsedData`], e.g. for "download as CSV".

use crate::error::{IngestionError, IngestionResult};
use crate::ingestion::IngestionFormat;
use crate::types::ParsedData;

/// Write `data` as comma-separated text with a header row. Values are rendered with
/// [`crate::types::Value::to_text`]; quoting follows the `csv` crate's defaults.
pub fn to_csv_string(data: &ParsedData) -> IngestionResult<String> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(data.column_names())?;
    for row in data.rows() {
        wtr.write_record(row.iter().map(|v| v.to_text()))?;
    }
    let bytes = wtr
        .into_inner()
        .map_err(|e| IngestionError::parse(IngestionFormat::Csv, e.error()))?;
    String::from_utf8(bytes).map_err(|e| IngestionError::parse(IngestionFormat::Csv, e))
}
