//! Summary construction for [`crate::types::ParsedData`].

use crate::types::{DataColumn, DataSummary, Value};

use super::inference::role_hints;

/// Compute the dataset summary. Pure and deterministic: the same `(rows, columns)` always yields
/// an equal summary. Role hint lists that would be empty are left as `None`.
pub fn build_summary(rows: &[Vec<Value>], columns: &[DataColumn]) -> DataSummary {
    let hints = role_hints(columns);
    DataSummary {
        total_rows: rows.len(),
        total_columns: columns.len(),
        possible_user_id_columns: non_empty(hints.user_id),
        possible_event_columns: non_empty(hints.event),
        possible_timestamp_columns: non_empty(hints.timestamp),
    }
}

fn non_empty(names: Vec<String>) -> Option<Vec<String>> {
    (!names.is_empty()).then_some(names)
}
