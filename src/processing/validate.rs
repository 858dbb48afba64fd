//! The single gate every parser funnels through before a [`crate::types::ParsedData`] exists.

use crate::error::{IngestionError, IngestionResult};
use crate::types::{DataColumn, Value};

/// Reject tables that have no data rows or no columns.
///
/// Rows are checked first, so an input that is empty in both dimensions reports
/// [`IngestionError::EmptyDataset`].
pub fn validate(rows: &[Vec<Value>], columns: &[DataColumn]) -> IngestionResult<()> {
    if rows.is_empty() {
        return Err(IngestionError::EmptyDataset);
    }
    if columns.is_empty() {
        return Err(IngestionError::NoColumns);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::validate;
    use crate::error::IngestionError;
    use crate::types::{ColumnType, DataColumn, Value};

    #[test]
    fn one_row_one_column_is_enough() {
        let cols = vec![DataColumn::new("a", ColumnType::String)];
        assert!(validate(&[vec![Value::from("x")]], &cols).is_ok());
    }

    #[test]
    fn empty_rows_win_over_empty_columns() {
        let err = validate(&[], &[]).unwrap_err();
        assert!(matches!(err, IngestionError::EmptyDataset));
    }

    #[test]
    fn rows_without_columns_fail() {
        let err = validate(&[vec![]], &[]).unwrap_err();
        assert!(matches!(err, IngestionError::NoColumns));
    }
}
