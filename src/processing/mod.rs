//! Normalisation of parsed tables into [`crate::types::ParsedData`].
//!
//! Every format parser yields a [`RawTable`]; [`finalize`] then runs the shared steps in order:
//!
//! - [`inference::normalize_headers`]: trim, name blank headers, de-duplicate
//! - [`inference::infer_columns`]: sample-based column typing
//! - [`validate::validate`]: reject empty datasets
//! - [`summary::build_summary`]: counts and column role hints
//!
//! ## Example
//!
//! ```rust
//! use data_detective_ingest::config::IngestionConfig;
//! use data_detective_ingest::processing::finalize;
//! use data_detective_ingest::types::{ColumnType, RawTable, Value};
//!
//! let table = RawTable::new(
//!     vec!["name".to_string(), "age".to_string()],
//!     vec![vec![Value::from("Alice"), Value::from("30")]],
//! );
//! let data = finalize(table, 0, &IngestionConfig::default()).unwrap();
//! assert_eq!(data.columns()[1].column_type, ColumnType::Number);
//! ```

pub mod inference;
pub mod summary;
pub mod validate;

use crate::config::IngestionConfig;
use crate::error::IngestionResult;
use crate::types::{ParsedData, RawTable};

pub use inference::{infer_column_type, infer_columns, normalize_headers, role_hints, ColumnRoleHints};
pub use summary::build_summary;
pub use validate::validate;

/// Turn a parser's [`RawTable`] into a validated [`ParsedData`].
pub fn finalize(table: RawTable, file_size: u64, config: &IngestionConfig) -> IngestionResult<ParsedData> {
    let headers = normalize_headers(table.headers);
    let columns = infer_columns(&headers, &table.rows, config);
    ParsedData::try_new(columns, table.rows, file_size)
}
