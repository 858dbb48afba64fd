//! `data-detective-ingest` turns uploaded tabular files into a validated, typed in-memory
//! [`types::ParsedData`] that analytics and UI layers can consume directly.
//!
//! The primary entrypoint is [`ingestion::DataIngestor`], a caller-owned service with no hidden
//! shared state. It picks a parser from the file extension (or you can force a format via
//! [`ingestion::IngestionOptions`]), parses the content, infers column types from a sample, and
//! validates the result.
//!
//! ## What you can ingest
//!
//! **File formats (detected by extension):**
//!
//! - **CSV**: `.csv` (delimiter sniffed from `,` `;` tab `|` unless configured)
//! - **JSON**: `.json` (array of objects, a single object, or NDJSON)
//! - **Text**: `.txt` (read as CSV; if that fails, read once more as JSON)
//! - **Excel** (Cargo feature `excel`, on by default): `.xlsx`, `.xls`, first worksheet only
//!
//! Uploads of zero bytes or above [`config::IngestionConfig::max_file_size`] are rejected before
//! any parsing.
//!
//! **Column typing:**
//!
//! Each [`types::DataColumn`] gets a [`types::ColumnType`] (`string`, `number`, `date`,
//! `boolean`) decided by the first non-empty value among the first
//! [`config::IngestionConfig::sample_size`] rows. This is a heuristic: later values are not
//! checked against it.
//!
//! **Summary:**
//!
//! [`types::DataSummary`] carries row/column counts and advisory name-based hints for columns that
//! look like user ids, event names or timestamps.
//!
//! ## Quick example
//!
//! ```rust
//! use data_detective_ingest::ingestion::{DataIngestor, SourceFile};
//! use data_detective_ingest::types::{ColumnType, Value};
//!
//! # fn main() -> Result<(), data_detective_ingest::IngestionError> {
//! let ingestor = DataIngestor::default();
//! let upload = SourceFile::new("events.csv", "user_id,event,ts\n7,login,2024-05-01\n");
//! let data = ingestor.parse_file(&upload)?;
//!
//! assert_eq!(data.row_count(), 1);
//! assert_eq!(data.columns()[2].column_type, ColumnType::Date);
//! assert_eq!(data.value(0, "event"), Some(&Value::from("login")));
//! assert_eq!(
//!     data.summary().possible_user_id_columns,
//!     Some(vec!["user_id".to_string()])
//! );
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`ingestion`]: dispatcher, the ingestion service and format-specific readers
//! - [`processing`]: header normalisation, type inference, validation and summary
//! - [`types`]: the `ParsedData` model and the persistence payload
//! - [`config`]: limits and parser settings
//! - [`export`]: CSV export
//! - [`batch`]: discovering files to queue
//! - [`error`]: error types used across ingestion

pub mod batch;
pub mod config;
pub mod error;
pub mod export;
pub mod ingestion;
pub mod processing;
pub mod types;

pub use error::{IngestionError, IngestionResult};
