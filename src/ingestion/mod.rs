//! Ingestion entrypoints and implementations.
//!
//! Most callers should use [`DataIngestor`] (from [`unified`]) which:
//!
//! - rejects empty/oversized uploads and picks a parser by file extension (or you can override
//!   via [`IngestionOptions`])
//! - parses the content and normalises it into a [`crate::types::ParsedData`]
//! - optionally reports success/failure/alerts to an [`IngestionObserver`]
//!
//! Format-specific readers are also available under:
//! - [`csv`]
//! - [`json`]
//! - `excel` (feature `excel`)

pub mod csv;
#[cfg(feature = "excel")]
pub mod excel;
pub mod json;
pub mod observability;
pub mod unified;

pub use observability::{
    CompositeObserver, FileObserver, IngestionContext, IngestionObserver, IngestionSeverity, IngestionStats,
    TracingObserver,
};
pub use unified::{
    dispatch, ingest_from_path, severity_for_error, DataIngestor, IngestionFormat, IngestionOptions, SourceFile,
    SUPPORTED_EXTENSIONS,
};
