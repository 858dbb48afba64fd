//! Unified ingestion entrypoint.
//!
//! Most callers construct a [`DataIngestor`] once and hand it uploads:
//!
//! - [`dispatch`] rejects empty/oversized files and picks a parser from the file extension
//!   (or [`IngestionOptions::format`] forces one)
//! - the format parser produces a [`RawTable`], which [`crate::processing::finalize`] types,
//!   validates and summarises into a [`ParsedData`]
//! - if an [`IngestionObserver`] is configured, success/failure/alerts are reported to it
//!
//! A `DataIngestor` holds no mutable state, so every call is independent of the ones before it.

use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::IngestionConfig;
use crate::error::{IngestionError, IngestionResult};
use crate::processing::finalize;
use crate::types::{ParsedData, RawTable, Value};

use super::csv::{looks_like_json, read_csv_from_str, CsvReadOptions};
use super::json::read_json_from_str;
use super::observability::{IngestionContext, IngestionObserver, IngestionSeverity, IngestionStats};

/// Extensions accepted by [`dispatch`], lower-case.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["csv", "json", "txt", "xlsx", "xls"];

/// Supported ingestion formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IngestionFormat {
    /// Comma-separated values (delimiter may be sniffed).
    Csv,
    /// JSON array-of-objects, single object, or NDJSON.
    Json,
    /// Plain text: read as CSV, falling back to JSON once.
    Text,
    /// Spreadsheet workbooks (feature-gated behind `excel`).
    Excel,
}

impl IngestionFormat {
    /// Parse an ingestion format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "json" => Some(Self::Json),
            "txt" => Some(Self::Text),
            "xlsx" | "xls" => Some(Self::Excel),
            _ => None,
        }
    }
}

impl fmt::Display for IngestionFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Text => "text",
            Self::Excel => "excel",
        })
    }
}

/// Decide how to parse an upload without looking at its content.
///
/// Fails with [`IngestionError::EmptyFile`] for a zero size, [`IngestionError::FileTooLarge`]
/// above `config.max_file_size`, and [`IngestionError::UnsupportedFormat`] for an unknown
/// extension.
pub fn dispatch(
    file_name: &str,
    declared_size: u64,
    config: &IngestionConfig,
) -> IngestionResult<IngestionFormat> {
    check_size(declared_size, config)?;

    let ext = Path::new(file_name)
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("");
    IngestionFormat::from_extension(ext).ok_or_else(|| IngestionError::UnsupportedFormat {
        extension: if ext.is_empty() {
            "(none)".to_string()
        } else {
            ext.to_ascii_lowercase()
        },
        supported: SUPPORTED_EXTENSIONS.join(", "),
    })
}

fn check_size(size: u64, config: &IngestionConfig) -> IngestionResult<()> {
    if size == 0 {
        return Err(IngestionError::EmptyFile);
    }
    if size > config.max_file_size {
        return Err(IngestionError::FileTooLarge {
            size,
            max: config.max_file_size,
        });
    }
    Ok(())
}

/// A raw upload: file name, size as reported by the source, and the content.
///
/// The declared size is trusted for the size checks; the content is not trusted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub name: String,
    pub declared_size: u64,
    pub bytes: Vec<u8>,
}

impl SourceFile {
    /// Build a source whose declared size is the content length.
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        let bytes = bytes.into();
        Self {
            name: name.into(),
            declared_size: bytes.len() as u64,
            bytes,
        }
    }
}

/// Options controlling unified ingestion behavior.
///
/// Use [`Default`] for common cases.
#[derive(Clone)]
pub struct IngestionOptions {
    /// Limits and parser settings.
    pub config: IngestionConfig,
    /// If `None`, detect the format from the file extension.
    pub format: Option<IngestionFormat>,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn IngestionObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: IngestionSeverity,
}

impl fmt::Debug for IngestionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IngestionOptions")
            .field("config", &self.config)
            .field("format", &self.format)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for IngestionOptions {
    fn default() -> Self {
        Self {
            config: IngestionConfig::default(),
            format: None,
            observer: None,
            alert_at_or_above: IngestionSeverity::Critical,
        }
    }
}

impl From<IngestionConfig> for IngestionOptions {
    fn from(config: IngestionConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }
}

/// Caller-owned ingestion service.
///
/// When an observer is configured, every `parse_*` call reports:
///
/// - `on_success` on success, with row/column/size stats
/// - `on_failure` on failure, with a computed severity
/// - `on_alert` on failure when the computed severity is >= `options.alert_at_or_above`
///
/// # Examples
///
/// ```rust
/// use data_detective_ingest::ingestion::{DataIngestor, SourceFile};
/// use data_detective_ingest::types::ColumnType;
///
/// # fn main() -> Result<(), data_detective_ingest::IngestionError> {
/// let ingestor = DataIngestor::default();
/// let data = ingestor.parse_file(&SourceFile::new("people.csv", "name,age\nAlice,30\nBob,\n"))?;
///
/// assert_eq!(data.row_count(), 2);
/// assert_eq!(data.columns()[1].column_type, ColumnType::Number);
/// # Ok(())
/// # }
/// ```
///
/// ## Pasted text
///
/// ```rust
/// use data_detective_ingest::ingestion::DataIngestor;
///
/// # fn main() -> Result<(), data_detective_ingest::IngestionError> {
/// // Not CSV-shaped, so the JSON attempt is used. Pasted text has no file size.
/// let data = DataIngestor::default().parse_text(r#"[{"event":"login"},{"event":"logout"}]"#)?;
/// assert_eq!(data.row_count(), 2);
/// assert_eq!(data.file_size(), 0);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct DataIngestor {
    options: IngestionOptions,
}

impl DataIngestor {
    pub fn new(options: IngestionOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &IngestionOptions {
        &self.options
    }

    /// Parse one upload into a [`ParsedData`].
    pub fn parse_file(&self, file: &SourceFile) -> IngestionResult<ParsedData> {
        let format = self.resolve_format(&file.name, file.declared_size);
        let ctx_format = format.as_ref().ok().copied().or_else(|| self.guess_format(&file.name));
        let result = format.and_then(|fmt| {
            debug!(file = %file.name, format = %fmt, size = file.declared_size, "parsing upload");
            self.parse_content(fmt, &file.bytes, file.bytes.len() as u64)
        });
        self.report(&file.name, ctx_format, &result);
        result
    }

    /// Parse a file from disk. The size check runs on filesystem metadata before the content is
    /// read.
    pub fn parse_path(&self, path: impl AsRef<Path>) -> IngestionResult<ParsedData> {
        let path = path.as_ref();
        let name = path.display().to_string();

        let result = fs::metadata(path)
            .map_err(IngestionError::from)
            .and_then(|meta| {
                let fmt = self.resolve_format(&name, meta.len())?;
                let bytes = fs::read(path)?;
                debug!(file = %name, format = %fmt, size = bytes.len(), "parsing file");
                Ok((fmt, bytes))
            });
        let format = result.as_ref().ok().map(|(fmt, _)| *fmt);
        let result = result
            .and_then(|(fmt, bytes)| self.parse_content(fmt, &bytes, bytes.len() as u64));

        self.report(&name, format.or_else(|| self.guess_format(&name)), &result);
        result
    }

    /// Parse pasted text: CSV first, then JSON. The result has a file size of `0`.
    pub fn parse_text(&self, text: &str) -> IngestionResult<ParsedData> {
        let result = check_size(text.len() as u64, &self.options.config)
            .and_then(|()| self.parse_text_content(text, 0));
        self.report("<pasted text>", Some(IngestionFormat::Text), &result);
        result
    }

    /// Build a [`ParsedData`] from in-memory records (generated or mock data). The result has a
    /// file size of `0`.
    pub fn from_records(
        &self,
        headers: Vec<String>,
        rows: Vec<Vec<Value>>,
    ) -> IngestionResult<ParsedData> {
        finalize(RawTable::new(headers, rows), 0, &self.options.config)
    }

    /// Parse queued uploads one after another. Each entry succeeds or fails on its own; a failure
    /// does not stop the queue.
    pub fn parse_queue(&self, files: &[SourceFile]) -> Vec<IngestionResult<ParsedData>> {
        files.iter().map(|f| self.parse_file(f)).collect()
    }

    fn resolve_format(&self, name: &str, size: u64) -> IngestionResult<IngestionFormat> {
        match self.options.format {
            Some(fmt) => check_size(size, &self.options.config).map(|()| fmt),
            None => dispatch(name, size, &self.options.config),
        }
    }

    fn guess_format(&self, name: &str) -> Option<IngestionFormat> {
        self.options.format.or_else(|| {
            Path::new(name)
                .extension()
                .and_then(|s| s.to_str())
                .and_then(IngestionFormat::from_extension)
        })
    }

    fn parse_content(
        &self,
        format: IngestionFormat,
        bytes: &[u8],
        file_size: u64,
    ) -> IngestionResult<ParsedData> {
        let config = &self.options.config;
        match format {
            IngestionFormat::Csv => {
                let table = read_csv_from_str(&String::from_utf8_lossy(bytes), self.csv_options())?;
                finalize(table, file_size, config)
            }
            IngestionFormat::Json => {
                let table = read_json_from_str(&String::from_utf8_lossy(bytes), config.max_json_depth)?;
                finalize(table, file_size, config)
            }
            IngestionFormat::Text => self.parse_text_content(&String::from_utf8_lossy(bytes), file_size),
            IngestionFormat::Excel => {
                let table = read_excel_dispatch(bytes)?;
                finalize(table, file_size, config)
            }
        }
    }

    /// One CSV attempt, then one JSON attempt. Text that opens with `{` or `[` is not tried as
    /// CSV.
    fn parse_text_content(&self, text: &str, file_size: u64) -> IngestionResult<ParsedData> {
        let config = &self.options.config;
        let as_csv = if looks_like_json(text) {
            Err(IngestionError::parse(IngestionFormat::Csv, "content starts like json"))
        } else {
            read_csv_from_str(text, self.csv_options()).and_then(|table| finalize(table, file_size, config))
        };

        let csv_err = match as_csv {
            Ok(data) => return Ok(data),
            Err(e) => e,
        };
        warn!(error = %csv_err, "text is not csv, retrying as json");

        read_json_from_str(text, config.max_json_depth)
            .and_then(|table| finalize(table, file_size, config))
            .map_err(|json_err| {
                IngestionError::parse(
                    IngestionFormat::Text,
                    format!("not csv ({csv_err}) and not json ({json_err})"),
                )
            })
    }

    fn csv_options(&self) -> CsvReadOptions {
        CsvReadOptions {
            delimiter: self.options.config.delimiter,
        }
    }

    fn report(
        &self,
        file_name: &str,
        format: Option<IngestionFormat>,
        result: &IngestionResult<ParsedData>,
    ) {
        let Some(obs) = self.options.observer.as_ref() else {
            return;
        };
        let ctx = IngestionContext {
            file_name: file_name.to_string(),
            format,
        };
        match result {
            Ok(data) => obs.on_success(
                &ctx,
                IngestionStats {
                    rows: data.row_count(),
                    columns: data.columns().len(),
                    file_size: data.file_size(),
                },
            ),
            Err(e) => {
                let sev = severity_for_error(e);
                obs.on_failure(&ctx, sev, e);
                if sev >= self.options.alert_at_or_above {
                    obs.on_alert(&ctx, sev, e);
                }
            }
        }
    }
}

/// Path-based convenience wrapper around [`DataIngestor::parse_path`].
///
/// ```no_run
/// use data_detective_ingest::ingestion::{ingest_from_path, IngestionOptions};
///
/// # fn main() -> Result<(), data_detective_ingest::IngestionError> {
/// let data = ingest_from_path("events.csv", &IngestionOptions::default())?;
/// println!("rows={}", data.row_count());
/// # Ok(())
/// # }
/// ```
pub fn ingest_from_path(
    path: impl AsRef<Path>,
    options: &IngestionOptions,
) -> IngestionResult<ParsedData> {
    DataIngestor::new(options.clone()).parse_path(path)
}

/// Severity used for observer callbacks: infrastructure failures are critical, rejected uploads
/// are warnings, content problems are errors.
pub fn severity_for_error(e: &IngestionError) -> IngestionSeverity {
    match e {
        IngestionError::Io(_) => IngestionSeverity::Critical,
        IngestionError::EmptyFile
        | IngestionError::FileTooLarge { .. }
        | IngestionError::UnsupportedFormat { .. } => IngestionSeverity::Warning,
        IngestionError::Parse { .. }
        | IngestionError::InvalidJsonStructure { .. }
        | IngestionError::EmptyDataset
        | IngestionError::NoColumns => IngestionSeverity::Error,
    }
}

fn read_excel_dispatch(bytes: &[u8]) -> IngestionResult<RawTable> {
    #[cfg(feature = "excel")]
    {
        super::excel::read_excel_from_bytes(bytes)
    }

    #[cfg(not(feature = "excel"))]
    {
        let _ = bytes;
        Err(IngestionError::parse(
            IngestionFormat::Excel,
            "excel ingestion not enabled (enable cargo feature 'excel')",
        ))
    }
}
