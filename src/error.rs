use thiserror::Error;

use crate::ingestion::IngestionFormat;

/// Convenience result type for ingestion operations.
pub type IngestionResult<T> = Result<T, IngestionError>;

/// Error type returned by ingestion functions.
///
/// Every variant is terminal for the parse attempt that produced it. Nothing is retried except the
/// single CSV → JSON fallback applied to `.txt` uploads and pasted text.
#[derive(Debug, Error)]
pub enum IngestionError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The upload reported a size of zero bytes.
    #[error("file is empty")]
    EmptyFile,

    /// The upload exceeds the configured size ceiling.
    #[error("file is too large: {size} bytes exceeds the maximum of {max} bytes")]
    FileTooLarge { size: u64, max: u64 },

    /// The file extension does not map to a known parser.
    #[error("unsupported file format '{extension}' (supported: {supported})")]
    UnsupportedFormat { extension: String, supported: String },

    /// A format parser rejected the content.
    #[error("failed to parse {format} input: {message}")]
    Parse {
        format: IngestionFormat,
        message: String,
    },

    /// JSON parsed fine but is not shaped like a table.
    #[error("invalid json structure: {message}")]
    InvalidJsonStructure { message: String },

    /// The input produced no data rows.
    #[error("dataset is empty: no data rows found")]
    EmptyDataset,

    /// The input produced no columns.
    #[error("dataset has no columns")]
    NoColumns,
}

impl IngestionError {
    /// Wrap a format-specific failure as [`IngestionError::Parse`].
    pub fn parse(format: IngestionFormat, cause: impl std::fmt::Display) -> Self {
        Self::Parse {
            format,
            message: cause.to_string(),
        }
    }

    pub(crate) fn invalid_json(message: impl Into<String>) -> Self {
        Self::InvalidJsonStructure {
            message: message.into(),
        }
    }
}

impl From<csv::Error> for IngestionError {
    fn from(err: csv::Error) -> Self {
        if !err.is_io_error() {
            return Self::parse(IngestionFormat::Csv, err);
        }
        match err.into_kind() {
            csv::ErrorKind::Io(io) => Self::Io(io),
            other => Self::parse(IngestionFormat::Csv, format!("{other:?}")),
        }
    }
}

impl From<serde_json::Error> for IngestionError {
    fn from(err: serde_json::Error) -> Self {
        Self::parse(IngestionFormat::Json, err)
    }
}

#[cfg(feature = "excel")]
impl From<calamine::Error> for IngestionError {
    fn from(err: calamine::Error) -> Self {
        Self::parse(IngestionFormat::Excel, err)
    }
}

#[cfg(test)]
mod tests {
    use super::IngestionError;
    use crate::ingestion::IngestionFormat;

    #[test]
    fn messages_are_human_readable() {
        let err = IngestionError::FileTooLarge { size: 20, max: 10 };
        assert_eq!(
            err.to_string(),
            "file is too large: 20 bytes exceeds the maximum of 10 bytes"
        );

        let err = IngestionError::parse(IngestionFormat::Json, "expected value at line 1");
        assert_eq!(
            err.to_string(),
            "failed to parse json input: expected value at line 1"
        );
    }

    #[test]
    fn csv_io_errors_stay_io() {
        let io = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "truncated");
        let err: IngestionError = csv::Error::from(io).into();
        assert!(matches!(err, IngestionError::Io(_)));
    }
}
