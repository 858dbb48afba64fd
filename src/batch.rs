//! Discovery of uploadable files on disk, for queueing several files at once.
//!
//! Discovery only lists paths; parsing stays sequential through
//! [`crate::ingestion::DataIngestor::parse_path`] / [`parse_all`].

use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::error::{IngestionError, IngestionResult};
use crate::ingestion::{DataIngestor, IngestionFormat};
use crate::types::ParsedData;

fn has_supported_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .and_then(IngestionFormat::from_extension)
        .is_some()
}

/// Recursively list files under `dir` with a supported extension, sorted by path.
pub fn discover_files(dir: impl AsRef<Path>) -> IngestionResult<Vec<PathBuf>> {
    let mut out = Vec::new();
    for entry in WalkDir::new(dir.as_ref()) {
        let entry = entry.map_err(|e| {
            IngestionError::Io(e.into_io_error().unwrap_or_else(|| std::io::Error::other("filesystem loop")))
        })?;
        if entry.file_type().is_file() && has_supported_extension(entry.path()) {
            out.push(entry.into_path());
        }
    }
    out.sort();
    debug!(dir = %dir.as_ref().display(), found = out.len(), "discovered uploads");
    Ok(out)
}

/// List files matching a glob `pattern` that have a supported extension, sorted by path.
/// Unreadable matches are skipped.
pub fn discover_glob(pattern: &str) -> IngestionResult<Vec<PathBuf>> {
    let paths = glob::glob(pattern).map_err(|e| {
        IngestionError::Io(std::io::Error::new(std::io::ErrorKind::InvalidInput, e))
    })?;
    let mut out: Vec<PathBuf> = paths
        .filter_map(Result::ok)
        .filter(|p| p.is_file() && has_supported_extension(p))
        .collect();
    out.sort();
    Ok(out)
}

/// Parse `paths` one after another, pairing each path with its own result.
pub fn parse_all(
    ingestor: &DataIngestor,
    paths: &[PathBuf],
) -> Vec<(PathBuf, IngestionResult<ParsedData>)> {
    paths
        .iter()
        .map(|p| (p.clone(), ingestor.parse_path(p)))
        .collect()
}
