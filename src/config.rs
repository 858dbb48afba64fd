//! Tunables for ingestion.
//!
//! [`IngestionConfig`] is plain data (serde, all fields defaulted) so a host application can embed
//! it in its own configuration file. Runtime-only options such as observers live on
//! [`crate::ingestion::IngestionOptions`].

use serde::{Deserialize, Serialize};

/// Default upload ceiling: 50 MiB.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 50 * 1024 * 1024;
/// Number of leading rows examined when inferring column types.
pub const DEFAULT_SAMPLE_SIZE: usize = 100;
/// Number of sample values kept on each [`crate::types::DataColumn`].
pub const DEFAULT_RETAINED_SAMPLES: usize = 5;
/// Nested JSON objects are flattened up to this many levels below the row object.
pub const DEFAULT_MAX_JSON_DEPTH: usize = 3;

/// Ingestion limits and parser settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestionConfig {
    /// Largest accepted upload, in bytes.
    pub max_file_size: u64,
    /// Rows examined (from the front) per column for type inference.
    pub sample_size: usize,
    /// Non-empty values retained per column as display samples.
    pub retained_samples: usize,
    /// CSV delimiter. `None` sniffs one of `,` `;` `\t` `|` from the header line.
    pub delimiter: Option<char>,
    /// Maximum nesting of JSON objects inside a row before the input is rejected.
    pub max_json_depth: usize,
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            sample_size: DEFAULT_SAMPLE_SIZE,
            retained_samples: DEFAULT_RETAINED_SAMPLES,
            delimiter: None,
            max_json_depth: DEFAULT_MAX_JSON_DEPTH,
        }
    }
}

impl IngestionConfig {
    /// Builder-style override of [`Self::max_file_size`].
    pub fn with_max_file_size(mut self, bytes: u64) -> Self {
        self.max_file_size = bytes;
        self
    }

    /// Builder-style override of [`Self::delimiter`].
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = Some(delimiter);
        self
    }
}
