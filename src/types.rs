//! Core data model types for ingestion.
//!
//! Every successful parse produces a [`ParsedData`]: an ordered list of [`DataColumn`]s, positional
//! rows aligned with those columns, and a [`DataSummary`] of row/column counts and column role
//! hints. A `ParsedData` can only be built through [`ParsedData::try_new`], so every value a caller
//! holds has passed validation and is never mutated afterwards.

use std::collections::HashMap;

use serde::ser::{SerializeMap, SerializeSeq, SerializeStruct};
use serde::{Deserialize, Serialize, Serializer};

use crate::error::{IngestionError, IngestionResult};
use crate::processing::summary::build_summary;
use crate::processing::validate::validate;

/// Semantic type assigned to a column by sample-based inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    /// Free text (also the fallback when nothing else matches).
    String,
    /// Integer or floating point number.
    Number,
    /// Date or date-time.
    Date,
    /// `true` / `false`.
    Boolean,
}

/// A single cell value.
///
/// CSV cells are always [`Value::Utf8`] (an empty field is `Utf8("")`), while JSON and spreadsheet
/// cells keep their native scalar type. [`Value::Null`] marks a missing field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Missing value.
    Null,
    /// 64-bit signed integer.
    Int64(i64),
    /// 64-bit float.
    Float64(f64),
    /// Boolean.
    Bool(bool),
    /// UTF-8 string.
    Utf8(String),
}

impl Value {
    /// `true` for [`Value::Null`] and for strings that are empty after trimming.
    pub fn is_missing(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Utf8(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Render the value the way it appears in a CSV cell. `Null` renders as an empty string.
    pub fn to_text(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Int64(v) => v.to_string(),
            Value::Float64(v) => v.to_string(),
            Value::Bool(v) => v.to_string(),
            Value::Utf8(s) => s.clone(),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Utf8(s.to_owned())
    }
}

/// A named column with its inferred type and a few sample values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataColumn {
    /// Header label.
    pub name: String,
    /// Inferred type. Best effort: decided from the first non-empty sample only.
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    /// First few non-empty values observed, for display and debugging.
    #[serde(default)]
    pub samples: Vec<Value>,
}

impl DataColumn {
    /// Create a column with no samples.
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            samples: Vec::new(),
        }
    }
}

/// Aggregate counts plus advisory column role hints.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSummary {
    pub total_rows: usize,
    pub total_columns: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub possible_user_id_columns: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub possible_event_columns: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub possible_timestamp_columns: Option<Vec<String>>,
}

/// Header labels plus positional rows, as produced by a format parser before type inference.
///
/// Rows may be shorter or longer than `headers`; [`ParsedData::try_new`] pads or truncates them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        Self { headers, rows }
    }
}

/// The canonical in-memory representation of an uploaded tabular file.
///
/// Rows are stored row-major as `Vec<Vec<Value>>`, each row aligned with [`ParsedData::columns`].
/// On the wire (serde) rows are emitted as `{column name: value}` objects.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "ParsedDataRepr")]
pub struct ParsedData {
    columns: Vec<DataColumn>,
    rows: Vec<Vec<Value>>,
    file_size: u64,
    summary: DataSummary,
}

impl ParsedData {
    /// Validate `columns`/`rows` and compute the summary.
    ///
    /// Fails with [`IngestionError::EmptyDataset`] when there are no rows and
    /// [`IngestionError::NoColumns`] when there are no columns. Rows shorter than the column list
    /// are padded with [`Value::Null`]; longer rows are truncated.
    pub fn try_new(
        columns: Vec<DataColumn>,
        mut rows: Vec<Vec<Value>>,
        file_size: u64,
    ) -> IngestionResult<Self> {
        validate(&rows, &columns)?;
        for row in &mut rows {
            row.resize(columns.len(), Value::Null);
        }
        let summary = build_summary(&rows, &columns);
        Ok(Self {
            columns,
            rows,
            file_size,
            summary,
        })
    }

    /// Columns in first-seen order.
    pub fn columns(&self) -> &[DataColumn] {
        &self.columns
    }

    /// Rows, each aligned with [`Self::columns`].
    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    /// Number of data rows. Always equal to `rows().len()`.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Byte length of the source; `0` for synthetic or pasted input.
    pub fn file_size(&self) -> u64 {
        self.file_size
    }

    pub fn summary(&self) -> &DataSummary {
        &self.summary
    }

    /// Iterate column names in order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Returns the index of a column by name, if present.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Look up a single cell by row index and column name.
    pub fn value(&self, row: usize, column: &str) -> Option<&Value> {
        let idx = self.column_index(column)?;
        self.rows.get(row)?.get(idx)
    }

    /// A row as `(column name, value)` pairs in column order.
    pub fn row_map(&self, row: usize) -> Option<Vec<(&str, &Value)>> {
        let values = self.rows.get(row)?;
        Some(self.column_names().zip(values.iter()).collect())
    }

    /// Build the payload handed to persistence: metadata plus up to `max_rows` sample rows.
    pub fn to_record(&self, name: impl Into<String>, max_rows: usize) -> DatasetRecord {
        let take = max_rows.min(self.rows.len());
        DatasetRecord {
            name: name.into(),
            columns: self.columns.clone(),
            sample_rows: self.rows[..take].to_vec(),
            summary: self.summary.clone(),
            row_count: self.row_count(),
            file_size: self.file_size,
        }
    }
}

impl Serialize for ParsedData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("ParsedData", 5)?;
        s.serialize_field("columns", &self.columns)?;
        s.serialize_field(
            "rows",
            &RowsAsObjects {
                columns: &self.columns,
                rows: &self.rows,
            },
        )?;
        s.serialize_field("rowCount", &self.rows.len())?;
        s.serialize_field("fileSize", &self.file_size)?;
        s.serialize_field("summary", &self.summary)?;
        s.end()
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ParsedDataRepr {
    columns: Vec<DataColumn>,
    rows: Vec<HashMap<String, Value>>,
    row_count: Option<usize>,
    #[serde(default)]
    file_size: u64,
}

impl TryFrom<ParsedDataRepr> for ParsedData {
    type Error = IngestionError;

    fn try_from(repr: ParsedDataRepr) -> Result<Self, Self::Error> {
        if let Some(count) = repr.row_count {
            if count != repr.rows.len() {
                return Err(IngestionError::invalid_json(format!(
                    "rowCount {count} does not match {} rows",
                    repr.rows.len()
                )));
            }
        }
        let rows: Vec<Vec<Value>> = repr
            .rows
            .into_iter()
            .map(|mut obj| {
                repr.columns
                    .iter()
                    .map(|c| obj.remove(&c.name).unwrap_or(Value::Null))
                    .collect()
            })
            .collect();
        ParsedData::try_new(repr.columns, rows, repr.file_size)
    }
}

/// Dataset payload for a storage backend: column metadata, a row sample and the summary.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetRecord {
    pub name: String,
    pub columns: Vec<DataColumn>,
    pub sample_rows: Vec<Vec<Value>>,
    pub summary: DataSummary,
    pub row_count: usize,
    pub file_size: u64,
}

impl Serialize for DatasetRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("DatasetRecord", 6)?;
        s.serialize_field("name", &self.name)?;
        s.serialize_field("columns", &self.columns)?;
        s.serialize_field(
            "sampleRows",
            &RowsAsObjects {
                columns: &self.columns,
                rows: &self.sample_rows,
            },
        )?;
        s.serialize_field("summary", &self.summary)?;
        s.serialize_field("rowCount", &self.row_count)?;
        s.serialize_field("fileSize", &self.file_size)?;
        s.end()
    }
}

struct RowsAsObjects<'a> {
    columns: &'a [DataColumn],
    rows: &'a [Vec<Value>],
}

struct RowAsObject<'a> {
    columns: &'a [DataColumn],
    row: &'a [Value],
}

impl Serialize for RowsAsObjects<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.rows.len()))?;
        for row in self.rows {
            seq.serialize_element(&RowAsObject {
                columns: self.columns,
                row,
            })?;
        }
        seq.end()
    }
}

impl Serialize for RowAsObject<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (col, value) in self.columns.iter().zip(self.row.iter()) {
            map.serialize_entry(&col.name, value)?;
        }
        map.end()
    }
}
