//! JSON ingestion implementation.
//!
//! Supported inputs:
//! - A JSON array of objects: `[{"a":1}, {"a":2}]`
//! - A single object, read as a one-row dataset: `{"a":1,"b":2}`
//! - Newline-delimited JSON (NDJSON): `{"a":1}\n{"a":2}\n`
//!
//! Nested objects are flattened into dot-path columns (`user.name`) up to a configured depth.
//! Columns are the union of keys across all rows, in first-seen order; a row without a key gets
//! `Null` there.

use std::collections::HashMap;

use serde_json::Map;

use crate::error::{IngestionError, IngestionResult};
use crate::types::{RawTable, Value};

use super::IngestionFormat;

/// Read JSON text into a [`RawTable`].
///
/// `max_depth` bounds how many levels of nested objects a row may contain.
pub fn read_json_from_str(input: &str, max_depth: usize) -> IngestionResult<RawTable> {
    let trimmed = input.trim_start_matches('\u{feff}').trim();
    if trimmed.is_empty() {
        return Err(IngestionError::parse(IngestionFormat::Json, "json input is empty"));
    }

    // First try parsing as a single JSON value (array or object).
    let values = match serde_json::from_str::<serde_json::Value>(trimmed) {
        Ok(serde_json::Value::Array(items)) => items,
        Ok(v @ serde_json::Value::Object(_)) => vec![v],
        Ok(_) => {
            return Err(IngestionError::invalid_json(
                "top-level json must be an object or an array of objects",
            ));
        }
        Err(e) if trimmed.lines().filter(|l| !l.trim().is_empty()).count() < 2 => {
            return Err(e.into());
        }
        // Fall back to NDJSON.
        Err(_) => read_ndjson_lines(trimmed)?,
    };

    let mut table = TableBuilder::default();
    for (idx0, v) in values.iter().enumerate() {
        let row_num = idx0 + 1;
        let obj = v
            .as_object()
            .ok_or_else(|| IngestionError::invalid_json(format!("row {row_num} is not a json object")))?;

        let mut cells = Vec::new();
        flatten_object(obj, "", 0, max_depth, &mut cells)?;
        table.push_row(cells);
    }

    Ok(table.finish())
}

fn read_ndjson_lines(text: &str) -> IngestionResult<Vec<serde_json::Value>> {
    let mut values = Vec::new();
    for (i, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let v = serde_json::from_str::<serde_json::Value>(line).map_err(|e| {
            IngestionError::parse(
                IngestionFormat::Json,
                format!("invalid ndjson at line {}: {}", i + 1, e),
            )
        })?;
        values.push(v);
    }
    Ok(values)
}

/// Collect `(dot path, value)` pairs for one row object.
fn flatten_object(
    obj: &Map<String, serde_json::Value>,
    prefix: &str,
    depth: usize,
    max_depth: usize,
    out: &mut Vec<(String, Value)>,
) -> IngestionResult<()> {
    for (key, v) in obj {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };

        match v {
            serde_json::Value::Object(nested) => {
                if depth + 1 > max_depth {
                    return Err(IngestionError::invalid_json(format!(
                        "field '{path}' is nested deeper than {max_depth} levels"
                    )));
                }
                flatten_object(nested, &path, depth + 1, max_depth, out)?;
            }
            serde_json::Value::Array(items) => {
                if items.iter().any(|i| i.is_object() || i.is_array()) {
                    return Err(IngestionError::invalid_json(format!(
                        "field '{path}' holds nested objects or arrays"
                    )));
                }
                out.push((path, Value::Utf8(v.to_string())));
            }
            scalar => out.push((path, convert_json_scalar(scalar))),
        }
    }
    Ok(())
}

fn convert_json_scalar(v: &serde_json::Value) -> Value {
    match v {
        serde_json::Value::Bool(b) => Value::Bool(*b),
        serde_json::Value::String(s) => Value::Utf8(s.clone()),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Value::Int64(i),
            None => n.as_f64().map(Value::Float64).unwrap_or(Value::Null),
        },
        _ => Value::Null,
    }
}

/// Accumulates rows while growing the header list in first-seen order.
#[derive(Default)]
struct TableBuilder {
    headers: Vec<String>,
    index: HashMap<String, usize>,
    rows: Vec<Vec<Value>>,
}

impl TableBuilder {
    fn push_row(&mut self, cells: Vec<(String, Value)>) {
        let mut row: Vec<Value> = vec![Value::Null; self.headers.len()];
        for (name, value) in cells {
            let idx = match self.index.get(&name) {
                Some(&idx) => idx,
                None => {
                    let idx = self.headers.len();
                    self.headers.push(name.clone());
                    self.index.insert(name, idx);
                    idx
                }
            };
            if idx >= row.len() {
                row.resize(idx + 1, Value::Null);
            }
            // A repeated key overwrites the earlier value in the same row.
            row[idx] = value;
        }
        self.rows.push(row);
    }

    fn finish(self) -> RawTable {
        RawTable::new(self.headers, self.rows)
    }
}
