#![cfg(feature = "excel")]

use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};
use chrono::Timelike;

use crate::error::{IngestionError, IngestionResult};
use crate::types::{RawTable, Value};

use super::IngestionFormat;

/// Read the first worksheet of an Excel workbook (`.xlsx`, `.xls`) held in memory.
///
/// Behavior:
/// - Only the first sheet in workbook order is read
/// - The first non-empty row is the header row
/// - Trailing rows with no non-empty cell are dropped
/// - Cells keep their native type; integral floats become `Int64`, dates become ISO text
pub fn read_excel_from_bytes(bytes: &[u8]) -> IngestionResult<RawTable> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| IngestionError::parse(IngestionFormat::Excel, "workbook has no sheets"))??;

    read_sheet_range(&range)
}

fn read_sheet_range(range: &Range<Data>) -> IngestionResult<RawTable> {
    let mut sheet_rows = range.rows().skip_while(|row| is_empty_row(row));

    let Some(header_row) = sheet_rows.next() else {
        return Ok(RawTable::default());
    };
    let headers: Vec<String> = header_row.iter().map(cell_to_header_string).collect();

    let mut rows: Vec<Vec<Value>> = sheet_rows
        .map(|row| row.iter().take(headers.len()).map(convert_cell).collect())
        .collect();

    while rows
        .last()
        .is_some_and(|row: &Vec<Value>| row.iter().all(Value::is_missing))
    {
        rows.pop();
    }

    Ok(RawTable::new(headers, rows))
}

fn is_empty_row(row: &[Data]) -> bool {
    row.iter().all(|c| match c {
        Data::Empty => true,
        Data::String(s) => s.trim().is_empty(),
        _ => false,
    })
}

fn integral_float(f: f64) -> Option<i64> {
    (f.fract() == 0.0 && f.abs() < i64::MAX as f64).then_some(f as i64)
}

fn cell_to_header_string(c: &Data) -> String {
    match c {
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => match integral_float(*f) {
            Some(i) => i.to_string(),
            None => f.to_string(),
        },
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => excel_datetime_to_string(dt),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(e) => e.to_string(),
        Data::Empty => "".to_string(),
    }
}

fn convert_cell(c: &Data) -> Value {
    match c {
        Data::Empty => Value::Null,
        Data::String(s) => Value::Utf8(s.clone()),
        Data::Int(i) => Value::Int64(*i),
        Data::Float(f) => match integral_float(*f) {
            Some(i) => Value::Int64(i),
            None => Value::Float64(*f),
        },
        Data::Bool(b) => Value::Bool(*b),
        Data::DateTime(dt) => Value::Utf8(excel_datetime_to_string(dt)),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Value::Utf8(s.clone()),
        Data::Error(e) => Value::Utf8(e.to_string()),
    }
}

fn excel_datetime_to_string(dt: &calamine::ExcelDateTime) -> String {
    match dt.as_datetime() {
        Some(ndt) if ndt.hour() == 0 && ndt.minute() == 0 && ndt.second() == 0 => {
            ndt.format("%Y-%m-%d").to_string()
        }
        Some(ndt) => ndt.format("%Y-%m-%dT%H:%M:%S").to_string(),
        None => dt.as_f64().to_string(),
    }
}
