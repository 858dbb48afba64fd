//! CSV ingestion implementation.

use crate::error::{IngestionError, IngestionResult};
use crate::types::{RawTable, Value};

use super::IngestionFormat;

/// Delimiters considered when none is configured, in tie-break order.
const SNIFF_CANDIDATES: [u8; 4] = [b',', b';', b'\t', b'|'];

/// Options for a single CSV read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CsvReadOptions {
    /// Field delimiter; `None` sniffs it from the header line.
    pub delimiter: Option<char>,
}

/// Read CSV text into a [`RawTable`].
///
/// Rules:
///
/// - The first record is the header row.
/// - Quoted fields may contain delimiters, quotes (`""`) and line breaks.
/// - Blank lines are skipped. In a single-column file a quoted empty field (`""`) is a row.
/// - Short records are kept (missing cells become `Null` downstream) and extra fields are
///   ignored.
/// - Every cell is kept verbatim as [`Value::Utf8`]; typing happens later.
pub fn read_csv_from_str(text: &str, options: CsvReadOptions) -> IngestionResult<RawTable> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let delimiter = match options.delimiter {
        Some(c) => delimiter_byte(c)?,
        None => sniff_delimiter(text),
    };

    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(text.as_bytes());
    read_csv_from_reader(&mut rdr)
}

/// Read CSV records from an existing reader. The reader must be configured with headers.
pub fn read_csv_from_reader<R: std::io::Read>(
    rdr: &mut csv::Reader<R>,
) -> IngestionResult<RawTable> {
    let headers: Vec<String> = rdr.headers()?.iter().map(str::to_owned).collect();

    let mut rows: Vec<Vec<Value>> = Vec::new();
    for result in rdr.records() {
        let record = result?;
        if headers.len() > 1 && is_blank_record(&record) {
            continue;
        }

        rows.push(
            record
                .iter()
                .take(headers.len())
                .map(|field| Value::Utf8(field.to_owned()))
                .collect(),
        );
    }

    Ok(RawTable::new(headers, rows))
}

fn is_blank_record(record: &csv::StringRecord) -> bool {
    record.len() == 1 && record.get(0).is_some_and(|f| f.trim().is_empty())
}

fn delimiter_byte(c: char) -> IngestionResult<u8> {
    u8::try_from(c)
        .ok()
        .filter(u8::is_ascii)
        .ok_or_else(|| {
            IngestionError::parse(
                IngestionFormat::Csv,
                format!("delimiter {c:?} is not a single ASCII character"),
            )
        })
}

/// `true` if the first non-blank character opens a JSON object or array.
pub fn looks_like_json(text: &str) -> bool {
    text.trim_start_matches('\u{feff}')
        .trim_start()
        .starts_with(['{', '['])
}

/// Pick the candidate delimiter that occurs most often (outside quotes) on the header line.
/// Falls back to `,`.
pub fn sniff_delimiter(text: &str) -> u8 {
    let header_line = text.lines().find(|l| !l.trim().is_empty()).unwrap_or("");

    let mut counts = [0usize; SNIFF_CANDIDATES.len()];
    let mut in_quotes = false;
    for b in header_line.bytes() {
        if b == b'"' {
            in_quotes = !in_quotes;
        } else if !in_quotes {
            if let Some(i) = SNIFF_CANDIDATES.iter().position(|&c| c == b) {
                counts[i] += 1;
            }
        }
    }

    let mut best = 0;
    for i in 1..counts.len() {
        if counts[i] > counts[best] {
            best = i;
        }
    }
    if counts[best] == 0 {
        b','
    } else {
        SNIFF_CANDIDATES[best]
    }
}
