//! Sample-based column typing, header normalisation and column role hints.
//!
//! A column's type is decided by its *first* non-empty value within the first
//! [`IngestionConfig::sample_size`] rows. Later values are not consulted, so a column whose first
//! value looks numeric is typed `number` even if later rows hold text. Callers that need a
//! guarantee must check values themselves.

use std::collections::HashSet;
use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;
use tracing::warn;

use crate::config::IngestionConfig;
use crate::types::{ColumnType, DataColumn, Value};

const USER_ID_HINTS: &[&str] = &["id", "user"];
const EVENT_HINTS: &[&str] = &["event", "action", "activity"];
const TIMESTAMP_HINTS: &[&str] = &["time", "date", "created", "_at"];

const RFC3339: &str = "rfc3339";

/// Date-like shapes, each paired with the `chrono` formats that must accept the value.
static DATE_PATTERNS: LazyLock<Vec<(Regex, &'static [&'static str])>> = LazyLock::new(|| {
    let table: [(&str, &'static [&'static str]); 8] = [
        (r"^\d{4}-\d{1,2}-\d{1,2}$", &["%Y-%m-%d"]),
        (
            r"^\d{4}-\d{1,2}-\d{1,2}[T ]\d{1,2}:\d{2}(:\d{2}(\.\d+)?)?(Z|[+-]\d{2}:?\d{2})?$",
            &[
                RFC3339,
                "%Y-%m-%dT%H:%M:%S%.f",
                "%Y-%m-%d %H:%M:%S%.f",
                "%Y-%m-%dT%H:%M",
                "%Y-%m-%d %H:%M",
            ],
        ),
        (r"^\d{4}/\d{1,2}/\d{1,2}$", &["%Y/%m/%d"]),
        (r"^\d{1,2}/\d{1,2}/\d{4}$", &["%m/%d/%Y", "%d/%m/%Y"]),
        (r"^\d{1,2}-\d{1,2}-\d{4}$", &["%m-%d-%Y", "%d-%m-%Y"]),
        (r"^\d{1,2}\.\d{1,2}\.\d{4}$", &["%d.%m.%Y"]),
        (r"^[A-Za-z]{3,9}\.? \d{1,2}, \d{4}$", &["%B %d, %Y", "%b %d, %Y", "%b. %d, %Y"]),
        (r"^\d{1,2} [A-Za-z]{3,9} \d{4}$", &["%d %B %Y", "%d %b %Y"]),
    ];
    table
        .into_iter()
        .filter_map(|(pattern, formats)| Regex::new(pattern).ok().map(|re| (re, formats)))
        .collect()
});

/// Trim header labels, name blank ones `column_N` (1-based) and make duplicates unique by
/// suffixing `_2`, `_3`, ...
pub fn normalize_headers(raw: Vec<String>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::with_capacity(raw.len());
    let mut out = Vec::with_capacity(raw.len());

    for (idx0, header) in raw.into_iter().enumerate() {
        let trimmed = header.trim();
        let base = if trimmed.is_empty() {
            format!("column_{}", idx0 + 1)
        } else {
            trimmed.to_owned()
        };

        let mut name = base.clone();
        let mut suffix = 2;
        while seen.contains(&name) {
            name = format!("{base}_{suffix}");
            suffix += 1;
        }
        if name != base {
            warn!(header = %base, renamed = %name, "duplicate column header renamed");
        }
        seen.insert(name.clone());
        out.push(name);
    }
    out
}

/// Classify a single value, or `None` if it is missing.
pub fn classify_value(value: &Value) -> Option<ColumnType> {
    match value {
        v if v.is_missing() => None,
        Value::Int64(_) | Value::Float64(_) => Some(ColumnType::Number),
        Value::Bool(_) => Some(ColumnType::Boolean),
        Value::Utf8(s) => Some(classify_text(s.trim())),
        Value::Null => None,
    }
}

fn classify_text(s: &str) -> ColumnType {
    if is_numeric(s) {
        ColumnType::Number
    } else if s.eq_ignore_ascii_case("true") || s.eq_ignore_ascii_case("false") {
        ColumnType::Boolean
    } else if is_date(s) {
        ColumnType::Date
    } else {
        ColumnType::String
    }
}

fn is_numeric(s: &str) -> bool {
    s.parse::<f64>().map(f64::is_finite).unwrap_or(false)
}

/// `true` if `s` has one of the known date shapes and `chrono` accepts it as a real date.
pub fn is_date(s: &str) -> bool {
    DATE_PATTERNS
        .iter()
        .filter(|(re, _)| re.is_match(s))
        .any(|(_, formats)| formats.iter().any(|fmt| parses_with(s, fmt)))
}

fn parses_with(s: &str, fmt: &str) -> bool {
    if fmt == RFC3339 {
        DateTime::parse_from_rfc3339(s).is_ok()
    } else if fmt.contains("%H") {
        NaiveDateTime::parse_from_str(s, fmt).is_ok()
    } else {
        NaiveDate::parse_from_str(s, fmt).is_ok()
    }
}

/// Type of a column given its values in row order; only the first non-missing value counts.
pub fn infer_column_type<'a>(values: impl IntoIterator<Item = &'a Value>) -> ColumnType {
    values
        .into_iter()
        .find_map(classify_value)
        .unwrap_or(ColumnType::String)
}

/// Build typed columns for `headers` from a prefix of `rows`.
pub fn infer_columns(
    headers: &[String],
    rows: &[Vec<Value>],
    config: &IngestionConfig,
) -> Vec<DataColumn> {
    let sample_rows = &rows[..config.sample_size.min(rows.len())];

    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            let present: Vec<&Value> = sample_rows
                .iter()
                .filter_map(|row| row.get(idx))
                .filter(|v| !v.is_missing())
                .collect();

            DataColumn {
                name: name.clone(),
                column_type: infer_column_type(present.iter().copied()),
                samples: present
                    .iter()
                    .take(config.retained_samples)
                    .map(|v| (*v).clone())
                    .collect(),
            }
        })
        .collect()
}

/// Columns that look like user identifiers, event names or timestamps, judged by name (and, for
/// timestamps, by inferred type).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnRoleHints {
    pub user_id: Vec<String>,
    pub event: Vec<String>,
    pub timestamp: Vec<String>,
}

pub fn role_hints(columns: &[DataColumn]) -> ColumnRoleHints {
    let mut hints = ColumnRoleHints::default();
    for col in columns {
        let lower = col.name.to_lowercase();
        let has_any = |needles: &[&str]| needles.iter().any(|n| lower.contains(n));

        if has_any(USER_ID_HINTS) {
            hints.user_id.push(col.name.clone());
        }
        if has_any(EVENT_HINTS) {
            hints.event.push(col.name.clone());
        }
        if has_any(TIMESTAMP_HINTS) || col.column_type == ColumnType::Date {
            hints.timestamp.push(col.name.clone());
        }
    }
    hints
}
