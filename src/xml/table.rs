//! Record materialization and full denormalization.
//!
//! [`records_to_frame`] turns an assembled record set into a Polars
//! [`DataFrame`]: scalars become String columns, scalar lists become
//! `List(String)` columns, record lists become `List(Struct)` columns. A
//! recursive shape check runs first so conflicts surface as
//! [`NormalizeError::TypeMismatch`] naming the dotted column, instead of an
//! opaque engine error. [`fully_flatten`] then explodes list columns and
//! unnests struct columns to fixpoint, leaving only scalar columns.

use std::io::Cursor;

use indexmap::IndexMap;
use polars::prelude::*;

use crate::error::{NormalizeError, NormalizeResult};

use super::flatten::{FlatRecord, FlatValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ValueKind {
    Scalar,
    ScalarList,
    RecordList,
}

impl ValueKind {
    fn of(value: &FlatValue) -> Self {
        match value {
            FlatValue::Scalar(_) => Self::Scalar,
            FlatValue::Scalars(_) => Self::ScalarList,
            FlatValue::Records(_) => Self::RecordList,
        }
    }

    fn describe(self) -> &'static str {
        match self {
            Self::Scalar => "scalar",
            Self::ScalarList => "list of scalars",
            Self::RecordList => "list of records",
        }
    }
}

/// Reject shape conflicts before the engine sees them.
///
/// The first kind observed for a field path is binding for every later record;
/// record-list columns are checked recursively across the union of their
/// sub-records, with the offending column reported as a full dotted path.
fn check_records(records: &[&FlatRecord], prefix: &str) -> NormalizeResult<()> {
    let mut expected: IndexMap<&str, ValueKind> = IndexMap::new();

    for record in records {
        for (key, value) in record.iter() {
            let kind = ValueKind::of(value);
            match expected.get(key.as_str()).copied() {
                None => {
                    expected.insert(key.as_str(), kind);
                }
                Some(prev) if prev == kind => {}
                Some(prev) => {
                    return Err(NormalizeError::TypeMismatch {
                        column: qualify(prefix, key),
                        expected: prev.describe().to_string(),
                        found: kind.describe().to_string(),
                    });
                }
            }
        }
    }

    for (key, kind) in expected {
        if kind == ValueKind::RecordList {
            let nested: Vec<&FlatRecord> = records
                .iter()
                .flat_map(|record| match record.get(key) {
                    Some(FlatValue::Records(subs)) => subs.iter().collect::<Vec<_>>(),
                    _ => Vec::new(),
                })
                .collect();
            check_records(&nested, &qualify(prefix, key))?;
        }
    }
    Ok(())
}

fn qualify(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

fn record_to_json(record: &FlatRecord) -> serde_json::Value {
    let mut map = serde_json::Map::with_capacity(record.len());
    for (key, value) in record {
        map.insert(key.clone(), value_to_json(value));
    }
    serde_json::Value::Object(map)
}

fn value_to_json(value: &FlatValue) -> serde_json::Value {
    match value {
        FlatValue::Scalar(s) => serde_json::Value::String(s.clone()),
        FlatValue::Scalars(list) => serde_json::Value::Array(
            list.iter()
                .map(|s| serde_json::Value::String(s.clone()))
                .collect(),
        ),
        FlatValue::Records(records) => {
            serde_json::Value::Array(records.iter().map(record_to_json).collect())
        }
    }
}

/// Build a DataFrame from assembled records.
///
/// Columns are the union of field paths in first-seen order; a record missing
/// a path yields a null cell. The record set travels to the engine as
/// newline-delimited JSON (key order preserved) with unlimited schema
/// inference, so text stays text (nothing is coerced to numbers). An empty
/// record set (or one with only empty records) yields an empty frame.
pub(crate) fn records_to_frame(records: &[FlatRecord]) -> NormalizeResult<DataFrame> {
    let refs: Vec<&FlatRecord> = records.iter().collect();
    check_records(&refs, "")?;

    if records.is_empty() || records.iter().all(|record| record.is_empty()) {
        return Ok(DataFrame::empty());
    }

    let mut ndjson = String::new();
    for record in records {
        let line = serde_json::to_string(&record_to_json(record))?;
        ndjson.push_str(&line);
        ndjson.push('\n');
    }

    let cursor = Cursor::new(ndjson.into_bytes());
    let df = JsonReader::new(cursor)
        .with_json_format(JsonFormat::JsonLines)
        .infer_schema_len(None)
        .finish()?;
    Ok(df)
}

/// Explode list columns and unnest struct columns until only scalars remain.
///
/// List columns are processed one at a time: a row with an n-element list
/// becomes n rows, an empty or null list keeps one row with a null. Struct
/// columns are replaced by one column per field, named `column.field`,
/// keeping field order. The loop re-scans the column set after each pass, so
/// lists of structs resolve over successive iterations. `max_rows` caps
/// growth, checked after every explode.
///
/// Reapplying to an already-flat frame is a no-op.
pub fn fully_flatten(df: DataFrame, max_rows: Option<usize>) -> NormalizeResult<DataFrame> {
    let mut df = df;
    loop {
        let list_columns: Vec<String> = df
            .columns()
            .iter()
            .filter(|column| matches!(column.dtype(), DataType::List(_)))
            .map(|column| column.name().to_string())
            .collect();
        let struct_columns: Vec<(String, Vec<String>)> = df
            .columns()
            .iter()
            .filter_map(|column| match column.dtype() {
                DataType::Struct(fields) => Some((
                    column.name().to_string(),
                    fields.iter().map(|field| field.name().to_string()).collect(),
                )),
                _ => None,
            })
            .collect();

        if list_columns.is_empty() && struct_columns.is_empty() {
            break;
        }

        for column in &list_columns {
            // Empty and null lists must keep their row as a single null.
            let options = ExplodeOptions {
                empty_as_null: true,
                keep_nulls: true,
            };
            df = df.explode([column.as_str()], options)?;
            if let Some(limit) = max_rows {
                if df.height() > limit {
                    return Err(NormalizeError::RowLimitExceeded {
                        rows: df.height(),
                        limit,
                    });
                }
            }
        }

        for (column, fields) in &struct_columns {
            df = df.unnest([column.as_str()], None)?;
            for field in fields {
                df.rename(field, format!("{column}.{field}").into())?;
            }
        }
    }
    Ok(df)
}
