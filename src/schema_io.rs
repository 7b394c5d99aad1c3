//! Schema persistence.
//!
//! [`write_schema`] and [`read_schema`] store a frame schema as a JSON object
//! mapping column name to the dtype's debug notation (`"Int64"`,
//! `"List(String)"`, ...), preserving column order. [`frame_schema`] extracts
//! the schema from a DataFrame.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use polars::prelude::*;

use crate::error::{NormalizeError, NormalizeResult};

/// Schema of a frame, in column order.
pub fn frame_schema(df: &DataFrame) -> Schema {
    df.schema().as_ref().clone()
}

/// Write `schema` to `path` as a JSON object of `name: dtype` pairs.
pub fn write_schema(schema: &Schema, path: impl AsRef<Path>) -> NormalizeResult<()> {
    let mut rendered: IndexMap<String, String> = IndexMap::with_capacity(schema.len());
    for (name, dtype) in schema.iter() {
        rendered.insert(name.to_string(), format!("{dtype:?}"));
    }
    let json = serde_json::to_string_pretty(&rendered)?;
    fs::write(path, json)?;
    Ok(())
}

/// Read a schema previously written by [`write_schema`].
///
/// Column order follows the order of keys in the file. Unrecognized dtype
/// text is a [`NormalizeError::SchemaFormat`] error naming the token.
pub fn read_schema(path: impl AsRef<Path>) -> NormalizeResult<Schema> {
    let text = fs::read_to_string(path)?;
    let rendered: IndexMap<String, String> = serde_json::from_str(&text)?;
    let mut columns: Vec<(PlSmallStr, DataType)> = Vec::with_capacity(rendered.len());
    for (name, dtype) in rendered {
        columns.push((name.into(), parse_dtype(&dtype)?));
    }
    Ok(Schema::from_iter(columns))
}

fn parse_dtype(text: &str) -> NormalizeResult<DataType> {
    let text = text.trim();
    if let Some(inner) = text
        .strip_prefix("List(")
        .and_then(|rest| rest.strip_suffix(')'))
    {
        return Ok(DataType::List(Box::new(parse_dtype(inner)?)));
    }
    match text {
        "String" => Ok(DataType::String),
        "Boolean" => Ok(DataType::Boolean),
        "Int8" => Ok(DataType::Int8),
        "Int16" => Ok(DataType::Int16),
        "Int32" => Ok(DataType::Int32),
        "Int64" => Ok(DataType::Int64),
        "UInt8" => Ok(DataType::UInt8),
        "UInt16" => Ok(DataType::UInt16),
        "UInt32" => Ok(DataType::UInt32),
        "UInt64" => Ok(DataType::UInt64),
        "Float32" => Ok(DataType::Float32),
        "Float64" => Ok(DataType::Float64),
        "Null" => Ok(DataType::Null),
        _ => Err(NormalizeError::SchemaFormat {
            message: format!("unsupported dtype '{text}'"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_scalars_and_nested_lists() {
        assert_eq!(parse_dtype("String").unwrap(), DataType::String);
        assert_eq!(
            parse_dtype("List(Int64)").unwrap(),
            DataType::List(Box::new(DataType::Int64)),
        );
        assert_eq!(
            parse_dtype("List(List(Float64))").unwrap(),
            DataType::List(Box::new(DataType::List(Box::new(DataType::Float64)))),
        );
        assert_eq!(parse_dtype("  Boolean ").unwrap(), DataType::Boolean);
    }

    #[test]
    fn rejects_unknown_dtype_text() {
        let err = parse_dtype("Struct([Field(\"a\", Int64)])").unwrap_err();
        assert!(err.to_string().contains("unsupported dtype"));
        assert!(parse_dtype("List(Int64").is_err());
    }

    #[test]
    fn dtype_notation_round_trips() {
        for dtype in [
            DataType::String,
            DataType::Int64,
            DataType::Float64,
            DataType::Boolean,
            DataType::List(Box::new(DataType::String)),
        ] {
            assert_eq!(parse_dtype(&format!("{dtype:?}")).unwrap(), dtype);
        }
    }
}
