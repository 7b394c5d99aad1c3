//! `polars-extensions` is a small library of [Polars](https://pola.rs) helpers, centered on
//! normalizing hierarchical XML documents into columnar [`polars::prelude::DataFrame`]s.
//!
//! The primary entrypoint is [`xml::normalize_xml`], which accepts inline markup or a file path
//! (auto-detected, or use the explicit from-str/from-path variants), selects repeating record
//! elements via a dotted `record_path` in [`xml::XmlNormalizeOptions`], and materializes one row
//! per record.
//!
//! ## What normalization produces
//!
//! Every flattened entry is keyed by its dotted path from the record element:
//!
//! - element text becomes a `path.to.element.text` column
//! - attributes become `path.to.element.attrName` columns
//! - a repeated sibling group becomes a list-of-struct column, which
//!   `fully_flatten` can explode and unnest down to scalar rows
//! - each record also carries its ancestors' attributes and direct text
//!
//! ## Quick examples: normalize XML
//!
//! ```
//! use polars_extensions::{XmlNormalizeOptions, normalize_xml};
//!
//! # fn main() -> Result<(), polars_extensions::NormalizeError> {
//! let xml = r#"<catalog><book id="1"><title>A</title></book><book id="2"><title>B</title></book></catalog>"#;
//! let opts = XmlNormalizeOptions {
//!     record_path: Some("catalog.book".to_string()),
//!     ..Default::default()
//! };
//!
//! let df = normalize_xml(xml, &opts)?;
//! assert_eq!(df.height(), 2);
//! let names: Vec<&str> = df.get_column_names().iter().map(|n| n.as_str()).collect();
//! assert_eq!(names, vec!["book.id", "book.title.text"]);
//! # Ok(())
//! # }
//! ```
//!
//! Without a `record_path` the whole document flattens into a single row; repeated groups land in
//! a list-of-struct column which `fully_flatten` denormalizes:
//!
//! ```
//! use polars_extensions::{XmlNormalizeOptions, normalize_xml};
//!
//! # fn main() -> Result<(), polars_extensions::NormalizeError> {
//! let xml = "<library><book><id>1</id></book><book><id>2</id></book></library>";
//! let opts = XmlNormalizeOptions {
//!     fully_flatten: true,
//!     ..Default::default()
//! };
//!
//! let df = normalize_xml(xml, &opts)?;
//! assert_eq!(df.height(), 2);
//! let names: Vec<&str> = df.get_column_names().iter().map(|n| n.as_str()).collect();
//! assert_eq!(names, vec!["library.book.book.id.text"]);
//! # Ok(())
//! # }
//! ```
//!
//! Reading from a file works the same way:
//!
//! ```no_run
//! use polars_extensions::{XmlNormalizeOptions, normalize_xml_from_path};
//!
//! # fn main() -> Result<(), polars_extensions::NormalizeError> {
//! let opts = XmlNormalizeOptions {
//!     record_path: Some("feed.entry".to_string()),
//!     ..Default::default()
//! };
//! let df = normalize_xml_from_path("feed.xml", &opts)?;
//! println!("{df}");
//! # Ok(())
//! # }
//! ```
//!
//! ## Frame helpers
//!
//! Alongside normalization there are small DataFrame extensions: column-name restyling, string
//! similarity columns, rolling technical indicators, and schema save/load.
//!
//! ```
//! use polars::prelude::*;
//! use polars_extensions::{CaseStyle, restyle_columns, with_levenshtein};
//!
//! # fn main() -> PolarsResult<()> {
//! let df = df!("productName" => ["night"], "supplierName" => ["nacht"])?;
//! let df = restyle_columns(&df, CaseStyle::Snake)?;
//! let df = with_levenshtein(&df, "product_name", "supplier_name", "edit_distance")?;
//! assert_eq!(
//!     df.column("edit_distance")?.as_materialized_series().u32()?.get(0),
//!     Some(2),
//! );
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`xml`]: XML normalization pipeline (parse, flatten, materialize, denormalize) and observers
//! - [`name`]: column-name restyling (Pascal/snake/camel/Pascal_Snake)
//! - [`similarity`]: Levenshtein and n-gram Jaccard, scalar through DataFrame level
//! - [`indicators`]: rolling technical indicators (delta, log return, SMA, RSI, Bollinger, ATR)
//! - [`schema_io`]: schema save/load as JSON
//! - [`error`]: the error type used across the crate

pub mod error;
pub mod indicators;
pub mod name;
pub mod schema_io;
pub mod similarity;
pub mod xml;

pub use error::{NormalizeError, NormalizeResult};
pub use indicators::{atr, bollinger_bands, delta, log_return, rsi, sma};
pub use name::{
    CaseStyle, camel_case, pascal_case, pascal_snake_case, restyle_columns, snake_case,
};
pub use schema_io::{frame_schema, read_schema, write_schema};
pub use similarity::{
    jaccard, jaccard_series, levenshtein, levenshtein_series, with_jaccard, with_levenshtein,
};
pub use xml::{
    CompositeObserver, DEFAULT_MAX_DEPTH, DEFAULT_MAX_ROWS, FileObserver, FlatRecord, FlatValue,
    NormalizeContext, NormalizeObserver, NormalizeSeverity, NormalizeStats, StdErrObserver,
    XmlElement, XmlNormalizeOptions, XmlSource, fully_flatten, normalize_xml,
    normalize_xml_from_path, normalize_xml_from_str,
};
