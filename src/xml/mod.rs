//! XML normalization: hierarchical documents to tabular [`polars::prelude::DataFrame`]s.
//!
//! Most callers should use [`normalize_xml`] (from [`normalize`]) which:
//!
//! - accepts inline markup or a file path (auto-detected, or use the explicit
//!   `normalize_xml_from_str` / `normalize_xml_from_path` variants)
//! - selects record elements via the dotted `record_path` in
//!   [`XmlNormalizeOptions`], or flattens the whole document when unset
//! - optionally reports success/failure/alerts to a [`NormalizeObserver`]
//!
//! The pipeline stages are also available individually:
//! - [`tree`] parses markup into an element tree
//! - [`flatten`] turns one element into dotted key/value entries
//! - [`table`] materializes records as a DataFrame and can fully denormalize
//!   nested columns

pub mod flatten;
pub mod normalize;
pub mod observe;
pub(crate) mod path;
pub mod table;
pub mod tree;

pub use flatten::{FlatRecord, FlatValue, flatten_element, wrap_scalars};
pub use normalize::{
    DEFAULT_MAX_ROWS, XmlNormalizeOptions, normalize_xml, normalize_xml_from_path,
    normalize_xml_from_str,
};
pub use observe::{
    CompositeObserver, FileObserver, NormalizeContext, NormalizeObserver, NormalizeSeverity,
    NormalizeStats, StdErrObserver, XmlSource,
};
pub use table::fully_flatten;
pub use tree::{DEFAULT_MAX_DEPTH, XmlElement, parse_document, strip_ns};
