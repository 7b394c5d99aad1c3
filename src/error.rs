use thiserror::Error;

/// Convenience result type for normalization and schema operations.
pub type NormalizeResult<T> = Result<T, NormalizeError>;

/// Error type returned by this crate.
///
/// This is a single error enum shared across XML normalization, denormalization,
/// and the schema save/load helpers.
#[derive(Debug, Error)]
pub enum NormalizeError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Low-level XML syntax error reported by the parser.
    #[error("xml parse error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Malformed attribute reported by the parser.
    #[error("xml attribute error: {0}")]
    Attr(#[from] quick_xml::events::attributes::AttrError),

    /// Structurally invalid document (unclosed elements, multiple roots,
    /// content outside the root, unresolved entities, nesting too deep).
    #[error("malformed document: {message}")]
    MalformedDocument { message: String },

    /// The record path's ancestor chain matched no nodes.
    #[error("record path not found: '{path}' matched no elements")]
    PathNotFound { path: String },

    /// Strict-mode shape conflict: a column's values disagree across records.
    #[error("type mismatch in column '{column}': {expected} vs {found}")]
    TypeMismatch {
        column: String,
        expected: String,
        found: String,
    },

    /// Denormalization grew past the configured row ceiling.
    #[error("row limit exceeded while flattening: {rows} rows > limit {limit}")]
    RowLimitExceeded { rows: usize, limit: usize },

    /// A schema file contains a dtype this crate cannot read back.
    #[error("schema format error: {message}")]
    SchemaFormat { message: String },

    /// JSON (de)serialization error from the record encoding or a schema file.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error from the Polars engine.
    #[error("polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),
}
