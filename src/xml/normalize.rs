//! Normalization entry points.
//!
//! [`normalize_xml`] (and the explicit from-str/from-path variants) wires the
//! full pipeline: parse → record-path resolution → per-record flattening with
//! ancestor metadata merged in → optional lenient wrapping → DataFrame
//! materialization → optional full denormalization.
//!
//! - Behavior is controlled by [`XmlNormalizeOptions`]; the defaults flatten
//!   with attributes, strict typing, and nested columns left in place.
//! - If a [`super::observe::NormalizeObserver`] is provided, every outcome is
//!   reported to it.

use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use polars::prelude::DataFrame;
use rayon::prelude::*;

use crate::error::{NormalizeError, NormalizeResult};

use super::flatten::{FlatRecord, FlatValue, flatten_element, wrap_scalars};
use super::observe::{
    NormalizeContext, NormalizeObserver, NormalizeSeverity, NormalizeStats, XmlSource,
};
use super::path::{find_descendants, resolve_ancestors, split_record_path};
use super::table::{fully_flatten, records_to_frame};
use super::tree::{DEFAULT_MAX_DEPTH, XmlElement, parse_document, strip_ns};

/// Row ceiling applied to denormalization when none is configured explicitly.
pub const DEFAULT_MAX_ROWS: usize = 10_000_000;

/// Options controlling XML normalization.
///
/// Use [`Default`] for common cases.
#[derive(Clone)]
pub struct XmlNormalizeOptions {
    /// Dotted record selector (for example `catalog.book`). `None` or blank
    /// flattens the whole document into a single record.
    pub record_path: Option<String>,
    /// Emit one entry per attribute (`prefix.attrName`).
    pub include_attributes: bool,
    /// Explode and unnest nested columns after materialization until only
    /// scalar columns remain.
    pub fully_flatten: bool,
    /// Strict shape checking. `false` wraps every terminal scalar into a
    /// single-element list first, so a field that is bare in one record and a
    /// list in another unifies instead of failing.
    pub strict: bool,
    /// Element nesting ceiling, enforced at parse time.
    pub max_depth: usize,
    /// Row ceiling for denormalization growth; `None` disables the guard.
    pub max_rows: Option<usize>,
    /// Flatten record nodes on the rayon thread pool. Output order is
    /// unchanged.
    pub parallel: bool,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn NormalizeObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: NormalizeSeverity,
}

impl fmt::Debug for XmlNormalizeOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("XmlNormalizeOptions")
            .field("record_path", &self.record_path)
            .field("include_attributes", &self.include_attributes)
            .field("fully_flatten", &self.fully_flatten)
            .field("strict", &self.strict)
            .field("max_depth", &self.max_depth)
            .field("max_rows", &self.max_rows)
            .field("parallel", &self.parallel)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for XmlNormalizeOptions {
    fn default() -> Self {
        Self {
            record_path: None,
            include_attributes: true,
            fully_flatten: false,
            strict: true,
            max_depth: DEFAULT_MAX_DEPTH,
            max_rows: Some(DEFAULT_MAX_ROWS),
            parallel: false,
            observer: None,
            alert_at_or_above: NormalizeSeverity::Critical,
        }
    }
}

/// Normalize inline markup or a file, deciding by inspection.
///
/// Input whose trimmed text starts with `<` is treated as inline markup,
/// anything else as a filesystem path.
///
/// # Examples
///
/// ```
/// use polars_extensions::{XmlNormalizeOptions, normalize_xml};
///
/// # fn main() -> Result<(), polars_extensions::NormalizeError> {
/// let xml = r#"<catalog><book id="1"><title>A</title></book><book id="2"><title>B</title></book></catalog>"#;
/// let opts = XmlNormalizeOptions {
///     record_path: Some("catalog.book".to_string()),
///     ..Default::default()
/// };
///
/// let df = normalize_xml(xml, &opts)?;
/// assert_eq!(df.height(), 2);
/// let names: Vec<&str> = df.get_column_names().iter().map(|n| n.as_str()).collect();
/// assert_eq!(names, vec!["book.id", "book.title.text"]);
/// # Ok(())
/// # }
/// ```
pub fn normalize_xml(input: &str, options: &XmlNormalizeOptions) -> NormalizeResult<DataFrame> {
    if input.trim_start().starts_with('<') {
        normalize_xml_from_str(input, options)
    } else {
        normalize_xml_from_path(input, options)
    }
}

/// Normalize markup supplied directly as a string.
pub fn normalize_xml_from_str(
    xml: &str,
    options: &XmlNormalizeOptions,
) -> NormalizeResult<DataFrame> {
    finish(XmlSource::Inline, pipeline(xml, options), options)
}

/// Normalize a document read from a file.
///
/// When an observer is configured, this reports:
///
/// - `on_success` on success, with row/column stats
/// - `on_failure` on failure, with a computed severity (I/O is Critical)
/// - `on_alert` on failure when the severity is >= `options.alert_at_or_above`
///
/// ```no_run
/// use std::sync::Arc;
///
/// use polars_extensions::{NormalizeSeverity, StdErrObserver, XmlNormalizeOptions, normalize_xml_from_path};
///
/// # fn main() -> Result<(), polars_extensions::NormalizeError> {
/// let opts = XmlNormalizeOptions {
///     record_path: Some("feed.entry".to_string()),
///     observer: Some(Arc::new(StdErrObserver)),
///     alert_at_or_above: NormalizeSeverity::Critical,
///     ..Default::default()
/// };
///
/// let df = normalize_xml_from_path("feed.xml", &opts)?;
/// println!("{df}");
/// # Ok(())
/// # }
/// ```
pub fn normalize_xml_from_path(
    path: impl AsRef<Path>,
    options: &XmlNormalizeOptions,
) -> NormalizeResult<DataFrame> {
    let path = path.as_ref();
    let result = fs::read_to_string(path)
        .map_err(NormalizeError::from)
        .and_then(|text| pipeline(&text, options));
    finish(XmlSource::Path(path.to_path_buf()), result, options)
}

fn pipeline(xml: &str, options: &XmlNormalizeOptions) -> NormalizeResult<DataFrame> {
    let root = parse_document(xml, options.max_depth)?;
    let mut records = assemble_records(&root, options)?;
    if !options.strict {
        records = records.into_iter().map(wrap_scalars).collect();
    }
    let df = records_to_frame(&records)?;
    if options.fully_flatten {
        return fully_flatten(df, options.max_rows);
    }
    Ok(df)
}

fn finish(
    source: XmlSource,
    result: NormalizeResult<DataFrame>,
    options: &XmlNormalizeOptions,
) -> NormalizeResult<DataFrame> {
    if let Some(obs) = options.observer.as_ref() {
        let ctx = NormalizeContext {
            source,
            record_path: options.record_path.clone(),
        };
        match &result {
            Ok(df) => obs.on_success(
                &ctx,
                NormalizeStats {
                    rows: df.height(),
                    columns: df.width(),
                },
            ),
            Err(e) => {
                let severity = severity_for_error(e);
                obs.on_failure(&ctx, severity, e);
                if severity >= options.alert_at_or_above {
                    obs.on_alert(&ctx, severity, e);
                }
            }
        }
    }
    result
}

fn severity_for_error(e: &NormalizeError) -> NormalizeSeverity {
    match e {
        NormalizeError::Io(_) => NormalizeSeverity::Critical,
        NormalizeError::Xml(_)
        | NormalizeError::Attr(_)
        | NormalizeError::MalformedDocument { .. }
        | NormalizeError::PathNotFound { .. }
        | NormalizeError::TypeMismatch { .. }
        | NormalizeError::RowLimitExceeded { .. }
        | NormalizeError::SchemaFormat { .. }
        | NormalizeError::Json(_)
        | NormalizeError::Polars(_) => NormalizeSeverity::Error,
    }
}

/// Locate record nodes and produce one merged record per node, in document
/// order (ancestors outer, records inner).
fn assemble_records(
    root: &XmlElement,
    options: &XmlNormalizeOptions,
) -> NormalizeResult<Vec<FlatRecord>> {
    let record_path = options
        .record_path
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty());

    let Some(path) = record_path else {
        return Ok(vec![flatten_element(root, "", options.include_attributes)]);
    };

    let (ancestor_segments, record_tag) = split_record_path(path);
    let ancestors = resolve_ancestors(root, &ancestor_segments)?;

    let mut pending: Vec<(FlatRecord, &XmlElement)> = Vec::new();
    for ancestor in ancestors {
        let metadata = ancestor_metadata(ancestor, options.include_attributes);
        for node in find_descendants(ancestor, record_tag) {
            pending.push((metadata.clone(), node));
        }
    }

    let records: Vec<FlatRecord> = if options.parallel {
        pending
            .par_iter()
            .map(|(metadata, node)| {
                merge_records(
                    metadata,
                    flatten_element(node, "", options.include_attributes),
                )
            })
            .collect()
    } else {
        pending
            .iter()
            .map(|(metadata, node)| {
                merge_records(
                    metadata,
                    flatten_element(node, "", options.include_attributes),
                )
            })
            .collect()
    };
    Ok(records)
}

/// Metadata carried from an ancestor onto each of its records: the ancestor's
/// own attributes and its own direct text. Ancestor children are not
/// flattened here.
fn ancestor_metadata(ancestor: &XmlElement, include_attributes: bool) -> FlatRecord {
    let local = ancestor.local_name();
    let mut metadata = FlatRecord::new();
    if include_attributes {
        for (name, value) in &ancestor.attributes {
            metadata.insert(
                format!("{local}.{}", strip_ns(name)),
                FlatValue::Scalar(value.clone()),
            );
        }
    }
    if let Some(text) = ancestor.trimmed_text() {
        metadata.insert(format!("{local}.text"), FlatValue::Scalar(text.to_string()));
    }
    metadata
}

/// Ordered overlay merge: base keys first in base order, then overlay-only
/// keys in overlay order. On collision the overlay value wins, in place.
fn merge_records(base: &FlatRecord, overlay: FlatRecord) -> FlatRecord {
    let mut merged = base.clone();
    for (key, value) in overlay {
        merged.insert(key, value);
    }
    merged
}
