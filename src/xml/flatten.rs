//! Subtree flattening.
//!
//! [`flatten_element`] turns one element subtree into a [`FlatRecord`]: a flat,
//! insertion-ordered mapping from dotted field path to value. Nesting through
//! single-occurrence children collapses into dotted scalar keys; repeated
//! sibling groups become nested record lists that the denormalizer can later
//! explode. [`wrap_scalars`] is the lenient-mode shape unification applied
//! before table construction.

use indexmap::IndexMap;

use super::tree::{XmlElement, strip_ns};

/// One flattened record: dotted field path → value, insertion-ordered.
pub type FlatRecord = IndexMap<String, FlatValue>;

/// A value inside a [`FlatRecord`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlatValue {
    /// Terminal text: an attribute value or an element's own trimmed text.
    Scalar(String),
    /// A repeated sibling group, one sub-record per occurrence, in document order.
    Records(Vec<FlatRecord>),
    /// A list of terminal scalars; produced by lenient wrapping.
    Scalars(Vec<String>),
}

/// Flatten one element subtree into a single record.
///
/// `parent_prefix` is the dotted path accumulated so far; the empty string
/// means "start from this element's own local name". Rules, in order:
///
/// 1. attributes (when enabled) emit `prefix.attrName` scalars;
/// 2. an element with no children and non-empty trimmed text emits a
///    `prefix.text` scalar (children always win over mixed text);
/// 3. children are grouped by local name, first-seen tag order;
/// 4. a group of one is flattened with the current prefix and inlined, so
///    single-occurrence nesting stays invisible;
/// 5. a group of several becomes a [`FlatValue::Records`] list at
///    `prefix.tag`, each sibling flattened with an *empty* prefix.
pub fn flatten_element(
    element: &XmlElement,
    parent_prefix: &str,
    include_attributes: bool,
) -> FlatRecord {
    let local = element.local_name();
    let prefix = if parent_prefix.is_empty() {
        local.to_string()
    } else {
        format!("{parent_prefix}.{local}")
    };

    let mut record = FlatRecord::new();

    if include_attributes {
        for (name, value) in &element.attributes {
            record.insert(
                format!("{prefix}.{}", strip_ns(name)),
                FlatValue::Scalar(value.clone()),
            );
        }
    }

    if element.children.is_empty() {
        if let Some(text) = element.trimmed_text() {
            record.insert(format!("{prefix}.text"), FlatValue::Scalar(text.to_string()));
        }
    }

    let mut groups: IndexMap<&str, Vec<&XmlElement>> = IndexMap::new();
    for child in &element.children {
        groups.entry(child.local_name()).or_default().push(child);
    }

    for (tag, siblings) in groups {
        if siblings.len() == 1 {
            let child_record = flatten_element(siblings[0], &prefix, include_attributes);
            record.extend(child_record);
        } else {
            // Deliberate: a repeated group restarts its own namespace. Each
            // sub-record is flattened with an empty prefix, so its keys begin
            // at the sibling's own tag instead of the accumulated ancestry.
            let nested: Vec<FlatRecord> = siblings
                .iter()
                .map(|sibling| flatten_element(sibling, "", include_attributes))
                .collect();
            record.insert(format!("{prefix}.{tag}"), FlatValue::Records(nested));
        }
    }

    record
}

/// Lenient-mode shape unification.
///
/// Every terminal scalar becomes a single-element scalar list; values that are
/// already plain scalar lists pass through untouched; nested record lists are
/// rewritten recursively. Applying this twice is a no-op, and after one
/// application a field that is bare in one record and a list in another
/// unifies to a list type everywhere.
pub fn wrap_scalars(record: FlatRecord) -> FlatRecord {
    record
        .into_iter()
        .map(|(key, value)| (key, wrap_value(value)))
        .collect()
}

fn wrap_value(value: FlatValue) -> FlatValue {
    match value {
        FlatValue::Scalar(s) => FlatValue::Scalars(vec![s]),
        FlatValue::Scalars(list) => FlatValue::Scalars(list),
        FlatValue::Records(records) => {
            FlatValue::Records(records.into_iter().map(wrap_scalars).collect())
        }
    }
}
