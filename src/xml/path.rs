//! Record-path resolution.
//!
//! A record path is a dotted selector of the form `ancestor….recordTag`,
//! anchored at the document: the first ancestor segment names the root
//! element, every following segment an immediate child, and the final segment
//! selects record nodes by descendant search (any depth) under each resolved
//! ancestor. A single-segment path has no ancestor chain; the root element is
//! then the sole ancestor.

use crate::error::{NormalizeError, NormalizeResult};

use super::tree::XmlElement;

/// Split a dotted record path into ancestor segments plus the record tag.
///
/// Leading and trailing dots are ignored.
pub(crate) fn split_record_path(path: &str) -> (Vec<&str>, &str) {
    let mut segments: Vec<&str> = path.trim_matches('.').split('.').collect();
    // `split` always yields at least one item.
    let record_tag = segments.pop().unwrap_or(path);
    (segments, record_tag)
}

/// Resolve the ancestor chain of a record path against the document root.
///
/// Returns the matched ancestor nodes in document order; an empty match set is
/// a [`NormalizeError::PathNotFound`] naming the full ancestor path.
pub(crate) fn resolve_ancestors<'a>(
    root: &'a XmlElement,
    ancestor_segments: &[&str],
) -> NormalizeResult<Vec<&'a XmlElement>> {
    if ancestor_segments.is_empty() {
        return Ok(vec![root]);
    }

    // Document-anchored: the first segment is matched against the root element
    // itself, not its children.
    let mut current: Vec<&XmlElement> = if root.local_name() == ancestor_segments[0] {
        vec![root]
    } else {
        Vec::new()
    };

    for segment in &ancestor_segments[1..] {
        current = current
            .iter()
            .flat_map(|node| {
                node.children
                    .iter()
                    .filter(|child| child.local_name() == *segment)
            })
            .collect();
    }

    if current.is_empty() {
        return Err(NormalizeError::PathNotFound {
            path: ancestor_segments.join("."),
        });
    }
    Ok(current)
}

/// Collect descendants of `node` (any depth, document order) whose local name
/// equals `tag`. The node itself is excluded; subtrees of matched nodes are
/// still searched, so nested matches are all returned.
pub(crate) fn find_descendants<'a>(node: &'a XmlElement, tag: &str) -> Vec<&'a XmlElement> {
    let mut found = Vec::new();
    // Explicit stack, children pushed reversed so popping walks document order.
    let mut stack: Vec<&XmlElement> = node.children.iter().rev().collect();
    while let Some(current) = stack.pop() {
        if current.local_name() == tag {
            found.push(current);
        }
        stack.extend(current.children.iter().rev());
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::tree::{DEFAULT_MAX_DEPTH, parse_document};

    fn parse(xml: &str) -> XmlElement {
        parse_document(xml, DEFAULT_MAX_DEPTH).unwrap()
    }

    #[test]
    fn splits_ancestors_and_record_tag() {
        assert_eq!(split_record_path("catalog.book"), (vec!["catalog"], "book"));
        assert_eq!(split_record_path("a.b.c"), (vec!["a", "b"], "c"));
        assert_eq!(split_record_path(".book."), (vec![], "book"));
        assert_eq!(split_record_path("book"), (vec![], "book"));
    }

    #[test]
    fn empty_chain_resolves_to_the_root() {
        let root = parse("<catalog><book/></catalog>");
        let ancestors = resolve_ancestors(&root, &[]).unwrap();
        assert_eq!(ancestors.len(), 1);
        assert_eq!(ancestors[0].name, "catalog");
    }

    #[test]
    fn first_segment_names_the_root_element() {
        let root = parse("<catalog><book/></catalog>");
        let ancestors = resolve_ancestors(&root, &["catalog"]).unwrap();
        assert_eq!(ancestors.len(), 1);
        assert_eq!(ancestors[0].name, "catalog");
    }

    #[test]
    fn chain_walks_immediate_children_only() {
        let root = parse("<rss><channel><item/></channel><other><channel/></other></rss>");
        let ancestors = resolve_ancestors(&root, &["rss", "channel"]).unwrap();
        // Only the direct child matches; `other/channel` is not on the chain.
        assert_eq!(ancestors.len(), 1);
        assert_eq!(ancestors[0].children.len(), 1);
    }

    #[test]
    fn chain_fans_out_across_repeated_ancestors() {
        let root = parse(r#"<r><g n="1"><x/></g><g n="2"><x/></g></r>"#);
        let ancestors = resolve_ancestors(&root, &["r", "g"]).unwrap();
        assert_eq!(ancestors.len(), 2);
        assert_eq!(ancestors[0].attributes[0].1, "1");
        assert_eq!(ancestors[1].attributes[0].1, "2");
    }

    #[test]
    fn unmatched_chain_names_the_full_ancestor_path() {
        let root = parse("<catalog><book/></catalog>");
        let err = resolve_ancestors(&root, &["catalog", "missingTag"]).unwrap_err();
        assert!(err.to_string().contains("catalog.missingTag"));

        let err = resolve_ancestors(&root, &["shop"]).unwrap_err();
        assert!(err.to_string().contains("'shop'"));
    }

    #[test]
    fn descendant_search_is_deep_and_in_document_order() {
        let root = parse(
            r#"<r><item id="1"><item id="2"/></item><box><item id="3"/></box></r>"#,
        );
        let items = find_descendants(&root, "item");
        let ids: Vec<&str> = items
            .iter()
            .map(|i| i.attributes[0].1.as_str())
            .collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
    }

    #[test]
    fn descendant_search_excludes_the_starting_node() {
        let root = parse("<item><item/></item>");
        let items = find_descendants(&root, "item");
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn descendant_search_matches_namespaced_tags_by_local_name() {
        let root = parse(r#"<r xmlns:m="urn:x"><m:item/><item/></r>"#);
        let items = find_descendants(&root, "item");
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].name, "m:item");
    }
}
