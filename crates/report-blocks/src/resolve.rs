//! Nested child-tag resolution for grouping tags.
//!
//! A grouping tag (multi-table) wraps nested tags of a different kind.
//! Resolution re-applies the matcher to the grouping tag's own matched
//! text — never the surrounding document — so tables belonging to
//! sibling groupings are never accidentally included.

use report_tags::{TagAttributes, find_all};

/// A child tag occurrence carrying the attributes needed to register it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildTable {
    pub id: String,
    pub attributes: TagAttributes,
}

/// Collect child tag occurrences inside a grouping tag's full text.
///
/// Occurrences missing an `id` attribute are dropped rather than
/// failing the whole group. The returned order equals order of
/// appearance inside the grouping tag's content; the rendering layer
/// uses it for tab/selector ordering, so it is a semantic guarantee.
#[must_use]
pub fn child_tables(group_full_text: &str, child_tag_name: &str) -> Vec<ChildTable> {
    find_all(group_full_text, child_tag_name)
        .into_iter()
        .filter_map(|child| match child.attributes.get("id") {
            Some(id) => Some(ChildTable {
                id: id.to_owned(),
                attributes: child.attributes,
            }),
            None => {
                tracing::debug!(
                    tag = child_tag_name,
                    offset = child.start,
                    "child tag without id dropped from grouping"
                );
                None
            }
        })
        .collect()
}

/// Collect only the child identifiers, in order of appearance.
#[must_use]
pub fn resolve_child_ids(group_full_text: &str, child_tag_name: &str) -> Vec<String> {
    child_tables(group_full_text, child_tag_name)
        .into_iter()
        .map(|child| child.id)
        .collect()
}
