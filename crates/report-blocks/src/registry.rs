//! Identifier / cross-reference registry.
//!
//! Three independent id-keyed maps (tables, multi-tables, images) let
//! the rendering layer fetch a block's structured payload without
//! embedding payloads inline in blocks. All maps are created fresh for
//! one parse invocation and owned by the caller afterwards.

use std::collections::HashMap;

use report_tags::TagAttributes;

use crate::ParsedBlock;

/// An image reference payload.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImageRef {
    pub path: String,
    pub image_type: String,
}

/// Id-keyed payload maps populated during one parse invocation.
///
/// Registration is append-only for the duration of a parse;
/// re-registering an id overwrites the previous entry (last-writer-wins,
/// matching how duplicate ids behave in source documents — a data
/// quality issue, not an error). A multi-table entry may reference
/// child ids with no table entry; the rendering layer treats those as
/// "missing data for this child".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlockRegistry {
    tables: HashMap<String, TagAttributes>,
    multi_tables: HashMap<String, Vec<String>>,
    images: HashMap<String, ImageRef>,
}

impl BlockRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a parsed block under its id.
    ///
    /// Variants without an id (recommendation titles, reactive
    /// variable references) are a no-op.
    pub fn register(&mut self, block: &ParsedBlock) {
        match block {
            ParsedBlock::Table { id, attributes } => {
                self.register_table(id.clone(), attributes.clone());
            }
            ParsedBlock::MultiTable {
                id,
                child_table_ids,
            } => {
                if self
                    .multi_tables
                    .insert(id.clone(), child_table_ids.clone())
                    .is_some()
                {
                    tracing::debug!(id = %id, "duplicate multitable id overwritten");
                }
            }
            ParsedBlock::Image {
                id,
                path,
                image_type,
            } => {
                let image = ImageRef {
                    path: path.clone(),
                    image_type: image_type.clone(),
                };
                if self.images.insert(id.clone(), image).is_some() {
                    tracing::debug!(id = %id, "duplicate image id overwritten");
                }
            }
            ParsedBlock::RecommendationTitle { .. } | ParsedBlock::ReactiveVariableRef { .. } => {}
        }
    }

    /// Register a table payload directly.
    ///
    /// Used for tables nested inside a grouping tag, which never
    /// surface as top-level blocks of their own.
    pub fn register_table(&mut self, id: String, attributes: TagAttributes) {
        if self.tables.insert(id.clone(), attributes).is_some() {
            tracing::debug!(id = %id, "duplicate table id overwritten");
        }
    }

    /// Look up a table payload by id.
    #[must_use]
    pub fn table(&self, id: &str) -> Option<&TagAttributes> {
        self.tables.get(id)
    }

    /// Look up a multi-table's ordered child table ids.
    #[must_use]
    pub fn multi_table(&self, id: &str) -> Option<&[String]> {
        self.multi_tables.get(id).map(Vec::as_slice)
    }

    /// Look up an image reference by id.
    #[must_use]
    pub fn image(&self, id: &str) -> Option<&ImageRef> {
        self.images.get(id)
    }

    /// Number of registered tables.
    #[must_use]
    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    /// Number of registered multi-table groupings.
    #[must_use]
    pub fn multi_table_count(&self) -> usize {
        self.multi_tables.len()
    }

    /// Number of registered images.
    #[must_use]
    pub fn image_count(&self) -> usize {
        self.images.len()
    }
}
