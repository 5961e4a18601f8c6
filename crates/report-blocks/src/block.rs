//! Parsed block variants.

use report_tags::TagAttributes;

/// A custom block extracted from report text.
///
/// Each variant corresponds to one custom tag type. Variants carrying
/// an `id` are also inserted into the [`BlockRegistry`] under that id
/// when parsed by the built-in handlers, so the rendering layer can
/// look up structured payloads independently of document order.
///
/// [`BlockRegistry`]: crate::BlockRegistry
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ParsedBlock {
    /// A data table reference: `<table id="...">`.
    Table {
        id: String,
        /// Raw opening-tag attributes, kept for the rendering layer.
        attributes: TagAttributes,
    },
    /// A multi-table grouping: `<multitable id="...">` wrapping nested
    /// `<table>` tags. Child order drives tab ordering downstream.
    MultiTable {
        id: String,
        child_table_ids: Vec<String>,
    },
    /// An image reference: `<image path="..." type="..."/>`.
    ///
    /// The id is generated at parse time; the source tag carries none.
    Image {
        id: String,
        path: String,
        image_type: String,
    },
    /// A recommendation title with analysis cross-references:
    /// `<oracle-recommendation-title analysis_reference="1,2,3">`.
    RecommendationTitle {
        analysis_refs: Vec<u32>,
        title: String,
    },
    /// A reactive variable reference embedded in prose:
    /// `<reactive-variable name="..." nest_location="..." table_id="..."/>`.
    ReactiveVariableRef {
        name: String,
        nest_location: String,
        table_id: String,
    },
}

impl ParsedBlock {
    /// The block's registry identifier, for variants that carry one.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Table { id, .. } | Self::MultiTable { id, .. } | Self::Image { id, .. } => {
                Some(id)
            }
            Self::RecommendationTitle { .. } | Self::ReactiveVariableRef { .. } => None,
        }
    }
}
