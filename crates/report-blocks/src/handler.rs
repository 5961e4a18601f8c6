//! Tag handlers: the closed dispatch table over custom tag types.
//!
//! Each handler pairs a tag name with a parse function. The splicer
//! runs handlers in the order they are registered, which is a semantic
//! contract: groupings come before their leaf members so that a
//! multi-table's nested tables are resolved before stray top-level
//! table tags in the same region are independently matched.

use report_tags::TagMatch;

use crate::{BlockRegistry, ParsedBlock, resolve};

/// Handler for one custom tag type.
///
/// `parse` returning `None` for a syntactically matched tag (a
/// required attribute absent, typically `id`) tells the splicer to
/// treat the match as absent: the occurrence's source text stays in
/// place and the rest of the document is unaffected.
///
/// # Example
///
/// ```
/// use report_blocks::{BlockRegistry, ParsedBlock, TagHandler};
/// use report_tags::TagMatch;
///
/// struct CalloutTag;
///
/// impl TagHandler for CalloutTag {
///     fn name(&self) -> &str { "callout" }
///
///     fn parse(&self, tag: &TagMatch<'_>, _registry: &mut BlockRegistry) -> Option<ParsedBlock> {
///         Some(ParsedBlock::RecommendationTitle {
///             analysis_refs: Vec::new(),
///             title: tag.inner_content.trim().to_owned(),
///         })
///     }
/// }
/// ```
pub trait TagHandler: Send {
    /// Tag name matched against the source text (case-sensitive).
    fn name(&self) -> &str;

    /// Build a block from a matched occurrence, registering any
    /// id-keyed payloads. `None` declines the match.
    fn parse(&self, tag: &TagMatch<'_>, registry: &mut BlockRegistry) -> Option<ParsedBlock>;
}

/// The built-in handler set, in default priority order.
#[must_use]
pub fn default_handlers() -> Vec<Box<dyn TagHandler>> {
    vec![
        Box::new(MultiTableTag),
        Box::new(TableTag),
        Box::new(ImageTag),
        Box::new(RecommendationTitleTag),
        Box::new(ReactiveVariableTag),
    ]
}

/// `<multitable id="...">` grouping nested `<table>` tags.
pub struct MultiTableTag;

impl TagHandler for MultiTableTag {
    fn name(&self) -> &str {
        "multitable"
    }

    fn parse(&self, tag: &TagMatch<'_>, registry: &mut BlockRegistry) -> Option<ParsedBlock> {
        let id = tag.attributes.get("id")?.to_owned();

        // Children are resolved against this tag's own matched text so
        // sibling groupings never leak into each other.
        let children = resolve::child_tables(tag.full_text, "table");
        let child_table_ids: Vec<String> = children
            .iter()
            .map(|child| child.id.clone())
            .collect();

        for child in children {
            registry.register_table(child.id, child.attributes);
        }

        let block = ParsedBlock::MultiTable {
            id,
            child_table_ids,
        };
        registry.register(&block);
        Some(block)
    }
}

/// Top-level `<table id="...">`.
pub struct TableTag;

impl TagHandler for TableTag {
    fn name(&self) -> &str {
        "table"
    }

    fn parse(&self, tag: &TagMatch<'_>, registry: &mut BlockRegistry) -> Option<ParsedBlock> {
        let id = tag.attributes.get("id")?.to_owned();

        let block = ParsedBlock::Table {
            id,
            attributes: tag.attributes.clone(),
        };
        registry.register(&block);
        Some(block)
    }
}

/// `<image path="..." type="..."/>`. The id is generated here; image
/// tags carry none of their own.
pub struct ImageTag;

impl TagHandler for ImageTag {
    fn name(&self) -> &str {
        "image"
    }

    fn parse(&self, tag: &TagMatch<'_>, registry: &mut BlockRegistry) -> Option<ParsedBlock> {
        let path = tag.attributes.get("path")?.to_owned();
        let image_type = tag.attributes.get("type").unwrap_or("").to_owned();

        let block = ParsedBlock::Image {
            id: uuid::Uuid::new_v4().to_string(),
            path,
            image_type,
        };
        registry.register(&block);
        Some(block)
    }
}

/// `<oracle-recommendation-title analysis_reference="1,2,3">title</...>`.
pub struct RecommendationTitleTag;

impl TagHandler for RecommendationTitleTag {
    fn name(&self) -> &str {
        "oracle-recommendation-title"
    }

    fn parse(&self, tag: &TagMatch<'_>, _registry: &mut BlockRegistry) -> Option<ParsedBlock> {
        let analysis_refs = tag
            .attributes
            .get("analysis_reference")
            .map(parse_analysis_refs)
            .unwrap_or_default();

        Some(ParsedBlock::RecommendationTitle {
            analysis_refs,
            title: tag.inner_content.trim().to_owned(),
        })
    }
}

/// Parse a comma-separated reference list, keeping parseable entries.
fn parse_analysis_refs(raw: &str) -> Vec<u32> {
    raw.split(',')
        .filter_map(|entry| {
            let entry = entry.trim();
            if entry.is_empty() {
                return None;
            }
            match entry.parse::<u32>() {
                Ok(n) => Some(n),
                Err(_) => {
                    tracing::debug!(entry, "non-numeric analysis reference skipped");
                    None
                }
            }
        })
        .collect()
}

/// `<reactive-variable name="..." nest_location="..." table_id="..."/>`.
pub struct ReactiveVariableTag;

impl TagHandler for ReactiveVariableTag {
    fn name(&self) -> &str {
        "reactive-variable"
    }

    fn parse(&self, tag: &TagMatch<'_>, _registry: &mut BlockRegistry) -> Option<ParsedBlock> {
        Some(ParsedBlock::ReactiveVariableRef {
            name: tag.attributes.get("name")?.to_owned(),
            nest_location: tag.attributes.get("nest_location")?.to_owned(),
            table_id: tag.attributes.get("table_id")?.to_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use report_tags::find_first;

    use super::*;

    fn parse_with<H: TagHandler>(
        handler: &H,
        text: &str,
    ) -> (Option<ParsedBlock>, BlockRegistry) {
        let tag = find_first(text, handler.name()).expect("tag should match");
        let mut registry = BlockRegistry::new();
        let block = handler.parse(&tag, &mut registry);
        (block, registry)
    }

    #[test]
    fn test_table_registers_payload() {
        let (block, registry) = parse_with(&TableTag, r#"<table id="t1" title="Q1"></table>"#);

        match block.unwrap() {
            ParsedBlock::Table { id, attributes } => {
                assert_eq!(id, "t1");
                assert_eq!(attributes.get("title"), Some("Q1"));
            }
            other => panic!("expected table block, got {other:?}"),
        }
        assert!(registry.table("t1").is_some());
    }

    #[test]
    fn test_table_without_id_declines() {
        let (block, registry) = parse_with(&TableTag, "<table>data</table>");
        assert!(block.is_none());
        assert_eq!(registry.table_count(), 0);
    }

    #[test]
    fn test_multitable_resolves_and_registers_children() {
        let text = r#"<multitable id="g1"><table id="t1"></table><table id="t2"></table></multitable>"#;
        let (block, registry) = parse_with(&MultiTableTag, text);

        match block.unwrap() {
            ParsedBlock::MultiTable {
                id,
                child_table_ids,
            } => {
                assert_eq!(id, "g1");
                assert_eq!(child_table_ids, vec!["t1", "t2"]);
            }
            other => panic!("expected multitable block, got {other:?}"),
        }
        assert_eq!(registry.multi_table("g1").unwrap(), ["t1", "t2"]);
        assert!(registry.table("t1").is_some());
        assert!(registry.table("t2").is_some());
    }

    #[test]
    fn test_multitable_drops_idless_child() {
        let text = r#"<multitable id="g"><table></table><table id="t2"></table></multitable>"#;
        let (block, registry) = parse_with(&MultiTableTag, text);

        match block.unwrap() {
            ParsedBlock::MultiTable {
                child_table_ids, ..
            } => assert_eq!(child_table_ids, vec!["t2"]),
            other => panic!("expected multitable block, got {other:?}"),
        }
        assert_eq!(registry.table_count(), 1);
    }

    #[test]
    fn test_image_generates_unique_ids() {
        let (first, registry) = parse_with(&ImageTag, r#"<image path="a.png" type="chart"/>"#);
        let (second, _) = parse_with(&ImageTag, r#"<image path="a.png" type="chart"/>"#);

        let (ParsedBlock::Image { id: first_id, path, image_type }, ParsedBlock::Image { id: second_id, .. }) =
            (first.unwrap(), second.unwrap())
        else {
            panic!("expected image blocks");
        };

        assert_eq!(path, "a.png");
        assert_eq!(image_type, "chart");
        assert_ne!(first_id, second_id);
        assert_eq!(registry.image(&first_id).unwrap().path, "a.png");
    }

    #[test]
    fn test_image_without_path_declines() {
        let (block, _) = parse_with(&ImageTag, r#"<image type="chart"/>"#);
        assert!(block.is_none());
    }

    #[test]
    fn test_image_type_defaults_empty() {
        let (block, _) = parse_with(&ImageTag, r#"<image path="a.png"/>"#);
        match block.unwrap() {
            ParsedBlock::Image { image_type, .. } => assert_eq!(image_type, ""),
            other => panic!("expected image block, got {other:?}"),
        }
    }

    #[test]
    fn test_recommendation_title() {
        let text = r#"<oracle-recommendation-title analysis_reference="1,2,3">Raise prices</oracle-recommendation-title>"#;
        let (block, _) = parse_with(&RecommendationTitleTag, text);

        match block.unwrap() {
            ParsedBlock::RecommendationTitle {
                analysis_refs,
                title,
            } => {
                assert_eq!(analysis_refs, vec![1, 2, 3]);
                assert_eq!(title, "Raise prices");
            }
            other => panic!("expected title block, got {other:?}"),
        }
    }

    #[test]
    fn test_recommendation_title_tolerates_bad_refs() {
        let text = r#"<oracle-recommendation-title analysis_reference="1, x, 3,">T</oracle-recommendation-title>"#;
        let (block, _) = parse_with(&RecommendationTitleTag, text);

        match block.unwrap() {
            ParsedBlock::RecommendationTitle { analysis_refs, .. } => {
                assert_eq!(analysis_refs, vec![1, 3]);
            }
            other => panic!("expected title block, got {other:?}"),
        }
    }

    #[test]
    fn test_recommendation_title_without_refs() {
        let text = "<oracle-recommendation-title>Just a title</oracle-recommendation-title>";
        let (block, _) = parse_with(&RecommendationTitleTag, text);

        match block.unwrap() {
            ParsedBlock::RecommendationTitle {
                analysis_refs,
                title,
            } => {
                assert!(analysis_refs.is_empty());
                assert_eq!(title, "Just a title");
            }
            other => panic!("expected title block, got {other:?}"),
        }
    }

    #[test]
    fn test_reactive_variable() {
        let text = r#"<reactive-variable name="total" nest_location="r0.c1" table_id="t1"/>"#;
        let (block, _) = parse_with(&ReactiveVariableTag, text);

        assert_eq!(
            block.unwrap(),
            ParsedBlock::ReactiveVariableRef {
                name: "total".to_owned(),
                nest_location: "r0.c1".to_owned(),
                table_id: "t1".to_owned(),
            }
        );
    }

    #[test]
    fn test_reactive_variable_missing_attribute_declines() {
        let text = r#"<reactive-variable name="total" table_id="t1"/>"#;
        let (block, _) = parse_with(&ReactiveVariableTag, text);
        assert!(block.is_none());
    }

    #[test]
    fn test_default_handler_priority() {
        let handlers = default_handlers();
        let names: Vec<&str> = handlers.iter().map(|h| h.name()).collect();

        assert_eq!(
            names,
            vec![
                "multitable",
                "table",
                "image",
                "oracle-recommendation-title",
                "reactive-variable",
            ]
        );
    }
}
