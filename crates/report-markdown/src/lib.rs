//! pulldown-cmark backed Markdown delegate.
//!
//! The splicing engine hands every remaining plain-Markdown chunk to an
//! injected [`MarkdownDelegate`]; this crate supplies one that converts
//! a chunk into one [`HtmlBlock`] per top-level Markdown block, so a
//! block-oriented editor can address paragraphs, headings, and lists
//! individually rather than receiving one opaque HTML string.
//!
//! # Example
//!
//! ```
//! use report_blocks::parse_report;
//! use report_markdown::HtmlDelegate;
//!
//! let report = parse_report(
//!     "# Findings\n\nRevenue grew.\n\n<table id=\"t1\"></table>",
//!     &HtmlDelegate::new(),
//! );
//!
//! assert_eq!(report.blocks.len(), 3);
//! assert!(report.registry.table("t1").is_some());
//! ```

use std::convert::Infallible;

use pulldown_cmark::{Event, Options, Parser, html};
use report_blocks::MarkdownDelegate;

/// One renderer-native block: the HTML of a single top-level Markdown
/// block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlBlock {
    pub html: String,
}

/// Markdown delegate producing [`HtmlBlock`]s via pulldown-cmark.
///
/// Conversion cannot fail; a chunk with no renderable content yields
/// zero blocks.
pub struct HtmlDelegate {
    options: Options,
}

impl Default for HtmlDelegate {
    fn default() -> Self {
        Self::new()
    }
}

impl HtmlDelegate {
    /// Create a delegate with the extensions report documents use:
    /// tables, strikethrough, footnotes, and task lists.
    #[must_use]
    pub fn new() -> Self {
        Self {
            options: Options::ENABLE_TABLES
                | Options::ENABLE_STRIKETHROUGH
                | Options::ENABLE_FOOTNOTES
                | Options::ENABLE_TASKLISTS,
        }
    }

    /// Create a delegate with explicit pulldown-cmark options.
    #[must_use]
    pub fn with_options(options: Options) -> Self {
        Self { options }
    }
}

impl MarkdownDelegate for HtmlDelegate {
    type Block = HtmlBlock;
    type Error = Infallible;

    fn convert(&self, text: &str) -> Result<Vec<HtmlBlock>, Infallible> {
        let mut blocks = Vec::new();
        let mut group: Vec<Event<'_>> = Vec::new();
        let mut depth = 0usize;

        for event in Parser::new_ext(text, self.options) {
            match &event {
                Event::Start(_) => depth += 1,
                Event::End(_) => depth -= 1,
                _ => {}
            }
            group.push(event);

            // Depth returns to zero at the end of each top-level block;
            // leaf events at top level (rules) form blocks of their own.
            if depth == 0 {
                blocks.push(render_group(group.drain(..)));
            }
        }

        // Flush any trailing events into a final block
        if !group.is_empty() {
            blocks.push(render_group(group.drain(..)));
        }

        Ok(blocks)
    }
}

fn render_group<'a>(events: impl Iterator<Item = Event<'a>>) -> HtmlBlock {
    let mut out = String::new();
    html::push_html(&mut out, events);
    HtmlBlock { html: out }
}
