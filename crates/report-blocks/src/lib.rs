//! Tag extraction and block splicing for AI-generated report documents.
//!
//! Reports arrive as Markdown interleaved with custom pseudo-XML tags
//! referencing out-of-band structured data. Before a document reaches
//! the rich-text editor it is decomposed into an ordered sequence of
//! typed blocks plus id-keyed payload maps; this crate is that engine.
//!
//! # Architecture
//!
//! - [`TagHandler`]: a closed dispatch table over tag types, run in a
//!   fixed priority order (groupings before their leaf members).
//! - [`Splicer`]: owns the document's ordered chunk sequence, splitting
//!   text chunks around matched tags while preserving document order.
//! - [`BlockRegistry`]: three id-keyed maps (tables, multi-tables,
//!   images) for render-time payload lookup.
//! - [`MarkdownDelegate`]: the injected converter that expands the
//!   remaining plain-Markdown chunks into renderer-native blocks.
//!
//! # Example
//!
//! ```
//! use std::convert::Infallible;
//! use report_blocks::{MarkdownDelegate, ReportBlock, parse_report};
//!
//! struct PassThrough;
//!
//! impl MarkdownDelegate for PassThrough {
//!     type Block = String;
//!     type Error = Infallible;
//!
//!     fn convert(&self, text: &str) -> Result<Vec<String>, Infallible> {
//!         Ok(vec![text.to_owned()])
//!     }
//! }
//!
//! let report = parse_report(
//!     r#"Intro <table id="t1"></table> outro"#,
//!     &PassThrough,
//! );
//!
//! assert_eq!(report.blocks.len(), 3);
//! assert!(report.registry.table("t1").is_some());
//! ```
//!
//! Parsing never fails for input that merely lacks tags or contains
//! malformed ones; the only fallible boundary is the injected delegate,
//! and its failures are localized per chunk.

mod block;
mod delegate;
mod handler;
mod registry;
mod resolve;
mod splice;

pub use block::ParsedBlock;
pub use delegate::{ChunkFailure, MarkdownDelegate};
pub use handler::{
    ImageTag, MultiTableTag, ReactiveVariableTag, RecommendationTitleTag, TableTag, TagHandler,
    default_handlers,
};
pub use registry::{BlockRegistry, ImageRef};
pub use resolve::{ChildTable, child_tables, resolve_child_ids};
pub use splice::{Chunk, ParsedReport, ReportBlock, Splicer, expand, parse_report};

// The matcher types appear in the `TagHandler` signature.
pub use report_tags::{TagAttributes, TagMatch};
