//! Pseudo-XML tag matching for report documents.
//!
//! AI-generated reports arrive as Markdown interleaved with custom tags
//! (`<table id="...">`, `<image path="..."/>`, ...) that reference
//! out-of-band structured data. This crate provides the two lookup
//! primitives the splicing engine is built on:
//!
//! - [`find_all`] / [`find_first`]: locate every occurrence of a named
//!   tag in raw text, paired or self-closing, without crossing another
//!   opening tag of the same name.
//! - [`TagAttributes`]: extract `key=value` pairs from an opening tag,
//!   where values are single-quoted, double-quoted, or brace-delimited.
//!
//! Both are pure functions over their inputs: absence of a tag returns
//! an empty result, never an error.

mod attrs;
mod matcher;

pub use attrs::TagAttributes;
pub use matcher::{TagMatch, find_all, find_first, find_from};
