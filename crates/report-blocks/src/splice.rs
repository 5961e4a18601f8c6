//! The block splicer: order-preserving decomposition of report text.
//!
//! The splicer owns an ordered chunk sequence for the whole document.
//! Each handler pass scans the text chunks left to right and splits
//! them around matched tags; the sequence is only ever expanded (one
//! chunk into three) or substituted (one chunk into one block), never
//! reordered. Rather than splicing a list in place while iterating it,
//! each pass produces a fresh sequence with a cursor over the old one,
//! which keeps the order invariant trivially true.

use rayon::prelude::*;

use report_tags::find_from;

use crate::{
    BlockRegistry, ChunkFailure, MarkdownDelegate, ParsedBlock, TagHandler, default_handlers,
};

/// One element of the document-ordered sequence the splicer builds.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Chunk {
    /// Text not yet claimed by any tag handler.
    Text(String),
    /// A resolved custom block and the source text it replaced.
    Block {
        block: ParsedBlock,
        /// The original matched substring, retained so the sequence
        /// can be flattened back to the input text.
        source: String,
    },
}

impl Chunk {
    /// The chunk's contribution to the original document text.
    ///
    /// Concatenating this over a splice result reconstructs the input.
    #[must_use]
    pub fn source_text(&self) -> &str {
        match self {
            Self::Text(text) => text,
            Self::Block { source, .. } => source,
        }
    }
}

/// A block in the final flattened sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportBlock<B> {
    /// A custom block parsed from a tag.
    Custom(ParsedBlock),
    /// A renderer-native block produced by the Markdown delegate.
    Rendered(B),
    /// A text chunk whose delegate conversion failed; the raw text is
    /// kept in sequence so document order survives the failure.
    Unrendered(String),
}

/// Everything one parse invocation produces.
///
/// Owned by the caller for the lifetime of the document's display and
/// discarded wholesale afterwards; nothing is shared across documents.
#[derive(Debug)]
pub struct ParsedReport<B, E>
where
    E: std::error::Error + 'static,
{
    /// Ordered block sequence: custom blocks and delegate output
    /// interleaved in original document order.
    pub blocks: Vec<ReportBlock<B>>,
    /// Id-keyed payload maps for render-time lookup.
    pub registry: BlockRegistry,
    /// Per-chunk delegate failures, if any.
    pub failures: Vec<ChunkFailure<E>>,
    /// Data-quality warnings collected while splicing.
    pub warnings: Vec<String>,
}

/// Splices report text into chunks using an ordered handler list.
///
/// # Example
///
/// ```
/// use report_blocks::{Chunk, ParsedBlock, Splicer};
///
/// let mut splicer = Splicer::new();
/// let chunks = splicer.splice(r#"Hello <image path="a.png" type="chart"/> world"#);
///
/// assert_eq!(chunks.len(), 3);
/// assert_eq!(chunks[0], Chunk::Text("Hello ".to_owned()));
/// assert!(matches!(&chunks[1], Chunk::Block { block: ParsedBlock::Image { .. }, .. }));
/// assert_eq!(chunks[2], Chunk::Text(" world".to_owned()));
/// ```
pub struct Splicer {
    handlers: Vec<Box<dyn TagHandler>>,
    registry: BlockRegistry,
    warnings: Vec<String>,
}

impl Default for Splicer {
    fn default() -> Self {
        Self::new()
    }
}

impl Splicer {
    /// Create a splicer with the built-in handler set in default
    /// priority order (groupings before leaf members).
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlers: default_handlers(),
            registry: BlockRegistry::new(),
            warnings: Vec::new(),
        }
    }

    /// Create a splicer with no handlers registered.
    #[must_use]
    pub fn bare() -> Self {
        Self {
            handlers: Vec::new(),
            registry: BlockRegistry::new(),
            warnings: Vec::new(),
        }
    }

    /// Append a handler. Handlers run in registration order, so append
    /// grouping tags before the tags they may contain.
    #[must_use]
    pub fn with_handler<H: TagHandler + 'static>(mut self, handler: H) -> Self {
        self.handlers.push(Box::new(handler));
        self
    }

    /// Decompose `input` into an ordered chunk sequence.
    ///
    /// Runs every handler pass, splitting text chunks around matched
    /// tags. Malformed occurrences (handler declines) stay in place as
    /// text; absence of any tag leaves the whole input as one text
    /// chunk. Never fails.
    pub fn splice(&mut self, input: &str) -> Vec<Chunk> {
        let mut chunks = vec![Chunk::Text(input.to_owned())];

        for handler in &self.handlers {
            let mut next = Vec::with_capacity(chunks.len());
            for chunk in chunks {
                match chunk {
                    Chunk::Block { .. } => next.push(chunk),
                    Chunk::Text(text) => splice_text(
                        handler.as_ref(),
                        &text,
                        &mut self.registry,
                        &mut self.warnings,
                        &mut next,
                    ),
                }
            }
            chunks = next;
        }

        chunks
    }

    /// Data-quality warnings collected so far.
    #[must_use]
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// The registry populated by splicing.
    #[must_use]
    pub fn registry(&self) -> &BlockRegistry {
        &self.registry
    }

    /// Consume the splicer, yielding the registry and warnings.
    #[must_use]
    pub fn into_parts(self) -> (BlockRegistry, Vec<String>) {
        (self.registry, self.warnings)
    }
}

/// Scan one text chunk for a handler's tag, appending the resulting
/// chunks to `out` in document order.
///
/// Successful parses split the text (before / block / after) and
/// scanning resumes after the match; declined parses advance past the
/// occurrence leaving its text untouched.
fn splice_text(
    handler: &dyn TagHandler,
    text: &str,
    registry: &mut BlockRegistry,
    warnings: &mut Vec<String>,
    out: &mut Vec<Chunk>,
) {
    let mut segment_start = 0;
    let mut scan = 0;

    while let Some(tag) = find_from(text, handler.name(), scan) {
        scan = tag.end;

        if let Some(block) = handler.parse(&tag, registry) {
            if tag.start > segment_start {
                out.push(Chunk::Text(text[segment_start..tag.start].to_owned()));
            }
            out.push(Chunk::Block {
                block,
                source: tag.full_text.to_owned(),
            });
            segment_start = tag.end;
        } else {
            tracing::warn!(
                tag = handler.name(),
                offset = tag.start,
                "malformed tag left unresolved"
            );
            warnings.push(format!(
                "<{}> tag missing required attributes, left unresolved",
                handler.name()
            ));
        }
    }

    if segment_start < text.len() {
        out.push(Chunk::Text(text[segment_start..].to_owned()));
    }
}

/// Expand remaining text chunks through the Markdown delegate.
///
/// Chunks are splice-disjoint, so delegate calls run chunk-parallel on
/// the rayon pool; the ordered collect restores original chunk order
/// before flattening. A failed chunk surfaces as
/// [`ReportBlock::Unrendered`] in sequence plus a [`ChunkFailure`]
/// record, leaving every other chunk's result unaffected.
pub fn expand<D>(
    chunks: Vec<Chunk>,
    delegate: &D,
) -> (Vec<ReportBlock<D::Block>>, Vec<ChunkFailure<D::Error>>)
where
    D: MarkdownDelegate + Sync,
{
    let expanded: Vec<Result<Vec<ReportBlock<D::Block>>, ChunkFailure<D::Error>>> = chunks
        .into_par_iter()
        .map(|chunk| match chunk {
            Chunk::Block { block, .. } => Ok(vec![ReportBlock::Custom(block)]),
            Chunk::Text(text) => match delegate.convert(&text) {
                Ok(rendered) => Ok(rendered.into_iter().map(ReportBlock::Rendered).collect()),
                Err(error) => Err(ChunkFailure { text, error }),
            },
        })
        .collect();

    let mut blocks = Vec::new();
    let mut failures = Vec::new();
    for result in expanded {
        match result {
            Ok(chunk_blocks) => blocks.extend(chunk_blocks),
            Err(failure) => {
                blocks.push(ReportBlock::Unrendered(failure.text.clone()));
                failures.push(failure);
            }
        }
    }

    (blocks, failures)
}

/// Parse a whole report document with the built-in handler set.
///
/// Splices custom tags out of `input`, expands the remaining Markdown
/// text through `delegate`, and returns the flattened ordered block
/// sequence together with the populated registry.
pub fn parse_report<D>(input: &str, delegate: &D) -> ParsedReport<D::Block, D::Error>
where
    D: MarkdownDelegate + Sync,
{
    let mut splicer = Splicer::new();
    let chunks = splicer.splice(input);
    let (blocks, failures) = expand(chunks, delegate);
    let (registry, warnings) = splicer.into_parts();

    ParsedReport {
        blocks,
        registry,
        failures,
        warnings,
    }
}
