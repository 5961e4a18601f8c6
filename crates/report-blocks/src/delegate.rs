//! The Markdown delegate boundary.
//!
//! Once no custom tag matches, every remaining text chunk is plain
//! Markdown. Converting it to renderer-native blocks is the host
//! rendering environment's job; the engine only carries the delegate's
//! output through, never constructing or interpreting it.

/// An injected Markdown-to-blocks converter.
///
/// The engine invokes `convert` once per remaining text chunk, and may
/// do so concurrently across chunks (chunks are splice-disjoint), so
/// implementations are used behind a shared reference. Failure is
/// per-chunk: one failing chunk never affects the others.
pub trait MarkdownDelegate {
    /// The host's renderer-native block type. Opaque to the engine.
    type Block: Send;
    /// Conversion failure for one chunk.
    type Error: std::error::Error + Send + 'static;

    /// Convert one Markdown text chunk into zero or more blocks.
    fn convert(&self, text: &str) -> Result<Vec<Self::Block>, Self::Error>;
}

/// A delegate failure localized to one text chunk.
///
/// The chunk's text is retained so callers can still display or retry
/// the affected region; all other chunks' results are unaffected.
#[derive(Debug, thiserror::Error)]
#[error("markdown delegate failed for a chunk of {} bytes", text.len())]
pub struct ChunkFailure<E>
where
    E: std::error::Error + 'static,
{
    /// The text the delegate was asked to convert.
    pub text: String,
    /// The delegate's error.
    #[source]
    pub error: E,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("bad chunk")]
    struct BadChunk;

    #[test]
    fn test_failure_display_and_source() {
        let failure = ChunkFailure {
            text: "some text".to_owned(),
            error: BadChunk,
        };

        assert_eq!(
            failure.to_string(),
            "markdown delegate failed for a chunk of 9 bytes"
        );
        assert!(std::error::Error::source(&failure).is_some());
    }
}
