//! Tag occurrence matching.
//!
//! Locates custom tag occurrences in raw text. Matching is non-greedy
//! and supports both paired tags (`<tag ...>...</tag>`) and
//! self-closing tags (`<tag .../>`).
//!
//! A paired match never consumes another opening tag of the same name
//! before hitting its close, so adjacent sibling tags yield distinct
//! matches. The `regex` crate has no lookaround, so the opening tag is
//! matched by regex and the close is found by a forward scan that stops
//! at whichever comes first: the closing tag or the next same-name
//! opening. An opening with no close before the next opening (or end of
//! input) yields no match at all; the text is left for the caller.

use std::collections::HashMap;
use std::sync::{LazyLock, Mutex};

use regex::Regex;

use crate::TagAttributes;

/// Compiled per-tag-name regexes, built on first use.
static REGEX_CACHE: LazyLock<Mutex<HashMap<String, TagRegexes>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

#[derive(Clone)]
struct TagRegexes {
    opening: Regex,
    closing: Regex,
}

fn tag_regexes(tag_name: &str) -> TagRegexes {
    let mut cache = REGEX_CACHE.lock().unwrap();
    cache
        .entry(tag_name.to_owned())
        .or_insert_with(|| {
            let name = regex::escape(tag_name);
            TagRegexes {
                // Group 1: opening-tag attribute text. Group 2: the
                // slash of a self-closing tag.
                opening: Regex::new(&format!(r"<{name}(\s[^>]*?)?(/)?>")).unwrap(),
                closing: Regex::new(&format!(r"</{name}\s*>")).unwrap(),
            }
        })
        .clone()
}

/// One occurrence of a named tag in scanned text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagMatch<'a> {
    /// Byte offset of the match start within the scanned text.
    pub start: usize,
    /// Byte offset one past the match end.
    pub end: usize,
    /// The full matched text, opening tag through closing tag (or the
    /// self-closing tag itself).
    pub full_text: &'a str,
    /// Text strictly between the opening tag's `>` and the first
    /// subsequent `<`. Callers needing deeper content re-invoke the
    /// matcher on `full_text` for nested tags.
    pub inner_content: &'a str,
    /// Attributes parsed from the opening tag only.
    pub attributes: TagAttributes,
}

/// Find every occurrence of `tag_name` in `text`, in document order.
///
/// Returns an empty Vec when the tag is absent; this is a lookup
/// primitive, not a validator.
///
/// # Example
///
/// ```
/// use report_tags::find_all;
///
/// let text = r#"<table id="x"></table><table id="y"></table>"#;
/// let matches = find_all(text, "table");
/// assert_eq!(matches.len(), 2);
/// assert_eq!(matches[0].attributes.get("id"), Some("x"));
/// assert_eq!(matches[1].attributes.get("id"), Some("y"));
/// ```
#[must_use]
pub fn find_all<'a>(text: &'a str, tag_name: &str) -> Vec<TagMatch<'a>> {
    let mut matches = Vec::new();
    let mut pos = 0;

    while let Some(m) = find_from(text, tag_name, pos) {
        pos = m.end;
        matches.push(m);
    }

    matches
}

/// Find the first occurrence of `tag_name` at or after the start of
/// `text`.
#[must_use]
pub fn find_first<'a>(text: &'a str, tag_name: &str) -> Option<TagMatch<'a>> {
    find_from(text, tag_name, 0)
}

/// Find the first occurrence of `tag_name` at or after byte offset
/// `from`.
#[must_use]
pub fn find_from<'a>(text: &'a str, tag_name: &str, from: usize) -> Option<TagMatch<'a>> {
    let regexes = tag_regexes(tag_name);
    let mut scan = from;

    loop {
        let caps = regexes.opening.captures(&text[scan..])?;
        let opening = caps.get(0)?;
        let open_start = scan + opening.start();
        let open_end = scan + opening.end();
        let attrs_text = caps.get(1).map_or("", |m| m.as_str());

        if caps.get(2).is_some() {
            // Self-closing: the opening tag is the whole match
            return Some(TagMatch {
                start: open_start,
                end: open_end,
                full_text: &text[open_start..open_end],
                inner_content: &text[open_end..open_end],
                attributes: TagAttributes::parse(attrs_text),
            });
        }

        let rest = &text[open_end..];
        let closing = regexes.closing.find(rest);
        let next_opening = regexes.opening.find(rest);

        match (closing, next_opening) {
            (Some(close), next) if next.is_none_or(|n| close.start() < n.start()) => {
                let end = open_end + close.end();
                let inner_end = open_end + close.start();
                return Some(TagMatch {
                    start: open_start,
                    end,
                    full_text: &text[open_start..end],
                    inner_content: first_text_run(text, open_end, inner_end),
                    attributes: TagAttributes::parse(attrs_text),
                });
            }
            // No close before the next same-name opening: this
            // occurrence is dangling, skip past its opening tag
            _ => scan = open_end,
        }
    }
}

/// The substring between `from` and `to`, cut at the first `<`.
fn first_text_run(text: &str, from: usize, to: usize) -> &str {
    let region = &text[from..to];
    let cut = region.find('<').unwrap_or(region.len());
    &region[..cut]
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_absent_tag() {
        assert!(find_all("no tags here", "table").is_empty());
        assert!(find_first("", "table").is_none());
    }

    #[test]
    fn test_self_closing() {
        let text = r#"Hello <image path="a.png" type="chart"/> world"#;
        let m = find_first(text, "image").unwrap();

        assert_eq!(m.full_text, r#"<image path="a.png" type="chart"/>"#);
        assert_eq!(&text[..m.start], "Hello ");
        assert_eq!(&text[m.end..], " world");
        assert_eq!(m.inner_content, "");
        assert_eq!(m.attributes.get("path"), Some("a.png"));
        assert_eq!(m.attributes.get("type"), Some("chart"));
    }

    #[test]
    fn test_paired() {
        let text = r#"<oracle-recommendation-title analysis_reference="1,2">Raise prices</oracle-recommendation-title>"#;
        let m = find_first(text, "oracle-recommendation-title").unwrap();

        assert_eq!(m.start, 0);
        assert_eq!(m.end, text.len());
        assert_eq!(m.inner_content, "Raise prices");
        assert_eq!(m.attributes.get("analysis_reference"), Some("1,2"));
    }

    #[test]
    fn test_adjacent_siblings_not_merged() {
        let text = r#"<table id="x">A</table><table id="y">B</table>"#;
        let matches = find_all(text, "table");

        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].full_text, r#"<table id="x">A</table>"#);
        assert_eq!(matches[0].inner_content, "A");
        assert_eq!(matches[1].full_text, r#"<table id="y">B</table>"#);
        assert_eq!(matches[1].inner_content, "B");
    }

    #[test]
    fn test_inner_content_stops_at_nested_tag() {
        let text = r#"<multitable id="g">lead<table id="t"></table></multitable>"#;
        let m = find_first(text, "multitable").unwrap();

        assert_eq!(m.inner_content, "lead");
        assert_eq!(m.end, text.len());
    }

    #[test]
    fn test_nested_lookup_via_full_text() {
        let text = r#"pre <multitable id="g"><table id="t1"></table><table id="t2"></table></multitable> post"#;
        let group = find_first(text, "multitable").unwrap();
        let children = find_all(group.full_text, "table");

        assert_eq!(children.len(), 2);
        assert_eq!(children[0].attributes.get("id"), Some("t1"));
        assert_eq!(children[1].attributes.get("id"), Some("t2"));
    }

    #[test]
    fn test_table_not_matched_inside_multitable_name() {
        // "table" is a substring of "multitable" but not a tag
        // occurrence; nothing should match in the bare grouping tag.
        let text = r#"<multitable id="g"></multitable>"#;
        assert!(find_all(text, "table").is_empty());
    }

    #[test]
    fn test_attributes_scoped_to_opening_tag() {
        // The nested tag's id must not leak into the outer match
        let text = r#"<multitable id="g"><table id="t1"></table></multitable>"#;
        let m = find_first(text, "multitable").unwrap();

        assert_eq!(m.attributes.get("id"), Some("g"));
        assert_eq!(m.attributes.len(), 1);
    }

    #[test]
    fn test_dangling_opening_skipped() {
        let text = r#"<table id="x"> never closed"#;
        assert!(find_all(text, "table").is_empty());
    }

    #[test]
    fn test_dangling_opening_does_not_hide_later_match() {
        let text = r#"<table id="x"> dangling <table id="y">B</table>"#;
        let matches = find_all(text, "table");

        // With no close before the next opening, the first occurrence
        // yields nothing; the second one still matches.
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].attributes.get("id"), Some("y"));
    }

    #[test]
    fn test_no_attributes() {
        let text = "<table></table>";
        let m = find_first(text, "table").unwrap();

        assert!(m.attributes.is_empty());
        assert_eq!(m.full_text, text);
    }

    #[test]
    fn test_multiline_content() {
        let text = "<table id=\"t\">\nrow one\nrow two\n</table>";
        let m = find_first(text, "table").unwrap();

        assert_eq!(m.end, text.len());
        assert_eq!(m.inner_content, "\nrow one\nrow two\n");
    }

    #[test]
    fn test_closing_tag_with_whitespace() {
        let text = "<table id=\"t\">x</table >";
        let m = find_first(text, "table").unwrap();
        assert_eq!(m.end, text.len());
    }

    #[test]
    fn test_case_sensitive() {
        assert!(find_first("<Table id=\"t\"></Table>", "table").is_none());
        assert!(find_first("<table id=\"t\"></table>", "Table").is_none());
    }

    #[test]
    fn test_find_from_offset() {
        let text = r#"<table id="x"></table><table id="y"></table>"#;
        let first = find_from(text, "table", 0).unwrap();
        let second = find_from(text, "table", first.end).unwrap();

        assert_eq!(second.attributes.get("id"), Some("y"));
        assert!(find_from(text, "table", second.end).is_none());
    }

    #[test]
    fn test_rescan_finds_exactly_remaining_occurrences() {
        let text = r#"a<image path="1.png"/>b<image path="2.png"/>c<image path="3.png"/>d"#;
        let all = find_all(text, "image");
        assert_eq!(all.len(), 3);

        // Re-running over the after-region of the first split finds
        // exactly the remaining occurrences, none dropped or duplicated.
        let after = &text[all[0].end..];
        let rescanned = find_all(after, "image");
        assert_eq!(rescanned.len(), 2);
        assert_eq!(rescanned[0].attributes.get("path"), Some("2.png"));
        assert_eq!(rescanned[1].attributes.get("path"), Some("3.png"));
    }

    #[test]
    fn test_self_closing_with_no_attributes() {
        let m = find_first("<image/>", "image").unwrap();
        assert!(m.attributes.is_empty());
        assert_eq!(m.full_text, "<image/>");
    }
}
