//! Opening-tag attribute parsing.
//!
//! Parses `key=value` pairs where the value is delimited by single
//! quotes, double quotes, or braces: `id="t1"`, `path='a.png'`,
//! `cols={["a","b"]}`.

use std::collections::HashMap;

/// Attributes extracted from a tag's opening text.
///
/// Keys are unique per occurrence; a duplicated key keeps the last
/// value seen. Values stay strings at this layer, numeric-looking or
/// not; type coercion is a downstream concern.
///
/// # Example
///
/// ```
/// use report_tags::TagAttributes;
///
/// let attrs = TagAttributes::parse(r#"<table id="t1" title='Revenue'>"#);
/// assert_eq!(attrs.get("id"), Some("t1"));
/// assert_eq!(attrs.get("title"), Some("Revenue"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TagAttributes {
    map: HashMap<String, String>,
}

impl TagAttributes {
    /// Parse attributes from an opening tag's text.
    ///
    /// Unrecognized or malformed fragments (unquoted values, stray
    /// punctuation, a dangling `=`) are skipped silently; parsing of
    /// the remaining attributes always continues.
    #[must_use]
    pub fn parse(opening_tag_text: &str) -> Self {
        let mut map = HashMap::new();
        let mut remaining = opening_tag_text;

        while !remaining.is_empty() {
            remaining = remaining.trim_start();

            if let Some((key, value, rest)) = parse_key_value(remaining) {
                // Last occurrence wins on duplicated keys
                map.insert(key.to_owned(), value.to_owned());
                remaining = rest;
            } else {
                // Skip one char and retry from the next position
                let mut chars = remaining.chars();
                chars.next();
                remaining = chars.as_str();
            }
        }

        Self { map }
    }

    /// Get an attribute value by name.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.map.get(key).map(String::as_str)
    }

    /// Whether an attribute with this name is present.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    /// Number of parsed attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether no attributes were parsed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Iterate over `(name, value)` pairs in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.map.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Parse one `key=value` pair with a quoted or braced value.
///
/// Returns `(key, value, rest)`, or `None` if the text at this
/// position is not a well-formed pair.
fn parse_key_value(s: &str) -> Option<(&str, &str, &str)> {
    let eq_pos = s.find('=')?;
    let key = s[..eq_pos].trim();

    if key.is_empty() || !is_valid_attr_name(key) {
        return None;
    }

    let after_eq = &s[eq_pos + 1..];

    if let Some(stripped) = after_eq.strip_prefix('"') {
        let end_quote = stripped.find('"')?;
        Some((key, &stripped[..end_quote], &stripped[end_quote + 1..]))
    } else if let Some(stripped) = after_eq.strip_prefix('\'') {
        let end_quote = stripped.find('\'')?;
        Some((key, &stripped[..end_quote], &stripped[end_quote + 1..]))
    } else if after_eq.starts_with('{') {
        let (value, consumed) = parse_braced(after_eq)?;
        Some((key, value, &after_eq[consumed..]))
    } else {
        // Unquoted values are not recognized at this layer
        None
    }
}

/// Parse a brace-delimited value, handling nested braces.
///
/// Returns the value without braces and the bytes consumed.
fn parse_braced(s: &str) -> Option<(&str, usize)> {
    let mut depth = 0;

    for (i, c) in s.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some((&s[1..i], i + 1));
                }
            }
            _ => {}
        }
    }

    None
}

/// Attribute names contain only alphanumerics, hyphens, and underscores.
fn is_valid_attr_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
}
