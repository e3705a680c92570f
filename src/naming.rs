//! Title parsing for the `NNN<sep>title` filename convention.
//!
//! Poem files carry a fixed-width numeric ordering token in front of their
//! title, optionally followed by a single separator:
//! - `001 The Road` → "The Road"
//! - `010-dusk` → "dusk"
//! - `042_Night.Song` → "Night.Song"
//!
//! Only the leading token is removed. Stems that do not start with the full
//! width of digits are left untouched rather than truncated, so the caller can
//! report them.

/// Default width of the ordering token.
pub const DEFAULT_PREFIX_WIDTH: usize = 3;

/// Characters accepted between the ordering token and the title.
const SEPARATORS: &[char] = &[' ', '-', '_', '.'];

/// Result of parsing a file stem like `001 The Road`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedName {
    /// Ordering number if the stem carried a full-width token.
    pub number: Option<u32>,
    /// Display title. For unprefixed stems this is the full stem.
    pub title: String,
}

impl ParsedName {
    pub fn is_prefixed(&self) -> bool {
        self.number.is_some()
    }
}

/// Parse a file stem following the `NNN<sep>title` convention.
///
/// - `("001 The Road", 3)` → number=Some(1), title="The Road"
/// - `("001", 3)` → number=Some(1), title=""
/// - `("12 Short", 3)` → number=None, title="12 Short"
/// - `("Road", 3)` → number=None, title="Road"
pub fn parse_poem_name(stem: &str, width: usize) -> ParsedName {
    let token_end = stem
        .char_indices()
        .nth(width)
        .map(|(i, _)| i)
        .unwrap_or(stem.len());
    let token = &stem[..token_end];

    let is_full_token = width > 0
        && token.chars().count() == width
        && token.chars().all(|c| c.is_ascii_digit());
    if !is_full_token {
        return ParsedName {
            number: None,
            title: stem.to_string(),
        };
    }

    let rest = &stem[token_end..];
    let rest = rest.strip_prefix(SEPARATORS).unwrap_or(rest);
    ParsedName {
        number: token.parse().ok(),
        title: rest.to_string(),
    }
}
