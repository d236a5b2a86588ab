use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

/// `#` followed by one or more ASCII word characters.
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"#[A-Za-z0-9_]+").unwrap());

/// How tags are pulled out of a page body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagMode {
    /// Only tokens that match the tag pattern, with the `#` removed.
    #[default]
    Strict,
    /// Legacy behaviour: every space-separated token of a line that contains
    /// at least one tag, with its first `#` removed.
    Compat,
}

impl TagMode {
    pub fn extract(self, content: &str) -> Vec<String> {
        match self {
            TagMode::Strict => extract_tags(content),
            TagMode::Compat => extract_tags_compat(content),
        }
    }
}

/// Extract every tag in document order. Duplicates are kept.
pub fn extract_tags(content: &str) -> Vec<String> {
    TAG_RE
        .find_iter(content)
        .map(|m| m.as_str()[1..].to_string())
        .collect()
}

/// Line-gated extraction kept for clients that rely on the old output.
///
/// Lines are split on `\n` and tokens on a single space, so consecutive
/// spaces produce empty tokens and `\r` stays attached to the last token.
pub fn extract_tags_compat(content: &str) -> Vec<String> {
    content
        .split('\n')
        .filter(|line| TAG_RE.is_match(line))
        .flat_map(|line| line.split(' '))
        .map(|token| token.replacen('#', "", 1))
        .collect()
}

pub fn has_any_tag(content: &str) -> bool {
    TAG_RE.is_match(content)
}

/// A page with no tags never matches, even if `#<tag>` would be a
/// substring of it (e.g. an empty tag name).
pub fn has_specific_tag(content: &str, tag: &str) -> bool {
    has_any_tag(content) && content.contains(&format!("#{tag}"))
}
