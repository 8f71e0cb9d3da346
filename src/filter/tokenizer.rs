use regex::Regex;
use std::sync::LazyLock;

/// Token that separates OR groups
pub const GROUP_SEPARATOR: &str = "|";

/// A quoted phrase (optionally negated and field-scoped) or any run of non-whitespace.
static PHRASE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)-?(?:[a-z0-9|,_]+:)?"[^"]+"|\S+"#).expect("valid phrase regex")
});

/// Split a search string into phrase tokens.
///
/// Quoted phrases keep their quotes, negation and field scope, so
/// `-name:"john smith"` is one token. Everything else splits on whitespace.
pub fn tokenize(search: &str) -> Vec<&str> {
    PHRASE_RE.find_iter(search).map(|m| m.as_str()).collect()
}

/// Partition tokens into AND groups separated by [`GROUP_SEPARATOR`].
///
/// Leading, trailing and doubled separators produce empty groups. No tokens
/// means no groups at all.
pub fn split_groups<'a>(tokens: &[&'a str]) -> Vec<Vec<&'a str>> {
    if tokens.is_empty() {
        return Vec::new();
    }

    let mut groups = vec![Vec::new()];
    for &token in tokens {
        if token == GROUP_SEPARATOR {
            groups.push(Vec::new());
        } else if let Some(group) = groups.last_mut() {
            group.push(token);
        }
    }
    groups
}
