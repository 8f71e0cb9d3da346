use super::error::GlobError;
use regex::{Regex, RegexBuilder};

/// A compiled glob pattern (`*` = any run of characters, `?` = any single character).
///
/// Matching is containment: the pattern may match anywhere inside the text.
/// The one exception is a pattern ending in `*`, which must match from the
/// start of the text ("starts with" search).
#[derive(Debug, Clone)]
pub struct Glob {
    case_sensitive: bool,
    regex: Regex,
}

impl Glob {
    /// Compile a glob, matching case-insensitively unless `case_sensitive` is set
    pub fn new(pattern: &str, case_sensitive: bool) -> Result<Self, GlobError> {
        let regex = RegexBuilder::new(&glob_to_regex(pattern))
            .case_insensitive(!case_sensitive)
            .build()
            .map_err(|source| GlobError {
                pattern: pattern.to_string(),
                source,
            })?;

        Ok(Self {
            case_sensitive,
            regex,
        })
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

impl PartialEq for Glob {
    fn eq(&self, other: &Self) -> bool {
        self.regex.as_str() == other.regex.as_str() && self.case_sensitive == other.case_sensitive
    }
}

impl Eq for Glob {}

/// Translate a glob into regex source.
///
/// Everything except `*` and `?` is matched literally. A trailing `*` anchors
/// the expression to the start of the text; nothing ever anchors the end.
pub fn glob_to_regex(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() + 8);
    if pattern.ends_with('*') {
        out.push('^');
    }

    let mut literal = String::new();
    for c in pattern.chars() {
        let wildcard = match c {
            '*' => ".*",
            '?' => ".",
            _ => {
                literal.push(c);
                continue;
            }
        };
        out.push_str(&regex::escape(&literal));
        literal.clear();
        out.push_str(wildcard);
    }
    out.push_str(&regex::escape(&literal));

    out
}
