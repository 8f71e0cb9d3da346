use thiserror::Error;

/// Non-fatal diagnostics collected while compiling a search string.
///
/// Compilation never fails: every search string produces an expression tree.
/// These warnings describe the places where the compiler had to be lenient.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterWarning {
    #[error("Empty OR group #{index}: it matches every record")]
    EmptyGroup { index: usize },

    #[error("Unbalanced quotes in '{phrase}': all quote characters were removed")]
    UnbalancedQuotes { phrase: String },

    #[error("Stray '|' in '{phrase}': it was removed from the search text")]
    StrayPipe { phrase: String },

    #[error("Empty search text in '{phrase}': it matches any record where the field is set")]
    EmptyPattern { phrase: String },

    #[error("Pattern '{pattern}' cannot be matched ({reason}); it never matches")]
    InvalidPattern { pattern: String, reason: String },
}

/// Failure to turn a glob pattern into a matcher.
#[derive(Debug, Error)]
#[error("Invalid glob pattern '{pattern}': {source}")]
pub struct GlobError {
    pub pattern: String,
    #[source]
    pub source: regex::Error,
}
