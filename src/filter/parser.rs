use super::error::FilterWarning;
use super::expr::{Expr, MatchLeaf};
use super::tokenizer::{split_groups, tokenize};
use log::{debug, trace};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// Field scope at the start of a phrase, e.g. `name|title:` or `name,title:`
static FIELD_SCOPE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^([a-z0-9|,_]+):").expect("valid field scope regex"));

/// Ordered list of record field names a phrase is matched against
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldList(Vec<String>);

impl FieldList {
    /// Parse a `|` or `,` separated list of field names.
    ///
    /// Empty names and duplicates are kept as written.
    pub fn parse(spec: &str) -> Self {
        Self(spec.replace(',', "|").split('|').map(String::from).collect())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for FieldList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("|"))
    }
}

impl FromStr for FieldList {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<&str> for FieldList {
    fn from(spec: &str) -> Self {
        Self::parse(spec)
    }
}

impl From<String> for FieldList {
    fn from(spec: String) -> Self {
        Self::parse(&spec)
    }
}

impl From<Vec<String>> for FieldList {
    fn from(fields: Vec<String>) -> Self {
        Self(fields)
    }
}

impl From<&[&str]> for FieldList {
    fn from(fields: &[&str]) -> Self {
        fields.iter().copied().collect()
    }
}

impl<const N: usize> From<[&str; N]> for FieldList {
    fn from(fields: [&str; N]) -> Self {
        fields.into_iter().collect()
    }
}

impl<S: Into<String>> FromIterator<S> for FieldList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// A phrase after negation and field scope have been resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Phrase {
    pub fields: FieldList,
    pub pattern: String,
    pub negated: bool,
}

impl Phrase {
    /// Resolve a raw phrase token, falling back to `default_fields` when it has no scope
    pub fn parse(token: &str, default_fields: &FieldList) -> Self {
        Self::parse_with_warnings(token, default_fields, &mut Vec::new())
    }

    /// Like [`Phrase::parse`], recording anything suspicious about the token in `warnings`
    pub fn parse_with_warnings(
        token: &str,
        default_fields: &FieldList,
        warnings: &mut Vec<FilterWarning>,
    ) -> Self {
        let (negated, rest) = match token.strip_prefix('-') {
            Some(stripped) => (true, stripped),
            None => (false, token),
        };

        let (fields, body) = match FIELD_SCOPE_RE.captures(rest) {
            Some(caps) => (FieldList::parse(&caps[1]), &rest[caps[0].len()..]),
            None => (default_fields.clone(), rest),
        };

        if token.matches('"').count() % 2 == 1 {
            warnings.push(FilterWarning::UnbalancedQuotes {
                phrase: token.to_string(),
            });
        }
        if body.contains('|') {
            warnings.push(FilterWarning::StrayPipe {
                phrase: token.to_string(),
            });
        }

        let pattern = body.replace(['"', '|'], "");
        if pattern.is_empty() {
            warnings.push(FilterWarning::EmptyPattern {
                phrase: token.to_string(),
            });
        }

        Phrase {
            fields,
            pattern,
            negated,
        }
    }

    /// Build the leaf expression for this phrase
    pub fn into_expr(self, case_sensitive: bool, warnings: &mut Vec<FilterWarning>) -> Expr {
        let compiled = MatchLeaf::new(self.fields.clone(), self.pattern.as_str(), case_sensitive);
        let leaf = match compiled {
            Ok(leaf) => leaf,
            Err(err) => {
                warnings.push(FilterWarning::InvalidPattern {
                    pattern: self.pattern.clone(),
                    reason: err.source.to_string(),
                });
                MatchLeaf::unmatchable(self.fields, self.pattern)
            }
        };

        if self.negated {
            Expr::from(leaf).negate()
        } else {
            Expr::from(leaf)
        }
    }
}

/// Result of compiling a search string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledQuery {
    pub expr: Expr,
    pub warnings: Vec<FilterWarning>,
}

/// Compile a search string into `OR(AND(...), ...)`.
///
/// Never fails: malformed input degrades to some tree and a warning.
pub fn compile(search: &str, default_fields: &FieldList, case_sensitive: bool) -> CompiledQuery {
    let mut warnings = Vec::new();
    let tokens = tokenize(search);

    let groups: Vec<Expr> = split_groups(&tokens)
        .into_iter()
        .enumerate()
        .map(|(index, phrases)| {
            if phrases.is_empty() {
                warnings.push(FilterWarning::EmptyGroup { index });
            }
            let children = phrases
                .into_iter()
                .map(|token| {
                    let phrase = Phrase::parse_with_warnings(token, default_fields, &mut warnings);
                    trace!("phrase {token:?} -> {phrase:?}");
                    phrase.into_expr(case_sensitive, &mut warnings)
                })
                .collect();
            Expr::And(children)
        })
        .collect();

    debug!(
        "compiled {:?} into {} OR group(s) from {} token(s), {} warning(s)",
        search,
        groups.len(),
        tokens.len(),
        warnings.len()
    );

    CompiledQuery {
        expr: Expr::Or(groups),
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> FieldList {
        FieldList::parse("title|body")
    }

    #[test]
    fn test_field_list_parse() {
        assert_eq!(FieldList::parse("a|b").as_slice(), ["a", "b"]);
        assert_eq!(FieldList::parse("a,b|c,d").as_slice(), ["a", "b", "c", "d"]);
        assert_eq!(FieldList::parse("a").as_slice(), ["a"]);
        assert_eq!(FieldList::parse("a||a").as_slice(), ["a", "", "a"]);
        assert_eq!(FieldList::parse("").as_slice(), [""]);
        assert_eq!(FieldList::from(["x", "y"]).to_string(), "x|y");
    }

    #[test]
    fn test_phrase_uses_default_fields() {
        let phrase = Phrase::parse("john", &defaults());
        assert_eq!(phrase.fields, defaults());
        assert_eq!(phrase.pattern, "john");
        assert!(!phrase.negated);
    }

    #[test]
    fn test_phrase_with_field_scope() {
        let phrase = Phrase::parse("name:john", &defaults());
        assert_eq!(phrase.fields.as_slice(), ["name"]);
        assert_eq!(phrase.pattern, "john");

        let phrase = Phrase::parse("Name|EMAIL,city:jo*", &defaults());
        assert_eq!(phrase.fields.as_slice(), ["Name", "EMAIL", "city"]);
        assert_eq!(phrase.pattern, "jo*");
    }

    #[test]
    fn test_phrase_negation() {
        let phrase = Phrase::parse("-tag:draft", &defaults());
        assert!(phrase.negated);
        assert_eq!(phrase.fields.as_slice(), ["tag"]);
        assert_eq!(phrase.pattern, "draft");

        let phrase = Phrase::parse("--x", &defaults());
        assert!(phrase.negated);
        assert_eq!(phrase.pattern, "-x");
    }

    #[test]
    fn test_phrase_strips_quotes_and_pipes() {
        let phrase = Phrase::parse(r#"name:"john smith""#, &defaults());
        assert_eq!(phrase.pattern, "john smith");

        let phrase = Phrase::parse(r#"a"b"c""#, &defaults());
        assert_eq!(phrase.pattern, "abc");

        let phrase = Phrase::parse("a|b", &defaults());
        assert_eq!(phrase.fields, defaults());
        assert_eq!(phrase.pattern, "ab");
    }

    #[test]
    fn test_scope_must_start_the_phrase() {
        let phrase = Phrase::parse("x-y:z", &defaults());
        assert_eq!(phrase.fields, defaults());
        assert_eq!(phrase.pattern, "x-y:z");

        let phrase = Phrase::parse(r#""name:john""#, &defaults());
        assert_eq!(phrase.fields, defaults());
        assert_eq!(phrase.pattern, "name:john");
    }

    #[test]
    fn test_compile_groups() {
        let compiled = compile("a b | c", &defaults(), false);
        let expected = [
            "OR(",
            "  AND(",
            "    MATCH(\"title|body\", \"a\"),",
            "    MATCH(\"title|body\", \"b\") ),",
            "  AND(",
            "    MATCH(\"title|body\", \"c\") ) )",
        ];
        assert_eq!(compiled.expr.to_string(), expected.join("\n"));
        assert!(compiled.warnings.is_empty());
    }

    #[test]
    fn test_compile_empty_search() {
        let compiled = compile("   ", &defaults(), false);
        assert_eq!(compiled.expr, Expr::Or(vec![]));
        assert!(compiled.warnings.is_empty());
    }

    #[test]
    fn test_compile_warnings() {
        let compiled = compile(r#"| "open a|b name:"#, &defaults(), false);
        assert_eq!(
            compiled.warnings,
            vec![
                FilterWarning::EmptyGroup { index: 0 },
                FilterWarning::UnbalancedQuotes {
                    phrase: r#""open"#.to_string()
                },
                FilterWarning::StrayPipe {
                    phrase: "a|b".to_string()
                },
                FilterWarning::EmptyPattern {
                    phrase: "name:".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_quoted_pipe_is_stripped_with_warning() {
        let mut warnings = Vec::new();
        let phrase = Phrase::parse_with_warnings(r#"name:"a | b""#, &defaults(), &mut warnings);
        assert_eq!(phrase.fields.as_slice(), ["name"]);
        assert_eq!(phrase.pattern, "a  b");
        assert_eq!(
            warnings,
            vec![FilterWarning::StrayPipe {
                phrase: r#"name:"a | b""#.to_string()
            }]
        );
    }

    #[test]
    fn test_scope_pipes_do_not_warn() {
        let mut warnings = Vec::new();
        let phrase = Phrase::parse_with_warnings("-a|b:x", &defaults(), &mut warnings);
        assert!(phrase.negated);
        assert_eq!(phrase.fields.as_slice(), ["a", "b"]);
        assert!(warnings.is_empty());

        Phrase::parse_with_warnings(r#"-"""#, &defaults(), &mut warnings);
        assert_eq!(
            warnings,
            vec![FilterWarning::EmptyPattern {
                phrase: r#"-"""#.to_string()
            }]
        );
    }
}
