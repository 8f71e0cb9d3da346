use super::error::GlobError;
use super::glob::Glob;
use super::parser::FieldList;
use super::record::Record;
use serde::Serialize;
use std::fmt;

/// A compiled query.
///
/// The compiler always produces `Or` of `And` groups whose children are
/// `Match` leaves, optionally wrapped in a single `Not`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", content = "args", rename_all = "UPPERCASE")]
pub enum Expr {
    /// True when every child is true; an empty `And` is true
    And(Vec<Expr>),
    /// True when any child is true; an empty `Or` is false
    Or(Vec<Expr>),
    Not(Box<Expr>),
    Match(MatchLeaf),
}

impl Expr {
    pub fn negate(self) -> Self {
        Expr::Not(Box::new(self))
    }

    /// Evaluate this (sub)tree against a record
    pub fn evaluate<R: Record + ?Sized>(&self, record: &R) -> bool {
        match self {
            Expr::And(children) => children.iter().all(|child| child.evaluate(record)),
            Expr::Or(children) => children.iter().any(|child| child.evaluate(record)),
            Expr::Not(child) => !child.evaluate(record),
            Expr::Match(leaf) => leaf.matches(record),
        }
    }

    fn describe(&self) -> String {
        match self {
            Expr::And(children) => describe_list("AND", children),
            Expr::Or(children) => describe_list("OR", children),
            Expr::Not(child) => format!("NOT( {} )", child.describe()),
            Expr::Match(leaf) => format!("MATCH(\"{}\", \"{}\")", leaf.fields, leaf.pattern),
        }
    }
}

/// Renders the tree as nested `OR(`/`AND(`/`NOT(`/`MATCH(` calls, two spaces per level
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

fn describe_list(name: &str, children: &[Expr]) -> String {
    let body = children
        .iter()
        .map(Expr::describe)
        .collect::<Vec<_>>()
        .join(",\n");
    format!("{name}(\n{} )", indent(&body))
}

fn indent(text: &str) -> String {
    text.split('\n')
        .map(|line| format!("  {line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Leaf test: does the glob match any of the named fields?
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchLeaf {
    fields: FieldList,
    pattern: String,
    #[serde(skip)]
    glob: Option<Glob>,
}

impl MatchLeaf {
    pub fn new(
        fields: FieldList,
        pattern: impl Into<String>,
        case_sensitive: bool,
    ) -> Result<Self, GlobError> {
        let pattern = pattern.into();
        let glob = Glob::new(&pattern, case_sensitive)?;
        Ok(Self {
            fields,
            pattern,
            glob: Some(glob),
        })
    }

    /// A leaf whose pattern could not be compiled. It never matches.
    pub fn unmatchable(fields: FieldList, pattern: impl Into<String>) -> Self {
        Self {
            fields,
            pattern: pattern.into(),
            glob: None,
        }
    }

    pub fn fields(&self) -> &FieldList {
        &self.fields
    }

    /// The glob text after quote and pipe stripping
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn matches<R: Record + ?Sized>(&self, record: &R) -> bool {
        let Some(glob) = &self.glob else {
            return false;
        };
        self.fields.iter().any(|field| {
            record
                .field_text(field)
                .is_some_and(|text| glob.is_match(&text))
        })
    }
}

impl From<MatchLeaf> for Expr {
    fn from(leaf: MatchLeaf) -> Self {
        Expr::Match(leaf)
    }
}
