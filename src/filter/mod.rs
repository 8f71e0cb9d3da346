//! Search string compilation and record matching
//!
//! A search string is compiled once into an expression tree that is then
//! evaluated against each record.
//!
//! # Syntax
//!
//! ```text
//! word                 Match records where any default field contains "word"
//! "two words"          Quoted phrase, whitespace included
//! field:word           Match only the named field
//! f1|f2:word           Match any of the named fields (f1,f2:word works too)
//! -word                Exclude records matching the phrase
//! a b                  Phrases combine with AND
//! a b | c              Groups separated by a standalone "|" combine with OR
//! ```
//!
//! # Wildcards
//!
//! - `*` matches any run of characters, `?` matches exactly one
//! - A phrase matches anywhere inside the field text
//! - A phrase ending in `*` must match from the start of the field text
//!
//! # Examples
//!
//! ```text
//! john smith                 # both words, in any default field
//! name:"john smith"          # the phrase in the name field
//! name:jo* -city:oslo        # names starting with "jo", not in Oslo
//! tag:urgent | priority:1    # urgent tag, or priority 1
//! ```
//!
//! Compilation never fails. Malformed input is handled leniently and
//! reported through [`FilterWarning`]s.

pub mod error;
pub mod expr;
pub mod glob;
pub mod parser;
pub mod record;
pub mod tokenizer;

pub use error::{FilterWarning, GlobError};
pub use expr::{Expr, MatchLeaf};
pub use glob::Glob;
pub use parser::{CompiledQuery, FieldList, Phrase, compile};
pub use record::Record;

use serde::{Deserialize, Serialize};

/// Matching options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterOptions {
    /// Match letter case exactly (off by default)
    pub case_sensitive: bool,
}

impl FilterOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }
}

/// A compiled search string together with the fields it searches by default
#[derive(Debug, Clone)]
pub struct QueryFilter {
    search: String,
    default_fields: FieldList,
    options: FilterOptions,
    expr: Expr,
    warnings: Vec<FilterWarning>,
}

impl QueryFilter {
    pub fn new(
        search: &str,
        default_fields: impl Into<FieldList>,
        options: FilterOptions,
    ) -> Self {
        let mut filter = Self {
            search: String::new(),
            default_fields: default_fields.into(),
            options,
            expr: Expr::Or(Vec::new()),
            warnings: Vec::new(),
        };
        filter.parse(search);
        filter
    }

    /// Replace the compiled query with one built from `search`
    pub fn parse(&mut self, search: &str) {
        let compiled = compile(search, &self.default_fields, self.options.case_sensitive);
        self.search = search.to_string();
        self.expr = compiled.expr;
        self.warnings = compiled.warnings;
    }

    /// Change the default fields and recompile the current search string
    pub fn set_default_fields(&mut self, default_fields: impl Into<FieldList>) {
        self.default_fields = default_fields.into();
        let search = std::mem::take(&mut self.search);
        self.parse(&search);
    }

    pub fn search_string(&self) -> &str {
        &self.search
    }

    pub fn default_fields(&self) -> &FieldList {
        &self.default_fields
    }

    pub fn options(&self) -> FilterOptions {
        self.options
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    /// Diagnostics from the last compilation
    pub fn warnings(&self) -> &[FilterWarning] {
        &self.warnings
    }

    /// Check a record against the compiled query.
    ///
    /// An empty search string compiles to an empty OR, which matches nothing.
    pub fn test<R: Record + ?Sized>(&self, record: &R) -> bool {
        self.expr.evaluate(record)
    }

    /// Check a record against any (sub)tree, e.g. one group of [`QueryFilter::expr`]
    pub fn test_expr<R: Record + ?Sized>(&self, expr: &Expr, record: &R) -> bool {
        expr.evaluate(record)
    }

    /// Keep the records that match, in their original order
    pub fn filter<I, R>(&self, records: I) -> Vec<R>
    where
        I: IntoIterator<Item = R>,
        R: Record,
    {
        records
            .into_iter()
            .filter(|record| self.test(record))
            .collect()
    }

    /// Human-readable rendering of the compiled tree
    pub fn description(&self) -> String {
        self.expr.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_replaces_tree_and_warnings() {
        let mut filter = QueryFilter::new("| a", "name", FilterOptions::new());
        assert_eq!(filter.warnings().len(), 1);

        filter.parse("b");
        assert!(filter.warnings().is_empty());
        assert_eq!(filter.search_string(), "b");
        assert!(filter.test(&json!({"name": "abc"})));
        assert!(!filter.test(&json!({"name": "xyz"})));
    }

    #[test]
    fn test_set_default_fields_recompiles() {
        let mut filter = QueryFilter::new("oslo", "name", FilterOptions::new());
        let record = json!({"name": "Ada", "city": "Oslo"});
        assert!(!filter.test(&record));

        filter.set_default_fields(["name", "city"]);
        assert_eq!(filter.search_string(), "oslo");
        assert!(filter.test(&record));
    }

    #[test]
    fn test_case_sensitive_option() {
        let record = json!({"name": "Ada"});
        let insensitive = QueryFilter::new("ada", "name", FilterOptions::new());
        let sensitive = QueryFilter::new("ada", "name", FilterOptions::new().case_sensitive(true));
        assert!(insensitive.test(&record));
        assert!(!sensitive.test(&record));
    }

    #[test]
    fn test_filter_borrowed_and_owned() {
        let records = vec![json!({"n": "a1"}), json!({"n": "b"}), json!({"n": "a2"})];
        let filter = QueryFilter::new("a*", "n", FilterOptions::new());

        let borrowed = filter.filter(&records);
        assert_eq!(borrowed, vec![&records[0], &records[2]]);

        let owned = filter.filter(records.clone());
        assert_eq!(owned, vec![json!({"n": "a1"}), json!({"n": "a2"})]);
    }
}
