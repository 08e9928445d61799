use globset::GlobMatcher;
use regex::Regex;

/// A compiled selection: a boolean-evaluable predicate tree over a record.
///
/// Built once per selection at compile time, immutable, and reused across
/// every record evaluated against the rule.
#[derive(Debug, Clone)]
pub(crate) enum Predicate {
    Test(FieldTest),
    And(Vec<Predicate>),
    Or(Vec<Predicate>),
}

/// Leaf predicate: one field tested against one compiled matcher.
#[derive(Debug, Clone)]
pub(crate) struct FieldTest {
    pub(crate) field: String,
    pub(crate) matcher: FieldMatcher,
    /// Whether space/tab runs collapse before textual comparisons.
    pub(crate) collapse_ws: bool,
}

/// Comparison semantics selected by the field key's modifier suffix.
#[derive(Debug, Clone)]
pub(crate) enum FieldMatcher {
    /// No modifier: glob patterns and whole-value placeholders, OR across the
    /// list.
    Patterns(Vec<ValuePattern>),
    /// `contains` / `contains|all`: substring tests, OR or AND across the
    /// list.
    Contains {
        needles: Vec<String>,
        match_all: bool,
    },
    /// `startswith`: prefix test, OR across the list.
    StartsWith(Vec<String>),
    /// `endswith`: suffix test, OR across the list.
    EndsWith(Vec<String>),
    /// `re`: regular expressions, OR across the list.
    Regex(Vec<Regex>),
}

/// One default-mode pattern, classified at compile time.
#[derive(Debug, Clone)]
pub(crate) enum ValuePattern {
    /// A whole-value `%name%` placeholder, resolved through the caller's
    /// lookup at evaluation time.
    Placeholder(String),
    /// A translated glob; patterns without live wildcards degenerate to an
    /// exact match inside the glob engine.
    Glob(GlobMatcher),
}
