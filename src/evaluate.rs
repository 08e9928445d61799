//! Rule evaluation: walking a parsed condition and its compiled predicates
//! against one record.
//!
//! Evaluation allocates only when whitespace collapsing rewrites a record
//! value, takes shared references everywhere, and short-circuits at every
//! boolean node, so a compiled rule can be shared across threads and hammered
//! with records.

use crate::pattern::collapse_whitespace;
use crate::types::expr::{Expr, Quantifier};
use crate::types::predicate::{FieldMatcher, FieldTest, Predicate, ValuePattern};
use crate::types::record::{PlaceholderLookup, Record};
use crate::types::rule::CompiledSelection;

pub(crate) fn eval_expr(
    expr: &Expr,
    selections: &[CompiledSelection],
    record: &Record,
    lookup: Option<&dyn PlaceholderLookup>,
) -> bool {
    match expr {
        Expr::Selection(index) => eval_predicate(&selections[*index].predicate, record, lookup),
        Expr::And(left, right) => {
            eval_expr(left, selections, record, lookup)
                && eval_expr(right, selections, record, lookup)
        }
        Expr::Or(left, right) => {
            eval_expr(left, selections, record, lookup)
                || eval_expr(right, selections, record, lookup)
        }
        Expr::Not(inner) => !eval_expr(inner, selections, record, lookup),
        Expr::CountOf {
            quantifier,
            members,
        } => eval_count_of(*quantifier, members, selections, record, lookup),
    }
}

fn eval_count_of(
    quantifier: Quantifier,
    members: &[usize],
    selections: &[CompiledSelection],
    record: &Record,
    lookup: Option<&dyn PlaceholderLookup>,
) -> bool {
    match quantifier {
        Quantifier::All => members
            .iter()
            .all(|&i| eval_predicate(&selections[i].predicate, record, lookup)),
        Quantifier::AtLeast(n) => {
            let mut hits = 0;
            for (checked, &i) in members.iter().enumerate() {
                if eval_predicate(&selections[i].predicate, record, lookup) {
                    hits += 1;
                    if hits >= n {
                        return true;
                    }
                }
                // Not enough members left to reach n.
                if hits + (members.len() - checked - 1) < n {
                    return false;
                }
            }
            false
        }
    }
}

fn eval_predicate(
    predicate: &Predicate,
    record: &Record,
    lookup: Option<&dyn PlaceholderLookup>,
) -> bool {
    match predicate {
        Predicate::Test(test) => eval_field_test(test, record, lookup),
        Predicate::And(children) => children.iter().all(|c| eval_predicate(c, record, lookup)),
        Predicate::Or(children) => children.iter().any(|c| eval_predicate(c, record, lookup)),
    }
}

/// A field test against a record the field is absent from never matches.
fn eval_field_test(
    test: &FieldTest,
    record: &Record,
    lookup: Option<&dyn PlaceholderLookup>,
) -> bool {
    let Some(value) = record.get(&test.field) else {
        return false;
    };

    match &test.matcher {
        FieldMatcher::Patterns(patterns) => patterns
            .iter()
            .any(|p| eval_value_pattern(p, value, test.collapse_ws, lookup)),
        FieldMatcher::Contains { needles, match_all } => {
            let value = normalized(value, test.collapse_ws);
            if *match_all {
                needles.iter().all(|n| value.contains(n.as_str()))
            } else {
                needles.iter().any(|n| value.contains(n.as_str()))
            }
        }
        FieldMatcher::StartsWith(prefixes) => {
            let value = normalized(value, test.collapse_ws);
            prefixes.iter().any(|p| value.starts_with(p.as_str()))
        }
        FieldMatcher::EndsWith(suffixes) => {
            let value = normalized(value, test.collapse_ws);
            suffixes.iter().any(|s| value.ends_with(s.as_str()))
        }
        FieldMatcher::Regex(regexes) => regexes.iter().any(|re| re.is_match(value)),
    }
}

fn eval_value_pattern(
    pattern: &ValuePattern,
    value: &str,
    collapse_ws: bool,
    lookup: Option<&dyn PlaceholderLookup>,
) -> bool {
    match pattern {
        ValuePattern::Glob(glob) => glob.is_match(value),
        ValuePattern::Placeholder(name) => {
            let Some(candidates) = lookup.and_then(|l| l.resolve(name)) else {
                return false;
            };
            let value = normalized(value, collapse_ws);
            candidates.iter().any(|c| normalized(c, collapse_ws) == value)
        }
    }
}

fn normalized(value: &str, collapse_ws: bool) -> std::borrow::Cow<'_, str> {
    if collapse_ws {
        std::borrow::Cow::Owned(collapse_whitespace(value))
    } else {
        std::borrow::Cow::Borrowed(value)
    }
}
