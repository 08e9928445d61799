//! Selection compilation: raw selection definitions become immutable
//! predicate trees.
//!
//! All pattern translation, modifier resolution and whitespace normalization
//! happens here, once per rule; evaluation only walks the finished tree.

use std::collections::BTreeMap;

use regex::Regex;

use crate::pattern::{build_glob, collapse_whitespace, translate};
use crate::types::detection::{RawSelection, RawValue};
use crate::types::error::CompileError;
use crate::types::predicate::{FieldMatcher, FieldTest, Predicate, ValuePattern};

/// Compile-time knobs for a rule.
#[derive(Debug, Clone)]
pub struct CompileOptions {
    /// Collapse space/tab runs to a single space on both sides of textual
    /// comparisons. On by default; turn off for rules that match on exact
    /// spacing.
    pub collapse_whitespace: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            collapse_whitespace: true,
        }
    }
}

/// Compile one raw selection into a predicate tree.
///
/// Map form becomes a conjunction across its field keys; list form becomes a
/// disjunction across its elements. An empty selection has no decidable
/// truth value and is rejected.
pub(crate) fn compile_selection(
    name: &str,
    raw: &RawSelection,
    opts: &CompileOptions,
) -> Result<Predicate, CompileError> {
    match raw {
        RawSelection::Map(fields) => compile_fields(name, fields, opts),
        RawSelection::List(elements) => {
            if elements.is_empty() {
                return Err(CompileError::EmptySelection {
                    name: name.to_owned(),
                });
            }
            let branches = elements
                .iter()
                .map(|fields| compile_fields(name, fields, opts))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Predicate::Or(branches))
        }
    }
}

fn compile_fields(
    name: &str,
    fields: &BTreeMap<String, RawValue>,
    opts: &CompileOptions,
) -> Result<Predicate, CompileError> {
    if fields.is_empty() {
        return Err(CompileError::EmptySelection {
            name: name.to_owned(),
        });
    }
    let tests = fields
        .iter()
        .map(|(key, value)| compile_field(key, value, opts).map(Predicate::Test))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Predicate::And(tests))
}

/// Compile one `field|modifier` key and its pattern list into a field test.
fn compile_field(
    key: &str,
    value: &RawValue,
    opts: &CompileOptions,
) -> Result<FieldTest, CompileError> {
    let mut parts = key.split('|');
    let field = parts.next().unwrap_or_default().to_owned();
    let modifiers: Vec<&str> = parts.collect();

    let patterns = value.patterns();
    let matcher = match modifiers.as_slice() {
        [] => FieldMatcher::Patterns(
            patterns
                .iter()
                .map(|p| compile_pattern(&field, p, opts))
                .collect::<Result<Vec<_>, _>>()?,
        ),
        ["contains"] => FieldMatcher::Contains {
            needles: needles(patterns, opts),
            match_all: false,
        },
        ["contains", "all"] => FieldMatcher::Contains {
            needles: needles(patterns, opts),
            match_all: true,
        },
        ["startswith"] => FieldMatcher::StartsWith(needles(patterns, opts)),
        ["endswith"] => FieldMatcher::EndsWith(needles(patterns, opts)),
        ["re"] => FieldMatcher::Regex(
            patterns
                .iter()
                .map(|p| {
                    Regex::new(p).map_err(|source| CompileError::Regex {
                        field: field.clone(),
                        source,
                    })
                })
                .collect::<Result<Vec<_>, _>>()?,
        ),
        other => {
            let modifier = other
                .iter()
                .find(|m| !matches!(**m, "contains" | "all" | "startswith" | "endswith" | "re"))
                .unwrap_or(&other[0]);
            return Err(CompileError::UnknownModifier {
                key: key.to_owned(),
                modifier: (*modifier).to_owned(),
            });
        }
    };

    Ok(FieldTest {
        field,
        matcher,
        collapse_ws: opts.collapse_whitespace,
    })
}

/// Default-mode pattern: a whole-value placeholder or a translated glob.
fn compile_pattern(
    field: &str,
    pattern: &str,
    opts: &CompileOptions,
) -> Result<ValuePattern, CompileError> {
    let candidate = if opts.collapse_whitespace {
        collapse_whitespace(pattern)
    } else {
        pattern.to_owned()
    };
    if let Some(name) = placeholder_name(&candidate) {
        return Ok(ValuePattern::Placeholder(name.to_owned()));
    }
    build_glob(&translate(pattern))
        .map(ValuePattern::Glob)
        .map_err(|source| CompileError::Glob {
            field: field.to_owned(),
            source,
        })
}

/// `%name%` with a non-empty word-character name, nothing else.
fn placeholder_name(pattern: &str) -> Option<&str> {
    let inner = pattern.strip_prefix('%')?.strip_suffix('%')?;
    if !inner.is_empty() && inner.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        Some(inner)
    } else {
        None
    }
}

fn needles(patterns: Vec<String>, opts: &CompileOptions) -> Vec<String> {
    if opts.collapse_whitespace {
        patterns.iter().map(|p| collapse_whitespace(p)).collect()
    } else {
        patterns
    }
}
