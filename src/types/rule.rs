use std::fmt;

use crate::compile::{compile_selection, CompileOptions};
use crate::error::RuleError;
use crate::evaluate::eval_expr;
use crate::parse::parse;
use crate::types::detection::Detection;
use crate::types::expr::Expr;
use crate::types::predicate::Predicate;
use crate::types::record::{PlaceholderLookup, Record};

/// A fully compiled rule: the parsed condition plus one compiled predicate
/// per selection, in declaration order.
///
/// Compilation front-loads all pattern translation and validation;
/// [`matches`](CompiledRule::matches) is pure and takes `&self`, so one
/// compiled rule can serve any number of records, from any number of threads.
#[derive(Debug, Clone)]
pub struct CompiledRule {
    selections: Vec<CompiledSelection>,
    condition: Expr,
}

#[derive(Debug, Clone)]
pub(crate) struct CompiledSelection {
    pub(crate) name: String,
    pub(crate) predicate: Predicate,
}

impl CompiledRule {
    /// Compile a detection with default options.
    ///
    /// # Errors
    ///
    /// Returns the first condition-parse or selection-compile failure; a rule
    /// that fails any part of compilation produces no partial result.
    pub fn compile(detection: &Detection) -> Result<Self, RuleError> {
        Self::compile_with(detection, &CompileOptions::default())
    }

    /// Compile a detection with explicit options.
    ///
    /// # Errors
    ///
    /// See [`compile`](CompiledRule::compile).
    pub fn compile_with(detection: &Detection, opts: &CompileOptions) -> Result<Self, RuleError> {
        let names: Vec<&str> = detection
            .selections()
            .iter()
            .map(|(name, _)| name.as_str())
            .collect();
        let condition = parse(detection.condition(), &names)?;

        let selections = detection
            .selections()
            .iter()
            .map(|(name, raw)| {
                compile_selection(name, raw, opts).map(|predicate| CompiledSelection {
                    name: name.clone(),
                    predicate,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            selections,
            condition,
        })
    }

    /// Evaluate the rule against a record, with no placeholder resolution.
    ///
    /// Placeholder leaves evaluate to false; rules without placeholder
    /// patterns behave identically under
    /// [`matches_with`](CompiledRule::matches_with).
    #[must_use]
    pub fn matches(&self, record: &Record) -> bool {
        eval_expr(&self.condition, &self.selections, record, None)
    }

    /// Evaluate the rule against a record, resolving placeholder patterns
    /// through `lookup`.
    #[must_use]
    pub fn matches_with(&self, record: &Record, lookup: &dyn PlaceholderLookup) -> bool {
        eval_expr(&self.condition, &self.selections, record, Some(lookup))
    }

    /// Selection names in declaration order.
    #[must_use]
    pub fn selection_names(&self) -> Vec<&str> {
        self.selections.iter().map(|s| s.name.as_str()).collect()
    }
}

impl fmt::Display for CompiledRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rule with {} selections [", self.selections.len())?;
        for (i, selection) in self.selections.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(&selection.name)?;
        }
        f.write_str("]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::detection::{RawSelection, RawValue};

    fn detection() -> Detection {
        Detection::new("selection1 and not filter")
            .selection(
                "selection1",
                RawSelection::map([("Image", RawValue::one(r"*\whoami.exe"))]),
            )
            .selection(
                "filter",
                RawSelection::map([("User", RawValue::one("SYSTEM"))]),
            )
    }

    #[test]
    fn compile_and_match() {
        let rule = CompiledRule::compile(&detection()).unwrap();
        let hit = Record::new()
            .set("Image", r"C:\Windows\System32\whoami.exe")
            .set("User", "alice");
        let filtered = Record::new()
            .set("Image", r"C:\Windows\System32\whoami.exe")
            .set("User", "SYSTEM");
        assert!(rule.matches(&hit));
        assert!(!rule.matches(&filtered));
    }

    #[test]
    fn selection_names_keep_declaration_order() {
        let rule = CompiledRule::compile(&detection()).unwrap();
        assert_eq!(rule.selection_names(), ["selection1", "filter"]);
    }

    #[test]
    fn parse_failure_surfaces_before_selection_compilation() {
        let detection = Detection::new("nosuch").selection(
            "selection1",
            RawSelection::map([("A", RawValue::one("x"))]),
        );
        let err = CompiledRule::compile(&detection).unwrap_err();
        assert!(matches!(err, RuleError::Parse(_)));
    }

    #[test]
    fn compile_failure_is_terminal() {
        let detection = Detection::new("selection1").selection(
            "selection1",
            RawSelection::map([("A|bogus", RawValue::one("x"))]),
        );
        let err = CompiledRule::compile(&detection).unwrap_err();
        assert!(matches!(err, RuleError::Compile(_)));
    }

    #[test]
    fn display_lists_selections() {
        let rule = CompiledRule::compile(&detection()).unwrap();
        assert_eq!(
            rule.to_string(),
            "rule with 2 selections [selection1, filter]"
        );
    }
}
