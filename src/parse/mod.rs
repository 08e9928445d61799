//! Condition-string parsing: a winnow lexer feeding a small
//! recursive-descent grammar.

mod error;
mod grammar;
mod lexer;

pub use error::ParseError;

use crate::types::expr::Expr;

/// Parse a condition string against the ordered selection-name table.
pub(crate) fn parse(condition: &str, names: &[&str]) -> Result<Expr, ParseError> {
    let tokens = lexer::tokenize(condition)?;
    grammar::parse_condition(&tokens, names)
}
