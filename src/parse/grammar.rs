use crate::types::expr::{Expr, Quantifier};

use super::lexer::Token;
use super::ParseError;

/// Recursive-descent parser over a lexed token slice.
///
/// Precedence low to high: `or` < `and` < `not`; parenthesized groups nest
/// arbitrarily. Selection references resolve immediately against the ordered
/// selection-name table, so the produced [`Expr`] carries only indices.
pub(crate) fn parse_condition(tokens: &[Token], names: &[&str]) -> Result<Expr, ParseError> {
    let mut cursor = Cursor::new(tokens);
    let expr = or_expr(&mut cursor, names)?;

    match cursor.peek() {
        Token::Eof => Ok(expr),
        Token::Pipe => Err(ParseError::WorkInProgress {
            construct: "aggregation expression".to_owned(),
        }),
        other => Err(ParseError::MalformedCondition {
            reason: format!("unexpected token '{other}' after condition"),
        }),
    }
}

struct Cursor<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Self { tokens, pos: 0 }
    }

    fn peek(&self) -> &'a Token {
        self.tokens.get(self.pos).unwrap_or(&Token::Eof)
    }

    fn bump(&mut self) -> &'a Token {
        let token = self.peek();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        token
    }
}

fn or_expr(cursor: &mut Cursor<'_>, names: &[&str]) -> Result<Expr, ParseError> {
    let mut expr = and_expr(cursor, names)?;
    while *cursor.peek() == Token::Or {
        cursor.bump();
        let right = and_expr(cursor, names)?;
        expr = Expr::Or(Box::new(expr), Box::new(right));
    }
    Ok(expr)
}

fn and_expr(cursor: &mut Cursor<'_>, names: &[&str]) -> Result<Expr, ParseError> {
    let mut expr = unary(cursor, names)?;
    while *cursor.peek() == Token::And {
        cursor.bump();
        let right = unary(cursor, names)?;
        expr = Expr::And(Box::new(expr), Box::new(right));
    }
    Ok(expr)
}

fn unary(cursor: &mut Cursor<'_>, names: &[&str]) -> Result<Expr, ParseError> {
    if *cursor.peek() == Token::Not {
        cursor.bump();
        let inner = unary(cursor, names)?;
        return Ok(Expr::Not(Box::new(inner)));
    }
    atom(cursor, names)
}

fn atom(cursor: &mut Cursor<'_>, names: &[&str]) -> Result<Expr, ParseError> {
    match cursor.bump() {
        Token::LParen => {
            let expr = or_expr(cursor, names)?;
            match cursor.bump() {
                Token::RParen => Ok(expr),
                other => Err(ParseError::MalformedCondition {
                    reason: format!("expected ')', found '{other}'"),
                }),
            }
        }
        Token::All => {
            expect_of(cursor)?;
            let members = of_target(cursor, names)?;
            Ok(Expr::CountOf {
                quantifier: Quantifier::All,
                members,
            })
        }
        Token::Number(n) => {
            if *n == 0 {
                return Err(ParseError::MalformedCondition {
                    reason: "quantifier must be at least 1".to_owned(),
                });
            }
            expect_of(cursor)?;
            let members = of_target(cursor, names)?;
            Ok(Expr::CountOf {
                quantifier: Quantifier::AtLeast(*n),
                members,
            })
        }
        Token::Identifier(name) => resolve(name, names).map(Expr::Selection),
        Token::IdentifierPattern(prefix) => Err(ParseError::MalformedCondition {
            reason: format!("selection pattern '{prefix}*' is only valid after 'of'"),
        }),
        Token::Eof => Err(ParseError::MalformedCondition {
            reason: "unexpected end of condition".to_owned(),
        }),
        other => Err(ParseError::MalformedCondition {
            reason: format!("unexpected token '{other}'"),
        }),
    }
}

fn expect_of(cursor: &mut Cursor<'_>) -> Result<(), ParseError> {
    match cursor.bump() {
        Token::Of => Ok(()),
        other => Err(ParseError::MalformedCondition {
            reason: format!("expected 'of' after quantifier, found '{other}'"),
        }),
    }
}

/// The selection set a quantifier ranges over, in declaration order.
///
/// `them` selects every compiled selection; a `prefix*` pattern selects the
/// (possibly empty) set of selections whose name starts with the prefix; a
/// bare name selects exactly that selection.
fn of_target(cursor: &mut Cursor<'_>, names: &[&str]) -> Result<Vec<usize>, ParseError> {
    match cursor.bump() {
        Token::Them => Ok((0..names.len()).collect()),
        Token::IdentifierPattern(prefix) => Ok(names
            .iter()
            .enumerate()
            .filter(|(_, name)| name.starts_with(prefix.as_str()))
            .map(|(i, _)| i)
            .collect()),
        Token::Identifier(name) => resolve(name, names).map(|i| vec![i]),
        other => Err(ParseError::MalformedCondition {
            reason: format!("expected selection set after 'of', found '{other}'"),
        }),
    }
}

fn resolve(name: &str, names: &[&str]) -> Result<usize, ParseError> {
    names
        .iter()
        .position(|n| *n == name)
        .ok_or_else(|| ParseError::UnknownSelection {
            name: name.to_owned(),
        })
}
