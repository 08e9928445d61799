use std::fmt;

use winnow::combinator::{alt, opt};
use winnow::error::ModalResult;
use winnow::prelude::*;
use winnow::token::{one_of, take_while};

use super::ParseError;

/// A classified condition lexeme. Keywords match the lowercase literals only;
/// any other bare word is an identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token {
    /// A selection name.
    Identifier(String),
    /// A selection name prefix with a trailing `*`; the stored text is the
    /// prefix. Only meaningful as the operand of `of`.
    IdentifierPattern(String),
    /// An integer quantifier literal.
    Number(usize),
    And,
    Or,
    Not,
    Of,
    Them,
    All,
    LParen,
    RParen,
    /// Aggregation separator; recognized so the parser can report the
    /// construct as unimplemented rather than malformed.
    Pipe,
    Eof,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Identifier(name) => write!(f, "{name}"),
            Token::IdentifierPattern(prefix) => write!(f, "{prefix}*"),
            Token::Number(n) => write!(f, "{n}"),
            Token::And => f.write_str("and"),
            Token::Or => f.write_str("or"),
            Token::Not => f.write_str("not"),
            Token::Of => f.write_str("of"),
            Token::Them => f.write_str("them"),
            Token::All => f.write_str("all"),
            Token::LParen => f.write_str("("),
            Token::RParen => f.write_str(")"),
            Token::Pipe => f.write_str("|"),
            Token::Eof => f.write_str("end of condition"),
        }
    }
}

fn word(input: &mut &str) -> ModalResult<Token> {
    let text = (
        one_of(|c: char| c.is_ascii_alphabetic() || c == '_'),
        take_while(0.., |c: char| c.is_ascii_alphanumeric() || c == '_'),
    )
        .take()
        .parse_next(input)?;

    if opt('*').parse_next(input)?.is_some() {
        return Ok(Token::IdentifierPattern(text.to_owned()));
    }

    Ok(match text {
        "and" => Token::And,
        "or" => Token::Or,
        "not" => Token::Not,
        "of" => Token::Of,
        "them" => Token::Them,
        "all" => Token::All,
        _ => Token::Identifier(text.to_owned()),
    })
}

fn number(input: &mut &str) -> ModalResult<Token> {
    take_while(1.., |c: char| c.is_ascii_digit())
        .try_map(str::parse::<usize>)
        .map(Token::Number)
        .parse_next(input)
}

fn token(input: &mut &str) -> ModalResult<Token> {
    alt((
        '('.value(Token::LParen),
        ')'.value(Token::RParen),
        '|'.value(Token::Pipe),
        number,
        word,
    ))
    .parse_next(input)
}

/// Tokenize a condition string.
///
/// Whitespace between tokens is insignificant and discarded; the produced
/// sequence always ends with [`Token::Eof`]. Lexing stops at the first `|`:
/// everything after it belongs to the aggregation grammar, which is not
/// implemented, so its tokens are never inspected.
///
/// # Errors
///
/// Returns [`ParseError::UnsupportedToken`] when the input contains a
/// character sequence matching none of the recognized token shapes.
pub(crate) fn tokenize(input: &str) -> Result<Vec<Token>, ParseError> {
    let mut rest = input;
    let mut tokens = Vec::new();

    loop {
        rest = rest.trim_start();
        if rest.is_empty() {
            tokens.push(Token::Eof);
            return Ok(tokens);
        }
        match token.parse_next(&mut rest) {
            Ok(Token::Pipe) => {
                tokens.push(Token::Pipe);
                tokens.push(Token::Eof);
                return Ok(tokens);
            }
            Ok(t) => tokens.push(t),
            Err(_) => {
                let offset = input.len() - rest.len();
                let text: String = rest.chars().take_while(|c| !c.is_whitespace()).collect();
                return Err(ParseError::UnsupportedToken { offset, text });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(input: &str) -> Vec<Token> {
        tokenize(input).unwrap()
    }

    #[test]
    fn single_identifier() {
        assert_eq!(
            lex("selection"),
            vec![Token::Identifier("selection".into()), Token::Eof]
        );
    }

    #[test]
    fn keywords_and_identifiers() {
        assert_eq!(
            lex("selection1 and not selection3"),
            vec![
                Token::Identifier("selection1".into()),
                Token::And,
                Token::Not,
                Token::Identifier("selection3".into()),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn keywords_are_case_sensitive() {
        assert_eq!(
            lex("AND Them"),
            vec![
                Token::Identifier("AND".into()),
                Token::Identifier("Them".into()),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn keyword_prefix_is_still_an_identifier() {
        // Maximal munch: "android" must not lex as "and" + "roid".
        assert_eq!(
            lex("android"),
            vec![Token::Identifier("android".into()), Token::Eof]
        );
        assert_eq!(lex("ofs"), vec![Token::Identifier("ofs".into()), Token::Eof]);
    }

    #[test]
    fn quantifier_forms() {
        assert_eq!(
            lex("all of them"),
            vec![Token::All, Token::Of, Token::Them, Token::Eof]
        );
        assert_eq!(
            lex("1 of selection*"),
            vec![
                Token::Number(1),
                Token::Of,
                Token::IdentifierPattern("selection".into()),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn trailing_star_stays_part_of_the_identifier() {
        assert_eq!(
            lex("sel_a*"),
            vec![Token::IdentifierPattern("sel_a".into()), Token::Eof]
        );
    }

    #[test]
    fn lexing_stops_at_the_aggregation_separator() {
        // The aggregation tail may contain tokens the condition grammar has
        // no shape for; none of it is inspected.
        assert_eq!(
            lex("(a) | count() > 5"),
            vec![
                Token::LParen,
                Token::Identifier("a".into()),
                Token::RParen,
                Token::Pipe,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn empty_input_is_just_eof() {
        assert_eq!(lex("   "), vec![Token::Eof]);
    }

    #[test]
    fn unsupported_character_fails_with_offset() {
        match tokenize("selection1 && selection2") {
            Err(ParseError::UnsupportedToken { offset, text }) => {
                assert_eq!(offset, 11);
                assert_eq!(text, "&&");
            }
            other => panic!("expected UnsupportedToken, got {other:?}"),
        }
    }

    #[test]
    fn bare_star_is_unsupported() {
        assert!(matches!(
            tokenize("* of them"),
            Err(ParseError::UnsupportedToken { .. })
        ));
    }
}
