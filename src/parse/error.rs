use thiserror::Error;

/// Errors produced while tokenizing or parsing a condition string.
///
/// `WorkInProgress` is deliberately distinct from `MalformedCondition`:
/// callers can treat a rule using a recognized-but-unimplemented construct as
/// "not yet supported" rather than "invalid".
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("unsupported token '{text}' at offset {offset}")]
    UnsupportedToken { offset: usize, text: String },

    #[error("condition references unknown selection '{name}'")]
    UnknownSelection { name: String },

    #[error("malformed condition: {reason}")]
    MalformedCondition { reason: String },

    #[error("condition construct not yet supported: {construct}")]
    WorkInProgress { construct: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_token_message() {
        let err = ParseError::UnsupportedToken {
            offset: 11,
            text: "&&".into(),
        };
        assert_eq!(err.to_string(), "unsupported token '&&' at offset 11");
    }

    #[test]
    fn unknown_selection_message() {
        let err = ParseError::UnknownSelection {
            name: "selection9".into(),
        };
        assert_eq!(
            err.to_string(),
            "condition references unknown selection 'selection9'"
        );
    }

    #[test]
    fn work_in_progress_message() {
        let err = ParseError::WorkInProgress {
            construct: "aggregation expression".into(),
        };
        assert_eq!(
            err.to_string(),
            "condition construct not yet supported: aggregation expression"
        );
    }
}
