use thiserror::Error;

/// Errors produced while compiling a raw selection into a predicate.
///
/// All compilation errors are terminal for the rule: a rule that fails to
/// compile must not be partially evaluated.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("unknown modifier '{modifier}' in field key '{key}'")]
    UnknownModifier { key: String, modifier: String },

    #[error("selection '{name}' has no field definitions")]
    EmptySelection { name: String },

    #[error("invalid regular expression for field '{field}': {source}")]
    Regex {
        field: String,
        source: regex::Error,
    },

    #[error("invalid pattern for field '{field}': {source}")]
    Glob {
        field: String,
        source: globset::Error,
    },
}
