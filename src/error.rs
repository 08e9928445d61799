use thiserror::Error;

use crate::parse::ParseError;
use crate::types::error::CompileError;

/// Any failure while turning a detection into a [`CompiledRule`].
///
/// [`CompiledRule`]: crate::CompiledRule
#[derive(Debug, Error)]
pub enum RuleError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Compile(#[from] CompileError),
}
