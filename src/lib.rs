mod compile;
mod error;
mod evaluate;
mod parse;
pub mod pattern;
mod types;

pub use compile::CompileOptions;
pub use error::RuleError;
pub use parse::ParseError;
pub use types::{
    CompileError, CompiledRule, Detection, PlaceholderLookup, RawSelection, RawValue, Record, Value,
};
