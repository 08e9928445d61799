//! Core data types: raw detections as decoded from rule documents, the
//! compiled artifacts built from them, and the records they evaluate.

pub(crate) mod detection;
pub(crate) mod error;
pub(crate) mod expr;
pub(crate) mod predicate;
pub(crate) mod record;
pub(crate) mod rule;
pub(crate) mod value;

pub use detection::{Detection, RawSelection, RawValue};
pub use error::CompileError;
pub use record::{PlaceholderLookup, Record};
pub use rule::CompiledRule;
pub use value::Value;
