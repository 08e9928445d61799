use std::collections::HashMap;

use serde::Deserialize;

/// An event record: a flat mapping from field name to string value.
///
/// Records are produced by an external decoder and never mutated during
/// evaluation. When the external format legitimately carries the same key
/// more than once, the last decoded occurrence wins; rules in the wild are
/// written against this behavior, so it is preserved rather than rejected.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: HashMap<String, String>,
}

impl Record {
    /// Create an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field value, consuming and returning the record.
    #[must_use]
    pub fn set(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(field, value);
        self
    }

    /// Insert a field value, replacing any previous one.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(field.into(), value.into());
    }

    /// Look up a field value.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// Number of fields in the record.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the record carries no fields at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl From<HashMap<String, String>> for Record {
    fn from(fields: HashMap<String, String>) -> Self {
        Self { fields }
    }
}

impl FromIterator<(String, String)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

/// Resolves whole-value placeholder names to candidate values.
///
/// Supplied by the caller per evaluation call; a rule compiled without any
/// placeholder patterns never invokes it. Returning `None` means the name is
/// unknown, in which case the placeholder leaf simply does not match. Results
/// are not cached here; callers may cache if resolution is expensive.
pub trait PlaceholderLookup {
    /// Candidate values for `name`, or `None` if the name is unknown.
    fn resolve(&self, name: &str) -> Option<Vec<String>>;
}

impl<F> PlaceholderLookup for F
where
    F: Fn(&str) -> Option<Vec<String>>,
{
    fn resolve(&self, name: &str) -> Option<Vec<String>> {
        self(name)
    }
}

impl PlaceholderLookup for HashMap<String, Vec<String>> {
    fn resolve(&self, name: &str) -> Option<Vec<String>> {
        self.get(name).cloned()
    }
}
