use std::collections::BTreeMap;
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

use super::value::Value;

/// The detection block of a rule document: a condition string plus the named
/// selections it combines, in declaration order.
///
/// The external decoder produces this structure; the reserved `condition` key
/// is split out of the selection set during decoding. Declaration order is
/// preserved because `them` and prefix quantifiers in the condition walk the
/// selections in that order.
#[derive(Debug, Clone)]
pub struct Detection {
    condition: String,
    selections: Vec<(String, RawSelection)>,
}

impl Detection {
    /// Create a detection with the given condition and no selections yet.
    #[must_use]
    pub fn new(condition: impl Into<String>) -> Self {
        Self {
            condition: condition.into(),
            selections: Vec::new(),
        }
    }

    /// Append a named selection, consuming and returning the detection.
    #[must_use]
    pub fn selection(mut self, name: impl Into<String>, raw: RawSelection) -> Self {
        self.selections.push((name.into(), raw));
        self
    }

    /// The condition string combining the selections.
    #[must_use]
    pub fn condition(&self) -> &str {
        &self.condition
    }

    /// The raw selections in declaration order.
    #[must_use]
    pub fn selections(&self) -> &[(String, RawSelection)] {
        &self.selections
    }
}

impl<'de> Deserialize<'de> for Detection {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct DetectionVisitor;

        impl<'de> Visitor<'de> for DetectionVisitor {
            type Value = Detection;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a detection mapping with a condition key")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Detection, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut condition: Option<String> = None;
                let mut selections = Vec::new();

                while let Some(key) = map.next_key::<String>()? {
                    if key == "condition" {
                        if condition.is_some() {
                            return Err(serde::de::Error::duplicate_field("condition"));
                        }
                        condition = Some(map.next_value()?);
                    } else {
                        selections.push((key, map.next_value()?));
                    }
                }

                let condition =
                    condition.ok_or_else(|| serde::de::Error::missing_field("condition"))?;
                Ok(Detection {
                    condition,
                    selections,
                })
            }
        }

        deserializer.deserialize_map(DetectionVisitor)
    }
}

/// A raw selection definition as it appears in the rule document.
///
/// The map form is a conjunction across its field keys; the list form is a
/// disjunction across its elements, each of which is itself a map-form
/// conjunction. The shape is resolved once at compile time; evaluation never
/// sees it.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawSelection {
    /// `{field1: v1, field2: v2}` — AND across field keys.
    Map(BTreeMap<String, RawValue>),
    /// `[{fieldA: vA}, {fieldB: vB}]` — OR across elements.
    List(Vec<BTreeMap<String, RawValue>>),
}

impl RawSelection {
    /// Build a map-form selection from `(field key, values)` pairs.
    pub fn map<I, K>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, RawValue)>,
        K: Into<String>,
    {
        Self::Map(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Build a list-form selection; each element is a set of
    /// `(field key, values)` pairs.
    pub fn list<I, E, K>(elements: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: IntoIterator<Item = (K, RawValue)>,
        K: Into<String>,
    {
        Self::List(
            elements
                .into_iter()
                .map(|e| e.into_iter().map(|(k, v)| (k.into(), v)).collect())
                .collect(),
        )
    }
}

/// One or more pattern values for a single field key.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    /// A single scalar pattern.
    One(Value),
    /// An ordered list of patterns.
    Many(Vec<Value>),
}

impl RawValue {
    /// A single pattern value.
    pub fn one(value: impl Into<Value>) -> Self {
        Self::One(value.into())
    }

    /// An ordered list of pattern values.
    pub fn many<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::Many(values.into_iter().map(Into::into).collect())
    }

    /// Normalize to the ordered pattern-string list used by the compiler.
    pub(crate) fn patterns(&self) -> Vec<String> {
        match self {
            RawValue::One(v) => vec![v.as_pattern()],
            RawValue::Many(vs) => vs.iter().map(Value::as_pattern).collect(),
        }
    }
}
