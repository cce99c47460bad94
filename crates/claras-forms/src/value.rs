#![forbid(unsafe_code)]

//! Field values and the form value record.
//!
//! A [`FieldValue`] is a tagged union over the payloads a field can hold. Each
//! [`FieldKind`](crate::field::FieldKind) accepts exactly one payload shape plus
//! [`FieldValue::Unset`], so a boolean never lands in an email field.

use std::collections::BTreeMap;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// ValueShape
// ---------------------------------------------------------------------------

/// The payload shape a field kind stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueShape {
    /// Free or constrained text (also dates and choice values).
    Text,
    /// A floating point number.
    Number,
    /// A toggle.
    Bool,
}

// ---------------------------------------------------------------------------
// FieldValue
// ---------------------------------------------------------------------------

/// The current value of a single field.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(untagged))]
pub enum FieldValue {
    /// No value. Serialized as `null`.
    #[default]
    Unset,
    Bool(bool),
    Number(f64),
    Text(String),
}

static UNSET: FieldValue = FieldValue::Unset;

impl FieldValue {
    /// Create a text value.
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// The shape of the payload, or `None` for [`FieldValue::Unset`].
    #[must_use]
    pub fn shape(&self) -> Option<ValueShape> {
        match self {
            Self::Unset => None,
            Self::Text(_) => Some(ValueShape::Text),
            Self::Number(_) => Some(ValueShape::Number),
            Self::Bool(_) => Some(ValueShape::Bool),
        }
    }

    /// Borrow the text payload.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Whether the value counts as empty for the required rule.
    ///
    /// Blank text, an unticked toggle and a non-finite number are empty.
    /// Finite numbers never are, zero included.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Unset => true,
            Self::Text(s) => s.trim().is_empty(),
            Self::Bool(b) => !b,
            Self::Number(n) => !n.is_finite(),
        }
    }

    /// Convert the value into the given shape.
    ///
    /// Returns `None` when the payload cannot be represented in `shape`.
    /// `Unset` always converts to itself.
    #[must_use]
    pub fn coerce(self, shape: ValueShape) -> Option<Self> {
        match (self, shape) {
            (Self::Unset, _) => Some(Self::Unset),
            (Self::Number(n), ValueShape::Number) => n.is_finite().then_some(Self::Number(n)),
            (v @ Self::Text(_), ValueShape::Text) | (v @ Self::Bool(_), ValueShape::Bool) => {
                Some(v)
            }
            (Self::Text(s), ValueShape::Number) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Some(Self::Unset);
                }
                trimmed.parse::<f64>().ok().filter(|n| n.is_finite()).map(Self::Number)
            }
            (Self::Text(s), ValueShape::Bool) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "on" => Some(Self::Bool(true)),
                "false" | "0" | "off" | "" => Some(Self::Bool(false)),
                _ => None,
            },
            (Self::Number(n), ValueShape::Text) => Some(Self::Text(n.to_string())),
            (Self::Bool(b), ValueShape::Text) => Some(Self::Text(b.to_string())),
            (Self::Number(_), ValueShape::Bool) | (Self::Bool(_), ValueShape::Number) => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unset => Ok(()),
            Self::Text(s) => f.write_str(s),
            Self::Number(n) => write!(f, "{n}"),
            Self::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

// ---------------------------------------------------------------------------
// FormValues
// ---------------------------------------------------------------------------

/// Field name to value mapping, iterated in name order.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct FormValues {
    values: BTreeMap<String, FieldValue>,
}

impl FormValues {
    /// Create an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Insert or replace a value, returning the previous one.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: impl Into<FieldValue>,
    ) -> Option<FieldValue> {
        self.values.insert(name.into(), value.into())
    }

    /// The stored value, if the key is present.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    /// The stored value, or [`FieldValue::Unset`] when the key is absent.
    #[must_use]
    pub fn value(&self, name: &str) -> &FieldValue {
        self.values.get(name).unwrap_or(&UNSET)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<FieldValue> {
        self.values.remove(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over `(name, value)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Render the record as the flat JSON object the backend expects.
    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

impl<K, V> FromIterator<(K, V)> for FormValues
where
    K: Into<String>,
    V: Into<FieldValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
