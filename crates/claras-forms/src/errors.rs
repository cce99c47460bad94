#![forbid(unsafe_code)]

//! Error types: per-field messages, caller contract violations, and submit
//! failures.

use std::collections::BTreeMap;
use std::fmt;

use crate::field::FieldKind;
use crate::value::FieldValue;

// ---------------------------------------------------------------------------
// FormErrors
// ---------------------------------------------------------------------------

/// Field name to validation message. A missing key means the field is valid.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormErrors {
    errors: BTreeMap<String, String>,
}

impl FormErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.errors.get(name).map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.errors.contains_key(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, message: impl Into<String>) {
        self.errors.insert(name.into(), message.into());
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.errors.remove(name)
    }

    /// Keep only the entries for which `keep` returns true.
    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.errors.retain(|name, _| keep(name));
    }

    pub fn clear(&mut self) {
        self.errors.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Iterate over `(name, message)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.errors.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormErrors {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            errors: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// FieldError
// ---------------------------------------------------------------------------

/// An edit the schema cannot accept.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldError {
    /// No descriptor has this name.
    UnknownField(String),
    /// The value's payload does not fit the field's kind.
    KindMismatch {
        field: String,
        kind: FieldKind,
        value: FieldValue,
    },
    /// `step_number` was called on a field that is not numeric.
    NotNumeric(String),
    /// NaN or an infinity was offered to a number field.
    NonFinite(String),
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownField(name) => write!(f, "unknown field '{name}'"),
            Self::KindMismatch { field, kind, value } => {
                write!(f, "field '{field}' ({kind}) cannot hold {value:?}")
            }
            Self::NotNumeric(name) => write!(f, "field '{name}' is not a number field"),
            Self::NonFinite(name) => write!(f, "field '{name}' cannot hold a non-finite number"),
        }
    }
}

impl std::error::Error for FieldError {}

// ---------------------------------------------------------------------------
// SubmitError
// ---------------------------------------------------------------------------

/// Failure reported by a submit handler.
///
/// The message, when present and not blank, is shown to the user as is.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SubmitError {
    message: Option<String>,
}

impl SubmitError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }

    /// A failure with nothing to tell the user.
    #[must_use]
    pub fn without_message() -> Self {
        Self::default()
    }

    /// The message, if present and not blank.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message
            .as_deref()
            .filter(|m| !m.trim().is_empty())
    }

    /// The message to display, or `fallback`.
    #[must_use]
    pub fn display_message<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.message().unwrap_or(fallback)
    }
}

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.message() {
            Some(m) => write!(f, "submit failed: {m}"),
            None => f.write_str("submit failed"),
        }
    }
}

impl std::error::Error for SubmitError {}

impl From<String> for SubmitError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for SubmitError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}
