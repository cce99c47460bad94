#![forbid(unsafe_code)]

//! Core validation types and the built-in field rules.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, LazyLock};

use regex::Regex;

use crate::config::FormMessages;
use crate::field::{CustomValidateFn, FieldDescriptor, FieldKind};
use crate::value::FieldValue;

// ---------------------------------------------------------------------------
// Error Codes
// ---------------------------------------------------------------------------

/// Error code for required field validation.
pub const ERROR_CODE_REQUIRED: &str = "required";
/// Error code for email validation.
pub const ERROR_CODE_EMAIL: &str = "email";
/// Error code for a number below its lower bound.
pub const ERROR_CODE_MIN: &str = "min";
/// Error code for a number above its upper bound.
pub const ERROR_CODE_MAX: &str = "max";
/// Error code for caller-supplied rules.
pub const ERROR_CODE_CUSTOM: &str = "custom";

/// Pattern an email value must match.
pub const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

// `None` only if the pattern fails to compile, in which case no email matches.
static EMAIL_RE: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(EMAIL_PATTERN).ok());

// ---------------------------------------------------------------------------
// ValidationError
// ---------------------------------------------------------------------------

/// A failed rule: a stable code plus a message template and its parameters.
///
/// Templates name parameters as `{key}`. Rendering is a single left-to-right
/// pass, so substituted text is never expanded again, and placeholders with
/// no matching parameter are kept verbatim.
///
/// ```
/// use claras_forms::validation::ValidationError;
///
/// let error = ValidationError::new("min", "{label}: minimum value {min}")
///     .with_param("min", 1)
///     .with_param("label", "Pisos {piso}");
/// assert_eq!(error.render(), "Pisos {piso}: minimum value 1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub code: &'static str,
    pub template: String,
    pub params: BTreeMap<String, String>,
}

impl ValidationError {
    #[must_use]
    pub fn new(code: &'static str, template: impl Into<String>) -> Self {
        Self {
            code,
            template: template.into(),
            params: BTreeMap::new(),
        }
    }

    /// Set the value substituted for `{key}`. A later call wins.
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl fmt::Display) -> Self {
        self.params.insert(key.into(), value.to_string());
        self
    }

    /// The message shown to the user.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(self.template.len());
        let mut rest = self.template.as_str();
        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let tail = &rest[open..];
            let resolved = tail.find('}').and_then(|close| {
                self.params
                    .get(&tail[1..close])
                    .map(|value| (value, close + 1))
            });
            match resolved {
                Some((value, consumed)) => {
                    out.push_str(value);
                    rest = &tail[consumed..];
                }
                None => {
                    out.push('{');
                    rest = &tail[1..];
                }
            }
        }
        out.push_str(rest);
        out
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl std::error::Error for ValidationError {}

/// Outcome of one rule. Rules chain with [`Result::and_then`].
pub type ValidationResult = Result<(), ValidationError>;

// ---------------------------------------------------------------------------
// Validator Trait
// ---------------------------------------------------------------------------

/// A rule over values of type `T`.
///
/// ```
/// use claras_forms::validation::{ValidationError, ValidationResult, Validator};
///
/// struct NoSpaces;
///
/// impl Validator<str> for NoSpaces {
///     fn validate(&self, value: &str) -> ValidationResult {
///         if value.contains(' ') {
///             Err(ValidationError::new("no_spaces", "no spaces allowed"))
///         } else {
///             Ok(())
///         }
///     }
/// }
///
/// assert!(NoSpaces.validate("rol-123").is_ok());
/// ```
pub trait Validator<T: ?Sized>: Send + Sync {
    fn validate(&self, value: &T) -> ValidationResult;
}

// ---------------------------------------------------------------------------
// Built-in Validators
// ---------------------------------------------------------------------------

/// Fails on empty values (see [`FieldValue::is_empty`]).
#[derive(Debug, Clone)]
pub struct Required {
    pub message: String,
}

impl Required {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Validator<FieldValue> for Required {
    fn validate(&self, value: &FieldValue) -> ValidationResult {
        if value.is_empty() {
            Err(ValidationError::new(ERROR_CODE_REQUIRED, &self.message))
        } else {
            Ok(())
        }
    }
}

/// Checks non-empty text against [`EMAIL_PATTERN`].
///
/// Empty text is valid; pair with [`Required`] to demand a value.
#[derive(Debug, Clone)]
pub struct Email {
    pub message: String,
}

impl Email {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Validator<str> for Email {
    fn validate(&self, value: &str) -> ValidationResult {
        if value.is_empty() || EMAIL_RE.as_ref().is_some_and(|re| re.is_match(value)) {
            Ok(())
        } else {
            Err(ValidationError::new(ERROR_CODE_EMAIL, &self.message))
        }
    }
}

/// Inclusive numeric bounds; either side may be open.
#[derive(Debug, Clone)]
pub struct Bounds {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub min_message: String,
    pub max_message: String,
}

impl Bounds {
    /// Bounds using the templates from `messages`.
    #[must_use]
    pub fn new(min: Option<f64>, max: Option<f64>, messages: &FormMessages) -> Self {
        Self {
            min,
            max,
            min_message: messages.min.clone(),
            max_message: messages.max.clone(),
        }
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }
}

impl Validator<f64> for Bounds {
    /// NaN and infinities fail whichever bound is set, `min` first.
    fn validate(&self, value: &f64) -> ValidationResult {
        let finite = value.is_finite();
        if let Some(min) = self.min
            && (*value < min || !finite)
        {
            return Err(ValidationError::new(ERROR_CODE_MIN, &self.min_message)
                .with_param("min", min)
                .with_param("actual", value));
        }
        if let Some(max) = self.max
            && (*value > max || !finite)
        {
            return Err(ValidationError::new(ERROR_CODE_MAX, &self.max_message)
                .with_param("max", max)
                .with_param("actual", value));
        }
        Ok(())
    }
}

/// Wraps a caller-supplied hook.
#[derive(Clone)]
pub struct Custom(pub CustomValidateFn);

impl fmt::Debug for Custom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Custom(..)")
    }
}

impl Validator<FieldValue> for Custom {
    fn validate(&self, value: &FieldValue) -> ValidationResult {
        (self.0)(value).map_or(Ok(()), |message| {
            Err(ValidationError::new(ERROR_CODE_CUSTOM, message))
        })
    }
}

// ---------------------------------------------------------------------------
// Field rule chain
// ---------------------------------------------------------------------------

/// Validate one value against its descriptor.
///
/// Rules run in order and stop at the first failure: required, email
/// format, numeric bounds, then the descriptor's custom hook. Every error
/// carries the field label as the `label` parameter.
pub fn validate_field_with(
    field: &FieldDescriptor,
    value: &FieldValue,
    messages: &FormMessages,
) -> ValidationResult {
    required_rule(field, value, messages)
        .and_then(|()| email_rule(field, value, messages))
        .and_then(|()| bounds_rule(field, value, messages))
        .and_then(|()| match &field.validate {
            Some(hook) => Custom(Arc::clone(hook)).validate(value),
            None => Ok(()),
        })
        .map_err(|e| e.with_param("label", field.label_text()))
}

/// Validate with the default messages, returning the rendered error.
#[must_use]
pub fn validate_field(field: &FieldDescriptor, value: &FieldValue) -> Option<String> {
    validate_field_with(field, value, &FormMessages::default())
        .err()
        .map(|e| e.render())
}

fn required_rule(
    field: &FieldDescriptor,
    value: &FieldValue,
    messages: &FormMessages,
) -> ValidationResult {
    if field.required {
        Required::new(&messages.required).validate(value)
    } else {
        Ok(())
    }
}

fn email_rule(
    field: &FieldDescriptor,
    value: &FieldValue,
    messages: &FormMessages,
) -> ValidationResult {
    match (field.kind, value.as_text()) {
        (FieldKind::Email, Some(text)) => Email::new(&messages.invalid_email).validate(text),
        _ => Ok(()),
    }
}

fn bounds_rule(
    field: &FieldDescriptor,
    value: &FieldValue,
    messages: &FormMessages,
) -> ValidationResult {
    if field.kind != FieldKind::Number {
        return Ok(());
    }
    let bounds = Bounds::new(field.min, field.max, messages);
    match value.as_number() {
        Some(n) if !bounds.is_open() => bounds.validate(&n),
        _ => Ok(()),
    }
}
