#![forbid(unsafe_code)]

//! Field validation.
//!
//! Each field is checked by a short-circuiting chain of rules. Only the first
//! failing rule's message is reported:
//!
//! 1. [`Required`]: required fields must not be empty
//! 2. [`Email`]: email fields must match [`EMAIL_PATTERN`]
//! 3. [`Bounds`]: number fields must respect `min`/`max`
//! 4. [`Custom`]: the descriptor's own hook, if any
//!
//! ```
//! use claras_forms::field::FieldDescriptor;
//! use claras_forms::validation::validate_field;
//! use claras_forms::value::FieldValue;
//!
//! let field = FieldDescriptor::number("pisos").bounds(1.0, 100.0);
//! assert_eq!(
//!     validate_field(&field, &FieldValue::Number(0.0)).as_deref(),
//!     Some("minimum value: 1")
//! );
//! ```

mod validators;

pub use validators::{
    Bounds, Custom, EMAIL_PATTERN, ERROR_CODE_CUSTOM, ERROR_CODE_EMAIL, ERROR_CODE_MAX,
    ERROR_CODE_MIN, ERROR_CODE_REQUIRED, Email, Required, ValidationError, ValidationResult,
    Validator, validate_field, validate_field_with,
};
