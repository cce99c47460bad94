//! Schema-driven form engine for the Cuentas Claras administration console.
//!
//! Every CRUD page of the console (expenses, buildings, towers, meters,
//! fines, reservations, tickets) is a form described by a list of
//! [`FieldDescriptor`]s. This crate owns what those forms share:
//! building values from initial data, recording edits, validating visible
//! fields, gating an asynchronous submit, and producing a render plan. Drawing
//! and persistence stay with the caller.
//!
//! # Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`field`] | Field descriptors, kinds, widths, input controls |
//! | [`value`] | Typed field values and the form value record |
//! | [`validation`] | Short-circuiting rule chain per field |
//! | [`engine`] | [`FormEngine`], the controller |
//! | [`shared`] | [`SharedFormEngine`], a lock-releasing handle for concurrent edits |
//! | [`submission`] | Submit tokens, outcomes, and the event trace |
//! | [`notice`] | Form-level success and error banners |
//! | [`layout`] | Width grouping of visible fields |
//! | [`view`] | Per-field render plan |
//! | [`config`] | Message templates and timing |
//!
//! # Features
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `serde` | JSON payloads for [`FormValues`] and deserializable [`FormConfig`] |
//!
//! # Example
//!
//! ```
//! use claras_forms::{FieldDescriptor, FormEngine, FormValues, SubmitError, SubmitOutcome};
//!
//! let mut form = FormEngine::initialize(
//!     vec![
//!         FieldDescriptor::text("nombre").required(),
//!         FieldDescriptor::email("email"),
//!     ],
//!     FormValues::new(),
//! );
//! form.set_field_value("nombre", "Casa A").unwrap();
//! form.set_field_value("email", "a@b.com").unwrap();
//!
//! let outcome = pollster::block_on(form.submit(|payload| async move {
//!     assert_eq!(payload.value("nombre").as_text(), Some("Casa A"));
//!     Ok::<_, SubmitError>(())
//! }));
//! assert_eq!(outcome, SubmitOutcome::Saved);
//! ```

#![forbid(unsafe_code)]

pub mod config;
pub mod engine;
pub mod errors;
pub mod field;
pub mod layout;
pub mod notice;
pub mod shared;
pub mod submission;
pub mod validation;
pub mod value;
pub mod view;

pub use config::{FormConfig, FormMessages};
pub use engine::{FormEngine, StepDirection};
pub use errors::{FieldError, FormErrors, SubmitError};
pub use field::{ChoiceOption, FieldDescriptor, FieldKind, FieldWidth, InputControl};
pub use layout::{FieldGroups, group_fields_by_width};
pub use notice::{Notice, NoticeKind};
pub use shared::SharedFormEngine;
pub use submission::{SubmissionPhase, SubmitEvent, SubmitOutcome, SubmitToken};
pub use validation::{validate_field, validate_field_with};
pub use value::{FieldValue, FormValues};
pub use view::FieldView;
