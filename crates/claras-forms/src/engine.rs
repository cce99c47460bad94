#![forbid(unsafe_code)]

//! The form controller.
//!
//! [`FormEngine`] owns the values, errors, notice and submission state of one
//! form. Every transition is a plain method, so the whole lifecycle can be
//! driven without a rendering environment:
//!
//! ```
//! use claras_forms::engine::FormEngine;
//! use claras_forms::field::FieldDescriptor;
//! use claras_forms::value::FormValues;
//!
//! let mut form = FormEngine::initialize(
//!     vec![FieldDescriptor::text("nombre").required()],
//!     FormValues::new(),
//! );
//! assert!(!form.validate_form());
//! assert_eq!(form.errors().get("nombre"), Some("nombre is required"));
//!
//! form.set_field_value("nombre", "Casa A").unwrap();
//! assert!(form.errors().is_empty());
//! assert!(form.validate_form());
//! ```
//!
//! # Submission
//!
//! [`FormEngine::submit`] validates, copies the values, and awaits the
//! caller's handler. The split form, [`FormEngine::begin_submit`] followed by
//! [`FormEngine::complete_submit`], does the same for callers that run the
//! handler on their own executor. While a submit is in flight every further
//! submit is skipped.

use std::collections::BTreeSet;
use std::fmt;
use std::future::Future;

use tracing::Instrument;
use web_time::Instant;

use crate::config::FormConfig;
use crate::errors::{FieldError, FormErrors, SubmitError};
use crate::field::{FieldDescriptor, FieldKind};
use crate::layout::{FieldGroups, group_fields_by_width};
use crate::notice::Notice;
use crate::submission::{
    SubmissionPhase, SubmissionTracker, SubmitEvent, SubmitOutcome, SubmitTicket, SubmitToken,
    SubmitTrace,
};
use crate::validation::validate_field_with;
use crate::value::{FieldValue, FormValues};
use crate::view::{FieldView, build_views};

/// Callback invoked verbatim when the user cancels.
pub type CancelFn = Box<dyn FnMut() + Send>;

/// Direction for [`FormEngine::step_number`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepDirection {
    Up,
    Down,
}

/// Controller for a single schema-driven form.
pub struct FormEngine {
    fields: Vec<FieldDescriptor>,
    config: FormConfig,
    /// Snapshot produced by `initialize`, restored by `reset`.
    initial: FormValues,
    values: FormValues,
    errors: FormErrors,
    notice: Option<Notice>,
    touched: BTreeSet<String>,
    submissions: SubmissionTracker,
    on_cancel: Option<CancelFn>,
}

impl fmt::Debug for FormEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormEngine")
            .field("fields", &self.fields.len())
            .field("values", &self.values)
            .field("errors", &self.errors)
            .field("notice", &self.notice)
            .field("in_flight", &self.submissions.in_flight())
            .finish_non_exhaustive()
    }
}

impl FormEngine {
    /// Build a form from its schema and the caller's initial data, using the
    /// default configuration.
    pub fn initialize(fields: Vec<FieldDescriptor>, initial_data: FormValues) -> Self {
        Self::with_config(fields, initial_data, FormConfig::default())
    }

    /// Build a form with an explicit configuration.
    ///
    /// Each field takes its value from `initial_data`, then from its default,
    /// then from its kind's empty value. Values of the wrong shape are coerced
    /// when possible; otherwise the next source is used.
    pub fn with_config(
        fields: Vec<FieldDescriptor>,
        initial_data: FormValues,
        config: FormConfig,
    ) -> Self {
        let initial: FormValues = fields
            .iter()
            .map(|field| (field.name.clone(), initial_value(field, &initial_data)))
            .collect();
        tracing::debug!(fields = fields.len(), "form initialized");
        Self {
            fields,
            config,
            values: initial.clone(),
            initial,
            errors: FormErrors::new(),
            notice: None,
            touched: BTreeSet::new(),
            submissions: SubmissionTracker::new(),
            on_cancel: None,
        }
    }

    /// Set the callback run by [`FormEngine::cancel`].
    #[must_use]
    pub fn on_cancel(mut self, f: impl FnMut() + Send + 'static) -> Self {
        self.on_cancel = Some(Box::new(f));
        self
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    #[must_use]
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    #[must_use]
    pub fn config(&self) -> &FormConfig {
        &self.config
    }

    #[must_use]
    pub fn values(&self) -> &FormValues {
        &self.values
    }

    /// The values produced by `initialize`.
    #[must_use]
    pub fn initial_values(&self) -> &FormValues {
        &self.initial
    }

    #[must_use]
    pub fn value(&self, name: &str) -> &FieldValue {
        self.values.value(name)
    }

    #[must_use]
    pub fn errors(&self) -> &FormErrors {
        &self.errors
    }

    /// The current form-level notice, if any.
    #[must_use]
    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// The submission event log.
    #[must_use]
    pub fn trace(&self) -> &SubmitTrace {
        self.submissions.trace()
    }

    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.submissions.is_in_flight()
    }

    #[must_use]
    pub fn phase(&self) -> SubmissionPhase {
        if self.submissions.is_in_flight() {
            SubmissionPhase::Submitting
        } else if self.notice.is_some() {
            SubmissionPhase::Settled
        } else {
            SubmissionPhase::Idle
        }
    }

    // -------------------------------------------------------------------------
    // Editing
    // -------------------------------------------------------------------------

    /// Record an edit.
    ///
    /// Clears the field's error without re-validating, and drops errors of
    /// fields the edit has hidden. Edits are accepted while a submit is in
    /// flight; they go into the next submit's payload. NaN and infinities
    /// are refused with [`FieldError::NonFinite`].
    pub fn set_field_value(
        &mut self,
        name: &str,
        value: impl Into<FieldValue>,
    ) -> Result<(), FieldError> {
        let value = value.into();
        let kind = self
            .field(name)
            .map(|f| f.kind)
            .ok_or_else(|| FieldError::UnknownField(name.to_string()))?;
        if !kind.accepts(&value) {
            return Err(FieldError::KindMismatch {
                field: name.to_string(),
                kind,
                value,
            });
        }
        if value.as_number().is_some_and(|n| !n.is_finite()) {
            return Err(FieldError::NonFinite(name.to_string()));
        }

        self.values.insert(name, value);
        if self.errors.remove(name).is_some() {
            tracing::debug!(field = name, "field edited, error cleared");
        } else {
            tracing::debug!(field = name, "field edited");
        }
        self.prune_hidden_errors();
        Ok(())
    }

    /// Increment or decrement a number field by its step, clamped to its
    /// bounds. An unset value starts from `min`, or zero.
    pub fn step_number(&mut self, name: &str, direction: StepDirection) -> Result<(), FieldError> {
        let field = self
            .field(name)
            .ok_or_else(|| FieldError::UnknownField(name.to_string()))?;
        if field.kind != FieldKind::Number {
            return Err(FieldError::NotNumeric(name.to_string()));
        }

        let next = match (self.values.value(name).as_number(), direction) {
            (Some(v), StepDirection::Up) => v + field.step,
            (Some(v), StepDirection::Down) => v - field.step,
            (None, _) => field.min.unwrap_or(0.0),
        };
        let next = field.min.map_or(next, |m| next.max(m));
        let next = field.max.map_or(next, |m| next.min(m));
        self.set_field_value(name, next)
    }

    /// Mark a field as touched (focused, then left).
    pub fn mark_touched(&mut self, name: &str) {
        if self.field(name).is_some() {
            self.touched.insert(name.to_string());
        }
    }

    #[must_use]
    pub fn is_touched(&self, name: &str) -> bool {
        self.touched.contains(name)
    }

    /// Touched field names, in schema order.
    #[must_use]
    pub fn touched_fields(&self) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|f| self.touched.contains(&f.name))
            .map(|f| f.name.as_str())
            .collect()
    }

    /// Whether the field's value differs from the initial snapshot.
    #[must_use]
    pub fn is_dirty(&self, name: &str) -> bool {
        self.values.value(name) != self.initial.value(name)
    }

    /// Dirty field names, in schema order.
    #[must_use]
    pub fn dirty_fields(&self) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|f| self.is_dirty(&f.name))
            .map(|f| f.name.as_str())
            .collect()
    }

    /// No field touched and no value changed.
    #[must_use]
    pub fn is_pristine(&self) -> bool {
        self.touched.is_empty() && self.values == self.initial
    }

    // -------------------------------------------------------------------------
    // Validation
    // -------------------------------------------------------------------------

    /// Validate one value against a descriptor with this form's messages.
    #[must_use]
    pub fn validate_field(&self, field: &FieldDescriptor, value: &FieldValue) -> Option<String> {
        validate_field_with(field, value, &self.config.messages)
            .err()
            .map(|e| e.render())
    }

    /// Validate every visible field, replacing the error set.
    ///
    /// Returns `true` when no visible field fails.
    pub fn validate_form(&mut self) -> bool {
        let mut errors = FormErrors::new();
        for field in self.fields.iter().filter(|f| f.is_visible(&self.values)) {
            let result =
                validate_field_with(field, self.values.value(&field.name), &self.config.messages);
            if let Err(error) = result {
                errors.insert(&field.name, error.render());
            }
        }
        tracing::debug!(errors = errors.len(), "form validated");
        let valid = errors.is_empty();
        self.errors = errors;
        valid
    }

    fn prune_hidden_errors(&mut self) {
        let fields = &self.fields;
        let values = &self.values;
        self.errors.retain(|name| {
            fields
                .iter()
                .find(|f| f.name == name)
                .is_some_and(|f| f.is_visible(values))
        });
    }

    // -------------------------------------------------------------------------
    // Submission
    // -------------------------------------------------------------------------

    /// Validate and submit through `handler`.
    ///
    /// The handler receives a copy of the values taken before the await.
    /// Its failure becomes an error notice and is never propagated.
    pub async fn submit<F, Fut, T>(&mut self, handler: F) -> SubmitOutcome
    where
        F: FnOnce(FormValues) -> Fut,
        Fut: Future<Output = Result<T, SubmitError>>,
    {
        let ticket = match self.begin_submit() {
            Ok(ticket) => ticket,
            Err(outcome) => return outcome,
        };
        let span = tracing::info_span!(
            "form.submit",
            token = ticket.token.raw(),
            fields = ticket.payload.len()
        );
        let result = handler(ticket.payload).instrument(span).await;
        self.complete_submit(ticket.token, result)
    }

    /// First half of a submit: check the in-flight flag, validate, and copy
    /// the payload.
    ///
    /// `Err` carries the outcome of a submit that never reaches the handler:
    /// [`SubmitOutcome::Skipped`] or [`SubmitOutcome::Invalid`].
    pub fn begin_submit(&mut self) -> Result<SubmitTicket, SubmitOutcome> {
        if let Some(in_flight) = self.submissions.in_flight() {
            tracing::debug!(%in_flight, "submit ignored while another is pending");
            self.submissions.record(SubmitEvent::Skipped { in_flight });
            return Err(SubmitOutcome::Skipped);
        }

        if !self.validate_form() {
            self.submissions.record(SubmitEvent::Rejected {
                errors: self.errors.len(),
            });
            self.notice = Some(Notice::error(
                self.config.messages.invalid_form.clone(),
                Instant::now(),
            ));
            return Err(SubmitOutcome::Invalid);
        }

        let Some(token) = self.submissions.start(self.values.len()) else {
            return Err(SubmitOutcome::Skipped);
        };
        self.notice = None;
        tracing::info!(%token, "submit started");
        Ok(SubmitTicket {
            token,
            payload: self.values.clone(),
        })
    }

    /// Second half of a submit: apply the handler's result.
    pub fn complete_submit<T>(
        &mut self,
        token: SubmitToken,
        result: Result<T, SubmitError>,
    ) -> SubmitOutcome {
        self.complete_submit_at(token, result, Instant::now())
    }

    /// [`FormEngine::complete_submit`] with an explicit clock reading.
    pub fn complete_submit_at<T>(
        &mut self,
        token: SubmitToken,
        result: Result<T, SubmitError>,
        now: Instant,
    ) -> SubmitOutcome {
        if !self.submissions.finish(token) {
            tracing::debug!(%token, "stale submit result discarded");
            return SubmitOutcome::Discarded;
        }

        match result {
            Ok(_) => {
                self.submissions.record(SubmitEvent::Succeeded { token });
                self.notice = Some(Notice::success(
                    self.config.messages.saved.clone(),
                    self.config.success_notice,
                    now,
                ));
                tracing::info!(%token, "submit succeeded");
                SubmitOutcome::Saved
            }
            Err(err) => {
                let message = err
                    .display_message(&self.config.messages.submit_failed)
                    .to_string();
                self.submissions.record(SubmitEvent::Failed {
                    token,
                    message: message.clone(),
                });
                self.notice = Some(Notice::error(message.clone(), now));
                tracing::warn!(%token, error = %err, "submit failed");
                SubmitOutcome::Failed(message)
            }
        }
    }

    // -------------------------------------------------------------------------
    // Notices
    // -------------------------------------------------------------------------

    /// Expire the success notice if its window has elapsed.
    pub fn tick(&mut self) -> bool {
        self.tick_at(Instant::now())
    }

    /// [`FormEngine::tick`] with an explicit clock reading. Returns `true` if a
    /// notice was removed.
    pub fn tick_at(&mut self, now: Instant) -> bool {
        if self.notice.as_ref().is_some_and(|n| n.is_expired_at(now)) {
            self.notice = None;
            tracing::debug!("notice expired");
            return true;
        }
        false
    }

    /// Remove the current notice.
    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    // -------------------------------------------------------------------------
    // Reset / cancel
    // -------------------------------------------------------------------------

    /// Restore the initial values and clear errors, notices and touched state.
    ///
    /// A pending submit is not cancelled: it stays in flight, further submits
    /// are skipped until it settles, and its result is applied as usual.
    pub fn reset(&mut self) {
        self.values = self.initial.clone();
        self.errors.clear();
        self.notice = None;
        self.touched.clear();
        tracing::debug!(in_flight = self.submissions.is_in_flight(), "form reset");
    }

    /// Run the cancel callback, then reset.
    pub fn cancel(&mut self) {
        if let Some(on_cancel) = self.on_cancel.as_mut() {
            on_cancel();
        }
        self.reset();
    }

    // -------------------------------------------------------------------------
    // Layout
    // -------------------------------------------------------------------------

    /// Visible fields grouped by width.
    #[must_use]
    pub fn groups(&self) -> FieldGroups<'_> {
        group_fields_by_width(&self.fields, &self.values)
    }

    /// Render plan for the visible fields.
    #[must_use]
    pub fn views(&self) -> Vec<FieldView<'_>> {
        build_views(&self.fields, &self.values, &self.errors)
    }
}

/// Resolve a field's starting value from the initial data, its default, or
/// its kind's empty value.
fn initial_value(field: &FieldDescriptor, initial_data: &FormValues) -> FieldValue {
    let shape = field.kind.shape();
    let sources = [
        ("initial", initial_data.get(&field.name)),
        ("default", field.default_value.as_ref()),
    ];
    for (source, candidate) in sources {
        let Some(candidate) = candidate else {
            continue;
        };
        if matches!(candidate, FieldValue::Unset) {
            continue;
        }
        match candidate.clone().coerce(shape) {
            Some(FieldValue::Unset) => {}
            Some(value) => return value,
            None => tracing::warn!(
                field = %field.name,
                kind = %field.kind,
                source,
                value = ?candidate,
                "value does not fit field kind, ignoring"
            ),
        }
    }
    field.kind.empty_value()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use super::*;
    use crate::field::FieldWidth;
    use crate::notice::NoticeKind;

    fn edificio() -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor::text("nombre").label("Nombre").required(),
            FieldDescriptor::email("email"),
            FieldDescriptor::number("pisos")
                .bounds(1.0, 60.0)
                .default_value(5.0)
                .width(FieldWidth::Half),
            FieldDescriptor::checkbox("ascensor").width(FieldWidth::Half),
            FieldDescriptor::text("motivo_inactivo")
                .required()
                .show_if(|v| v.value("activo").as_text() == Some("no")),
            FieldDescriptor::radio("activo", [("si", "Sí"), ("no", "No")]).default_value("si"),
        ]
    }

    // -- initialize --

    #[test]
    fn initialize_merges_initial_data_defaults_and_empties() {
        let form = FormEngine::initialize(edificio(), FormValues::new().with("nombre", "Torre A"));
        assert_eq!(form.value("nombre"), &FieldValue::text("Torre A"));
        assert_eq!(form.value("email"), &FieldValue::text(""));
        assert_eq!(form.value("pisos"), &FieldValue::Number(5.0));
        assert_eq!(form.value("ascensor"), &FieldValue::Bool(false));
        assert_eq!(form.value("activo"), &FieldValue::text("si"));
        assert_eq!(form.values().len(), 6);
    }

    #[test]
    fn initialize_prefers_initial_data_over_default() {
        let form = FormEngine::initialize(edificio(), FormValues::new().with("pisos", 12.0));
        assert_eq!(form.value("pisos"), &FieldValue::Number(12.0));
    }

    #[test]
    fn initialize_coerces_or_falls_back() {
        let data = FormValues::new()
            .with("pisos", "20")
            .with("ascensor", "true")
            .with("activo", FieldValue::Unset);
        let form = FormEngine::initialize(edificio(), data);
        assert_eq!(form.value("pisos"), &FieldValue::Number(20.0));
        assert_eq!(form.value("ascensor"), &FieldValue::Bool(true));
        assert_eq!(form.value("activo"), &FieldValue::text("si"));

        let form = FormEngine::initialize(edificio(), FormValues::new().with("pisos", "muchos"));
        assert_eq!(form.value("pisos"), &FieldValue::Number(5.0));
    }

    #[test]
    fn initialize_ignores_keys_outside_schema() {
        let form = FormEngine::initialize(edificio(), FormValues::new().with("id", 7i64));
        assert!(form.values().get("id").is_none());
    }

    // -- set_field_value --

    #[test]
    fn edit_clears_only_that_error() {
        let mut form = FormEngine::initialize(
            vec![
                FieldDescriptor::text("a").required(),
                FieldDescriptor::text("b").required(),
            ],
            FormValues::new(),
        );
        assert!(!form.validate_form());
        assert_eq!(form.errors().len(), 2);

        form.set_field_value("a", "").unwrap();
        assert!(!form.errors().contains("a"));
        assert!(form.errors().contains("b"));
    }

    #[test]
    fn edit_rejects_unknown_field_and_wrong_kind() {
        let mut form = FormEngine::initialize(edificio(), FormValues::new());
        assert_eq!(
            form.set_field_value("nope", "x"),
            Err(FieldError::UnknownField("nope".into()))
        );
        assert!(matches!(
            form.set_field_value("pisos", "diez"),
            Err(FieldError::KindMismatch { .. })
        ));
        assert_eq!(form.value("pisos"), &FieldValue::Number(5.0));
        form.set_field_value("pisos", FieldValue::Unset).unwrap();
        assert_eq!(form.value("pisos"), &FieldValue::Unset);
    }

    #[test]
    fn edit_rejects_non_finite_numbers() {
        let mut form = FormEngine::initialize(edificio(), FormValues::new().with("nombre", "X"));
        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert_eq!(
                form.set_field_value("pisos", bad),
                Err(FieldError::NonFinite("pisos".into()))
            );
        }
        assert_eq!(form.value("pisos"), &FieldValue::Number(5.0));
        assert!(form.validate_form());
    }

    #[test]
    fn non_finite_initial_data_falls_back_to_default() {
        let form = FormEngine::initialize(edificio(), FormValues::new().with("pisos", f64::NAN));
        assert_eq!(form.value("pisos"), &FieldValue::Number(5.0));
    }

    #[test]
    fn hiding_a_field_drops_its_error() {
        let mut form = FormEngine::initialize(edificio(), FormValues::new().with("nombre", "X"));
        form.set_field_value("activo", "no").unwrap();
        assert!(!form.validate_form());
        assert!(form.errors().contains("motivo_inactivo"));

        form.set_field_value("activo", "si").unwrap();
        assert!(!form.errors().contains("motivo_inactivo"));
        assert!(form.validate_form());
    }

    // -- step_number --

    #[test]
    fn step_number_clamps_to_bounds() {
        let mut form = FormEngine::initialize(edificio(), FormValues::new().with("pisos", 59.0));
        form.step_number("pisos", StepDirection::Up).unwrap();
        assert_eq!(form.value("pisos"), &FieldValue::Number(60.0));
        form.step_number("pisos", StepDirection::Up).unwrap();
        assert_eq!(form.value("pisos"), &FieldValue::Number(60.0));

        form.set_field_value("pisos", FieldValue::Unset).unwrap();
        form.step_number("pisos", StepDirection::Down).unwrap();
        assert_eq!(form.value("pisos"), &FieldValue::Number(1.0));
        form.step_number("pisos", StepDirection::Down).unwrap();
        assert_eq!(form.value("pisos"), &FieldValue::Number(1.0));

        assert_eq!(
            form.step_number("nombre", StepDirection::Up),
            Err(FieldError::NotNumeric("nombre".into()))
        );
    }

    // -- dirty / touched --

    #[test]
    fn dirty_and_touched_tracking() {
        let mut form = FormEngine::initialize(edificio(), FormValues::new());
        assert!(form.is_pristine());

        form.mark_touched("email");
        form.mark_touched("ghost");
        assert_eq!(form.touched_fields(), vec!["email"]);
        assert!(!form.is_pristine());

        form.set_field_value("nombre", "Torre B").unwrap();
        assert!(form.is_dirty("nombre"));
        assert_eq!(form.dirty_fields(), vec!["nombre"]);

        form.set_field_value("nombre", "").unwrap();
        assert!(!form.is_dirty("nombre"));

        form.reset();
        assert!(form.is_pristine());
    }

    // -- submission --

    #[test]
    fn invalid_submit_sets_banner_and_skips_handler() {
        let calls = AtomicUsize::new(0);
        let mut form = FormEngine::initialize(edificio(), FormValues::new());
        let outcome = pollster::block_on(form.submit(|_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok::<_, SubmitError>(()) }
        }));
        assert_eq!(outcome, SubmitOutcome::Invalid);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        let notice = form.notice().unwrap();
        assert_eq!(notice.kind, NoticeKind::Error);
        assert_eq!(notice.message, "please correct the highlighted fields");
        assert_eq!(form.trace().count("rejected"), 1);
    }

    #[test]
    fn begin_submit_twice_is_skipped() {
        let mut form = FormEngine::initialize(edificio(), FormValues::new().with("nombre", "X"));
        let ticket = form.begin_submit().unwrap();
        assert_eq!(form.phase(), SubmissionPhase::Submitting);
        assert_eq!(form.begin_submit(), Err(SubmitOutcome::Skipped));
        assert_eq!(
            form.complete_submit(ticket.token, Ok::<_, SubmitError>(())),
            SubmitOutcome::Saved
        );
        assert_eq!(form.phase(), SubmissionPhase::Settled);
        assert!(form.trace().verify_invariants().is_empty());
    }

    #[test]
    fn failed_submit_keeps_values_and_uses_message() {
        let mut form = FormEngine::initialize(edificio(), FormValues::new().with("nombre", "X"));
        let outcome = pollster::block_on(
            form.submit(|_| async { Err::<(), _>(SubmitError::new("nombre duplicado")) }),
        );
        assert_eq!(outcome, SubmitOutcome::Failed("nombre duplicado".into()));
        assert_eq!(form.value("nombre"), &FieldValue::text("X"));
        assert!(!form.is_submitting());

        let outcome = pollster::block_on(
            form.submit(|_| async { Err::<(), _>(SubmitError::without_message()) }),
        );
        assert_eq!(
            outcome,
            SubmitOutcome::Failed("the form could not be saved".into())
        );
    }

    #[test]
    fn success_notice_expires_after_window() {
        let config = FormConfig::default().success_notice(Duration::from_secs(2));
        let mut form = FormEngine::with_config(
            edificio(),
            FormValues::new().with("nombre", "X"),
            config,
        );
        let t0 = Instant::now();
        let ticket = form.begin_submit().unwrap();
        form.complete_submit_at(ticket.token, Ok::<_, SubmitError>(()), t0);
        assert_eq!(form.notice().map(|n| n.kind), Some(NoticeKind::Success));

        assert!(!form.tick_at(t0 + Duration::from_secs(1)));
        assert!(form.notice().is_some());
        assert!(form.tick_at(t0 + Duration::from_secs(2)));
        assert!(form.notice().is_none());
        assert_eq!(form.phase(), SubmissionPhase::Idle);
    }

    #[test]
    fn reset_keeps_pending_submit_in_flight() {
        let mut form = FormEngine::initialize(edificio(), FormValues::new().with("nombre", "X"));
        let ticket = form.begin_submit().unwrap();
        form.reset();
        assert!(form.is_submitting());
        assert_eq!(form.phase(), SubmissionPhase::Submitting);

        form.set_field_value("nombre", "Y").unwrap();
        assert_eq!(form.begin_submit(), Err(SubmitOutcome::Skipped));

        assert_eq!(
            form.complete_submit(ticket.token, Ok::<_, SubmitError>(())),
            SubmitOutcome::Saved
        );
        assert_eq!(form.notice().map(|n| n.kind), Some(NoticeKind::Success));
        assert_eq!(form.trace().count("started"), 1);
        assert!(form.trace().verify_invariants().is_empty());
    }

    #[test]
    fn cancel_while_pending_does_not_open_a_second_submit() {
        let mut form = FormEngine::initialize(edificio(), FormValues::new().with("nombre", "X"));
        let ticket = form.begin_submit().unwrap();
        form.cancel();
        assert_eq!(form.begin_submit(), Err(SubmitOutcome::Skipped));
        assert_eq!(
            form.complete_submit(ticket.token, Err::<(), _>(SubmitError::new("conflicto"))),
            SubmitOutcome::Failed("conflicto".into())
        );
        assert!(form.begin_submit().is_ok());
    }

    #[test]
    fn cancel_invokes_callback_and_resets() {
        let cancelled = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&cancelled);
        let mut form = FormEngine::initialize(edificio(), FormValues::new())
            .on_cancel(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        form.set_field_value("nombre", "borrador").unwrap();
        form.cancel();
        assert_eq!(cancelled.load(Ordering::SeqCst), 1);
        assert_eq!(form.values(), form.initial_values());
    }

    // -- layout --

    #[test]
    fn groups_and_views_follow_visibility() {
        let mut form = FormEngine::initialize(edificio(), FormValues::new());
        assert_eq!(
            form.groups().names(FieldWidth::Full),
            vec!["nombre", "email", "activo"]
        );
        form.set_field_value("activo", "no").unwrap();
        assert_eq!(
            form.groups().names(FieldWidth::Full),
            vec!["nombre", "email", "motivo_inactivo", "activo"]
        );
        assert_eq!(form.views().len(), 6);
        assert_eq!(form.groups().names(FieldWidth::Half), vec!["pisos", "ascensor"]);
    }
}
