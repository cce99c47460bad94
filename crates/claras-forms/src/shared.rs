#![forbid(unsafe_code)]

//! Cloneable handle around a [`FormEngine`].
//!
//! [`FormEngine::submit`] holds `&mut self` across the handler's await, so
//! nothing else can touch the form meanwhile. [`SharedFormEngine`] locks only
//! for the begin and complete steps. While the handler runs, other handles can
//! keep editing, and a second submit is skipped. Edits made during the await go
//! into the next payload.
//!
//! [`SharedFormEngine::submit`] consumes its handle and keeps only a weak
//! reference across the await. If every other handle is dropped before the
//! handler resolves (the page was torn down), the result is discarded.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::Instrument;

use crate::engine::FormEngine;
use crate::errors::{FieldError, SubmitError};
use crate::submission::SubmitOutcome;
use crate::value::{FieldValue, FormValues};

/// Thread-safe handle to a form engine.
#[derive(Debug)]
pub struct SharedFormEngine {
    inner: Arc<Mutex<FormEngine>>,
}

impl Clone for SharedFormEngine {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl From<FormEngine> for SharedFormEngine {
    fn from(engine: FormEngine) -> Self {
        Self::new(engine)
    }
}

impl SharedFormEngine {
    pub fn new(engine: FormEngine) -> Self {
        Self {
            inner: Arc::new(Mutex::new(engine)),
        }
    }

    /// Lock the engine for direct access.
    ///
    /// Do not hold the guard across an await.
    pub fn lock(&self) -> MutexGuard<'_, FormEngine> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` with the engine locked.
    pub fn with<R>(&self, f: impl FnOnce(&mut FormEngine) -> R) -> R {
        f(&mut self.lock())
    }

    pub fn set_field_value(
        &self,
        name: &str,
        value: impl Into<FieldValue>,
    ) -> Result<(), FieldError> {
        self.lock().set_field_value(name, value)
    }

    /// Snapshot of the current values.
    #[must_use]
    pub fn values(&self) -> FormValues {
        self.lock().values().clone()
    }

    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.lock().is_submitting()
    }

    pub fn reset(&self) {
        self.lock().reset();
    }

    pub fn cancel(&self) {
        self.lock().cancel();
    }

    /// Validate and submit through `handler` without holding the lock while
    /// it runs.
    pub async fn submit<F, Fut, T>(self, handler: F) -> SubmitOutcome
    where
        F: FnOnce(FormValues) -> Fut,
        Fut: Future<Output = Result<T, SubmitError>>,
    {
        let ticket = match self.lock().begin_submit() {
            Ok(ticket) => ticket,
            Err(outcome) => return outcome,
        };
        let weak = Arc::downgrade(&self.inner);
        drop(self);

        let span = tracing::info_span!(
            "form.submit",
            token = ticket.token.raw(),
            fields = ticket.payload.len()
        );
        let result = handler(ticket.payload).instrument(span).await;

        let Some(inner) = weak.upgrade() else {
            tracing::debug!(token = %ticket.token, "form dropped before submit resolved");
            return SubmitOutcome::Discarded;
        };
        let mut engine = inner.lock().unwrap_or_else(PoisonError::into_inner);
        engine.complete_submit(ticket.token, result)
    }
}
