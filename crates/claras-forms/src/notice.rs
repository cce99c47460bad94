#![forbid(unsafe_code)]

//! Form-level notices shown after a submit attempt.
//!
//! A success notice dismisses itself once its display window has elapsed.
//! Error notices stay until the user dismisses them or the form is reset.

use std::time::Duration;

use web_time::Instant;

/// What a notice reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoticeKind {
    Success,
    Error,
}

/// A banner attached to the whole form.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    /// When the notice was raised.
    pub raised_at: Instant,
    /// Auto-dismiss window. `None` means persistent until dismissed.
    pub duration: Option<Duration>,
}

impl Notice {
    /// A success notice that expires after `window`.
    pub fn success(message: impl Into<String>, window: Duration, now: Instant) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
            raised_at: now,
            duration: Some(window),
        }
    }

    /// A persistent error banner.
    pub fn error(message: impl Into<String>, now: Instant) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
            raised_at: now,
            duration: None,
        }
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.kind == NoticeKind::Error
    }

    /// Time left before auto-dismissal, as seen at `now`.
    #[must_use]
    pub fn remaining_at(&self, now: Instant) -> Option<Duration> {
        let window = self.duration?;
        Some(window.saturating_sub(now.saturating_duration_since(self.raised_at)))
    }

    /// Whether the display window has elapsed at `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: Instant) -> bool {
        self.remaining_at(now).is_some_and(|left| left.is_zero())
    }
}
