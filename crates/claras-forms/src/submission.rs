#![forbid(unsafe_code)]

//! Submit bookkeeping with token-based staleness detection.
//!
//! Every accepted submit gets a fresh [`SubmitToken`]. At most one token is in
//! flight at a time. A completion is applied only if its token is still the
//! in-flight one, so a completion delivered twice, or for a token that was
//! never issued, is logged as stale and ignored. Nothing clears the in-flight
//! token except its own completion.
//!
//! # Invariants
//!
//! - Tokens are strictly monotonic; token 0 means "none".
//! - A `Started` event is followed by exactly one of `Succeeded` or `Failed`
//!   for the same token, unless the engine is dropped first.

use std::fmt;

use crate::value::FormValues;

// ---------------------------------------------------------------------------
// SubmitToken
// ---------------------------------------------------------------------------

/// Identifies one submit attempt that reached the handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SubmitToken(u64);

impl SubmitToken {
    /// The null token.
    pub const NONE: Self = Self(0);

    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }

    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for SubmitToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Submit({})", self.0)
    }
}

/// An accepted submit: the token and the payload copied at submit time.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitTicket {
    pub token: SubmitToken,
    pub payload: FormValues,
}

// ---------------------------------------------------------------------------
// Outcome / phase
// ---------------------------------------------------------------------------

/// How a call to `submit` ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Another submit was in flight; nothing happened.
    Skipped,
    /// Validation failed; the handler was not called.
    Invalid,
    /// The handler succeeded.
    Saved,
    /// The handler failed with this display message.
    Failed(String),
    /// The handler finished after the form was reset or dropped; the result
    /// was not applied.
    Discarded,
}

impl SubmitOutcome {
    #[must_use]
    pub fn is_saved(&self) -> bool {
        matches!(self, Self::Saved)
    }
}

/// Coarse submission state for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubmissionPhase {
    Idle,
    Submitting,
    /// Idle, with a notice still showing.
    Settled,
}

// ---------------------------------------------------------------------------
// SubmitEvent / SubmitTrace
// ---------------------------------------------------------------------------

/// An entry in the submission log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitEvent {
    Started { token: SubmitToken, fields: usize },
    /// A submit was ignored because `in_flight` was pending.
    Skipped { in_flight: SubmitToken },
    /// Validation blocked a submit.
    Rejected { errors: usize },
    Succeeded { token: SubmitToken },
    Failed { token: SubmitToken, message: String },
    /// A completion arrived for a token that is no longer in flight.
    StaleDiscarded {
        token: SubmitToken,
        current: SubmitToken,
    },
}

impl SubmitEvent {
    /// Event type name for logging.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::Started { .. } => "started",
            Self::Skipped { .. } => "skipped",
            Self::Rejected { .. } => "rejected",
            Self::Succeeded { .. } => "succeeded",
            Self::Failed { .. } => "failed",
            Self::StaleDiscarded { .. } => "stale_discarded",
        }
    }
}

/// Ordered log of submission events.
#[derive(Debug, Clone, Default)]
pub struct SubmitTrace {
    events: Vec<SubmitEvent>,
}

impl SubmitTrace {
    pub fn push(&mut self, event: SubmitEvent) {
        self.events.push(event);
    }

    #[must_use]
    pub fn events(&self) -> &[SubmitEvent] {
        &self.events
    }

    /// Number of events of the given type.
    #[must_use]
    pub fn count(&self, event_type: &str) -> usize {
        self.events
            .iter()
            .filter(|e| e.event_type() == event_type)
            .count()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Check the trace invariants, returning a description of each violation.
    #[must_use]
    pub fn verify_invariants(&self) -> Vec<String> {
        let mut violations = Vec::new();
        let mut last_started = SubmitToken::NONE;
        let mut open: Option<SubmitToken> = None;

        for event in &self.events {
            match event {
                SubmitEvent::Started { token, .. } => {
                    if *token <= last_started {
                        violations.push(format!(
                            "non-monotonic start token: {token} after {last_started}"
                        ));
                    }
                    last_started = *token;
                    open = Some(*token);
                }
                SubmitEvent::Succeeded { token } | SubmitEvent::Failed { token, .. } => {
                    if open != Some(*token) {
                        violations.push(format!("{token} settled while not in flight"));
                    }
                    open = None;
                }
                SubmitEvent::StaleDiscarded { token, current } if token == current => {
                    violations.push(format!("{token} discarded while current"));
                }
                _ => {}
            }
        }
        violations
    }
}

// ---------------------------------------------------------------------------
// SubmissionTracker
// ---------------------------------------------------------------------------

/// Issues tokens and decides whether completions still apply.
#[derive(Debug, Clone)]
pub struct SubmissionTracker {
    next_token: u64,
    in_flight: Option<SubmitToken>,
    trace: SubmitTrace,
}

impl Default for SubmissionTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl SubmissionTracker {
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_token: 1,
            in_flight: None,
            trace: SubmitTrace::default(),
        }
    }

    /// Start a submit, or return `None` if one is already in flight.
    pub fn start(&mut self, fields: usize) -> Option<SubmitToken> {
        if let Some(in_flight) = self.in_flight {
            self.trace.push(SubmitEvent::Skipped { in_flight });
            return None;
        }
        let token = SubmitToken(self.next_token);
        self.next_token += 1;
        self.in_flight = Some(token);
        self.trace.push(SubmitEvent::Started { token, fields });
        Some(token)
    }

    /// Claim the completion for `token`.
    ///
    /// Returns `true` if `token` was in flight and is now settled. Otherwise
    /// the completion is logged as stale and `false` is returned.
    pub fn finish(&mut self, token: SubmitToken) -> bool {
        if self.in_flight == Some(token) {
            self.in_flight = None;
            true
        } else {
            self.trace.push(SubmitEvent::StaleDiscarded {
                token,
                current: self.in_flight.unwrap_or(SubmitToken::NONE),
            });
            false
        }
    }

    /// Append an event to the trace.
    pub fn record(&mut self, event: SubmitEvent) {
        self.trace.push(event);
    }

    #[must_use]
    pub fn in_flight(&self) -> Option<SubmitToken> {
        self.in_flight
    }

    #[must_use]
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    #[must_use]
    pub fn trace(&self) -> &SubmitTrace {
        &self.trace
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_monotonic() {
        let mut tracker = SubmissionTracker::new();
        let a = tracker.start(2).unwrap();
        assert!(tracker.finish(a));
        let b = tracker.start(2).unwrap();
        assert!(b > a);
        assert!(!a.is_none());
        assert!(tracker.trace().verify_invariants().is_empty());
    }

    #[test]
    fn second_start_is_skipped_while_in_flight() {
        let mut tracker = SubmissionTracker::new();
        let a = tracker.start(1).unwrap();
        assert_eq!(tracker.start(1), None);
        assert_eq!(
            tracker.trace().events().last(),
            Some(&SubmitEvent::Skipped { in_flight: a })
        );
        assert!(tracker.is_in_flight());
    }

    #[test]
    fn repeated_completion_is_stale() {
        let mut tracker = SubmissionTracker::new();
        let a = tracker.start(1).unwrap();
        assert!(tracker.finish(a));
        assert!(!tracker.finish(a));
        assert_eq!(tracker.trace().count("stale_discarded"), 1);

        let b = tracker.start(1).unwrap();
        assert!(!tracker.finish(a));
        assert!(tracker.is_in_flight());
        assert!(tracker.finish(b));
        assert!(tracker.trace().verify_invariants().is_empty());
    }

    #[test]
    fn verify_flags_settle_without_start() {
        let mut trace = SubmitTrace::default();
        trace.push(SubmitEvent::Succeeded {
            token: SubmitToken(4),
        });
        assert_eq!(trace.verify_invariants().len(), 1);
    }
}
