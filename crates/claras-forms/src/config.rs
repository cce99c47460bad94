#![forbid(unsafe_code)]

//! Engine configuration: notice timing and user-facing message templates.
//!
//! Templates use `{key}` placeholders, filled from the parameters of the
//! [`ValidationError`](crate::validation::ValidationError) that produced them.
//!
//! | Template | Parameters |
//! |----------|------------|
//! | `required` | `label` |
//! | `invalid_email` | `label` |
//! | `min` | `label`, `min` |
//! | `max` | `label`, `max` |

use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Environment variable overriding [`FormConfig::success_notice`], in milliseconds.
pub const ENV_NOTICE_MS: &str = "CLARAS_FORMS_NOTICE_MS";

/// Default display window of the success notice.
pub const DEFAULT_SUCCESS_NOTICE: Duration = Duration::from_secs(3);

/// User-facing message templates.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct FormMessages {
    pub required: String,
    pub invalid_email: String,
    pub min: String,
    pub max: String,
    /// Form-level banner when validation blocks a submit.
    pub invalid_form: String,
    /// Fallback banner when a failed submit carries no message.
    pub submit_failed: String,
    /// Success notice after a submit resolves.
    pub saved: String,
}

impl Default for FormMessages {
    fn default() -> Self {
        Self {
            required: "{label} is required".to_string(),
            invalid_email: "invalid email".to_string(),
            min: "minimum value: {min}".to_string(),
            max: "maximum value: {max}".to_string(),
            invalid_form: "please correct the highlighted fields".to_string(),
            submit_failed: "the form could not be saved".to_string(),
            saved: "saved successfully".to_string(),
        }
    }
}

/// Configuration for a [`FormEngine`](crate::engine::FormEngine).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct FormConfig {
    /// How long the success notice stays up. Default: 3s.
    #[cfg_attr(
        feature = "serde",
        serde(rename = "success_notice_ms", with = "duration_ms")
    )]
    pub success_notice: Duration,
    pub messages: FormMessages,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            success_notice: DEFAULT_SUCCESS_NOTICE,
            messages: FormMessages::default(),
        }
    }
}

impl FormConfig {
    /// Defaults, with overrides read from the environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::default().with_env_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup`, which maps variable names to values.
    #[must_use]
    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(raw) = lookup(ENV_NOTICE_MS) {
            match raw.trim().parse::<u64>() {
                Ok(ms) => self.success_notice = Duration::from_millis(ms),
                Err(_) => tracing::warn!(
                    var = ENV_NOTICE_MS,
                    value = %raw,
                    "ignoring unparseable notice duration"
                ),
            }
        }
        self
    }

    #[must_use]
    pub fn success_notice(mut self, window: Duration) -> Self {
        self.success_notice = window;
        self
    }

    #[must_use]
    pub fn messages(mut self, messages: FormMessages) -> Self {
        self.messages = messages;
        self
    }
}

#[cfg(feature = "serde")]
mod duration_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(u64::try_from(value.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
