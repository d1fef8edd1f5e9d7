//! Fallback eligibility rules.
//!
//! A failed attempt may move on to the next model of its chain only when the
//! failure looks transient: throttling, overload or a server-side error.
//! Anything else (bad request, auth failure, unknown model) stops the chain.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// HTTP statuses that make a failure fallbackable by default.
pub const DEFAULT_FALLBACK_STATUSES: [u16; 6] = [429, 500, 502, 503, 504, 529];

/// Message fragments (matched case-insensitively) that make a failure
/// fallbackable by default.
pub const DEFAULT_FALLBACK_KEYWORDS: [&str; 6] = [
    "rate limit",
    "overloaded",
    "capacity",
    "timeout",
    "quota",
    "unavailable",
];

/// Pause before each fallback attempt.
pub const DEFAULT_COOLDOWN: Duration = Duration::from_millis(600);

/// Tunable fallback policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FallbackPolicy {
    pub statuses: Vec<u16>,
    pub keywords: Vec<String>,
    pub cooldown: Duration,
}

impl Default for FallbackPolicy {
    fn default() -> Self {
        Self {
            statuses: DEFAULT_FALLBACK_STATUSES.to_vec(),
            keywords: DEFAULT_FALLBACK_KEYWORDS
                .iter()
                .map(|k| k.to_string())
                .collect(),
            cooldown: DEFAULT_COOLDOWN,
        }
    }
}

impl FallbackPolicy {
    pub fn with_cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = cooldown;
        self
    }

    /// Whether a failure with this status and message should try the next model.
    pub fn is_fallbackable(&self, status: Option<u16>, message: &str) -> bool {
        if let Some(status) = status {
            if self.statuses.contains(&status) {
                return true;
            }
        }

        let lower = message.to_lowercase();
        self.keywords
            .iter()
            .any(|keyword| lower.contains(&keyword.to_lowercase()))
    }
}
