//! Call span model.

use crate::catalog::Provider;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a span. `Pending` is the only non-terminal state.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SpanStatus {
    Pending,
    /// Succeeded on the first attempt of a call
    Ok,
    /// Succeeded on a later attempt of a call
    Fallback,
    Error,
    /// The caller cancelled the call while this attempt was in flight
    Cancelled,
}

impl SpanStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SpanStatus::Pending)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, SpanStatus::Ok | SpanStatus::Fallback)
    }
}

/// How an attempt ended. Passed to [`crate::trace::SpanRecorder::finalize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpanOutcome {
    Ok { tokens: Option<u64> },
    Fallback { tokens: Option<u64> },
    Error { message: String },
    Cancelled,
}

/// One timed record of a single attempted call to one model.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CallSpan {
    /// Sequential id, unique within a session
    pub id: u64,
    /// Phase description, e.g. "Interview · Q3 of 6"
    pub label: String,
    pub model_label: String,
    pub provider: Provider,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub duration_ms: Option<i64>,
    pub status: SpanStatus,
    pub is_fallback: bool,
    /// Token usage reported by the vendor, when it reported any
    pub tokens: Option<u64>,
    /// Failure message; only set when `status` is `Error`
    pub error: Option<String>,
}

impl CallSpan {
    pub(crate) fn pending(
        id: u64,
        label: String,
        model_label: String,
        provider: Provider,
        start_time: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            label,
            model_label,
            provider,
            start_time,
            end_time: None,
            duration_ms: None,
            status: SpanStatus::Pending,
            is_fallback: false,
            tokens: None,
            error: None,
        }
    }

    pub fn is_finalized(&self) -> bool {
        self.end_time.is_some()
    }

    /// Applies the terminal fields. Callers guarantee this runs once.
    pub(crate) fn apply(&mut self, outcome: SpanOutcome, end_time: DateTime<Utc>) {
        self.end_time = Some(end_time);
        self.duration_ms = Some((end_time - self.start_time).num_milliseconds().max(0));
        match outcome {
            SpanOutcome::Ok { tokens } => {
                self.status = SpanStatus::Ok;
                self.tokens = tokens;
            }
            SpanOutcome::Fallback { tokens } => {
                self.status = SpanStatus::Fallback;
                self.is_fallback = true;
                self.tokens = tokens;
            }
            SpanOutcome::Error { message } => {
                self.status = SpanStatus::Error;
                self.error = Some(message);
            }
            SpanOutcome::Cancelled => {
                self.status = SpanStatus::Cancelled;
            }
        }
    }
}
