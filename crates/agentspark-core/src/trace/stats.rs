//! Aggregate trace statistics. Always derived, never stored.

use super::span::{CallSpan, SpanStatus};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Serialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TraceStats {
    pub calls: usize,
    /// Sum of finalized span durations
    pub total_duration_ms: i64,
    /// Sum of reported token counts
    pub total_tokens: u64,
    pub error_count: usize,
    pub fallback_count: usize,
    pub average_duration_ms: i64,
    pub has_fallback: bool,
    pub has_error: bool,
    pub has_pending: bool,
    pub session_start: Option<DateTime<Utc>>,
}

impl TraceStats {
    pub fn from_spans(spans: &[CallSpan], session_start: Option<DateTime<Utc>>) -> Self {
        let calls = spans.len();
        let total_duration_ms: i64 = spans.iter().filter_map(|s| s.duration_ms).sum();
        let total_tokens: u64 = spans.iter().filter_map(|s| s.tokens).sum();
        let error_count = spans
            .iter()
            .filter(|s| s.status == SpanStatus::Error)
            .count();
        let fallback_count = spans.iter().filter(|s| s.is_fallback).count();

        Self {
            calls,
            total_duration_ms,
            total_tokens,
            error_count,
            fallback_count,
            average_duration_ms: if calls > 0 {
                total_duration_ms / calls as i64
            } else {
                0
            },
            has_fallback: fallback_count > 0,
            has_error: error_count > 0,
            has_pending: spans.iter().any(|s| s.status == SpanStatus::Pending),
            session_start,
        }
    }
}
