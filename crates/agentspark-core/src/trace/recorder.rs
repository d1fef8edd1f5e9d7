//! Session-scoped span recorder.

use super::span::{CallSpan, SpanOutcome};
use super::stats::TraceStats;
use crate::catalog::Provider;
use crate::error::{Result, SparkError};
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{RwLock, broadcast};

const EVENT_CAPACITY: usize = 256;

/// Change notification for live trace observers.
#[derive(Debug, Clone, PartialEq)]
pub enum TraceEvent {
    Started(CallSpan),
    Finalized(CallSpan),
    /// The session was reset; observers should drop what they hold
    Reset,
}

#[derive(Debug, Default)]
struct TraceState {
    spans: Vec<CallSpan>,
    session_start: Option<DateTime<Utc>>,
}

/// Append-only log of call attempts for one session.
///
/// Owned by a session and shared by reference (`Arc<SpanRecorder>`) with the
/// orchestrator; independent sessions never see each other's spans.
pub struct SpanRecorder {
    state: RwLock<TraceState>,
    next_id: AtomicU64,
    events: broadcast::Sender<TraceEvent>,
}

impl SpanRecorder {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            state: RwLock::new(TraceState::default()),
            next_id: AtomicU64::new(0),
            events,
        }
    }

    /// Subscribes to span creation, finalization and reset events.
    pub fn subscribe(&self) -> broadcast::Receiver<TraceEvent> {
        self.events.subscribe()
    }

    /// Registers a pending span and returns a copy of it.
    ///
    /// The first span of a fresh session also sets the session start.
    pub async fn start_span(
        &self,
        label: impl Into<String>,
        model_label: impl Into<String>,
        provider: Provider,
    ) -> CallSpan {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let now = Utc::now();
        let span = CallSpan::pending(id, label.into(), model_label.into(), provider, now);

        {
            let mut state = self.state.write().await;
            if state.session_start.is_none() {
                state.session_start = Some(now);
            }
            state.spans.push(span.clone());
        }

        tracing::debug!(span_id = id, label = %span.label, "[SpanRecorder] Span started");
        let _ = self.events.send(TraceEvent::Started(span.clone()));
        span
    }

    /// Moves a pending span to its terminal state.
    ///
    /// A span can be finalized exactly once; a second call is a programming
    /// error and is reported as [`SparkError::Internal`] without touching the
    /// span.
    pub async fn finalize(&self, span_id: u64, outcome: SpanOutcome) -> Result<CallSpan> {
        let finalized = {
            let mut state = self.state.write().await;
            let span = state
                .spans
                .iter_mut()
                .find(|s| s.id == span_id)
                .ok_or_else(|| SparkError::not_found("span", span_id.to_string()))?;

            if span.is_finalized() {
                return Err(SparkError::internal(format!(
                    "span {span_id} is already finalized"
                )));
            }

            span.apply(outcome, Utc::now());
            span.clone()
        };

        tracing::debug!(
            span_id,
            status = ?finalized.status,
            duration_ms = finalized.duration_ms,
            "[SpanRecorder] Span finalized"
        );
        let _ = self.events.send(TraceEvent::Finalized(finalized.clone()));
        Ok(finalized)
    }

    /// Clears all spans and the session start for a new run.
    pub async fn reset(&self) {
        {
            let mut state = self.state.write().await;
            state.spans.clear();
            state.session_start = None;
            self.next_id.store(0, Ordering::SeqCst);
        }
        let _ = self.events.send(TraceEvent::Reset);
    }

    /// Copy of all spans in creation order.
    pub async fn spans(&self) -> Vec<CallSpan> {
        self.state.read().await.spans.clone()
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.spans.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.read().await.spans.is_empty()
    }

    pub async fn session_start(&self) -> Option<DateTime<Utc>> {
        self.state.read().await.session_start
    }

    pub async fn stats(&self) -> TraceStats {
        let state = self.state.read().await;
        TraceStats::from_spans(&state.spans, state.session_start)
    }
}

impl Default for SpanRecorder {
    fn default() -> Self {
        Self::new()
    }
}
