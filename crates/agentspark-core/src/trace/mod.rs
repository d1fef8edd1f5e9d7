//! Execution tracing for inference calls.
//!
//! Every attempted call to a model produces one [`CallSpan`]. Spans are kept
//! append-only by the session's [`SpanRecorder`] until the session is reset.

pub mod recorder;
pub mod span;
pub mod stats;

pub use recorder::{SpanRecorder, TraceEvent};
pub use span::{CallSpan, SpanOutcome, SpanStatus};
pub use stats::TraceStats;
