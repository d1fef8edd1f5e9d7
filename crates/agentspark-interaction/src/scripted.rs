//! Adapter that replays canned responses.
//!
//! Used by the orchestrator and driver tests across the workspace.

use agentspark_core::catalog::ModelConfig;
use agentspark_core::{Completion, CompletionRequest, ProviderAdapter, ProviderError};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

/// One scripted step.
#[derive(Debug, Clone)]
pub enum ScriptStep {
    Reply(Completion),
    Fail(ProviderError),
    /// Sleep, then reply; for exercising cancellation
    Delayed(Duration, Completion),
}

/// What the adapter was asked to do.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub model_id: String,
    pub api_key: String,
    pub request: CompletionRequest,
}

/// [`ProviderAdapter`] answering from a queue of [`ScriptStep`]s.
///
/// When the queue runs dry every call fails with a non-recoverable 400.
#[derive(Debug, Default)]
pub struct ScriptedAdapter {
    steps: Mutex<VecDeque<ScriptStep>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedAdapter {
    pub fn new(steps: impl IntoIterator<Item = ScriptStep>) -> Self {
        Self {
            steps: Mutex::new(steps.into_iter().collect()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Adapter that answers each call with the next text, in order.
    pub fn replies<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            texts
                .into_iter()
                .map(|t| ScriptStep::Reply(Completion::new(t, None))),
        )
    }

    pub fn push(&self, step: ScriptStep) {
        if let Ok(mut steps) = self.steps.lock() {
            steps.push_back(step);
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or_default()
    }

    pub fn remaining(&self) -> usize {
        self.steps.lock().map(|s| s.len()).unwrap_or_default()
    }
}

#[async_trait]
impl ProviderAdapter for ScriptedAdapter {
    async fn invoke(
        &self,
        config: &ModelConfig,
        api_key: &str,
        request: &CompletionRequest,
    ) -> Result<Completion, ProviderError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(RecordedCall {
                model_id: config.model_id.clone(),
                api_key: api_key.to_string(),
                request: request.clone(),
            });
        }

        let step = self.steps.lock().ok().and_then(|mut s| s.pop_front());
        match step {
            Some(ScriptStep::Reply(completion)) => Ok(completion),
            Some(ScriptStep::Fail(err)) => Err(err),
            Some(ScriptStep::Delayed(delay, completion)) => {
                tokio::time::sleep(delay).await;
                Ok(completion)
            }
            None => Err(ProviderError::http(400, "script exhausted")),
        }
    }
}
