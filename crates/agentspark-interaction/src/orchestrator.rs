//! Fallback orchestrator.
//!
//! Drives one logical inference call through the selected model and the
//! rest of its fallback chain, recording one span per attempt.

use agentspark_core::catalog::{ModelCatalog, ModelConfig};
use agentspark_core::fallback::FallbackPolicy;
use agentspark_core::trace::{SpanOutcome, SpanRecorder};
use agentspark_core::{CompletionRequest, InferenceError, ProviderAdapter};
use std::sync::Arc;
use tokio::sync::{RwLock, mpsc};
use tokio_util::sync::CancellationToken;

/// Progress notices for a caller showing live status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallNotice {
    /// An attempt failed recoverably; `next` is about to be tried
    TryingNext { failed: String, next: String },
    /// The call succeeded on a fallback model
    FellBack { model_label: String, model_id: String },
}

#[derive(Debug, Clone)]
struct CallSettings {
    selected: ModelConfig,
    api_key: Option<String>,
}

/// Sampling parameters applied to every request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RequestDefaults {
    pub temperature: f64,
    pub max_output_tokens: u32,
}

impl Default for RequestDefaults {
    fn default() -> Self {
        let request = CompletionRequest::new("", "");
        Self {
            temperature: request.temperature,
            max_output_tokens: request.max_output_tokens,
        }
    }
}

/// Runs inference calls with fallback across a model chain.
///
/// Calls within one session are single-flight: callers await one call before
/// issuing the next. Span ids stay unique even if they do not.
pub struct InferenceOrchestrator {
    adapter: Arc<dyn ProviderAdapter>,
    catalog: ModelCatalog,
    policy: FallbackPolicy,
    recorder: Arc<SpanRecorder>,
    settings: RwLock<CallSettings>,
    defaults: RequestDefaults,
    notices: Option<mpsc::UnboundedSender<CallNotice>>,
}

impl InferenceOrchestrator {
    pub fn new(
        adapter: Arc<dyn ProviderAdapter>,
        catalog: ModelCatalog,
        recorder: Arc<SpanRecorder>,
        selected: ModelConfig,
    ) -> Self {
        Self {
            adapter,
            catalog,
            policy: FallbackPolicy::default(),
            recorder,
            settings: RwLock::new(CallSettings {
                selected,
                api_key: None,
            }),
            defaults: RequestDefaults::default(),
            notices: None,
        }
    }

    pub fn with_policy(mut self, policy: FallbackPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_request_defaults(mut self, defaults: RequestDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.settings.get_mut().api_key = Some(api_key.into());
        self
    }

    /// Sends [`CallNotice`]s to `sender`. Send failures are ignored.
    pub fn with_notices(mut self, sender: mpsc::UnboundedSender<CallNotice>) -> Self {
        self.notices = Some(sender);
        self
    }

    pub async fn select_model(&self, model: ModelConfig) {
        tracing::info!(
            "[FallbackOrchestrator] Selected model {} ({})",
            model.model_id,
            model.chain_tag
        );
        self.settings.write().await.selected = model;
    }

    pub async fn set_api_key(&self, api_key: Option<String>) {
        self.settings.write().await.api_key = api_key;
    }

    pub async fn selected_model(&self) -> ModelConfig {
        self.settings.read().await.selected.clone()
    }

    pub fn catalog(&self) -> &ModelCatalog {
        &self.catalog
    }

    pub fn policy(&self) -> &FallbackPolicy {
        &self.policy
    }

    pub fn recorder(&self) -> &Arc<SpanRecorder> {
        &self.recorder
    }

    /// Runs one logical call and returns the first usable completion text.
    ///
    /// Fails with [`InferenceError::Config`] or
    /// [`InferenceError::MissingApiKey`] before any attempt when the selected
    /// model's chain is unknown or no key is set. Otherwise the terminal error is the first
    /// non-recoverable failure, or the last recoverable one once the chain
    /// is exhausted.
    pub async fn run_inference_call(
        &self,
        system_prompt: &str,
        user_message: &str,
        trace_label: Option<&str>,
    ) -> Result<String, InferenceError> {
        self.run(system_prompt, user_message, trace_label, None)
            .await
    }

    /// Like [`Self::run_inference_call`], but gives up as soon as `cancel`
    /// fires. The in-flight attempt's span ends as `cancelled`.
    pub async fn run_inference_call_cancellable(
        &self,
        system_prompt: &str,
        user_message: &str,
        trace_label: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<String, InferenceError> {
        self.run(system_prompt, user_message, trace_label, Some(cancel))
            .await
    }

    async fn run(
        &self,
        system_prompt: &str,
        user_message: &str,
        trace_label: Option<&str>,
        cancel: Option<&CancellationToken>,
    ) -> Result<String, InferenceError> {
        let CallSettings { selected, api_key } = self.settings.read().await.clone();
        if self.catalog.chain(&selected.chain_tag).is_empty() {
            return Err(InferenceError::Config(format!(
                "Unknown model chain '{}'",
                selected.chain_tag
            )));
        }
        let api_key = api_key
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| InferenceError::MissingApiKey {
                chain_tag: selected.chain_tag.clone(),
            })?;

        if cancel.is_some_and(CancellationToken::is_cancelled) {
            return Err(InferenceError::Cancelled);
        }

        let attempts = self.catalog.attempts_for(&selected);
        let request = CompletionRequest::new(system_prompt, user_message)
            .with_temperature(self.defaults.temperature)
            .with_max_output_tokens(self.defaults.max_output_tokens);

        let mut last_error: Option<InferenceError> = None;

        for (index, model) in attempts.iter().enumerate() {
            if index > 0 {
                self.notify(CallNotice::TryingNext {
                    failed: attempts[index - 1].label().to_string(),
                    next: model.label().to_string(),
                });
                if !self.cool_down(cancel).await {
                    tracing::info!("[FallbackOrchestrator] Cancelled during cooldown");
                    return Err(InferenceError::Cancelled);
                }
            }

            let span = self
                .recorder
                .start_span(span_label(trace_label, index), model.label(), model.provider)
                .await;

            let invocation = self.adapter.invoke(model, &api_key, &request);
            let result = match cancel {
                Some(token) => tokio::select! {
                    biased;
                    _ = token.cancelled() => None,
                    result = invocation => Some(result),
                },
                None => Some(invocation.await),
            };

            match result {
                None => {
                    self.finalize(span.id, SpanOutcome::Cancelled).await;
                    tracing::info!(
                        "[FallbackOrchestrator] Cancelled while calling {}",
                        model.model_id
                    );
                    return Err(InferenceError::Cancelled);
                }
                Some(Ok(completion)) => {
                    let outcome = if index == 0 {
                        SpanOutcome::Ok {
                            tokens: completion.tokens,
                        }
                    } else {
                        SpanOutcome::Fallback {
                            tokens: completion.tokens,
                        }
                    };
                    self.finalize(span.id, outcome).await;

                    if index > 0 {
                        tracing::info!(
                            "[FallbackOrchestrator] Fell back to {}",
                            model.model_id
                        );
                        self.notify(CallNotice::FellBack {
                            model_label: model.label().to_string(),
                            model_id: model.model_id.clone(),
                        });
                    }
                    return Ok(completion.text);
                }
                Some(Err(err)) => {
                    self.finalize(
                        span.id,
                        SpanOutcome::Error {
                            message: err.message.clone(),
                        },
                    )
                    .await;

                    if !self.policy.is_fallbackable(err.status, &err.message) {
                        tracing::warn!(
                            "[FallbackOrchestrator] Non-fallbackable error on {}: {}",
                            model.model_id,
                            err.message
                        );
                        return Err(err.into());
                    }

                    tracing::warn!(
                        "[FallbackOrchestrator] Fallback triggered ({}): {}",
                        model.model_id,
                        err.message
                    );
                    last_error = Some(err.into());
                }
            }
        }

        Err(last_error.unwrap_or(InferenceError::AllModelsFailed))
    }

    /// Waits the policy cooldown. Returns `false` when cancelled first.
    async fn cool_down(&self, cancel: Option<&CancellationToken>) -> bool {
        let sleep = tokio::time::sleep(self.policy.cooldown);
        match cancel {
            Some(token) => tokio::select! {
                biased;
                _ = token.cancelled() => false,
                _ = sleep => true,
            },
            None => {
                sleep.await;
                true
            }
        }
    }

    async fn finalize(&self, span_id: u64, outcome: SpanOutcome) {
        if let Err(e) = self.recorder.finalize(span_id, outcome).await {
            tracing::error!("[FallbackOrchestrator] Failed to finalize span {span_id}: {e}");
        }
    }

    fn notify(&self, notice: CallNotice) {
        if let Some(sender) = &self.notices {
            let _ = sender.send(notice);
        }
    }
}

/// Span label for attempt `index` of a call.
fn span_label(trace_label: Option<&str>, index: usize) -> String {
    match (trace_label, index) {
        (Some(label), 0) => label.to_string(),
        (Some(label), _) => format!("{label} (fallback)"),
        (None, 0) => "API Call".to_string(),
        (None, i) => format!("Fallback #{i}"),
    }
}
