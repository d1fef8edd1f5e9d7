use agentspark_core::InferenceError;
use anyhow::Result;
use colored::Colorize;
use tokio_util::sync::CancellationToken;

use crate::bootstrap::AppBootstrap;
use crate::render;

/// Sends one prompt through the fallback chain. Ctrl-C cancels the call.
pub async fn run(
    app: &AppBootstrap,
    system: &str,
    message: &str,
    label: Option<&str>,
) -> Result<()> {
    let orchestrator = &app.services.orchestrator;
    let cancel = CancellationToken::new();
    let watcher = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        })
    };

    let result = orchestrator
        .run_inference_call_cancellable(system, message, label, &cancel)
        .await;
    watcher.abort();

    render::trace_table(&orchestrator.recorder().spans().await);
    match result {
        Ok(reply) => {
            println!("{reply}");
            Ok(())
        }
        Err(InferenceError::Cancelled) => {
            eprintln!("{}", "Cancelled".bright_black());
            Ok(())
        }
        Err(e) => Err(app.explain(e.into())),
    }
}
