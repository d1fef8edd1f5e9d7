//! Helpers shared by the provider adapters.

use agentspark_core::ProviderError;
use agentspark_core::catalog::Provider;
use reqwest::{Response, StatusCode};
use serde::Deserialize;

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// Builds the failure for a non-success HTTP response.
///
/// Uses `error.message` from the JSON body when present, otherwise
/// `"<vendor> error <status>"`.
pub(crate) fn map_http_error(provider: Provider, status: StatusCode, body: &str) -> ProviderError {
    let message = serde_json::from_str::<ErrorWrapper>(body)
        .ok()
        .and_then(|wrapper| wrapper.error.message)
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| format!("{} error {}", provider.vendor_name(), status.as_u16()));

    ProviderError::http(status.as_u16(), message)
}

/// Failure raised before any HTTP status was received.
///
/// The request URL is stripped since it may carry the API key.
pub(crate) fn map_transport_error(provider: Provider, err: reqwest::Error) -> ProviderError {
    let kind = if err.is_timeout() {
        "request timeout"
    } else if err.is_connect() {
        "connection failed"
    } else {
        "request failed"
    };
    ProviderError::transport(format!(
        "{} {kind}: {}",
        provider.vendor_name(),
        err.without_url()
    ))
}

/// Reads a response, turning non-success statuses into [`ProviderError`]s
/// and parsing the success body as `T`.
pub(crate) async fn read_json<T: serde::de::DeserializeOwned>(
    provider: Provider,
    response: Response,
) -> Result<T, ProviderError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(map_http_error(provider, status, &body));
    }

    response.json::<T>().await.map_err(|err| {
        ProviderError::transport(format!(
            "Failed to parse {} response: {}",
            provider.vendor_name(),
            err.without_url()
        ))
    })
}

/// Vendors report zero when they did not count; treat that as absent.
pub(crate) fn non_zero(tokens: Option<u64>) -> Option<u64> {
    tokens.filter(|t| *t > 0)
}
