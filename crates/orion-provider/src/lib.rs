pub mod gemini;
pub mod imagen;

use reqwest::StatusCode;

pub use gemini::{GeminiClient, ANALYSIS_INSTRUCTION};
pub use imagen::ImagenClient;

pub const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Failure taxonomy for the hosted endpoints.
///
/// Every variant is caught at the engine boundary and converted into a
/// scripted apology; none is retried automatically.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("network failure: {0}")]
    Network(#[source] reqwest::Error),
    #[error("api error ({status}): {message}")]
    Api { status: StatusCode, message: String },
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl ProviderError {
    pub(crate) async fn from_status(resp: reqwest::Response) -> Self {
        let status = resp.status();
        let message = match resp.text().await {
            Ok(body) => body,
            Err(e) => return ProviderError::Network(e),
        };
        ProviderError::Api { status, message }
    }
}

pub(crate) fn shared_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(120))
        .build()
        .unwrap_or_default()
}
