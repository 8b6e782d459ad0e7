//! Client for the hosted image-generation endpoint.

use base64::Engine as _;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::{shared_client, ProviderError, API_BASE};

const SAMPLE_COUNT: u32 = 1;

#[derive(Debug, Clone)]
pub struct ImagenClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl ImagenClient {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: shared_client(),
            api_key: api_key.into(),
            base_url: API_BASE.to_string(),
            model: model.into(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Renders a single PNG for the prompt. Single attempt, no retries; the
    /// caller substitutes a scripted apology on failure.
    pub async fn generate(&self, prompt: &str) -> Result<Vec<u8>, ProviderError> {
        let url = format!(
            "{}/models/{}:predict?key={}",
            self.base_url, self.model, self.api_key
        );
        let payload = PredictRequest {
            instances: Instances { prompt },
            parameters: Parameters {
                sample_count: SAMPLE_COUNT,
            },
        };

        let resp = self
            .client
            .post(&url)
            .header("content-type", "application/json")
            .json(&payload)
            .send()
            .await
            .map_err(ProviderError::Network)?;

        if resp.status() != StatusCode::OK {
            return Err(ProviderError::from_status(resp).await);
        }

        let body: PredictResponse = resp
            .json()
            .await
            .map_err(|e| ProviderError::MalformedResponse(e.to_string()))?;
        decode_first_prediction(&body)
    }
}

fn decode_first_prediction(body: &PredictResponse) -> Result<Vec<u8>, ProviderError> {
    let encoded = body
        .predictions
        .first()
        .and_then(|p| p.bytes_base64_encoded.as_deref())
        .ok_or_else(|| {
            ProviderError::MalformedResponse(
                "missing predictions[0].bytesBase64Encoded".to_string(),
            )
        })?;
    base64::engine::general_purpose::STANDARD
        .decode(encoded)
        .map_err(|e| ProviderError::MalformedResponse(format!("invalid image payload: {e}")))
}

#[derive(Debug, Serialize)]
struct PredictRequest<'a> {
    instances: Instances<'a>,
    parameters: Parameters,
}

#[derive(Debug, Serialize)]
struct Instances<'a> {
    prompt: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Parameters {
    sample_count: u32,
}

#[derive(Debug, Deserialize)]
struct PredictResponse {
    #[serde(default)]
    predictions: Vec<Prediction>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Prediction {
    #[serde(default)]
    bytes_base64_encoded: Option<String>,
}
