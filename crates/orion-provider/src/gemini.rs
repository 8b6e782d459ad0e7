//! Client for the hosted text-completion and image-analysis endpoints.
//!
//! https://ai.google.dev/api/generate-content

use base64::Engine as _;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use orion_schema::{Role, Turn};

use crate::{shared_client, ProviderError, API_BASE};

const TEMPERATURE: f32 = 0.8;
const TOP_P: f32 = 0.9;

/// Fixed instruction sent alongside an uploaded image.
pub const ANALYSIS_INSTRUCTION: &str = "Analyze this image and describe its contents, \
     key features, and any notable elements. Provide a concise summary.";

#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GeminiClient {
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

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        )
    }

    fn build_completion_request(history: &[Turn], system_instruction: &str) -> GenerateRequest {
        let contents = history
            .iter()
            .map(|turn| GeminiContent {
                role: turn.role.as_wire_str().to_string(),
                parts: vec![GeminiPart::Text {
                    text: turn.text.clone(),
                }],
            })
            .collect();

        GenerateRequest {
            contents,
            system_instruction: Some(GeminiContent {
                role: "user".to_string(),
                parts: vec![GeminiPart::Text {
                    text: system_instruction.to_string(),
                }],
            }),
            generation_config: Some(GenerationConfig {
                temperature: TEMPERATURE,
                top_p: TOP_P,
            }),
        }
    }

    /// Sends the full turn history plus the persona instruction and wraps the
    /// first candidate's text as a model turn. Single attempt, no retries.
    pub async fn complete(
        &self,
        history: &[Turn],
        system_instruction: &str,
    ) -> Result<Turn, ProviderError> {
        let payload = Self::build_completion_request(history, system_instruction);
        let text = self.generate(&payload).await?;
        Ok(Turn::model(text))
    }

    /// Sends image bytes plus the fixed analysis instruction to the
    /// multimodal endpoint and returns the descriptive text.
    pub async fn analyze(&self, image: &[u8], mime_type: &str) -> Result<String, ProviderError> {
        let payload = GenerateRequest {
            contents: vec![GeminiContent {
                role: "user".to_string(),
                parts: vec![
                    GeminiPart::Text {
                        text: ANALYSIS_INSTRUCTION.to_string(),
                    },
                    GeminiPart::InlineData {
                        inline_data: InlineData {
                            mime_type: mime_type.to_string(),
                            data: base64::engine::general_purpose::STANDARD.encode(image),
                        },
                    },
                ],
            }],
            system_instruction: None,
            generation_config: None,
        };
        self.generate(&payload).await
    }

    async fn generate(&self, payload: &GenerateRequest) -> Result<String, ProviderError> {
        let resp = self
            .client
            .post(self.endpoint())
            .header("content-type", "application/json")
            .json(payload)
            .send()
            .await
            .map_err(ProviderError::Network)?;

        if resp.status() != StatusCode::OK {
            return Err(ProviderError::from_status(resp).await);
        }

        let body: GenerateResponse = resp
            .json()
            .await
            .map_err(|e| ProviderError::MalformedResponse(e.to_string()))?;
        first_candidate_text(&body)
    }
}

fn first_candidate_text(body: &GenerateResponse) -> Result<String, ProviderError> {
    body.candidates
        .first()
        .and_then(|c| c.content.parts.first())
        .and_then(|part| match part {
            GeminiPart::Text { text } => Some(text.clone()),
            _ => None,
        })
        .ok_or_else(|| {
            ProviderError::MalformedResponse(
                "missing candidates[0].content.parts[0].text".to_string(),
            )
        })
}

// ============================================================
// Wire types
// ============================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    role: String,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum GeminiPart {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
}

#[derive(Debug, Clone, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Clone, Deserialize)]
struct GeminiCandidate {
    content: GeminiContent,
}
