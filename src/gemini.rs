use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{GenerateError, Result};

const GEMINI_API_ROOT: &str = "https://generativelanguage.googleapis.com/v1beta";
const GEMINI_IMAGE_MODEL: &str = "gemini-2.5-flash-image";

pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Inline image bytes from a response part, still base64-encoded.
#[derive(Debug, Clone)]
pub struct InlineImage {
    pub mime_type: String,
    pub data: String,
}

/// One content part of a model response. A part carries text, inline image
/// data, or (for unknown part kinds) neither.
#[derive(Debug, Clone, Default)]
pub struct ContentPart {
    pub text: Option<String>,
    pub inline_image: Option<InlineImage>,
}

/// The external generation collaborator: one image plus one prompt in, a list
/// of content parts out. An empty or image-free part list is the caller's
/// signal of refusal.
#[async_trait]
pub trait ImageModel: Send + Sync {
    async fn edit_image(
        &self,
        payload: &str,
        mime_type: &str,
        prompt: &str,
    ) -> Result<Vec<ContentPart>>;
}

/// Client for the Google Generative Language image model.
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: GEMINI_IMAGE_MODEL.to_string(),
        }
    }

    /// Reads the credential from the environment. Fails fast so a missing key
    /// is caught before any network attempt.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var(API_KEY_ENV)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| GenerateError::Configuration(format!("{API_KEY_ENV} is not set")))?;
        Ok(Self::new(api_key))
    }
}

#[async_trait]
impl ImageModel for GeminiClient {
    async fn edit_image(
        &self,
        payload: &str,
        mime_type: &str,
        prompt: &str,
    ) -> Result<Vec<ContentPart>> {
        let body = EditRequest::new(payload, mime_type, prompt);
        let response = self
            .client
            .post(format!(
                "{GEMINI_API_ROOT}/models/{}:generateContent",
                self.model
            ))
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GenerateError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let text = response.text().await?;
        let parsed: EditResponse = serde_json::from_str(&text).map_err(|err| {
            warn!(%err, "unparseable generation response");
            GenerateError::NoContentGenerated
        })?;

        // Safety blocks come back as HTTP 200 with a block reason and no
        // candidates.
        if let Some(feedback) = parsed.prompt_feedback {
            if let Some(reason) = feedback.block_reason {
                let message = feedback
                    .block_reason_message
                    .unwrap_or_else(|| format!("prompt blocked: {reason}"));
                return Err(GenerateError::ModelRefused(message));
            }
        }

        let parts = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| content.parts)
            .unwrap_or_default();

        Ok(parts
            .into_iter()
            .map(|part| ContentPart {
                text: part.text,
                inline_image: part.inline_data.map(|data| InlineImage {
                    mime_type: data.mime_type,
                    data: data.data,
                }),
            })
            .collect())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EditRequest {
    contents: Vec<RequestContent>,
    generation_config: GenerationConfig,
}

impl EditRequest {
    fn new(payload: &str, mime_type: &str, prompt: &str) -> Self {
        Self {
            contents: vec![RequestContent {
                parts: vec![
                    RequestPart::InlineData {
                        inline_data: RequestInlineData {
                            mime_type: mime_type.to_string(),
                            data: payload.to_string(),
                        },
                    },
                    RequestPart::Text {
                        text: prompt.to_string(),
                    },
                ],
            }],
            generation_config: GenerationConfig {
                response_modalities: vec!["IMAGE".to_string()],
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct RequestContent {
    parts: Vec<RequestPart>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum RequestPart {
    InlineData { inline_data: RequestInlineData },
    Text { text: String },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RequestInlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_modalities: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EditResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    inline_data: Option<ResponseInlineData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponseInlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
    #[serde(default)]
    block_reason_message: Option<String>,
}
