use crate::llm::client::{GenerateRequest, LLMClient, LLMError};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Serialize, Deserialize, Default)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize, Default)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Content,
}

impl GenerateContentResponse {
    /// First non-empty text part, scanning candidates in order
    fn extract_text(self) -> Result<String, LLMError> {
        if self.candidates.is_empty() {
            return Err(LLMError::NoCandidates);
        }

        self.candidates
            .into_iter()
            .flat_map(|candidate| candidate.content.parts)
            .filter_map(|part| part.text)
            .map(|text| text.trim().to_string())
            .find(|text| !text.is_empty())
            .ok_or(LLMError::NoText)
    }
}

/// Client for the Gemini `generateContent` endpoint
pub struct GeminiClient {
    api_key: String,
    model: String,
    base_url: String,
    http_client: Client,
}

impl GeminiClient {
    pub fn new(api_key: String, model: String, timeout: Duration) -> Result<Self, LLMError> {
        Self::with_base_url(api_key, model, DEFAULT_BASE_URL.to_string(), timeout)
    }

    pub fn with_base_url(
        api_key: String,
        model: String,
        base_url: String,
        timeout: Duration,
    ) -> Result<Self, LLMError> {
        let http_client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_http_client(api_key, model, base_url, http_client))
    }

    pub fn with_http_client(api_key: String, model: String, base_url: String, http_client: Client) -> Self {
        Self {
            api_key,
            model,
            base_url,
            http_client,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }

    fn request_body(request: &GenerateRequest) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(request.prompt.clone()),
                }],
            }],
            generation_config: GenerationConfig {
                max_output_tokens: request.max_output_tokens,
                temperature: request.temperature,
            },
        }
    }
}

#[async_trait]
impl LLMClient for GeminiClient {
    async fn generate(&self, request: &GenerateRequest) -> Result<String, LLMError> {
        let response = self
            .http_client
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .header("content-type", "application/json")
            .json(&Self::request_body(request))
            .send()
            .await
            .map_err(|e| if e.is_timeout() { LLMError::Timeout } else { e.into() })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(LLMError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        let parsed: GenerateContentResponse = serde_json::from_str(&body)?;
        parsed.extract_text()
    }
}
