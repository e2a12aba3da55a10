use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur talking to the generation service
#[derive(Debug, Error)]
pub enum LLMError {
    #[error("API returned status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Request timed out")]
    Timeout,

    #[error("Response contained no candidates")]
    NoCandidates,

    #[error("Response contained no non-empty text parts in any candidate")]
    NoText,

    #[error("No API key configured")]
    MissingApiKey,

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// One prompt plus its generation parameters
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateRequest {
    pub prompt: String,
    pub max_output_tokens: u32,
    pub temperature: f32,
}

impl GenerateRequest {
    pub fn new(prompt: String, max_output_tokens: u32, temperature: f32) -> Self {
        Self {
            prompt,
            max_output_tokens,
            temperature,
        }
    }
}

/// A text-generation backend.
///
/// Implementations make exactly one request per call and return the raw reply
/// text. They never retry and never interpret the reply.
#[async_trait]
pub trait LLMClient: Send + Sync {
    async fn generate(&self, request: &GenerateRequest) -> Result<String, LLMError>;
}
