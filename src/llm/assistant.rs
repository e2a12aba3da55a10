use crate::git::RepoInfo;
use crate::llm::client::{GenerateRequest, LLMClient, LLMError};
use crate::llm::normalize::{self, CommandSuggestion, CommitAnalysis, ReplyError};
use crate::llm::prompt::{self, ReviewRequest, SystemContext};
use std::time::Instant;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("LLM error: {0}")]
    LLMError(#[from] LLMError),

    #[error("Reply error: {0}")]
    ReplyError(#[from] ReplyError),

    #[error("Request message must not be empty")]
    EmptyRequest,

    #[error("Diff is empty")]
    EmptyDiff,
}

/// Output budget and sampling temperature for one request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParams {
    pub max_output_tokens: u32,
    pub temperature: f32,
}

/// Runs the reply pipeline: prompt, one model call, extraction, normalization.
///
/// Every call is bounded by `deadline`; once it passes the pending request is
/// dropped and `LLMError::Timeout` is returned.
pub struct Assistant {
    client: Box<dyn LLMClient>,
}

impl Assistant {
    pub fn new(client: Box<dyn LLMClient>) -> Self {
        Self { client }
    }

    pub async fn suggest_commands(
        &self,
        message: &str,
        context: &SystemContext,
        params: GenerationParams,
        deadline: Instant,
    ) -> Result<Vec<CommandSuggestion>, AssistantError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(AssistantError::EmptyRequest);
        }

        let prompt = prompt::suggestion_prompt(message, context);
        let reply = self.generate(prompt, params, deadline).await?;
        let suggestions = normalize::parse_suggestions(&reply)?;

        debug!(count = suggestions.len(), top = %suggestions[0].command, "normalized suggestions");
        Ok(suggestions)
    }

    pub async fn analyze_commit(
        &self,
        diff: &str,
        repo: &RepoInfo,
        params: GenerationParams,
        deadline: Instant,
    ) -> Result<CommitAnalysis, AssistantError> {
        if diff.trim().is_empty() {
            return Err(AssistantError::EmptyDiff);
        }

        let prompt = prompt::commit_analysis_prompt(diff, repo);
        let reply = self.generate(prompt, params, deadline).await?;
        let analysis = normalize::parse_commit_analysis(&reply)?;

        debug!(risk = %analysis.privacy_risk, branch = ?analysis.branch_name, "normalized commit analysis");
        Ok(analysis)
    }

    /// Free-text review; the reply is returned as-is
    pub async fn review(
        &self,
        request: &ReviewRequest,
        params: GenerationParams,
        deadline: Instant,
    ) -> Result<String, AssistantError> {
        if request.diff.trim().is_empty() {
            return Err(AssistantError::EmptyDiff);
        }

        let prompt = prompt::review_prompt(request);
        Ok(self.generate(prompt, params, deadline).await?)
    }

    async fn generate(
        &self,
        prompt: String,
        params: GenerationParams,
        deadline: Instant,
    ) -> Result<String, LLMError> {
        let request = GenerateRequest::new(prompt, params.max_output_tokens, params.temperature);
        debug!(prompt_chars = request.prompt.len(), max_tokens = params.max_output_tokens, "sending generation request");

        let call = self.client.generate(&request);
        match tokio::time::timeout_at(tokio::time::Instant::from_std(deadline), call).await {
            Ok(reply) => reply,
            Err(_) => Err(LLMError::Timeout),
        }
    }
}
