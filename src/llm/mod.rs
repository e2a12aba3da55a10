pub mod assistant;
pub mod client;
pub mod extract;
pub mod gemini;
pub mod normalize;
pub mod prompt;

pub use assistant::{Assistant, AssistantError, GenerationParams};
pub use client::{GenerateRequest, LLMClient, LLMError};
pub use extract::extract_object_span;
pub use gemini::GeminiClient;
pub use normalize::{CommandSuggestion, CommitAnalysis, ReplyError, parse_commit_analysis, parse_suggestions};
pub use prompt::{ReviewRequest, ReviewTarget, SystemContext};
