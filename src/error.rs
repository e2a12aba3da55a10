use std::io;
use thiserror::Error;

// Import module-level errors for AppError
use crate::config::first_run::SetupError;
use crate::config::settings::ConfigError;
use crate::interaction::InteractionError;
use crate::llm::assistant::AssistantError;
use crate::llm::client::LLMError;
use crate::llm::normalize::ReplyError;
use crate::shell::ShellError;

/// Errors that can occur during git operations
#[derive(Debug, Error)]
pub enum GitError {
    #[error("Not a git repository")]
    NotARepository,

    #[error("Git command failed: {0}")]
    CommandFailed(String),

    #[error("Git command timed out: {0}")]
    Timeout(String),

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
}

/// Top-level application error that wraps all module-specific errors
///
/// Command flows return `AppResult` and use `?` on every module call; the
/// binary hands the final error to `ErrorTranslator` for display.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Git error: {0}")]
    Git(#[from] GitError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Setup error: {0}")]
    Setup(#[from] SetupError),

    #[error("LLM error: {0}")]
    Llm(#[from] LLMError),

    #[error("Reply error: {0}")]
    Reply(#[from] ReplyError),

    #[error("Assistant error: {0}")]
    Assistant(#[from] AssistantError),

    #[error("Shell error: {0}")]
    Shell(#[from] ShellError),

    #[error("Interaction error: {0}")]
    Interaction(#[from] InteractionError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Result type for git operations
pub type GitResult<T> = std::result::Result<T, GitError>;

/// Result type for application-level operations
pub type AppResult<T> = std::result::Result<T, AppError>;
