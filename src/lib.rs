pub mod audit;
pub mod commands;
pub mod config;
pub mod error;
pub mod error_translation;
pub mod git;
pub mod interaction;
pub mod llm;
pub mod logging;
pub mod security;
pub mod shell;

// Re-export commonly used types for convenience
pub use error::{AppError, AppResult, GitError, GitResult};
pub use git::{BranchName, Repository, derive_branch_name};
pub use interaction::{InteractionController, Mode, Outcome};
pub use llm::{CommandSuggestion, CommitAnalysis, extract_object_span, parse_commit_analysis, parse_suggestions};
pub use security::{RiskLevel, SafetyClassifier};
