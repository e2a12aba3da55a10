use crate::error::{AppError, GitError};
use crate::interaction::InteractionError;
use crate::llm::{AssistantError, LLMError, ReplyError};
use crate::shell::ShellError;

#[derive(Debug, Clone)]
pub struct UserFriendlyError {
    pub simple_message: String,
    pub suggestion: Option<String>,
    pub raw_error: String,
}

impl UserFriendlyError {
    fn new(simple_message: &str, suggestion: Option<&str>, raw_error: String) -> Self {
        Self {
            simple_message: simple_message.to_string(),
            suggestion: suggestion.map(String::from),
            raw_error,
        }
    }
}

pub struct ErrorTranslator;

impl ErrorTranslator {
    /// Translate an AppError into a user-friendly error message
    pub fn translate_app_error(error: &AppError) -> UserFriendlyError {
        match error {
            AppError::Git(git_err) => Self::translate(git_err),
            AppError::Config(config_err) => UserFriendlyError::new(
                "Configuration error occurred.",
                Some("Check your config file at ~/.config/smartgit/config.toml"),
                config_err.to_string(),
            ),
            AppError::Setup(setup_err) => UserFriendlyError::new(
                "No usable API key.",
                Some("Set GEMINI_API_KEY or run again and enter a key when asked"),
                setup_err.to_string(),
            ),
            AppError::Llm(llm_err) => Self::translate_llm(llm_err),
            AppError::Reply(reply_err) => Self::translate_reply(reply_err),
            AppError::Assistant(assistant_err) => match assistant_err {
                AssistantError::LLMError(llm_err) => Self::translate_llm(llm_err),
                AssistantError::ReplyError(reply_err) => Self::translate_reply(reply_err),
                AssistantError::EmptyRequest => UserFriendlyError::new(
                    "Nothing to ask: the request is empty.",
                    Some("Describe what you want, e.g. sg command show disk usage"),
                    assistant_err.to_string(),
                ),
                AssistantError::EmptyDiff => UserFriendlyError::new(
                    "There are no changes to analyze.",
                    Some("Make or stage some changes first"),
                    assistant_err.to_string(),
                ),
            },
            AppError::Shell(shell_err) => Self::translate_shell(shell_err),
            AppError::Interaction(InteractionError::Shell(shell_err)) => Self::translate_shell(shell_err),
            AppError::Interaction(interaction_err) => UserFriendlyError::new(
                "Could not complete the interactive prompt.",
                None,
                interaction_err.to_string(),
            ),
            AppError::Io(io_err) => UserFriendlyError::new(
                "I/O error occurred.",
                Some("Check file permissions and disk space"),
                io_err.to_string(),
            ),
        }
    }

    /// Translate a GitError into a user-friendly error message
    pub fn translate(error: &GitError) -> UserFriendlyError {
        let raw_error = error.to_string();

        if let GitError::Timeout(_) = error {
            return UserFriendlyError::new(
                "Git did not finish in time.",
                Some("Retry with a longer --timeout"),
                raw_error,
            );
        }

        let (simple_message, suggestion) = Self::match_error_patterns(&raw_error);

        UserFriendlyError {
            simple_message,
            suggestion,
            raw_error,
        }
    }

    fn translate_llm(error: &LLMError) -> UserFriendlyError {
        let raw_error = error.to_string();
        match error {
            LLMError::Api { status: 400 | 401 | 403, .. } | LLMError::MissingApiKey => UserFriendlyError::new(
                "The Gemini API rejected the request.",
                Some("Check your API key and the configured model name"),
                raw_error,
            ),
            LLMError::Api { status: 429, .. } => UserFriendlyError::new(
                "The Gemini API quota or rate limit was exceeded.",
                Some("Wait a moment and run the command again"),
                raw_error,
            ),
            LLMError::Api { .. } => UserFriendlyError::new("The Gemini API returned an error.", None, raw_error),
            LLMError::Timeout => UserFriendlyError::new(
                "The model did not answer in time.",
                Some("Retry with a longer --timeout"),
                raw_error,
            ),
            LLMError::NoCandidates | LLMError::NoText => UserFriendlyError::new(
                "The model returned an empty answer.",
                Some("Try rephrasing the request"),
                raw_error,
            ),
            LLMError::NetworkError(_) => UserFriendlyError::new(
                "Could not reach the Gemini API.",
                Some("Check your network connection"),
                raw_error,
            ),
            LLMError::JsonError(_) => UserFriendlyError::new(
                "The Gemini API response could not be read.",
                None,
                raw_error,
            ),
        }
    }

    fn translate_reply(error: &ReplyError) -> UserFriendlyError {
        let simple_message = match error {
            ReplyError::NoUsableSuggestions { .. } => "The model did not suggest any usable command.",
            ReplyError::EmptyCommitMessage { .. } => "The model did not produce a commit message.",
            _ => "The model's answer was not in the expected format.",
        };
        UserFriendlyError::new(
            simple_message,
            Some("Run the command again or rephrase the request; the raw reply is shown below"),
            error.to_string(),
        )
    }

    fn translate_shell(error: &ShellError) -> UserFriendlyError {
        let raw_error = error.to_string();
        match error {
            ShellError::DeadlineExceeded { .. } => UserFriendlyError::new(
                "The command was stopped because it ran past the time limit.",
                Some("Retry with a longer --timeout"),
                raw_error,
            ),
            ShellError::Spawn(_) => UserFriendlyError::new(
                "Could not start your shell.",
                Some("Check the SHELL environment variable"),
                raw_error,
            ),
            _ => UserFriendlyError::new("Running the command failed.", None, raw_error),
        }
    }

    /// Match common git error patterns and provide user-friendly messages
    fn match_error_patterns(error_text: &str) -> (String, Option<String>) {
        let lower = error_text.to_lowercase();

        let matched: Option<(&str, Option<&str>)> = if lower.contains("no upstream")
            || lower.contains("does not have an upstream")
        {
            Some((
                "No remote branch is configured for tracking.",
                Some("Run sg push, which sets the upstream on first push"),
            ))
        } else if lower.contains("merge conflict") || lower.contains("conflict") {
            Some((
                "There are conflicts that need to be resolved.",
                Some("Fix conflicts in the listed files, then git add and continue the rebase or merge."),
            ))
        } else if lower.contains("nothing to commit") || lower.contains("working tree clean") {
            Some(("No changes to commit - working directory is clean.", None))
        } else if lower.contains("already exists") && (lower.contains("branch") || lower.contains("ref")) {
            Some((
                "A branch with that name already exists.",
                Some("Switch to it with sg switch <branch>, or commit from a different branch."),
            ))
        } else if lower.contains("not a git repository") {
            Some((
                "Current directory is not a git repository.",
                Some("Run this inside a repository, or initialize one with: git init"),
            ))
        } else if lower.contains("authentication failed") || lower.contains("permission denied") {
            Some((
                "Authentication failed - check your credentials.",
                Some("Verify your SSH keys or personal access token."),
            ))
        } else if lower.contains("remote") && (lower.contains("not found") || lower.contains("does not appear")) {
            Some(("Remote repository not found.", Some("Check the remote URL with: git remote -v")))
        } else if lower.contains("would be overwritten") || lower.contains("uncommitted changes") {
            Some((
                "Operation would overwrite uncommitted changes.",
                Some("Commit or stash your changes first: git stash"),
            ))
        } else if lower.contains("diverged") || (lower.contains("rejected") && lower.contains("fetch first"))
            || lower.contains("non-fast-forward")
        {
            Some((
                "Local and remote branches have diverged.",
                Some("Pull first with sg switch <branch>, then push again."),
            ))
        } else if lower.contains("rebase in progress") {
            Some((
                "A rebase operation is currently in progress.",
                Some("Continue with: git rebase --continue, or abort: git rebase --abort"),
            ))
        } else if lower.contains("did not match any file") && lower.contains("pathspec") {
            Some(("That branch or path does not exist.", Some("List branches with: git branch -a")))
        } else {
            None
        };

        match matched {
            Some((message, suggestion)) => (message.to_string(), suggestion.map(String::from)),
            // Default: return the error as-is with no suggestion
            None => (error_text.to_string(), None),
        }
    }
}
