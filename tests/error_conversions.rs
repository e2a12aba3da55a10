use smartgit::config::first_run::SetupError;
use smartgit::config::settings::ConfigError;
use smartgit::error::{AppError, AppResult, GitError};
use smartgit::interaction::InteractionError;
use smartgit::llm::{AssistantError, LLMError, ReplyError};
use smartgit::shell::ShellError;
use std::error::Error;

#[test]
fn test_git_error_converts_to_app_error() {
    let app_err: AppError = GitError::NotARepository.into();
    assert!(matches!(app_err, AppError::Git(_)));
}

#[test]
fn test_config_error_converts_to_app_error() {
    let app_err: AppError = ConfigError::DirectoryNotFound.into();
    assert!(matches!(app_err, AppError::Config(_)));
}

#[test]
fn test_setup_error_converts_to_app_error() {
    let app_err: AppError = SetupError::EmptyApiKey.into();
    assert!(matches!(app_err, AppError::Setup(_)));
}

#[test]
fn test_llm_error_converts_to_app_error() {
    let app_err: AppError = LLMError::Timeout.into();
    assert!(matches!(app_err, AppError::Llm(_)));
}

#[test]
fn test_reply_error_converts_to_app_error() {
    let app_err: AppError = ReplyError::NoPayload {
        reply: "nope".to_string(),
    }
    .into();
    assert!(matches!(app_err, AppError::Reply(_)));
}

#[test]
fn test_assistant_error_converts_to_app_error() {
    let app_err: AppError = AssistantError::EmptyDiff.into();
    assert!(matches!(app_err, AppError::Assistant(_)));
}

#[test]
fn test_shell_and_interaction_errors_convert() {
    let app_err: AppError = ShellError::EmptyCommand.into();
    assert!(matches!(app_err, AppError::Shell(_)));

    let app_err: AppError = InteractionError::NoSuggestions.into();
    assert!(matches!(app_err, AppError::Interaction(_)));
}

#[test]
fn test_io_error_converts_to_app_error() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let app_err: AppError = io_err.into();
    assert!(matches!(app_err, AppError::Io(_)));
}

#[test]
fn test_question_mark_propagates_through_layers() {
    fn reply_layer() -> Result<(), ReplyError> {
        Err(ReplyError::NoUsableSuggestions {
            raw: r#"{"commands":[]}"#.to_string(),
        })
    }

    fn assistant_layer() -> Result<(), AssistantError> {
        reply_layer()?;
        Ok(())
    }

    fn app_layer() -> AppResult<()> {
        assistant_layer()?;
        Ok(())
    }

    let err = app_layer().unwrap_err();
    assert!(matches!(
        err,
        AppError::Assistant(AssistantError::ReplyError(ReplyError::NoUsableSuggestions { .. }))
    ));
}

#[test]
fn test_error_source_chain() {
    let app_err: AppError = AssistantError::LLMError(LLMError::Api {
        status: 500,
        body: "backend unavailable".to_string(),
    })
    .into();

    let source = app_err.source().expect("AppError should expose its source");
    assert!(source.to_string().contains("backend unavailable"));
}

#[test]
fn test_display_messages_carry_context() {
    let app_err: AppError = GitError::Timeout("git push".to_string()).into();
    assert!(app_err.to_string().contains("git push"));

    let app_err: AppError = ShellError::DeadlineExceeded {
        command: "sleep 100".to_string(),
    }
    .into();
    assert!(app_err.to_string().contains("sleep 100"));
}
