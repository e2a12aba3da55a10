use super::settings::{Config, ConfigError};
use crate::interaction::{InteractionError, Prompter};
use std::io::{self, BufRead, Write};
use std::path::Path;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum SetupError {
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("Config error: {0}")]
    ConfigError(#[from] ConfigError),

    #[error("Prompt failed: {0}")]
    Prompt(#[from] InteractionError),

    #[error("Setup cancelled by user")]
    Cancelled,

    #[error("API key cannot be empty")]
    EmptyApiKey,
}

/// Resolve the API key, asking for one and saving it when none is configured.
///
/// Resolution order is the environment variable named by `llm.api_key_env`,
/// then `llm.api_key` from the file, then the prompt. A key entered at the
/// prompt is written to `config_path` (mode 0600) so the next run finds it.
/// Only the key is persisted; runtime overrides already applied to `config`
/// stay out of the file.
pub fn ensure_api_key<R: BufRead, W: Write>(
    config: &mut Config,
    config_path: &Path,
    prompter: &mut Prompter<R, W>,
) -> Result<String, SetupError> {
    if let Some(key) = config.get_api_key() {
        return Ok(key);
    }

    prompter.say(&format!(
        "No Gemini API key found. Set {} or enter a key to store in {}.",
        config.llm.api_key_env,
        config_path.display()
    ))?;

    let Some(key) = prompter.ask("Enter your Gemini API key: ")? else {
        return Err(SetupError::Cancelled);
    };
    if key.is_empty() {
        return Err(SetupError::EmptyApiKey);
    }

    let mut stored = Config::load_from(config_path)?;
    stored.llm.api_key = Some(key.clone());
    stored.save_to(config_path)?;
    config.llm.api_key = Some(key.clone());
    info!(path = %config_path.display(), "stored API key");
    prompter.say(&format!("Saved API key to {}", config_path.display()))?;

    Ok(key)
}
