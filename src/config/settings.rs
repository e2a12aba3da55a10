use crate::llm::gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Overrides `llm.model` when set
pub const MODEL_ENV_VAR: &str = "GEMINI_MODEL";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    #[error("Config directory not found")]
    DirectoryNotFound,

    #[error("Invalid config value: {0}")]
    InvalidValue(String),
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub llm: LLMConfig,
    pub suggest: SuggestConfig,
    pub commit: CommitConfig,
    pub review: ReviewConfig,
    pub behavior: BehaviorConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct LLMConfig {
    pub provider: String,
    pub model: String,
    pub api_key_env: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct SuggestConfig {
    pub max_tokens: u32,
    pub temperature: f32,
    /// How many suggestions the menu shows before "see all"
    pub display_count: usize,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct CommitConfig {
    pub max_tokens: u32,
    pub temperature: f32,
    pub protected_branches: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct ReviewConfig {
    pub max_tokens: u32,
    pub language: String,
    pub short: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct BehaviorConfig {
    pub timeout_seconds: u64,
    pub color: bool,
    pub log_commands: bool,
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            provider: "gemini".to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
            api_key: None,
            base_url: None,
        }
    }
}

impl Default for SuggestConfig {
    fn default() -> Self {
        Self {
            max_tokens: 512,
            temperature: 0.4,
            display_count: 2,
        }
    }
}

impl Default for CommitConfig {
    fn default() -> Self {
        Self {
            max_tokens: 256,
            temperature: 0.3,
            protected_branches: ["main", "master", "develop", "dev"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            max_tokens: 1024,
            language: "en".to_string(),
            short: true,
        }
    }
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 45,
            color: true,
            log_commands: true,
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf, ConfigError> {
        let home = std::env::var("HOME").map_err(|_| ConfigError::DirectoryNotFound)?;
        Ok(PathBuf::from(home).join(".config").join("smartgit"))
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration from the default path, applying env overrides
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::load_from(&Self::config_path()?)?;
        if let Ok(model) = std::env::var(MODEL_ENV_VAR) {
            config.apply_model_override(&model);
        }
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from `path`; a missing file yields the defaults
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;

        config.validate()?;

        Ok(config)
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to `path`, readable by the owner only
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        // Validate before saving
        self.validate()?;

        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;

        // Set permissions to 600 (owner read/write only)
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = fs::metadata(path)?.permissions();
            perms.set_mode(0o600);
            fs::set_permissions(path, perms)?;
        }

        Ok(())
    }

    pub(crate) fn apply_model_override(&mut self, model: &str) {
        let model = model.trim();
        if !model.is_empty() {
            self.llm.model = model.to_string();
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.llm.provider != "gemini" {
            return Err(ConfigError::InvalidValue(format!(
                "Unsupported LLM provider: {}. Only 'gemini' is supported",
                self.llm.provider
            )));
        }

        if self.llm.model.trim().is_empty() {
            return Err(ConfigError::InvalidValue("llm.model must not be empty".to_string()));
        }

        for (name, value) in [
            ("suggest.max_tokens", self.suggest.max_tokens),
            ("commit.max_tokens", self.commit.max_tokens),
            ("review.max_tokens", self.review.max_tokens),
        ] {
            if value == 0 {
                return Err(ConfigError::InvalidValue(format!("{} must be greater than 0", name)));
            }
        }

        if self.suggest.display_count == 0 {
            return Err(ConfigError::InvalidValue(
                "suggest.display_count must be greater than 0".to_string(),
            ));
        }

        if !matches!(self.review.language.as_str(), "en" | "vi") {
            return Err(ConfigError::InvalidValue(format!(
                "Unsupported review language: {}. Use 'en' or 'vi'",
                self.review.language
            )));
        }

        if self.behavior.timeout_seconds == 0 {
            return Err(ConfigError::InvalidValue(
                "behavior.timeout_seconds must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Get API key from environment variable or config
    pub fn get_api_key(&self) -> Option<String> {
        // First try environment variable
        if !self.llm.api_key_env.is_empty()
            && let Ok(key) = std::env::var(&self.llm.api_key_env)
            && !key.trim().is_empty()
        {
            return Some(key.trim().to_string());
        }

        // Fall back to config file if present
        self.llm
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(String::from)
    }

    /// Check if API key is available
    pub fn has_api_key(&self) -> bool {
        self.get_api_key().is_some()
    }

    pub fn base_url(&self) -> &str {
        self.llm.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.behavior.timeout_seconds)
    }
}
