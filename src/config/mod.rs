pub mod first_run;
pub mod settings;

pub use first_run::{SetupError, ensure_api_key};
pub use settings::{BehaviorConfig, CommitConfig, Config, ConfigError, LLMConfig, ReviewConfig, SuggestConfig};
