pub mod commit;
pub mod push;
pub mod review;
pub mod suggest;
pub mod switch;
pub mod version;

use crate::audit::AuditLogger;
use crate::config::{Config, ensure_api_key};
use crate::error::AppResult;
use crate::interaction::{Prompter, Renderer};
use crate::llm::{Assistant, GeminiClient};
use crate::security::RiskLevel;
use std::io::{self, BufRead, StdinLock, Stdout, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::warn;

/// Everything a subcommand needs, loaded once per invocation
pub struct RunContext {
    pub config: Config,
    pub config_path: PathBuf,
    pub cwd: PathBuf,
    pub renderer: Renderer,
    audit: Option<AuditLogger>,
}

impl RunContext {
    pub fn load() -> AppResult<Self> {
        let config = Config::load()?;
        let config_path = Config::config_path()?;
        let cwd = std::env::current_dir()?;
        Ok(Self::new(config, config_path, cwd))
    }

    pub fn new(config: Config, config_path: PathBuf, cwd: PathBuf) -> Self {
        let audit = if config.behavior.log_commands {
            match AuditLogger::new() {
                Ok(logger) => Some(logger),
                Err(e) => {
                    warn!(error = %e, "audit log disabled");
                    None
                }
            }
        } else {
            None
        };

        Self {
            renderer: Renderer::new(config.behavior.color),
            config,
            config_path,
            cwd,
            audit,
        }
    }

    /// Replace the audit destination, or turn auditing off with `None`
    pub fn with_audit(mut self, audit: Option<AuditLogger>) -> Self {
        self.audit = audit;
        self
    }

    /// The deadline for this invocation: `--timeout` or the configured default
    pub fn deadline(&self, timeout: Option<Duration>) -> Instant {
        Instant::now() + self.timeout(timeout)
    }

    pub fn timeout(&self, timeout: Option<Duration>) -> Duration {
        timeout.unwrap_or_else(|| self.config.timeout())
    }

    /// Build the Gemini-backed assistant, asking for an API key if needed
    pub fn assistant<R: BufRead, W: Write>(
        &mut self,
        prompter: &mut Prompter<R, W>,
        timeout: Duration,
    ) -> AppResult<Assistant> {
        let api_key = ensure_api_key(&mut self.config, &self.config_path, prompter)?;
        let client = GeminiClient::with_base_url(
            api_key,
            self.config.llm.model.clone(),
            self.config.base_url().to_string(),
            timeout,
        )?;
        Ok(Assistant::new(Box::new(client)))
    }

    pub fn audit_command(&self, command: &str, exit_code: Option<i32>, risk: RiskLevel) {
        if let Some(audit) = &self.audit
            && let Err(e) = audit.log_command(command, &self.cwd, exit_code, risk)
        {
            warn!(error = %e, "failed to write audit log");
        }
    }

    pub fn audit_rejected_reply(&self, request: &str, reply: &str, reason: &str) {
        if let Some(audit) = &self.audit
            && let Err(e) = audit.log_rejected_reply(request, reply, reason, &self.cwd)
        {
            warn!(error = %e, "failed to write audit log");
        }
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }
}

/// Prompter over the process's stdin and stdout
pub fn terminal_prompter() -> Prompter<StdinLock<'static>, Stdout> {
    Prompter::new(io::stdin().lock(), io::stdout())
}

/// Parse `45s`, `2m`, `500ms` or a bare number of seconds
pub fn parse_duration(text: &str) -> Result<Duration, String> {
    let text = text.trim();
    let split = text
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(text.len());
    let (number, unit) = text.split_at(split);

    let value: u64 = number
        .parse()
        .map_err(|_| format!("invalid duration '{}': expected e.g. 45s, 2m or 500ms", text))?;

    let duration = match unit.trim() {
        "" | "s" => Duration::from_secs(value),
        "ms" => Duration::from_millis(value),
        "m" => Duration::from_secs(value * 60),
        "h" => Duration::from_secs(value * 3600),
        other => return Err(format!("invalid duration unit '{}' in '{}'", other, text)),
    };

    if duration.is_zero() {
        return Err("duration must be greater than zero".to_string());
    }
    Ok(duration)
}
