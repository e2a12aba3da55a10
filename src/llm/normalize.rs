use crate::llm::extract::extract_object_span;
use crate::security::RiskLevel;
use serde::Deserialize;
use thiserror::Error;

/// Failures interpreting a model reply
///
/// Every variant carries the text it failed on so the caller can show or log
/// it without re-running the request.
#[derive(Debug, Error)]
pub enum ReplyError {
    #[error("No JSON object found in model reply: {reply:?}")]
    NoPayload { reply: String },

    #[error("Model reply does not match the expected shape: {source}; raw={raw:?}")]
    Schema {
        raw: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Model returned an empty commit message; raw={raw:?}")]
    EmptyCommitMessage { raw: String },

    #[error("Model returned no usable command suggestions; raw={raw:?}")]
    NoUsableSuggestions { raw: String },
}

impl ReplyError {
    /// The reply text or payload span this error refers to
    pub fn raw_text(&self) -> &str {
        match self {
            ReplyError::NoPayload { reply } => reply,
            ReplyError::Schema { raw, .. }
            | ReplyError::EmptyCommitMessage { raw }
            | ReplyError::NoUsableSuggestions { raw } => raw,
        }
    }
}

/// A single shell command proposed by the model, after normalization
#[derive(Debug, Clone, PartialEq)]
pub struct CommandSuggestion {
    pub command: String,
    pub description: String,
    pub risk: RiskLevel,
    pub reason: String,
    pub tags: Vec<String>,
}

/// Commit message, branch name and privacy assessment for a diff
#[derive(Debug, Clone, PartialEq)]
pub struct CommitAnalysis {
    pub commit_message: String,
    pub branch_name: Option<String>,
    pub privacy_risk: RiskLevel,
    pub privacy_reasons: Vec<String>,
}

impl CommitAnalysis {
    /// First line of the commit message
    pub fn header(&self) -> &str {
        self.commit_message.lines().next().unwrap_or("").trim()
    }
}

// Wire shapes. Every field is optional here; the normalizer decides what is
// required and what gets a default.

#[derive(Debug, Deserialize)]
struct SuggestionEnvelope {
    #[serde(default)]
    commands: Vec<RawSuggestion>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawSuggestion {
    command: Option<String>,
    description: Option<String>,
    risk: Option<String>,
    reason: Option<String>,
    tags: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawCommitAnalysis {
    #[serde(alias = "commitMessage")]
    commit_message: Option<String>,
    #[serde(alias = "branchName")]
    branch_name: Option<String>,
    #[serde(alias = "privacyRisk")]
    privacy_risk: Option<String>,
    #[serde(alias = "privacyReasons")]
    privacy_reasons: Option<Vec<String>>,
}

/// Parse a model reply into ranked command suggestions.
///
/// Entries with a blank command are dropped; order is preserved, so the first
/// element stays the model's top pick. An empty result is an error.
pub fn parse_suggestions(reply: &str) -> Result<Vec<CommandSuggestion>, ReplyError> {
    let span = payload_span(reply)?;
    let envelope: SuggestionEnvelope = parse_span(span)?;

    let suggestions: Vec<CommandSuggestion> = envelope
        .commands
        .into_iter()
        .filter_map(normalize_suggestion)
        .collect();

    if suggestions.is_empty() {
        return Err(ReplyError::NoUsableSuggestions {
            raw: span.to_string(),
        });
    }

    Ok(suggestions)
}

/// Parse a model reply into a commit analysis.
///
/// A missing or blank commit message is an error; a blank branch name becomes
/// `None` so the caller can derive one.
pub fn parse_commit_analysis(reply: &str) -> Result<CommitAnalysis, ReplyError> {
    let span = payload_span(reply)?;
    let raw: RawCommitAnalysis = parse_span(span)?;

    let commit_message = trimmed(raw.commit_message);
    if commit_message.is_empty() {
        return Err(ReplyError::EmptyCommitMessage {
            raw: span.to_string(),
        });
    }

    let branch_name = Some(trimmed(raw.branch_name)).filter(|name| !name.is_empty());

    Ok(CommitAnalysis {
        commit_message,
        branch_name,
        privacy_risk: RiskLevel::from_reported(raw.privacy_risk.as_deref().unwrap_or("")),
        privacy_reasons: clean_list(raw.privacy_reasons),
    })
}

fn payload_span(reply: &str) -> Result<&str, ReplyError> {
    extract_object_span(reply).ok_or_else(|| ReplyError::NoPayload {
        reply: reply.to_string(),
    })
}

fn parse_span<'de, T: Deserialize<'de>>(span: &'de str) -> Result<T, ReplyError> {
    serde_json::from_str(span).map_err(|source| ReplyError::Schema {
        raw: span.to_string(),
        source,
    })
}

fn normalize_suggestion(raw: RawSuggestion) -> Option<CommandSuggestion> {
    let command = trimmed(raw.command);
    if command.is_empty() {
        return None;
    }

    Some(CommandSuggestion {
        command,
        description: trimmed(raw.description),
        risk: RiskLevel::from_reported(raw.risk.as_deref().unwrap_or("")),
        reason: trimmed(raw.reason),
        tags: clean_list(raw.tags),
    })
}

fn trimmed(value: Option<String>) -> String {
    value.map(|s| s.trim().to_string()).unwrap_or_default()
}

fn clean_list(values: Option<Vec<String>>) -> Vec<String> {
    values
        .unwrap_or_default()
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
