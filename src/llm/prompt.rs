use crate::git::RepoInfo;
use std::fmt::Write;
use std::path::{Path, PathBuf};

/// Diffs longer than this are cut before being sent to the model
pub const MAX_DIFF_CHARS: usize = 12_000;

const TRUNCATION_MARKER: &str = "\n... (diff truncated)";

/// Runtime environment the model should tailor its suggestions to
#[derive(Debug, Clone)]
pub struct SystemContext {
    pub os: String,
    pub shell: String,
    pub working_dir: PathBuf,
    pub repo: Option<RepoInfo>,
}

impl SystemContext {
    /// Describe the current process environment
    pub fn detect(working_dir: &Path, repo: Option<RepoInfo>) -> Self {
        Self {
            os: std::env::consts::OS.to_string(),
            shell: std::env::var("SHELL").unwrap_or_default().trim().to_string(),
            working_dir: working_dir.to_path_buf(),
            repo,
        }
    }
}

/// Which diff a review covers
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReviewTarget {
    Staged,
    WorkingTree,
    LastCommit,
}

impl ReviewTarget {
    fn label(&self) -> &'static str {
        match self {
            ReviewTarget::Staged => "staged changes",
            ReviewTarget::WorkingTree => "working tree changes",
            ReviewTarget::LastCommit => "latest commit",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReviewRequest {
    pub diff: String,
    pub repo: RepoInfo,
    pub target: ReviewTarget,
    pub language: String,
    pub short: bool,
}

/// Prompt asking for ranked shell command suggestions as JSON
pub fn suggestion_prompt(message: &str, context: &SystemContext) -> String {
    let mut prompt = String::from(
        "You are a command-line expert. Translate the user's request into concrete shell commands for their environment.
Prefer read-only or low-impact commands. When several commands would work, pick the safest and simplest first.

",
    );

    let _ = writeln!(prompt, "User request:\n{}\n", message.trim());
    prompt.push_str("Environment:\n");
    let _ = writeln!(prompt, "- OS: {}", context.os);
    if context.os == "macos" {
        prompt.push_str("- Use tools that ship with macOS (vm_stat, top, df, ps); avoid Linux-only tools such as free or /proc.\n");
    }
    let _ = writeln!(
        prompt,
        "- Shell: {}",
        if context.shell.is_empty() { "unknown" } else { &context.shell }
    );
    let _ = writeln!(prompt, "- Working directory: {}", context.working_dir.display());
    match &context.repo {
        Some(repo) => {
            let _ = writeln!(prompt, "- Git repository: {}", repo.path.display());
            let _ = writeln!(prompt, "- Git branch: {}", repo.branch);
            let _ = writeln!(prompt, "- Git remote: {}", repo.remote);
        }
        None => prompt.push_str("- Not inside a git repository\n"),
    }

    prompt.push_str(
        r#"
OUTPUT FORMAT:
- Respond with a single JSON object and nothing else. No markdown, no code fences, no commentary.
- Shape: {"commands":[{"command":"<shell command>","description":"<short explanation>","risk":"<low|medium|high>","reason":"<why it fits>","tags":["tag"]}]}
- Put the best command first. Return at most 3 commands.
- "command" must be one line, ready to paste into a terminal.
- risk=low for read-only commands, medium for reversible local changes, high for destructive or hard-to-undo actions.
"#,
    );

    prompt
}

/// Prompt asking for a commit message, branch name and privacy check as JSON
pub fn commit_analysis_prompt(diff: &str, repo: &RepoInfo) -> String {
    let mut prompt = String::from(
        r#"You are a careful software engineer reviewing a git diff before it is committed.

TASK 1: Write a Conventional Commits message: <type>(<optional scope>): <description>
- Types: feat, fix, refactor, perf, style, test, docs, build, ops, chore, revert
- Imperative mood, lowercase first letter, no trailing period, about 50 characters
- Breaking changes put "!" before the colon and add a "BREAKING CHANGE:" footer
- Usually a single header line; no markdown, bullets or backticks

TASK 2: Suggest a branch name <category>/<kebab-description>
- Categories: feature, fix, hotfix, refactor, docs, chore, test, perf, ops, build
- Lowercase letters, digits and dashes only; under 40 characters after the slash

TASK 3: Flag anything in the diff that could leak secrets, credentials, tokens, personal data or internal URLs.
- privacy_risk is one of low, medium, high; use high when secrets are clearly exposed
- privacy_reasons lists short reasons for medium or high; it may be empty for low

OUTPUT FORMAT:
Respond with a single JSON object and nothing else:
{"commit_message":"<message>","branch_name":"<branch>","privacy_risk":"<low|medium|high>","privacy_reasons":["<reason>"]}

"#,
    );

    write_repo_header(&mut prompt, repo);
    write_diff(&mut prompt, diff);
    prompt
}

/// Prompt asking for a free-text code review
pub fn review_prompt(request: &ReviewRequest) -> String {
    let mut prompt = String::from(
        "You are an experienced software engineer reviewing git changes.
Structure the feedback as: Overview, Risks/Bugs, Refactoring Ideas, Testing Suggestions, Commit Message feedback.
",
    );

    if request.short {
        prompt.push_str("Keep it concise and focus on the most important issues.\n");
    }
    if request.language.eq_ignore_ascii_case("vi") {
        prompt.push_str("Respond in Vietnamese.\n");
    } else {
        prompt.push_str("Respond in English.\n");
    }

    write_repo_header(&mut prompt, &request.repo);
    let _ = writeln!(prompt, "Review target: {}", request.target.label());
    write_diff(&mut prompt, &request.diff);
    prompt.push_str("Call out missing tests and risky changes explicitly.\n");
    prompt
}

/// Trim a diff and cut it to `MAX_DIFF_CHARS` characters
pub fn truncate_diff(diff: &str) -> String {
    let diff = diff.trim();
    match diff.char_indices().nth(MAX_DIFF_CHARS) {
        Some((cut, _)) => format!("{}{}", &diff[..cut], TRUNCATION_MARKER),
        None => diff.to_string(),
    }
}

fn write_repo_header(prompt: &mut String, repo: &RepoInfo) {
    let _ = writeln!(prompt, "Repository path: {}", repo.path.display());
    let _ = writeln!(prompt, "Branch: {}", repo.branch);
    let _ = writeln!(prompt, "Remote: {}", repo.remote);
}

fn write_diff(prompt: &mut String, diff: &str) {
    prompt.push_str("Git diff:\n---\n");
    prompt.push_str(&truncate_diff(diff));
    prompt.push_str("\n---\n");
}
