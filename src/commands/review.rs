use super::{RunContext, parse_duration, terminal_prompter};
use crate::error::AppResult;
use crate::git::Repository;
use crate::llm::{GenerationParams, ReviewRequest, ReviewTarget};
use clap::Args;
use std::time::{Duration, Instant};
use tracing::info;

const REVIEW_TEMPERATURE: f32 = 0.4;

#[derive(Args, Debug)]
pub struct ReviewArgs {
    /// Review the latest commit instead of pending changes
    #[arg(long)]
    pub last_commit: bool,

    /// Concise summary instead of a full review (`--short=false` for full)
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub short: Option<bool>,

    /// Print the model's text without framing
    #[arg(long)]
    pub raw: bool,

    /// Review language
    #[arg(long, value_parser = ["en", "vi"])]
    pub language: Option<String>,

    /// Maximum output tokens for the review
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// Time limit for the whole run, e.g. 45s or 2m
    #[arg(long, value_parser = parse_duration)]
    pub timeout: Option<Duration>,
}

/// Diff to review: the last commit, else staged changes, else the working tree
pub async fn select_diff(repo: &Repository, last_commit: bool) -> AppResult<(String, ReviewTarget)> {
    if last_commit {
        return Ok((repo.last_commit_diff().await?, ReviewTarget::LastCommit));
    }

    let staged = repo.staged_diff().await?;
    if !staged.trim().is_empty() {
        return Ok((staged, ReviewTarget::Staged));
    }

    Ok((repo.working_tree_diff().await?, ReviewTarget::WorkingTree))
}

pub fn format_review(text: &str, raw: bool) -> String {
    if raw {
        return text.to_string();
    }

    let divider = "-".repeat(60);
    format!("{divider}\nAI Review:\n{divider}\n{text}\n{divider}")
}

pub async fn run(ctx: &mut RunContext, args: ReviewArgs) -> AppResult<()> {
    let timeout = ctx.timeout(args.timeout);
    let deadline = Instant::now() + timeout;
    let repo = Repository::discover_from(ctx.cwd())?.with_deadline(deadline);

    let (diff, target) = select_diff(&repo, args.last_commit).await?;
    if diff.trim().is_empty() {
        println!("There are no changes to review.");
        return Ok(());
    }

    let mut prompter = terminal_prompter();
    let assistant = ctx.assistant(&mut prompter, timeout)?;

    let request = ReviewRequest {
        diff,
        repo: repo.info().await?,
        target,
        language: args.language.unwrap_or_else(|| ctx.config.review.language.clone()),
        short: args.short.unwrap_or(ctx.config.review.short),
    };
    let params = GenerationParams {
        max_output_tokens: args.max_tokens.unwrap_or(ctx.config.review.max_tokens),
        temperature: REVIEW_TEMPERATURE,
    };

    info!(review_target = ?request.target, language = %request.language, "requesting review");
    let text = assistant.review(&request, params, deadline).await?;

    println!("{}", format_review(&text, args.raw));
    Ok(())
}
