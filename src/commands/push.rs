use super::{RunContext, parse_duration, terminal_prompter};
use crate::error::{AppResult, GitError};
use crate::git::{Repository, derive_branch_name, is_protected_branch};
use crate::interaction::Prompter;
use crate::security::RiskLevel;
use clap::Args;
use std::io::{BufRead, Write};
use std::time::{Duration, Instant};
use tracing::info;

const GITHUB_HOST: &str = "github.com";

#[derive(Args, Debug)]
pub struct PushArgs {
    /// Time limit for the whole run, e.g. 45s or 2m
    #[arg(long, value_parser = parse_duration)]
    pub timeout: Option<Duration>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PushOutcome {
    /// Declined moving off a protected branch; nothing was pushed
    Aborted,
    Pushed {
        branch: String,
        set_upstream: bool,
        url: Option<String>,
    },
}

/// Push the current branch, diverting off a protected branch first.
///
/// On a protected branch a name is derived from the last commit subject and,
/// unless declined, created and checked out before pushing.
pub async fn push_current<R: BufRead, W: Write>(
    repo: &Repository,
    protected_branches: &[String],
    prompter: &mut Prompter<R, W>,
) -> AppResult<PushOutcome> {
    let repo_info = repo.info().await?;
    let mut branch = repo
        .current_branch()
        .await?
        .ok_or_else(|| GitError::CommandFailed("could not determine current branch (detached HEAD?)".to_string()))?;

    if is_protected_branch(&branch, protected_branches) {
        let subject = repo.last_commit_subject().await?;
        let suggested = derive_branch_name(&subject).to_string();

        prompter.say(&format!("On protected branch '{}'.", branch))?;
        prompter.say(&format!("Suggested branch: {}", suggested))?;
        if !prompter.confirm_default_yes("Create, switch, and push this branch to origin?")? {
            prompter.say("Push aborted. No branch was created or pushed.")?;
            return Ok(PushOutcome::Aborted);
        }

        info!(from = %branch, to = %suggested, "moving off protected branch");
        repo.create_and_checkout_branch(&suggested).await?;
        branch = suggested;
    }

    let set_upstream = !repo.has_upstream().await?;
    info!(branch = %branch, set_upstream, "pushing");
    repo.push_current_branch(set_upstream).await?;

    if set_upstream {
        prompter.say(&format!("Pushed branch '{}' to origin and set upstream tracking.", branch))?;
    } else {
        prompter.say(&format!("Pushed branch '{}' to origin.", branch))?;
    }

    let url = github_branch_url(&repo_info.remote, &branch);
    if let Some(url) = &url {
        prompter.say(&format!("Branch URL: {}", url))?;
    }

    Ok(PushOutcome::Pushed {
        branch,
        set_upstream,
        url,
    })
}

/// Browser URL for `branch` when `remote` is a GitHub SSH, HTTPS or git URL
pub fn github_branch_url(remote: &str, branch: &str) -> Option<String> {
    let remote = remote.trim();
    let branch = branch.trim();
    if remote.is_empty() || branch.is_empty() {
        return None;
    }

    let ssh_prefix = format!("git@{}:", GITHUB_HOST);
    let path = if let Some(path) = remote.strip_prefix(&ssh_prefix) {
        path
    } else {
        ["https://", "http://", "git://"]
            .iter()
            .find_map(|scheme| remote.strip_prefix(&format!("{}{}/", scheme, GITHUB_HOST)))?
    };

    let path = path.trim_end_matches('/');
    let path = path.strip_suffix(".git").unwrap_or(path);
    if path.is_empty() {
        return None;
    }

    Some(format!("https://{}/{}/tree/{}", GITHUB_HOST, path, branch))
}

pub async fn run(ctx: &RunContext, args: PushArgs) -> AppResult<PushOutcome> {
    let deadline = ctx.deadline(args.timeout);
    let repo = Repository::discover_from(ctx.cwd())?.with_deadline(deadline);

    let mut prompter = terminal_prompter();
    let outcome = push_current(&repo, &ctx.config.commit.protected_branches, &mut prompter).await?;

    if let PushOutcome::Pushed { set_upstream, .. } = &outcome {
        let command = if *set_upstream { "git push -u origin HEAD" } else { "git push" };
        ctx.audit_command(command, Some(0), RiskLevel::Medium);
    }

    Ok(outcome)
}
