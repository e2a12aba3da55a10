use super::{RunContext, parse_duration};
use crate::error::AppResult;
use crate::git::Repository;
use crate::security::RiskLevel;
use clap::Args;
use std::time::Duration;
use tracing::info;

#[derive(Args, Debug)]
pub struct SwitchArgs {
    /// Branch to check out and rebase onto origin
    pub branch: String,

    /// Time limit for the whole run, e.g. 45s or 2m
    #[arg(long, value_parser = parse_duration)]
    pub timeout: Option<Duration>,
}

/// Check out `branch`, then `pull --rebase origin <branch>`
pub async fn switch_branch(repo: &Repository, branch: &str) -> AppResult<()> {
    info!(target_branch = branch, "checking out branch");
    repo.checkout_branch(branch).await?;

    info!(target_branch = branch, "pulling with rebase from origin");
    repo.pull_rebase("origin", branch).await?;
    Ok(())
}

pub async fn run(ctx: &RunContext, args: SwitchArgs) -> AppResult<()> {
    let deadline = ctx.deadline(args.timeout);
    let repo = Repository::discover_from(ctx.cwd())?.with_deadline(deadline);

    switch_branch(&repo, &args.branch).await?;
    ctx.audit_command(&format!("git checkout {}", args.branch), Some(0), RiskLevel::Low);
    ctx.audit_command(&format!("git pull --rebase origin {}", args.branch), Some(0), RiskLevel::Low);

    println!("Switched to '{}' and rebased on origin/{}.", args.branch, args.branch);
    Ok(())
}
