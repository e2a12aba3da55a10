use super::{RunContext, parse_duration, terminal_prompter};
use crate::config::CommitConfig;
use crate::error::AppResult;
use crate::git::{BranchName, Repository, derive_branch_name, is_protected_branch};
use crate::interaction::{Prompter, Renderer, privacy_gate};
use crate::llm::{Assistant, GenerationParams};
use crate::security::RiskLevel;
use clap::Args;
use std::io::{BufRead, Write};
use std::time::{Duration, Instant};
use tracing::info;

#[derive(Args, Debug)]
pub struct CommitArgs {
    /// Time limit for the whole run, e.g. 45s or 2m
    #[arg(long, value_parser = parse_duration)]
    pub timeout: Option<Duration>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CommitOutcome {
    NothingToCommit,
    /// The privacy gate was declined; nothing was staged
    Declined,
    Committed {
        message: String,
        /// Branch created because the starting branch was protected
        new_branch: Option<String>,
    },
}

pub struct CommitSession<'a> {
    pub assistant: &'a Assistant,
    pub repo: &'a Repository,
    pub config: &'a CommitConfig,
    pub renderer: Renderer,
    pub deadline: Instant,
}

impl CommitSession<'_> {
    /// Analyze the pending changes, gate on privacy, then stage and commit.
    ///
    /// Nothing in the working tree is touched before the privacy gate passes.
    pub async fn run<R: BufRead, W: Write>(&self, prompter: &mut Prompter<R, W>) -> AppResult<CommitOutcome> {
        if self.repo.status_porcelain().await?.trim().is_empty() {
            prompter.say("There are no changes to commit.")?;
            return Ok(CommitOutcome::NothingToCommit);
        }

        let diff = self.pending_diff().await?;
        if diff.is_empty() {
            prompter.say("There are no changes to commit.")?;
            return Ok(CommitOutcome::NothingToCommit);
        }

        let repo_info = self.repo.info().await?;
        info!(branch = %repo_info.branch, diff_chars = diff.len(), "requesting commit analysis");

        let params = GenerationParams {
            max_output_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };
        let analysis = self
            .assistant
            .analyze_commit(&diff, &repo_info, params, self.deadline)
            .await?;

        let divider = "-".repeat(24);
        prompter.say("Proposed commit message:")?;
        prompter.say(&divider)?;
        prompter.say(&analysis.commit_message)?;
        prompter.say(&divider)?;

        if !privacy_gate(&analysis, prompter, &self.renderer)? {
            prompter.say("Commit aborted due to potential sensitive information.")?;
            return Ok(CommitOutcome::Declined);
        }

        let mut new_branch = None;
        if is_protected_branch(&repo_info.branch, &self.config.protected_branches) {
            let branch = analysis
                .branch_name
                .as_deref()
                .and_then(BranchName::parse)
                .unwrap_or_else(|| derive_branch_name(analysis.header()))
                .to_string();

            prompter.say(&format!("Creating and switching to branch: {}", branch))?;
            self.repo.create_and_checkout_branch(&branch).await?;
            new_branch = Some(branch);
        }

        info!(risk = %analysis.privacy_risk, "staging and committing");
        self.repo.add_all().await?;
        self.repo.commit(&analysis.commit_message).await?;
        prompter.say("Commit created successfully.")?;

        Ok(CommitOutcome::Committed {
            message: analysis.commit_message,
            new_branch,
        })
    }

    /// Staged diff followed by unstaged diff, trimmed
    async fn pending_diff(&self) -> AppResult<String> {
        let staged = self.repo.staged_diff().await?;
        let working = self.repo.working_tree_diff().await?;

        let mut diff = staged;
        if !working.trim().is_empty() {
            if !diff.is_empty() {
                diff.push('\n');
            }
            diff.push_str(&working);
        }
        Ok(diff.trim().to_string())
    }
}

pub async fn run(ctx: &mut RunContext, args: CommitArgs) -> AppResult<CommitOutcome> {
    let timeout = ctx.timeout(args.timeout);
    let deadline = Instant::now() + timeout;
    let repo = Repository::discover_from(ctx.cwd())?.with_deadline(deadline);

    let mut prompter = terminal_prompter();
    let assistant = ctx.assistant(&mut prompter, timeout)?;

    let session = CommitSession {
        assistant: &assistant,
        repo: &repo,
        config: &ctx.config.commit,
        renderer: ctx.renderer,
        deadline,
    };
    let outcome = session.run(&mut prompter).await?;

    if let CommitOutcome::Committed { message, new_branch } = &outcome {
        if let Some(branch) = new_branch {
            ctx.audit_command(&format!("git checkout -b {}", branch), Some(0), RiskLevel::Low);
        }
        ctx.audit_command("git add -A", Some(0), RiskLevel::Low);
        ctx.audit_command(&format!("git commit -m {:?}", message), Some(0), RiskLevel::Low);
    }

    Ok(outcome)
}
