use super::{RunContext, parse_duration, terminal_prompter};
use crate::error::{AppError, AppResult};
use crate::git::Repository;
use crate::interaction::{InteractionController, Mode, Outcome, Prompter, Renderer};
use crate::llm::{Assistant, AssistantError, GenerationParams, SystemContext};
use crate::security::SafetyClassifier;
use crate::shell::{ShellRunner, SystemShell};
use clap::Args;
use std::io::{BufRead, Write};
use std::time::{Duration, Instant};
use tracing::info;

#[derive(Args, Debug)]
pub struct CommandArgs {
    /// What you want to do, in plain words
    #[arg(required = true, num_args = 1..)]
    pub words: Vec<String>,

    /// Time limit for the whole run, e.g. 45s or 2m
    #[arg(long, value_parser = parse_duration)]
    pub timeout: Option<Duration>,

    /// Maximum output tokens for the model reply
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// Run the top suggestion without the menu (high risk still asks)
    #[arg(long, short = 'y')]
    pub auto_accept: bool,

    /// Show suggestions without running anything
    #[arg(long, conflicts_with = "auto_accept")]
    pub dry_run: bool,
}

impl CommandArgs {
    pub fn mode(&self) -> Mode {
        if self.dry_run {
            Mode::DryRun
        } else if self.auto_accept {
            Mode::AutoAccept
        } else {
            Mode::Interactive
        }
    }
}

/// One suggestion round: ask the model, then hand the result to the controller
pub struct SuggestSession<'a> {
    pub assistant: &'a Assistant,
    pub context: &'a SystemContext,
    pub params: GenerationParams,
    pub mode: Mode,
    pub display_count: usize,
    pub renderer: Renderer,
    pub deadline: Instant,
}

impl SuggestSession<'_> {
    pub async fn run<R: BufRead, W: Write>(
        &self,
        message: &str,
        prompter: &mut Prompter<R, W>,
        shell: &mut dyn ShellRunner,
    ) -> AppResult<Outcome> {
        let suggestions = self
            .assistant
            .suggest_commands(message, self.context, self.params, self.deadline)
            .await?;

        let mut controller = InteractionController::new(
            suggestions,
            SafetyClassifier::new(),
            self.renderer,
            self.mode,
            self.display_count,
        )?;

        Ok(controller.run(prompter, shell)?)
    }
}

pub async fn run(ctx: &mut RunContext, args: CommandArgs) -> AppResult<Outcome> {
    let message = args.words.join(" ");
    let timeout = ctx.timeout(args.timeout);
    let deadline = Instant::now() + timeout;

    let repo = match Repository::discover_from(ctx.cwd()) {
        Ok(repo) => repo.with_deadline(deadline).info().await.ok(),
        Err(_) => None,
    };
    let context = SystemContext::detect(ctx.cwd(), repo);

    let mut prompter = terminal_prompter();
    let assistant = ctx.assistant(&mut prompter, timeout)?;

    let session = SuggestSession {
        assistant: &assistant,
        context: &context,
        params: GenerationParams {
            max_output_tokens: args.max_tokens.unwrap_or(ctx.config.suggest.max_tokens),
            temperature: ctx.config.suggest.temperature,
        },
        mode: args.mode(),
        display_count: ctx.config.suggest.display_count,
        renderer: ctx.renderer,
        deadline,
    };

    info!(request = %message, mode = ?session.mode, "requesting command suggestions");

    let mut shell = SystemShell::new().with_deadline(deadline);
    let outcome = match session.run(&message, &mut prompter, &mut shell).await {
        Err(AppError::Assistant(AssistantError::ReplyError(e))) => {
            ctx.audit_rejected_reply(&message, e.raw_text(), &e.to_string());
            return Err(e.into());
        }
        other => other?,
    };

    if let Outcome::Executed { command, risk, report } = &outcome {
        ctx.audit_command(command, report.code, *risk);
    }

    Ok(outcome)
}
