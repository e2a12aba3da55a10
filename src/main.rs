use clap::{Parser, Subcommand};
use smartgit::commands::{
    self, RunContext,
    commit::CommitArgs,
    push::PushArgs,
    review::ReviewArgs,
    suggest::CommandArgs,
    switch::SwitchArgs,
};
use smartgit::error::AppResult;
use smartgit::error_translation::ErrorTranslator;
use smartgit::logging::{self, Verbosity};
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(
    name = "sg",
    version,
    about = "Git helper and terminal assistant backed by Gemini"
)]
struct Cli {
    /// Show progress logs on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Show debug logs on stderr
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Suggest shell commands for a plain-language request and run the one you pick
    Command(CommandArgs),
    /// Write a commit message for pending changes, then stage and commit them
    Commit(CommitArgs),
    /// Push the current branch to origin, setting upstream if needed
    #[command(alias = "p")]
    Push(PushArgs),
    /// Switch to a branch and pull from origin with rebase
    #[command(alias = "sw")]
    Switch(SwitchArgs),
    /// AI review of staged changes, the working tree, or the last commit
    #[command(alias = "rv")]
    Review(ReviewArgs),
    /// Print the current version
    Version,
}

async fn dispatch(command: Commands) -> AppResult<()> {
    if let Commands::Version = command {
        commands::version::run();
        return Ok(());
    }

    let mut ctx = RunContext::load()?;
    match command {
        Commands::Command(args) => {
            commands::suggest::run(&mut ctx, args).await?;
        }
        Commands::Commit(args) => {
            commands::commit::run(&mut ctx, args).await?;
        }
        Commands::Push(args) => {
            commands::push::run(&ctx, args).await?;
        }
        Commands::Switch(args) => commands::switch::run(&ctx, args).await?,
        Commands::Review(args) => commands::review::run(&mut ctx, args).await?,
        Commands::Version => {}
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(Verbosity::from_flags(cli.verbose, cli.debug));

    match dispatch(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            let friendly = ErrorTranslator::translate_app_error(&e);
            eprintln!("Error: {}", friendly.simple_message);
            if let Some(suggestion) = &friendly.suggestion {
                eprintln!("Hint: {}", suggestion);
            }
            if friendly.raw_error != friendly.simple_message {
                eprintln!("Details: {}", friendly.raw_error);
            }
            ExitCode::FAILURE
        }
    }
}
