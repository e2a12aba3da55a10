use super::InteractionError;
use super::prompt::Prompter;
use super::render::Renderer;
use crate::llm::CommandSuggestion;
use crate::security::{RiskLevel, SafetyClassifier};
use crate::shell::{ExitReport, ShellRunner};
use std::io::{BufRead, Write};
use tracing::{debug, info};

/// How the controller reaches a decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Full menu with edit and browse
    Interactive,
    /// Take the top suggestion; the high-risk gate still applies
    AutoAccept,
    /// Show the suggestions and stop before running anything
    DryRun,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Presenting,
    AwaitingChoice,
    Editing,
    BrowsingAlternates,
    Confirming,
    Executing,
    Done,
    Cancelled,
}

impl State {
    pub fn is_terminal(&self) -> bool {
        matches!(self, State::Done | State::Cancelled)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The command ran; a failing exit status is reported here, not raised
    Executed {
        command: String,
        risk: RiskLevel,
        report: ExitReport,
    },
    DryRun {
        command: String,
        risk: RiskLevel,
    },
    Cancelled,
}

enum Choice {
    Accept,
    Decline,
    Edit,
    Browse,
    Pick(usize),
    Unknown,
}

impl Choice {
    fn parse(input: &str) -> Self {
        match input.to_lowercase().as_str() {
            "" | "y" | "yes" => Choice::Accept,
            "n" | "no" => Choice::Decline,
            "e" | "edit" => Choice::Edit,
            "s" | "see" | "more" => Choice::Browse,
            other => match other.parse::<usize>() {
                Ok(index) => Choice::Pick(index),
                Err(_) => Choice::Unknown,
            },
        }
    }
}

/// Drives one decision over a ranked list of suggestions.
///
/// Every suggestion's risk is run through the [`SafetyClassifier`] on
/// construction, and again whenever the user edits the command. The
/// sequence of visited states is kept in [`history`](Self::history).
pub struct InteractionController {
    suggestions: Vec<CommandSuggestion>,
    classifier: SafetyClassifier,
    renderer: Renderer,
    mode: Mode,
    display_count: usize,
    selected: usize,
    command: String,
    risk: RiskLevel,
    state: State,
    history: Vec<State>,
}

impl InteractionController {
    pub fn new(
        suggestions: Vec<CommandSuggestion>,
        classifier: SafetyClassifier,
        renderer: Renderer,
        mode: Mode,
        display_count: usize,
    ) -> Result<Self, InteractionError> {
        if suggestions.is_empty() {
            return Err(InteractionError::NoSuggestions);
        }

        let suggestions: Vec<CommandSuggestion> = suggestions
            .into_iter()
            .map(|mut suggestion| {
                suggestion.risk = classifier.classify(&suggestion.command, Some(suggestion.risk));
                suggestion
            })
            .collect();

        let command = suggestions[0].command.clone();
        let risk = suggestions[0].risk;

        Ok(Self {
            suggestions,
            classifier,
            renderer,
            mode,
            display_count: display_count.max(1),
            selected: 0,
            command,
            risk,
            state: State::Presenting,
            history: vec![State::Presenting],
        })
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn history(&self) -> &[State] {
        &self.history
    }

    /// Suggestions with their classified risk
    pub fn suggestions(&self) -> &[CommandSuggestion] {
        &self.suggestions
    }

    /// Run the state machine to completion
    pub fn run<R: BufRead, W: Write>(
        &mut self,
        prompter: &mut Prompter<R, W>,
        shell: &mut dyn ShellRunner,
    ) -> Result<Outcome, InteractionError> {
        let mut outcome = Outcome::Cancelled;

        while !self.state.is_terminal() {
            let next = match self.state {
                State::Presenting => self.present(prompter, &mut outcome)?,
                State::AwaitingChoice => self.await_choice(prompter)?,
                State::Editing => self.edit(prompter)?,
                State::BrowsingAlternates => self.browse(prompter)?,
                State::Confirming => self.confirm(prompter)?,
                State::Executing => {
                    info!(command = %self.command, risk = %self.risk, "executing command");
                    let report = shell.run(&self.command)?;
                    if !report.success {
                        prompter.say(&self.renderer.warning(&format!(
                            "Command exited with status {}",
                            report.code.map_or_else(|| "signal".to_string(), |c| c.to_string())
                        )))?;
                    }
                    outcome = Outcome::Executed {
                        command: self.command.clone(),
                        risk: self.risk,
                        report,
                    };
                    State::Done
                }
                State::Done | State::Cancelled => break,
            };

            debug!(from = ?self.state, to = ?next, "interaction transition");
            self.state = next;
            self.history.push(next);
        }

        if self.state == State::Cancelled {
            prompter.say("Cancelled.")?;
            return Ok(Outcome::Cancelled);
        }
        Ok(outcome)
    }

    fn visible_count(&self) -> usize {
        self.display_count.min(self.suggestions.len())
    }

    fn select(&mut self, index: usize) {
        self.selected = index;
        self.command = self.suggestions[index].command.clone();
        self.risk = self.suggestions[index].risk;
    }

    fn present<R: BufRead, W: Write>(
        &mut self,
        prompter: &mut Prompter<R, W>,
        outcome: &mut Outcome,
    ) -> Result<State, InteractionError> {
        prompter.say("Suggested commands:")?;
        for (i, suggestion) in self.suggestions.iter().take(self.visible_count()).enumerate() {
            prompter.say(&self.renderer.menu_entry(i + 1, suggestion))?;
        }
        prompter.say("  0) Cancel")?;

        Ok(match self.mode {
            Mode::Interactive => State::AwaitingChoice,
            Mode::AutoAccept => State::Confirming,
            Mode::DryRun => {
                prompter.say(&format!("Dry run, not executing: {}", self.command))?;
                *outcome = Outcome::DryRun {
                    command: self.command.clone(),
                    risk: self.risk,
                };
                State::Done
            }
        })
    }

    fn await_choice<R: BufRead, W: Write>(
        &mut self,
        prompter: &mut Prompter<R, W>,
    ) -> Result<State, InteractionError> {
        let question = format!(
            "Run {} {}? [Y/n, e=edit, s=see all, 1-{} pick, 0 cancel]: ",
            self.renderer.command(&self.command),
            self.renderer.risk_badge(self.risk),
            self.visible_count()
        );
        let Some(answer) = prompter.ask(&question)? else {
            return Ok(State::Cancelled);
        };

        Ok(match Choice::parse(&answer) {
            Choice::Accept => State::Confirming,
            Choice::Decline | Choice::Pick(0) => State::Cancelled,
            Choice::Edit => State::Editing,
            Choice::Browse => State::BrowsingAlternates,
            Choice::Pick(n) if n <= self.visible_count() => {
                self.select(n - 1);
                State::Confirming
            }
            Choice::Pick(_) | Choice::Unknown => {
                prompter.say(&format!("Unrecognized choice: {}", answer))?;
                State::AwaitingChoice
            }
        })
    }

    fn edit<R: BufRead, W: Write>(&mut self, prompter: &mut Prompter<R, W>) -> Result<State, InteractionError> {
        prompter.say(&format!("Current: {}", self.command))?;
        let Some(edited) = prompter.ask("New command (empty keeps current): ")? else {
            return Ok(State::Cancelled);
        };

        if !edited.is_empty() {
            let assessment = self.classifier.assess(&edited, Some(self.risk));
            debug!(command = %edited, risk = %assessment.risk, escalation = ?assessment.escalation, "edited command classified");
            self.command = edited;
            self.risk = assessment.risk;
        }

        Ok(State::AwaitingChoice)
    }

    fn browse<R: BufRead, W: Write>(&mut self, prompter: &mut Prompter<R, W>) -> Result<State, InteractionError> {
        prompter.say("All suggestions:")?;
        for (i, suggestion) in self.suggestions.iter().enumerate() {
            prompter.say(&self.renderer.detailed_entry(i + 1, suggestion))?;
        }

        let Some(answer) = prompter.ask(&format!("Pick 1-{} (current {}): ", self.suggestions.len(), self.selected + 1))?
        else {
            return Ok(State::Cancelled);
        };

        match answer.parse::<usize>() {
            Ok(n) if (1..=self.suggestions.len()).contains(&n) => self.select(n - 1),
            _ => prompter.say(&format!("Keeping suggestion {}", self.selected + 1))?,
        }

        Ok(State::AwaitingChoice)
    }

    fn confirm<R: BufRead, W: Write>(&mut self, prompter: &mut Prompter<R, W>) -> Result<State, InteractionError> {
        match self.risk {
            RiskLevel::High => {
                prompter.say(&self.renderer.danger(&format!(
                    "{} This command may be destructive: {}",
                    self.renderer.risk_badge(RiskLevel::High),
                    self.command
                )))?;
                let answer = prompter.ask("Type 'yes' to run it: ")?;
                if answer.is_some_and(|a| a.eq_ignore_ascii_case("yes")) {
                    Ok(State::Executing)
                } else {
                    Ok(State::Cancelled)
                }
            }
            RiskLevel::Medium => {
                prompter.say(&self.renderer.warning(&format!(
                    "{} This command changes state; review it before relying on the result.",
                    self.renderer.risk_badge(RiskLevel::Medium)
                )))?;
                Ok(State::Executing)
            }
            RiskLevel::Low => Ok(State::Executing),
        }
    }
}
