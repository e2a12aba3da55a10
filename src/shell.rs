use std::io;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, warn};

const POLL_INTERVAL: Duration = Duration::from_millis(25);

#[derive(Debug, Error)]
pub enum ShellError {
    #[error("Command is empty")]
    EmptyCommand,

    #[error("Failed to launch shell: {0}")]
    Spawn(#[source] io::Error),

    #[error("Command did not finish before the deadline: {command}")]
    DeadlineExceeded { command: String },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// How a launched command finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitReport {
    /// `None` when the process was terminated by a signal
    pub code: Option<i32>,
    pub success: bool,
}

/// Runs a literal command string and reports how it exited
pub trait ShellRunner {
    fn run(&mut self, command: &str) -> Result<ExitReport, ShellError>;
}

/// Runs commands through the user's shell with the terminal attached
#[derive(Debug, Clone)]
pub struct SystemShell {
    program: String,
    deadline: Option<Instant>,
}

impl SystemShell {
    /// Use `$SHELL`, falling back to `sh`
    pub fn new() -> Self {
        let program = std::env::var("SHELL")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "sh".to_string());

        Self::with_program(program)
    }

    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            deadline: None,
        }
    }

    /// Kill the command if it is still running at `deadline`
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Default for SystemShell {
    fn default() -> Self {
        Self::new()
    }
}

impl ShellRunner for SystemShell {
    fn run(&mut self, command: &str) -> Result<ExitReport, ShellError> {
        let command = command.trim();
        if command.is_empty() {
            return Err(ShellError::EmptyCommand);
        }

        debug!(shell = %self.program, command, "launching command");

        let mut child = Command::new(&self.program)
            .arg("-c")
            .arg(command)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(ShellError::Spawn)?;

        let Some(deadline) = self.deadline else {
            let status = child.wait()?;
            return Ok(ExitReport {
                code: status.code(),
                success: status.success(),
            });
        };

        loop {
            if let Some(status) = child.try_wait()? {
                return Ok(ExitReport {
                    code: status.code(),
                    success: status.success(),
                });
            }

            let now = Instant::now();
            if now >= deadline {
                warn!(command, "deadline reached, killing command");
                child.kill()?;
                child.wait()?;
                return Err(ShellError::DeadlineExceeded {
                    command: command.to_string(),
                });
            }

            thread::sleep(POLL_INTERVAL.min(deadline - now));
        }
    }
}
