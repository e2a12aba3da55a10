pub mod controller;
pub mod privacy;
pub mod prompt;
pub mod render;

pub use controller::{InteractionController, Mode, Outcome, State};
pub use privacy::privacy_gate;
pub use prompt::Prompter;
pub use render::Renderer;

use crate::shell::ShellError;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InteractionError {
    #[error("No suggestions to present")]
    NoSuggestions,

    #[error("Terminal I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("Command execution failed: {0}")]
    Shell(#[from] ShellError),
}
