//! Interactive questions.
//!
//! Sessions ask through the [`Prompter`] trait so they can be driven by a terminal
//! ([`TerminalPrompter`], backed by `dialoguer`) or by a scripted answer list in tests.
//! Validation lives here too: invalid answers are re-asked, never fatal.

use chrono::NaiveDate;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input};
use dockit_core::date::parse_date;
use thiserror::Error;
use tokio::runtime::{Handle, RuntimeFlavor};
use tracing::debug;

#[derive(Debug, Error)]
pub enum PromptError {
    /// The user aborted the prompt.
    #[error("cancelled by user")]
    Cancelled,
    #[error("terminal error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<dialoguer::Error> for PromptError {
    fn from(e: dialoguer::Error) -> Self {
        match e {
            dialoguer::Error::IO(io) if io.kind() == std::io::ErrorKind::Interrupted => {
                PromptError::Cancelled
            }
            dialoguer::Error::IO(io) => PromptError::Io(io),
        }
    }
}

pub trait Prompter: Send {
    /// Free-text answer. An empty answer returns `default` when one is given.
    fn text(&mut self, message: &str, default: Option<&str>) -> Result<String, PromptError>;

    fn confirm(&mut self, message: &str, default: bool) -> Result<bool, PromptError>;

    /// Shown when an answer was rejected, before asking again.
    fn warn(&mut self, message: &str) {
        eprintln!("{message}");
    }
}

/// Runs a blocking terminal read.
///
/// On a multi-thread runtime the worker hands its other tasks off first, so the Ctrl-C
/// watcher and any spawned work keep running while the user types.
pub fn run_blocking<T>(read: impl FnOnce() -> T) -> T {
    match Handle::try_current() {
        Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
            tokio::task::block_in_place(read)
        }
        _ => read(),
    }
}

/// Prompts on the controlling terminal.
#[derive(Default)]
pub struct TerminalPrompter {
    theme: ColorfulTheme,
}

impl Prompter for TerminalPrompter {
    fn text(&mut self, message: &str, default: Option<&str>) -> Result<String, PromptError> {
        let mut input = Input::<String>::with_theme(&self.theme)
            .with_prompt(message)
            .allow_empty(true);
        if let Some(default) = default {
            input = input.default(default.to_string());
        }
        Ok(run_blocking(|| input.interact_text())?)
    }

    fn confirm(&mut self, message: &str, default: bool) -> Result<bool, PromptError> {
        let confirm = Confirm::with_theme(&self.theme)
            .with_prompt(message)
            .default(default);
        Ok(run_blocking(|| confirm.interact())?)
    }
}

/// Asks until a non-blank answer is given.
pub fn ask_required<P: Prompter + ?Sized>(
    prompter: &mut P,
    message: &str,
    missing: &str,
) -> Result<String, PromptError> {
    loop {
        let answer = prompter.text(message, None)?;
        let answer = answer.trim();
        if !answer.is_empty() {
            return Ok(answer.to_string());
        }
        debug!(message, "Rejected blank answer");
        prompter.warn(missing);
    }
}

/// Asks until the answer is a real `YYYY-MM-DD` date.
pub fn ask_date<P: Prompter + ?Sized>(
    prompter: &mut P,
    message: &str,
) -> Result<NaiveDate, PromptError> {
    loop {
        let answer = prompter.text(message, None)?;
        match parse_date(&answer) {
            Ok(date) => return Ok(date),
            Err(e) => {
                debug!(answer, error = %e, "Rejected date answer");
                prompter.warn("Invalid date format (YYYY-MM-DD)");
            }
        }
    }
}
