//! The interactive completion loop.
//!
//! Transport is delegated through [`PromptInput`]: the CLI wires a terminal
//! behind it, tests wire a scripted queue. The retry loop is unbounded -
//! this is an interactive-only path, bounded by user patience.

use std::collections::VecDeque;
use std::io;

use thiserror::Error;
use tracing::debug;

use super::types::Var;

/// Reading a line from the prompting transport failed.
#[derive(Debug, Error)]
#[error("failed to read a response for '{name}': {source}")]
pub struct PromptError {
    pub name: String,
    #[source]
    pub source: io::Error,
}

/// One line of interactive input, plus a channel for messages the user
/// should see (intro texts, validation failures).
pub trait PromptInput {
    /// Display `prompt` and read one response line, without its trailing
    /// newline. Blocks until the user answers.
    ///
    /// # Errors
    ///
    /// Any transport-level I/O failure; it aborts the completion pass.
    fn read_line(&mut self, prompt: &str) -> io::Result<String>;

    /// Show an informational line.
    fn show(&mut self, text: &str);
}

impl Var {
    /// Prompt until a response validates, resolving empty responses against
    /// the default. Validation failures are shown and re-prompted, never
    /// returned.
    ///
    /// # Errors
    ///
    /// [`PromptError`] if the transport itself fails.
    pub fn prompt(&self, input: &mut dyn PromptInput) -> Result<String, PromptError> {
        if let Some(intro) = self.intro() {
            input.show(intro);
        }

        let prompt = self.prompt_text();
        loop {
            let response = input.read_line(&prompt).map_err(|source| PromptError {
                name: self.name().to_string(),
                source,
            })?;
            match self.validate(&response) {
                Ok(value) => {
                    debug!(variable = self.name(), "collected value");
                    return Ok(value);
                }
                Err(invalid) => input.show(&invalid.to_string()),
            }
        }
    }
}

/// Scripted [`PromptInput`] for driving completion without a terminal.
///
/// Answers are consumed front to back; running out of answers reads as EOF.
/// Every prompt and shown message is recorded for inspection.
#[derive(Debug, Default)]
pub struct ScriptedInput {
    answers: VecDeque<String>,
    /// Prompts issued so far, in order.
    pub prompts: Vec<String>,
    /// Intro and validation lines shown so far, in order.
    pub shown: Vec<String>,
}

impl ScriptedInput {
    #[must_use]
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            prompts: Vec::new(),
            shown: Vec::new(),
        }
    }
}

impl PromptInput for ScriptedInput {
    fn read_line(&mut self, prompt: &str) -> io::Result<String> {
        self.prompts.push(prompt.to_string());
        self.answers.pop_front().ok_or_else(|| {
            io::Error::new(io::ErrorKind::UnexpectedEof, "no scripted answers left")
        })
    }

    fn show(&mut self, text: &str) {
        self.shown.push(text.to_string());
    }
}
