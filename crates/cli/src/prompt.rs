//! Terminal transport for interactive completion.
//!
//! The retry/validation loop lives in `skel-core`; this only reads lines
//! and relays messages.

use std::io;

use dialoguer::theme::ColorfulTheme;
use dialoguer::Input;
use skel_core::PromptInput;

pub struct TerminalPrompt {
    theme: ColorfulTheme,
}

impl TerminalPrompt {
    pub fn new() -> Self {
        Self { theme: ColorfulTheme::default() }
    }
}

impl PromptInput for TerminalPrompt {
    fn read_line(&mut self, prompt: &str) -> io::Result<String> {
        Input::<String>::with_theme(&self.theme)
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
            .map_err(|err| match err {
                dialoguer::Error::IO(io_err) => io_err,
            })
    }

    fn show(&mut self, text: &str) {
        eprintln!("{text}");
    }
}
