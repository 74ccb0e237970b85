//! Console prompts.

use anyhow::{Context, Result};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input};

/// Asks the user for values - enables scripted answers in tests.
pub trait Prompter {
    /// Reads a line of text. Empty answers are allowed only if `allow_empty`.
    fn input(&mut self, prompt: &str, allow_empty: bool) -> Result<String>;

    /// Asks a yes/no question; the default answer is no.
    fn confirm(&mut self, prompt: &str) -> Result<bool>;
}

/// Interactive terminal prompts.
pub struct ConsolePrompter {
    theme: ColorfulTheme,
}

impl ConsolePrompter {
    pub fn new() -> Self {
        Self { theme: ColorfulTheme::default() }
    }
}

impl Default for ConsolePrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompter for ConsolePrompter {
    fn input(&mut self, prompt: &str, allow_empty: bool) -> Result<String> {
        Input::<String>::with_theme(&self.theme)
            .with_prompt(prompt)
            .allow_empty(allow_empty)
            .interact_text()
            .context("Failed to read input")
    }

    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        Confirm::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(false)
            .interact()
            .context("Failed to read answer")
    }
}
