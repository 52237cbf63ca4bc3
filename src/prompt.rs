// src/prompt.rs
// =============================================================================
// Interactive questions asked while collecting the fetch parameters.
//
// The Prompter trait keeps the command logic free of terminal handling;
// TerminalPrompter renders with dialoguer.
// =============================================================================

use anyhow::{Context, Result};
use dialoguer::{theme::ColorfulTheme, Input, MultiSelect};

pub trait Prompter {
    /// Free-text answer; empty answers are rejected
    fn ask(&mut self, question: &str) -> Result<String>;

    /// Free-text answer that may be left empty
    fn ask_optional(&mut self, question: &str) -> Result<Option<String>>;

    /// The options the user ticked, in option order
    fn multi_select(&mut self, message: &str, options: &[String]) -> Result<Vec<String>>;
}

pub struct TerminalPrompter {
    theme: ColorfulTheme,
}

impl TerminalPrompter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Default for TerminalPrompter {
    fn default() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }
}

impl Prompter for TerminalPrompter {
    fn ask(&mut self, question: &str) -> Result<String> {
        let answer = Input::<String>::with_theme(&self.theme)
            .with_prompt(question)
            .interact_text()
            .with_context(|| format!("Failed to read answer to '{}'", question))?;
        Ok(answer.trim().to_string())
    }

    fn ask_optional(&mut self, question: &str) -> Result<Option<String>> {
        let answer = Input::<String>::with_theme(&self.theme)
            .with_prompt(question)
            .allow_empty(true)
            .interact_text()
            .with_context(|| format!("Failed to read answer to '{}'", question))?;

        let answer = answer.trim();
        Ok((!answer.is_empty()).then(|| answer.to_string()))
    }

    fn multi_select(&mut self, message: &str, options: &[String]) -> Result<Vec<String>> {
        let picked = MultiSelect::with_theme(&self.theme)
            .with_prompt(message)
            .items(options)
            .interact()
            .context("Failed to read file selection")?;

        Ok(picked
            .into_iter()
            .filter_map(|idx| options.get(idx).cloned())
            .collect())
    }
}
