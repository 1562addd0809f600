//! Interactive user input.
//!
//! Resolvers never read the terminal directly; they receive a
//! [`UserPrompt`] so tests and non-interactive callers can supply answers.
//!
//! [`ScriptedPrompt`] replays queued answers and records the dialogue.
//! The `lab` binary supplies the terminal implementation.

use std::collections::VecDeque;
use std::io;
use thiserror::Error;

/// Error type for prompting.
#[derive(Debug, Error)]
pub enum PromptError {
    /// The input stream ended before an answer was given.
    #[error("input closed before an answer was given")]
    Closed,

    /// Reading or writing the terminal failed.
    #[error("terminal I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Capability to show messages and ask the user a question.
pub trait UserPrompt {
    /// Show an informational line.
    fn message(&mut self, text: &str);

    /// Ask a question and return the answer without its line terminator.
    fn ask(&mut self, prompt: &str) -> Result<String, PromptError>;

    /// Ask for a secret such as an access token.
    ///
    /// Implementations must not echo the answer.
    fn ask_secret(&mut self, prompt: &str) -> Result<String, PromptError>;
}

/// Prompt that answers from a fixed script.
///
/// Every message and question is recorded. Asking past the end of the
/// script fails with [`PromptError::Closed`].
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    answers: VecDeque<String>,
    asked: Vec<String>,
    secret_asked: Vec<String>,
    messages: Vec<String>,
}

impl ScriptedPrompt {
    /// Create a prompt that gives `answers` in order.
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Questions asked so far, secret ones included.
    pub fn asked(&self) -> &[String] {
        &self.asked
    }

    /// Questions asked through [`UserPrompt::ask_secret`].
    pub fn secret_asked(&self) -> &[String] {
        &self.secret_asked
    }

    /// Messages shown so far.
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Answers not consumed yet.
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl UserPrompt for ScriptedPrompt {
    fn message(&mut self, text: &str) {
        self.messages.push(text.to_string());
    }

    fn ask(&mut self, prompt: &str) -> Result<String, PromptError> {
        self.asked.push(prompt.to_string());
        self.answers.pop_front().ok_or(PromptError::Closed)
    }

    fn ask_secret(&mut self, prompt: &str) -> Result<String, PromptError> {
        self.secret_asked.push(prompt.to_string());
        self.ask(prompt)
    }
}
