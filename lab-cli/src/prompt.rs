//! Terminal prompt for interactive resolution.

use std::io;

use dialoguer::{Input, Password};
use lab_core::{PromptError, UserPrompt};

/// Prompt on the process terminal.
///
/// Messages and questions go to stderr so stdout stays clean for command
/// output. Secrets are read with echo disabled.
#[derive(Debug, Default)]
pub struct TerminalPrompt;

impl TerminalPrompt {
    pub fn new() -> Self {
        Self
    }
}

impl UserPrompt for TerminalPrompt {
    fn message(&mut self, text: &str) {
        eprintln!("{}", text);
    }

    fn ask(&mut self, prompt: &str) -> Result<String, PromptError> {
        let answer: String = Input::new()
            .with_prompt(question(prompt))
            .allow_empty(true)
            .interact_text()
            .map_err(input_error)?;
        Ok(answer.trim().to_string())
    }

    fn ask_secret(&mut self, prompt: &str) -> Result<String, PromptError> {
        Password::new()
            .with_prompt(question(prompt))
            .allow_empty_password(true)
            .interact()
            .map_err(input_error)
    }
}

/// dialoguer appends its own `: ` after the prompt text.
fn question(prompt: &str) -> &str {
    prompt.trim_end().trim_end_matches(':')
}

fn input_error(e: dialoguer::Error) -> PromptError {
    let dialoguer::Error::IO(source) = e;
    if source.kind() == io::ErrorKind::UnexpectedEof {
        return PromptError::Closed;
    }
    PromptError::Io(source)
}
