//! User interface: status output, spinners, and consent prompts.
//!
//! This module provides:
//! - [`UserInterface`] trait for UI abstraction
//! - [`ConfirmationPort`], the yes/no and text questions provisioning asks
//! - [`TerminalUI`] for interactive terminal usage
//! - [`NonInteractiveUI`] for CI/headless environments
//! - [`MockUI`] for tests
//!
//! # Example
//!
//! ```
//! use pyboot::ui::{create_ui, ConfirmationPort, OutputMode};
//!
//! // Non-interactive UIs answer with the prompt default
//! let mut ui = create_ui(false, OutputMode::Quiet);
//! let replace = ui.ask_yes_no("replace_venv", "Replace it?", false).unwrap();
//! assert!(!replace);
//! ```

pub mod hints;
pub mod mock;
pub mod non_interactive;
pub mod output;
pub mod prompts;
pub mod spinner;
pub mod terminal;
pub mod theme;

pub use mock::{MockSpinner, MockUI, SpinnerStatus, UiEvent};
pub use non_interactive::{NonInteractiveUI, PROMPT_ENV_PREFIX};
pub use output::OutputMode;
pub use prompts::prompt_user;
pub use spinner::ProgressSpinner;
pub use terminal::{create_ui, TerminalUI};
pub use theme::{should_use_colors, PybootTheme};

use crate::error::Result;

/// Everything the provisioning workflow shows or asks goes through here.
///
/// Three implementations: [`TerminalUI`] for a person at a terminal,
/// [`NonInteractiveUI`] for CI, and [`MockUI`] for tests.
pub trait UserInterface {
    /// The mode the run was started with; tool runners follow it too.
    fn output_mode(&self) -> OutputMode;

    /// Progress text; hidden in quiet mode.
    fn message(&mut self, msg: &str);

    fn success(&mut self, msg: &str);

    fn warning(&mut self, msg: &str);

    fn error(&mut self, msg: &str);

    /// Ask a question. Prefer [`ConfirmationPort`] over calling this directly.
    fn prompt(&mut self, prompt: &Prompt) -> Result<PromptResult>;

    /// Begin a long-running step.
    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle>;

    fn show_header(&mut self, title: &str);

    /// A follow-up suggestion, such as how to activate the environment.
    fn show_hint(&mut self, hint: &str);

    /// A failed tool invocation with its captured output.
    fn show_error_block(&mut self, command: &str, output: &str, hint: Option<&str>);
}

/// A running step started by [`UserInterface::start_spinner`].
pub trait SpinnerHandle {
    fn finish_success(&mut self, msg: &str);

    fn finish_error(&mut self, msg: &str);

    /// The step turned out to be unnecessary.
    fn finish_skipped(&mut self, msg: &str);
}

/// One question for the user.
#[derive(Debug, Clone)]
pub struct Prompt {
    /// Stable identifier; `PYBOOT_PROMPT_<KEY>` answers it non-interactively.
    pub key: String,
    pub question: String,
    pub prompt_type: PromptType,
    /// Answer used when the user just presses enter.
    pub default: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptType {
    /// yes/no
    Confirm,
    /// A line of text.
    Input,
}

/// An answer to a [`Prompt`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptResult {
    Bool(bool),
    String(String),
}

impl PromptResult {
    /// The answer as text; booleans become "true" or "false".
    pub fn as_string(&self) -> String {
        match self {
            Self::Bool(b) => b.to_string(),
            Self::String(s) => s.clone(),
        }
    }

    /// Interpret as a yes/no answer.
    pub fn as_bool(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::String(s) => parse_yes(s),
        }
    }
}

/// Whether a textual answer means "yes".
pub fn parse_yes(answer: &str) -> bool {
    matches!(
        answer.trim().to_lowercase().as_str(),
        "true" | "yes" | "y" | "1"
    )
}

/// The questions provisioning asks before mutating the host.
///
/// Implemented for every [`UserInterface`], so terminal, headless, and
/// mock UIs all answer the same way.
pub trait ConfirmationPort {
    /// Ask a yes/no question.
    fn ask_yes_no(&mut self, key: &str, question: &str, default: bool) -> Result<bool>;

    /// Ask for a line of text.
    fn ask_text(&mut self, key: &str, question: &str, default: Option<&str>) -> Result<String>;
}

impl<T: UserInterface + ?Sized> ConfirmationPort for T {
    fn ask_yes_no(&mut self, key: &str, question: &str, default: bool) -> Result<bool> {
        let prompt = Prompt {
            key: key.to_string(),
            question: question.to_string(),
            prompt_type: PromptType::Confirm,
            default: Some(default.to_string()),
        };
        let answer = self.prompt(&prompt)?.as_bool();
        tracing::debug!("Prompt {} answered {}", key, answer);
        Ok(answer)
    }

    fn ask_text(&mut self, key: &str, question: &str, default: Option<&str>) -> Result<String> {
        let prompt = Prompt {
            key: key.to_string(),
            question: question.to_string(),
            prompt_type: PromptType::Input,
            default: default.map(str::to_string),
        };
        Ok(self.prompt(&prompt)?.as_string().trim().to_string())
    }
}
