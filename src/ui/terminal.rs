//! Interactive terminal UI.

use console::Term;
use std::io::Write;

use crate::error::Result;

use super::spinner::LineSpinner;
use super::{
    prompt_user, NonInteractiveUI, OutputMode, ProgressSpinner, Prompt, PromptResult,
    PybootTheme, SpinnerHandle, UserInterface,
};

/// UI for a person at a terminal: styled output, dialoguer prompts, and
/// spinners while tools run.
///
/// Progress goes to stdout; warnings, errors and failed-command output go
/// to stderr.
pub struct TerminalUI {
    out: Term,
    err: Term,
    theme: PybootTheme,
    mode: OutputMode,
}

impl TerminalUI {
    pub fn new(mode: OutputMode) -> Self {
        Self {
            out: Term::stdout(),
            err: Term::stderr(),
            theme: PybootTheme::detect(),
            mode,
        }
    }

    // Broken pipes are not worth failing a provisioning run over.
    fn out(&mut self, text: &str) {
        writeln!(self.out, "{}", text).ok();
    }

    fn err(&mut self, text: &str) {
        writeln!(self.err, "{}", text).ok();
    }
}

impl UserInterface for TerminalUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        if self.mode.shows_messages() {
            self.out(msg);
        }
    }

    fn success(&mut self, msg: &str) {
        let line = self.theme.format_success(msg);
        self.out(&line);
    }

    fn warning(&mut self, msg: &str) {
        let line = self.theme.format_warning(msg);
        self.err(&line);
    }

    fn error(&mut self, msg: &str) {
        let line = self.theme.format_error(msg);
        self.err(&line);
    }

    fn prompt(&mut self, prompt: &Prompt) -> Result<PromptResult> {
        prompt_user(prompt, &self.out)
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        if self.mode.shows_spinners() {
            return Box::new(ProgressSpinner::new(message));
        }
        // Tool output streams below this line instead.
        let line = self.theme.highlight.apply_to(message).to_string();
        self.out(&line);
        Box::new(LineSpinner::new(self.theme.clone()))
    }

    fn show_header(&mut self, title: &str) {
        if self.mode.shows_messages() {
            let line = format!("\n{}\n", self.theme.format_header(title));
            self.out(&line);
        }
    }

    fn show_hint(&mut self, hint: &str) {
        if self.mode.shows_messages() {
            let line = format!("  {}", self.theme.hint.apply_to(hint));
            self.out(&line);
        }
    }

    fn show_error_block(&mut self, command: &str, output: &str, hint: Option<&str>) {
        let block = self.theme.format_error_block(command, output, hint);
        self.err("");
        self.err(&block);
    }
}

/// Pick the UI for this run.
///
/// Prompts need a terminal on stdout; without one the run falls back to
/// [`NonInteractiveUI`] even when interactivity was requested.
pub fn create_ui(interactive: bool, mode: OutputMode) -> Box<dyn UserInterface> {
    if interactive && Term::stdout().is_term() {
        Box::new(TerminalUI::new(mode))
    } else {
        Box::new(NonInteractiveUI::new(mode))
    }
}
