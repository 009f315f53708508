//! Scripted UI for tests.
//!
//! [`MockUI`] answers prompts from scripted responses and keeps an ordered
//! log of everything shown, so tests can assert both what was displayed and
//! in which order.
//!
//! # Example
//!
//! ```
//! use pyboot::ui::{ConfirmationPort, MockUI, UiEvent, UserInterface};
//!
//! let mut ui = MockUI::new();
//! ui.set_prompt_response("replace_venv", "yes");
//!
//! assert!(ui.ask_yes_no("replace_venv", "Replace it?", false).unwrap());
//! ui.success("Done!");
//!
//! assert_eq!(ui.prompts_shown(), &["replace_venv"]);
//! assert_eq!(ui.events().last(), Some(&UiEvent::Success("Done!".into())));
//! ```

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use crate::error::Result;

use super::{parse_yes, OutputMode, Prompt, PromptResult, PromptType, SpinnerHandle, UserInterface};

/// One thing the workflow showed or asked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    Message(String),
    Success(String),
    Warning(String),
    Error(String),
    Header(String),
    Hint(String),
    Spinner(String),
    /// A spinner finished, with how and the final line.
    SpinnerDone(SpinnerStatus, String),
    /// A prompt, by key.
    Prompt(String),
    ErrorBlock {
        command: String,
        output: String,
        hint: Option<String>,
    },
}

/// UI double with scripted answers.
///
/// Answers are looked up per prompt key: queued answers first, then the
/// fixed answer, then the prompt's default. A confirm with nothing to go on
/// is answered "no".
#[derive(Debug, Default)]
pub struct MockUI {
    mode: OutputMode,
    // Shared with the spinners this UI hands out.
    events: Rc<RefCell<Vec<UiEvent>>>,
    answers: HashMap<String, String>,
    queued: HashMap<String, VecDeque<String>>,
}

impl MockUI {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mode(mode: OutputMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Answer every `key` prompt with `response`.
    pub fn set_prompt_response(&mut self, key: &str, response: &str) {
        self.answers.insert(key.to_string(), response.to_string());
    }

    /// Answer the next `key` prompts with `responses`, in order.
    pub fn queue_prompt_responses(&mut self, key: &str, responses: Vec<&str>) {
        self.queued
            .entry(key.to_string())
            .or_default()
            .extend(responses.into_iter().map(String::from));
    }

    /// Everything shown so far, in order.
    pub fn events(&self) -> Vec<UiEvent> {
        self.events.borrow().clone()
    }

    fn record(&self, event: UiEvent) {
        self.events.borrow_mut().push(event);
    }

    fn texts(&self, pick: impl Fn(&UiEvent) -> Option<&String>) -> Vec<String> {
        self.events.borrow().iter().filter_map(pick).cloned().collect()
    }

    pub fn messages(&self) -> Vec<String> {
        self.texts(|e| match e {
            UiEvent::Message(s) => Some(s),
            _ => None,
        })
    }

    pub fn successes(&self) -> Vec<String> {
        self.texts(|e| match e {
            UiEvent::Success(s) => Some(s),
            _ => None,
        })
    }

    pub fn warnings(&self) -> Vec<String> {
        self.texts(|e| match e {
            UiEvent::Warning(s) => Some(s),
            _ => None,
        })
    }

    pub fn errors(&self) -> Vec<String> {
        self.texts(|e| match e {
            UiEvent::Error(s) => Some(s),
            _ => None,
        })
    }

    pub fn headers(&self) -> Vec<String> {
        self.texts(|e| match e {
            UiEvent::Header(s) => Some(s),
            _ => None,
        })
    }

    pub fn hints(&self) -> Vec<String> {
        self.texts(|e| match e {
            UiEvent::Hint(s) => Some(s),
            _ => None,
        })
    }

    /// Spinner labels, in start order.
    pub fn spinners(&self) -> Vec<String> {
        self.texts(|e| match e {
            UiEvent::Spinner(s) => Some(s),
            _ => None,
        })
    }

    /// How each finished spinner ended, in finish order.
    pub fn spinner_outcomes(&self) -> Vec<(SpinnerStatus, String)> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                UiEvent::SpinnerDone(status, msg) => Some((*status, msg.clone())),
                _ => None,
            })
            .collect()
    }

    /// Prompt keys, in the order they were asked.
    pub fn prompts_shown(&self) -> Vec<String> {
        self.texts(|e| match e {
            UiEvent::Prompt(s) => Some(s),
            _ => None,
        })
    }

    /// Error blocks as (command, output, hint).
    pub fn error_blocks(&self) -> Vec<(String, String, Option<String>)> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                UiEvent::ErrorBlock {
                    command,
                    output,
                    hint,
                } => Some((command.clone(), output.clone(), hint.clone())),
                _ => None,
            })
            .collect()
    }

    pub fn has_message(&self, needle: &str) -> bool {
        self.messages().iter().any(|m| m.contains(needle))
    }

    pub fn has_success(&self, needle: &str) -> bool {
        self.successes().iter().any(|m| m.contains(needle))
    }

    pub fn has_warning(&self, needle: &str) -> bool {
        self.warnings().iter().any(|m| m.contains(needle))
    }

    pub fn has_error(&self, needle: &str) -> bool {
        self.errors().iter().any(|m| m.contains(needle))
    }

    pub fn has_hint(&self, needle: &str) -> bool {
        self.hints().iter().any(|m| m.contains(needle))
    }

    fn answer_for(&mut self, prompt: &Prompt) -> String {
        if let Some(next) = self
            .queued
            .get_mut(&prompt.key)
            .and_then(VecDeque::pop_front)
        {
            return next;
        }
        self.answers
            .get(&prompt.key)
            .or(prompt.default.as_ref())
            .cloned()
            .unwrap_or_default()
    }
}

impl UserInterface for MockUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        self.record(UiEvent::Message(msg.to_string()));
    }

    fn success(&mut self, msg: &str) {
        self.record(UiEvent::Success(msg.to_string()));
    }

    fn warning(&mut self, msg: &str) {
        self.record(UiEvent::Warning(msg.to_string()));
    }

    fn error(&mut self, msg: &str) {
        self.record(UiEvent::Error(msg.to_string()));
    }

    fn prompt(&mut self, prompt: &Prompt) -> Result<PromptResult> {
        self.record(UiEvent::Prompt(prompt.key.clone()));
        let answer = self.answer_for(prompt);
        Ok(match prompt.prompt_type {
            PromptType::Confirm => PromptResult::Bool(parse_yes(&answer)),
            PromptType::Input => PromptResult::String(answer),
        })
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        self.record(UiEvent::Spinner(message.to_string()));
        Box::new(MockSpinner {
            events: Rc::clone(&self.events),
        })
    }

    fn show_header(&mut self, title: &str) {
        self.record(UiEvent::Header(title.to_string()));
    }

    fn show_hint(&mut self, hint: &str) {
        self.record(UiEvent::Hint(hint.to_string()));
    }

    fn show_error_block(&mut self, command: &str, output: &str, hint: Option<&str>) {
        self.record(UiEvent::ErrorBlock {
            command: command.to_string(),
            output: output.to_string(),
            hint: hint.map(String::from),
        });
    }
}

/// How a spinner was finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinnerStatus {
    Success,
    Error,
    Skipped,
}

/// Spinner handed out by [`MockUI`]; its outcome lands in the UI's event log.
#[derive(Debug)]
pub struct MockSpinner {
    events: Rc<RefCell<Vec<UiEvent>>>,
}

impl MockSpinner {
    fn finish(&mut self, status: SpinnerStatus, msg: &str) {
        self.events
            .borrow_mut()
            .push(UiEvent::SpinnerDone(status, msg.to_string()));
    }
}

impl SpinnerHandle for MockSpinner {
    fn finish_success(&mut self, msg: &str) {
        self.finish(SpinnerStatus::Success, msg);
    }

    fn finish_error(&mut self, msg: &str) {
        self.finish(SpinnerStatus::Error, msg);
    }

    fn finish_skipped(&mut self, msg: &str) {
        self.finish(SpinnerStatus::Skipped, msg);
    }
}
