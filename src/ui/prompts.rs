//! Interactive prompts.

use console::Term;
use dialoguer::{Confirm, Input};

use crate::error::{ProvisionError, Result};

use super::{parse_yes, Prompt, PromptResult, PromptType};

/// Convert dialoguer errors to ProvisionError.
fn map_dialoguer_err(e: dialoguer::Error) -> ProvisionError {
    ProvisionError::Io(e.into())
}

/// Prompt the user on the terminal.
pub fn prompt_user(prompt: &Prompt, term: &Term) -> Result<PromptResult> {
    match prompt.prompt_type {
        PromptType::Confirm => prompt_confirm(prompt, term),
        PromptType::Input => prompt_input(prompt, term),
    }
}

fn prompt_confirm(prompt: &Prompt, term: &Term) -> Result<PromptResult> {
    let default = prompt.default.as_deref().map(parse_yes).unwrap_or(false);

    let result = Confirm::new()
        .with_prompt(&prompt.question)
        .default(default)
        .interact_on(term)
        .map_err(map_dialoguer_err)?;

    Ok(PromptResult::Bool(result))
}

fn prompt_input(prompt: &Prompt, term: &Term) -> Result<PromptResult> {
    let input = Input::<String>::new()
        .with_prompt(&prompt.question)
        .allow_empty(true);

    let result: String = match &prompt.default {
        Some(default) if !default.is_empty() => input
            .default(default.clone())
            .interact_on(term)
            .map_err(map_dialoguer_err)?,
        _ => input.interact_on(term).map_err(map_dialoguer_err)?,
    };

    Ok(PromptResult::String(result))
}
