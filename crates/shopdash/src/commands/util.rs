//! Shared helpers for command handlers.

use std::io::IsTerminal;

use dialoguer::Input;

use crate::error::CliError;

/// Map a dialoguer / interactive I/O failure into CliError.
pub fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
///
/// Refuses outright when stdin is not a terminal.
pub fn confirm(message: &str, action: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Use `value` when given, otherwise prompt for it.
pub fn value_or_prompt(value: Option<String>, prompt: &str) -> Result<String, CliError> {
    if let Some(v) = value {
        return Ok(v);
    }
    Input::new()
        .with_prompt(prompt)
        .interact_text()
        .map_err(prompt_err)
}
