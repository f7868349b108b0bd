//! Validated interactive input
//!
//! Uses dialoguer for terminal prompts. The same validators check values
//! given on the command line.

use std::path::Path;

use dialoguer::{Input, Select};
use dirfilter_io_fs::normalize_path;

use crate::cli::Commands;
use crate::error::{CliError, Result};

const C_MSG_EMPTY_INPUT: &str = "Input cannot be empty. Try again.";

/// A validation rule for one user-supplied value.
#[derive(Debug, Clone, Copy)]
pub struct SpecInputValidator {
    pub validator: fn(&str) -> bool,
    /// Normalize the trimmed input as a path before validating it.
    pub if_treat_as_path: bool,
    /// Shown when `validator` rejects the input.
    pub message: &'static str,
}

pub const SPEC_EXISTING_DIR: SpecInputValidator = SpecInputValidator {
    validator: is_valid_dir,
    if_treat_as_path: true,
    message: "Invalid path or not a directory. Try again.",
};

pub const SPEC_EXISTING_TXT_FILE: SpecInputValidator = SpecInputValidator {
    validator: is_valid_txt_file,
    if_treat_as_path: true,
    message: "Invalid path, not a file, or not a .txt file. Try again.",
};

pub fn is_valid_dir(path: &str) -> bool {
    Path::new(path).is_dir()
}

pub fn is_valid_file(path: &str) -> bool {
    Path::new(path).is_file()
}

/// An existing file whose extension is `txt` in any case.
pub fn is_valid_txt_file(path: &str) -> bool {
    is_valid_file(path)
        && Path::new(path)
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("txt"))
}

/// Check one raw value against `spec`.
///
/// Returns `Ok(None)` for blank input when `if_allow_empty` is set, otherwise
/// the trimmed (and for paths, normalized) value. `Err` carries the message
/// to show the operator.
pub fn validate_input(
    raw: &str,
    spec: &SpecInputValidator,
    if_allow_empty: bool,
) -> std::result::Result<Option<String>, String> {
    let c_trimmed = raw.trim();
    if c_trimmed.is_empty() {
        return if if_allow_empty {
            Ok(None)
        } else {
            Err(C_MSG_EMPTY_INPUT.to_string())
        };
    }

    let c_value = if spec.if_treat_as_path {
        normalize_path(Path::new(c_trimmed))
            .to_string_lossy()
            .into_owned()
    } else {
        c_trimmed.to_string()
    };

    if (spec.validator)(&c_value) {
        Ok(Some(c_value))
    } else {
        Err(spec.message.to_string())
    }
}

/// Use `value` when given (rejecting it if invalid), otherwise prompt until
/// a valid value is entered.
pub fn resolve_argument(
    value: Option<String>,
    c_prompt: &str,
    spec: &SpecInputValidator,
) -> Result<String> {
    match value {
        Some(raw) => match validate_input(&raw, spec, false) {
            Ok(Some(c_value)) => Ok(c_value),
            Ok(None) => Err(CliError::invalid_input(C_MSG_EMPTY_INPUT)),
            Err(message) => Err(CliError::invalid_input(format!("'{raw}': {message}"))),
        },
        None => prompt_validated(c_prompt, spec),
    }
}

/// Prompt repeatedly until the input passes `spec`.
pub fn prompt_validated(c_prompt: &str, spec: &SpecInputValidator) -> Result<String> {
    let raw: String = Input::new()
        .with_prompt(c_prompt)
        .validate_with(|input: &String| -> std::result::Result<(), String> {
            validate_input(input, spec, false).map(|_| ())
        })
        .interact_text()?;

    match validate_input(&raw, spec, false) {
        Ok(Some(c_value)) => Ok(c_value),
        Ok(None) => Err(CliError::invalid_input(C_MSG_EMPTY_INPUT)),
        Err(message) => Err(CliError::invalid_input(message)),
    }
}

/// Free-text prompt; blank input yields `default`.
pub fn prompt_text_with_default(c_prompt: &str, default: &str) -> Result<String> {
    let value: String = Input::new()
        .with_prompt(c_prompt)
        .default(default.to_string())
        .interact_text()?;
    let c_trimmed = value.trim();
    if c_trimmed.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(c_trimmed.to_string())
    }
}

/// Ask which action to run.
pub fn prompt_action() -> Result<Commands> {
    let l_items = [
        "scan   - list a directory into a .txt file",
        "filter - copy entries not listed in a .txt file",
    ];
    let idx = Select::new()
        .with_prompt("Choose an action")
        .items(&l_items)
        .default(0)
        .interact()?;

    Ok(match idx {
        0 => Commands::Scan {
            directory: None,
            output: None,
        },
        _ => Commands::filter_default(),
    })
}
