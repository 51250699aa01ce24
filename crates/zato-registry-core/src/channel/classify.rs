//! Interpreting a failed `zato.http-soap.create`
//!
//! Zato does not return an error code for a duplicate channel. The only
//! signal is a free-text message (often a traceback) inside the failure
//! body, so duplicates are recognised by substring.

use serde_json::Value;

use crate::error::{RegistryError, Result};

/// Message fragment Zato emits for a duplicate object name
pub const ALREADY_EXISTS_PHRASE: &str = "already exists on this cluster";

/// What a create call without a payload meant
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateFailure {
    /// A channel with this name is already defined on the cluster
    AlreadyExists,
    /// Any other refusal, with the message Zato gave
    Other { message: String },
}

/// Classify the raw `details` text of a failed create call.
///
/// The text must be JSON carrying a `zato_env.details` string; anything else
/// is an error the caller should not swallow.
pub fn classify_create_failure(details: &str) -> Result<CreateFailure> {
    let body: Value =
        serde_json::from_str(details).map_err(|e| RegistryError::UnexpectedResponse {
            operation: super::CREATE_OPERATION.to_string(),
            message: format!("failure details are not JSON ({}): {}", e, preview(details)),
        })?;

    let message = body
        .pointer("/zato_env/details")
        .and_then(Value::as_str)
        .ok_or_else(|| RegistryError::UnexpectedResponse {
            operation: super::CREATE_OPERATION.to_string(),
            message: format!("no zato_env.details in failure: {}", preview(details)),
        })?;

    Ok(classify_message(message))
}

/// Classify an already-extracted failure message
pub fn classify_message(message: &str) -> CreateFailure {
    if message.contains(ALREADY_EXISTS_PHRASE) {
        CreateFailure::AlreadyExists
    } else {
        CreateFailure::Other {
            message: message.trim().to_string(),
        }
    }
}

fn preview(text: &str) -> String {
    const MAX: usize = 200;
    match text.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
