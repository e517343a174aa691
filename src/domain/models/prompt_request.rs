use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

pub const EMPTY_PROMPT_MESSAGE: &str = "Prompt cannot be empty or null";

/// A single prompt submitted for inference.
///
/// `model` is optional; a missing or blank model falls back to the backend's
/// configured default when the request is resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptRequest {
    prompt: String,
    model: Option<String>,
}

impl PromptRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            model: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    /// Fails unless the prompt has at least one non-whitespace character.
    pub fn validate(&self) -> Result<(), DomainError> {
        validate_prompt(&self.prompt)
    }

    pub fn effective_model<'a>(&'a self, default_model: &'a str) -> &'a str {
        resolve_model(self.model.as_deref(), default_model)
    }
}

pub fn validate_prompt(prompt: &str) -> Result<(), DomainError> {
    if prompt.trim().is_empty() {
        return Err(DomainError::invalid_input(EMPTY_PROMPT_MESSAGE));
    }
    Ok(())
}

/// Returns `model` when it has text, otherwise `default_model`.
pub fn resolve_model<'a>(model: Option<&'a str>, default_model: &'a str) -> &'a str {
    match model {
        Some(m) if !m.trim().is_empty() => m,
        _ => default_model,
    }
}
