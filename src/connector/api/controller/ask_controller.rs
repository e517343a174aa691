use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, PromptRequest};

use super::super::Container;

/// Model used when the caller sends no `model` parameter (or an empty one).
///
/// This is distinct from the backend's configured default model, which only
/// applies when the model reaching the backend client is blank.
pub const DEFAULT_REQUEST_MODEL: &str = "llama3:8b";

pub const INVALID_PARAMETER_MESSAGE: &str = "Please check your input parameters";

/// Query parameters of `GET /api/ai/ask`.
#[derive(Debug, Deserialize)]
pub struct AskParams {
    pub prompt: String,
    #[serde(default)]
    pub model: Option<String>,
}

/// JSON body returned for every failed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }
}

pub struct AskController<'a> {
    container: &'a Container,
}

impl<'a> AskController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn ask(&self, prompt: String, model: Option<String>) -> Result<String, DomainError> {
        let request = PromptRequest::new(prompt).with_model(request_model(model));
        let use_case = self.container.ask_use_case();
        let result = use_case.execute(request).await?;
        Ok(result.into_text())
    }

    /// Runs [`Self::ask`] and renders the outcome as an HTTP response.
    pub async fn respond(&self, params: AskParams) -> Response {
        match self.ask(params.prompt, params.model).await {
            Ok(text) => (StatusCode::OK, text).into_response(),
            Err(e) => error_response(&e),
        }
    }
}

/// Applies the request-level model default to a missing or empty parameter.
pub fn request_model(model: Option<String>) -> String {
    match model {
        Some(m) if !m.is_empty() => m,
        _ => DEFAULT_REQUEST_MODEL.to_string(),
    }
}

/// Validation failures are the caller's fault; everything else, whether the
/// backend was unreachable or answered garbage, is reported as a server error.
pub fn error_response(error: &DomainError) -> Response {
    if error.is_invalid_input() {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorBody::new("Invalid request", error.to_string())),
        )
            .into_response()
    } else {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorBody::new("Error processing your request", error.to_string())),
        )
            .into_response()
    }
}

pub fn invalid_parameter_response() -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorBody::new("Invalid parameter", INVALID_PARAMETER_MESSAGE)),
    )
        .into_response()
}
