use async_trait::async_trait;

use crate::domain::{DomainError, InferenceResult};

/// Sends one prompt to an inference backend and returns the generated text.
///
/// Implementors own transport, serialization and failure classification.
/// A single call is one attempt; retrying is left to the caller.
#[async_trait]
pub trait InferenceService: Send + Sync {
    /// Generate text for `prompt` using `model`, or the implementor's default
    /// model when `model` is `None` or blank.
    async fn infer(&self, prompt: &str, model: Option<&str>) -> Result<InferenceResult, DomainError>;
}
