use std::sync::Arc;

use anyhow::Result;
use tracing::debug;

use crate::application::{AskPromptUseCase, InferenceService, RetryExecutor};
use crate::connector::adapter::OllamaClient;
use crate::domain::{BackendConfig, RetryPolicy};

#[derive(Debug, Clone, Default)]
pub struct ContainerConfig {
    pub backend: BackendConfig,
    pub retry_policy: RetryPolicy,
}

/// Process-wide wiring. Built once at startup and shared read-only by every
/// request.
pub struct Container {
    inference: Arc<dyn InferenceService>,
    config: ContainerConfig,
}

impl Container {
    pub fn new(config: ContainerConfig) -> Result<Self> {
        debug!(
            "Using Ollama backend at {} (default model {}, timeout {}s)",
            config.backend.endpoint_url(),
            config.backend.default_model(),
            config.backend.timeout().as_secs()
        );
        let client = OllamaClient::new(config.backend.clone())?;
        Ok(Self::with_inference(config, Arc::new(client)))
    }

    /// Wire the container around an already-built inference service.
    pub fn with_inference(config: ContainerConfig, inference: Arc<dyn InferenceService>) -> Self {
        Self { inference, config }
    }

    pub fn ask_use_case(&self) -> AskPromptUseCase {
        AskPromptUseCase::new(
            self.inference.clone(),
            RetryExecutor::new(self.config.retry_policy.clone()),
        )
    }

    pub fn backend(&self) -> &BackendConfig {
        &self.config.backend
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.config.retry_policy
    }
}
