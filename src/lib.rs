pub mod application;
pub mod cli;
pub mod connector;
pub mod domain;

pub use application::{AskPromptUseCase, InferenceService, RetryExecutor, Retryable};

pub use connector::{
    build_router, serve, AskController, Container, ContainerConfig, ErrorBody, OllamaClient,
    ASK_PATH, DEFAULT_REQUEST_MODEL,
};

pub use domain::{BackendConfig, DomainError, InferenceResult, PromptRequest, RetryPolicy};
