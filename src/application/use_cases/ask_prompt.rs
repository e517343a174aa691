use std::sync::Arc;
use std::time::Instant;

use tracing::{info, warn};

use crate::application::{InferenceService, RetryExecutor};
use crate::domain::{DomainError, InferenceResult, PromptRequest};

pub struct AskPromptUseCase {
    inference: Arc<dyn InferenceService>,
    retry: RetryExecutor,
}

impl AskPromptUseCase {
    pub fn new(inference: Arc<dyn InferenceService>, retry: RetryExecutor) -> Self {
        Self { inference, retry }
    }

    /// Validates the request, then calls the backend under the retry policy.
    ///
    /// Blank prompts are rejected here, before any attempt is made.
    pub async fn execute(&self, request: PromptRequest) -> Result<InferenceResult, DomainError> {
        request.validate()?;

        info!(
            "Asking backend (model={}, prompt_chars={})",
            request.model().unwrap_or("<default>"),
            request.prompt().chars().count()
        );

        let start_time = Instant::now();
        let inference = &self.inference;
        let prompt = request.prompt();
        let model = request.model();

        let result = self
            .retry
            .execute(move || inference.infer(prompt, model))
            .await;

        let elapsed = start_time.elapsed().as_secs_f64();
        match &result {
            Ok(output) => info!(
                "Backend answered with {} chars in {:.2}s",
                output.text().chars().count(),
                elapsed
            ),
            Err(e) => warn!("Backend request failed after {:.2}s: {}", elapsed, e),
        }

        result
    }

    pub async fn ask(
        &self,
        prompt: &str,
        model: Option<&str>,
    ) -> Result<InferenceResult, DomainError> {
        let mut request = PromptRequest::new(prompt);
        if let Some(model) = model {
            request = request.with_model(model);
        }
        self.execute(request).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;

    use super::*;
    use crate::domain::RetryPolicy;

    /// Replays a fixed sequence of outcomes, repeating the last one.
    struct ScriptedInference {
        script: Mutex<Vec<Result<InferenceResult, DomainError>>>,
        calls: AtomicU32,
        models: Mutex<Vec<Option<String>>>,
    }

    impl ScriptedInference {
        fn new(script: Vec<Result<InferenceResult, DomainError>>) -> Self {
            Self {
                script: Mutex::new(script),
                calls: AtomicU32::new(0),
                models: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    fn replay(outcome: &Result<InferenceResult, DomainError>) -> Result<InferenceResult, DomainError> {
        match outcome {
            Ok(result) => Ok(result.clone()),
            Err(DomainError::HttpStatus(code)) => Err(DomainError::HttpStatus(*code)),
            Err(DomainError::Protocol(msg)) => Err(DomainError::protocol(msg.clone())),
            Err(DomainError::Transport(msg)) => Err(DomainError::transport(msg.clone())),
            Err(other) => Err(DomainError::internal(other.to_string())),
        }
    }

    #[async_trait]
    impl InferenceService for ScriptedInference {
        async fn infer(
            &self,
            _prompt: &str,
            model: Option<&str>,
        ) -> Result<InferenceResult, DomainError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) as usize;
            self.models.lock().unwrap().push(model.map(String::from));
            let script = self.script.lock().unwrap();
            let outcome = script.get(n).or_else(|| script.last()).expect("empty script");
            replay(outcome)
        }
    }

    fn fast_retry() -> RetryExecutor {
        RetryExecutor::new(
            RetryPolicy::new(3, Duration::from_millis(1), 2.0, Duration::from_millis(5)).unwrap(),
        )
    }

    #[tokio::test]
    async fn blank_prompt_never_reaches_backend() {
        let backend = Arc::new(ScriptedInference::new(vec![Ok(InferenceResult::new("x"))]));
        let use_case = AskPromptUseCase::new(backend.clone(), fast_retry());

        let err = use_case.ask("   ", None).await.unwrap_err();

        assert!(err.is_invalid_input());
        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn returns_backend_text() {
        let backend = Arc::new(ScriptedInference::new(vec![Ok(InferenceResult::new(
            "Hi there",
        ))]));
        let use_case = AskPromptUseCase::new(backend.clone(), fast_retry());

        let result = use_case.ask("Hello world", Some("llama3:8b")).await.unwrap();

        assert_eq!(result.text(), "Hi there");
        assert_eq!(backend.calls(), 1);
        assert_eq!(
            backend.models.lock().unwrap().as_slice(),
            &[Some("llama3:8b".to_string())]
        );
    }

    #[tokio::test]
    async fn retries_transient_failures_until_success() {
        let backend = Arc::new(ScriptedInference::new(vec![
            Err(DomainError::HttpStatus(503)),
            Err(DomainError::transport("connection reset")),
            Ok(InferenceResult::new("finally")),
        ]));
        let use_case = AskPromptUseCase::new(backend.clone(), fast_retry());

        let result = use_case.ask("Hello", None).await.unwrap();

        assert_eq!(result.text(), "finally");
        assert_eq!(backend.calls(), 3);
    }

    #[tokio::test]
    async fn surfaces_last_error_when_attempts_run_out() {
        let backend = Arc::new(ScriptedInference::new(vec![Err(DomainError::HttpStatus(500))]));
        let use_case = AskPromptUseCase::new(backend.clone(), fast_retry());

        let err = use_case.ask("Hello", None).await.unwrap_err();

        assert_eq!(err.to_string(), "HTTP error code: 500");
        assert_eq!(backend.calls(), 3);
    }

    #[tokio::test]
    async fn protocol_error_is_returned_after_one_attempt() {
        let backend = Arc::new(ScriptedInference::new(vec![Err(DomainError::protocol(
            "missing 'response' field",
        ))]));
        let use_case = AskPromptUseCase::new(backend.clone(), fast_retry());

        let err = use_case.ask("Hello", None).await.unwrap_err();

        assert!(err.is_protocol());
        assert_eq!(backend.calls(), 1);
    }
}
