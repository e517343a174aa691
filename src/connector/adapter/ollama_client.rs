use async_trait::async_trait;
use reqwest::Url;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::application::InferenceService;
use crate::domain::{resolve_model, validate_prompt, BackendConfig, DomainError, InferenceResult};

/// Field of the generate response that carries the generated text.
const RESPONSE_FIELD: &str = "response";

/// Upper bound on how much of an error body is read for logging.
const MAX_LOGGED_BODY_BYTES: usize = 512;

/// Ollama `/api/generate` request payload.
#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

/// HTTP client for Ollama's `/api/generate` endpoint.
///
/// Implements [`InferenceService`] with one POST per call. Streaming is always
/// disabled: the gateway consumes a single complete response.
///
/// Failure classification:
///
/// | Outcome                                    | Error                        |
/// |--------------------------------------------|------------------------------|
/// | blank prompt                               | `InvalidInput` (no request)  |
/// | connect/read timeout, refused, reset       | `Transport` (transient)      |
/// | non-2xx status                             | `HttpStatus` (transient)     |
/// | 2xx without a JSON `response` field        | `Protocol`                   |
///
/// The configured timeout is applied separately to connection establishment
/// and to each read of the response.
pub struct OllamaClient {
    client: reqwest::Client,
    url: Url,
    config: BackendConfig,
}

impl OllamaClient {
    pub fn new(config: BackendConfig) -> Result<Self, DomainError> {
        let url = Url::parse(config.endpoint_url()).map_err(|e| {
            DomainError::config(format!("invalid backend URL '{}': {e}", config.endpoint_url()))
        })?;

        let client = reqwest::Client::builder()
            .connect_timeout(config.timeout())
            .read_timeout(config.timeout())
            .build()
            .map_err(|e| DomainError::config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            url,
            config,
        })
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    fn transport_error(&self, e: reqwest::Error) -> DomainError {
        if e.is_timeout() {
            DomainError::transport(format!(
                "request to {} timed out after {}s",
                self.url,
                self.config.timeout().as_secs_f64()
            ))
        } else if e.is_connect() {
            DomainError::transport(format!("connection to {} failed: {e}", self.url))
        } else {
            DomainError::transport(format!("request to {} failed: {e}", self.url))
        }
    }
}

#[async_trait]
impl InferenceService for OllamaClient {
    async fn infer(&self, prompt: &str, model: Option<&str>) -> Result<InferenceResult, DomainError> {
        validate_prompt(prompt)?;

        let request = GenerateRequest {
            model: resolve_model(model, self.config.default_model()),
            prompt,
            stream: false,
        };

        debug!("POST {} (model={})", self.url, request.model);

        // The response owns the connection; it is released when dropped on
        // any of the return paths below.
        let response = self
            .client
            .post(self.url.clone())
            .json(&request)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = read_body_prefix(response, MAX_LOGGED_BODY_BYTES).await;
            warn!("Backend returned {status}: {body}");
            return Err(DomainError::HttpStatus(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(e))?;

        parse_generate_response(&body).inspect_err(|err| {
            if let DomainError::Protocol(detail) = err {
                warn!("Malformed backend response: {detail}");
            }
        })
    }
}

/// Read at most `limit` bytes of an error body. The rest is never pulled off
/// the wire.
async fn read_body_prefix(mut response: reqwest::Response, limit: usize) -> String {
    let mut buf = Vec::new();
    while buf.len() < limit {
        match response.chunk().await {
            Ok(Some(chunk)) => buf.extend_from_slice(&chunk),
            Ok(None) => break,
            Err(e) => {
                warn!("Failed to read error body: {e}");
                break;
            }
        }
    }
    truncate_for_log(&buf, limit)
}

fn truncate_for_log(body: &[u8], limit: usize) -> String {
    if body.len() <= limit {
        return String::from_utf8_lossy(body).into_owned();
    }
    format!(
        "{}... ({} bytes shown)",
        String::from_utf8_lossy(&body[..limit]),
        limit
    )
}

/// Extract the generated text from a generate response body.
///
/// A string `response` is returned verbatim; any other JSON value is rendered
/// as JSON text.
fn parse_generate_response(body: &[u8]) -> Result<InferenceResult, DomainError> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| DomainError::protocol(format!("body is not valid JSON: {e}")))?;

    match value.get(RESPONSE_FIELD) {
        Some(Value::String(text)) => Ok(InferenceResult::new(text.as_str())),
        Some(other) => Ok(InferenceResult::new(other.to_string())),
        None => Err(DomainError::protocol(format!(
            "missing '{RESPONSE_FIELD}' field"
        ))),
    }
}
