use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_API_URL: &str = "http://localhost:11434/api/generate";
pub const DEFAULT_MODEL: &str = "deepseek-coder:1.3b";
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Where and how to reach the inference backend.
///
/// `timeout` bounds both connection establishment and each response read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    endpoint_url: String,
    default_model: String,
    timeout: Duration,
}

impl BackendConfig {
    pub fn new(
        endpoint_url: impl Into<String>,
        default_model: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            endpoint_url: endpoint_url.into(),
            default_model: default_model.into(),
            timeout,
        }
    }

    pub fn endpoint_url(&self) -> &str {
        &self.endpoint_url
    }

    pub fn default_model(&self) -> &str {
        &self.default_model
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self::new(
            DEFAULT_API_URL,
            DEFAULT_MODEL,
            Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        )
    }
}
