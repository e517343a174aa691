use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use crate::connector::api::ContainerConfig;
use crate::domain::{
    BackendConfig, DomainError, RetryPolicy, DEFAULT_API_URL, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS,
};

#[derive(Parser, Debug)]
#[command(name = "llm-gateway")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub backend: BackendArgs,

    #[command(flatten)]
    pub retry: RetryArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug, Clone)]
pub struct BackendArgs {
    /// Ollama generate endpoint
    #[arg(long, global = true, env = "OLLAMA_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Model used when a request reaches the backend without one
    #[arg(long, global = true, env = "OLLAMA_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Connect and read timeout for backend calls, in seconds
    #[arg(long, global = true, env = "OLLAMA_TIMEOUT_SECONDS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,
}

#[derive(Args, Debug, Clone)]
pub struct RetryArgs {
    /// Total attempts per request, including the first
    #[arg(long, global = true, env = "GATEWAY_RETRY_MAX_ATTEMPTS", default_value_t = 3)]
    pub max_attempts: u32,

    #[arg(long, global = true, env = "GATEWAY_RETRY_INITIAL_DELAY_MS", default_value_t = 1000)]
    pub initial_delay_ms: u64,

    #[arg(long, global = true, env = "GATEWAY_RETRY_MULTIPLIER", default_value_t = 2.0)]
    pub multiplier: f64,

    #[arg(long, global = true, env = "GATEWAY_RETRY_MAX_DELAY_MS", default_value_t = 10000)]
    pub max_delay_ms: u64,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP gateway
    Serve {
        #[arg(long, default_value = "127.0.0.1")]
        host: IpAddr,

        #[arg(short, long, default_value_t = 8080)]
        port: u16,

        /// Bind to 0.0.0.0 instead of --host, exposing the gateway on all network interfaces
        #[arg(long)]
        public: bool,
    },

    /// Send a single prompt and print the generated text
    Ask {
        prompt: String,

        /// Model for this prompt (the backend default is used when omitted)
        #[arg(long = "use-model")]
        use_model: Option<String>,
    },
}

/// Socket address for `serve`. `public` overrides `host` with `0.0.0.0`.
pub fn listen_addr(host: IpAddr, port: u16, public: bool) -> SocketAddr {
    let ip = if public {
        IpAddr::V4(Ipv4Addr::UNSPECIFIED)
    } else {
        host
    };
    SocketAddr::new(ip, port)
}

impl BackendArgs {
    pub fn to_config(&self) -> BackendConfig {
        BackendConfig::new(
            self.api_url.clone(),
            self.model.clone(),
            Duration::from_secs(self.timeout_secs),
        )
    }
}

impl RetryArgs {
    pub fn to_policy(&self) -> Result<RetryPolicy, DomainError> {
        RetryPolicy::new(
            self.max_attempts,
            Duration::from_millis(self.initial_delay_ms),
            self.multiplier,
            Duration::from_millis(self.max_delay_ms),
        )
    }
}

impl Cli {
    pub fn container_config(&self) -> Result<ContainerConfig, DomainError> {
        Ok(ContainerConfig {
            backend: self.backend.to_config(),
            retry_policy: self.retry.to_policy()?,
        })
    }
}
