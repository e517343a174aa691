//! # Connector Layer
//!
//! External integrations:
//! - Adapter: HTTP client for the Ollama inference backend
//! - API: dependency container, controllers and the axum HTTP boundary

pub mod adapter;
pub mod api;

pub use adapter::*;
pub use api::*;
