//! # Domain Layer
//!
//! Prompt and result models, retry policy, backend configuration and the
//! error taxonomy. Independent of HTTP frameworks and clients.

mod error;
pub mod models;

pub use error::*;
pub use models::*;
