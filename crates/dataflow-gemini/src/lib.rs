//! Gemini text generation for dataflow.
//!
//! This crate issues prompt requests to a rate-limited generation service:
//! - [`CredentialPool`] rotates through interchangeable API keys
//! - [`Transport`] sends one request; [`HttpTransport`] is the REST implementation
//! - [`GeminiClient`] retries quota, empty and malformed-JSON failures under one
//!   bounded attempt budget and returns normalized text
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use dataflow_gemini::{CredentialPool, GeminiClient, GenerationRequest, HttpTransport};
//!
//! let pool = Arc::new(CredentialPool::new(["key-1", "key-2"])?);
//! let client = GeminiClient::new(HttpTransport::default(), pool);
//! let diagram = client.generate(&GenerationRequest::new("Return an erDiagram for a blog"))?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod client;
mod credentials;
mod error;
mod request;
mod transport;

pub use client::{DEFAULT_MAX_ATTEMPTS, GeminiClient};
pub use credentials::{Credential, CredentialPool};
pub use error::{FailureKind, GenerationError, PoolError, TransportError};
pub use request::{GenerationConfig, GenerationRequest};
pub use transport::{
    DEFAULT_API_VERSION, DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TIMEOUT, HttpTransport,
    Transport, create_agent,
};
