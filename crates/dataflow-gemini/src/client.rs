//! Retry coordination over a [`Transport`] and a [`CredentialPool`].

use std::sync::Arc;

use dataflow_erd::{ResponseShape, classify, normalize};
use tracing::{info, warn};

use crate::credentials::CredentialPool;
use crate::error::{FailureKind, GenerationError};
use crate::request::GenerationRequest;
use crate::transport::{HttpTransport, Transport};

/// Default attempt budget shared by all retryable failures.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Generation client with credential rotation and bounded retry.
///
/// One attempt budget covers every retryable failure:
/// - quota or rate limiting rotates the pool, then retries
/// - empty output retries the same request
/// - JSON-looking output that does not parse retries with a "valid JSON only"
///   directive appended to the prompt
///
/// Any other endpoint failure is returned immediately.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use dataflow_gemini::{CredentialPool, GeminiClient, GenerationRequest, HttpTransport};
///
/// let pool = Arc::new(CredentialPool::new(["key-1", "key-2"])?);
/// let client = GeminiClient::new(HttpTransport::default(), pool).max_attempts(5);
/// let text = client.generate(&GenerationRequest::new("Describe a library system"))?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct GeminiClient<T = HttpTransport> {
    transport: T,
    pool: Arc<CredentialPool>,
    max_attempts: u32,
}

impl<T: Transport> GeminiClient<T> {
    /// Create a client sharing the given credential pool.
    #[must_use]
    pub fn new(transport: T, pool: Arc<CredentialPool>) -> Self {
        Self {
            transport,
            pool,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Set the attempt budget (at least one attempt is always made).
    #[must_use]
    pub fn max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Credential pool used by this client.
    #[must_use]
    pub fn pool(&self) -> &CredentialPool {
        &self.pool
    }

    /// Generate text for a request.
    ///
    /// Returns normalized text: code fences stripped, whitespace trimmed,
    /// never empty. JSON-shaped text is guaranteed to parse.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::Transport`] for non-retryable endpoint
    /// failures and [`GenerationError::Exhausted`] when the attempt budget runs
    /// out. No partial result is returned.
    pub fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        let mut current = request.clone();
        let mut last = FailureKind::EmptyResponse;

        for attempt in 1..=self.max_attempts {
            let credential = self.pool.current();

            let raw = match self.transport.send(&credential, &current) {
                Ok(raw) => raw,
                Err(err) if err.is_quota() => {
                    self.pool.rotate();
                    warn!(
                        "Attempt {}/{}: quota exceeded, rotated to API key #{}",
                        attempt,
                        self.max_attempts,
                        self.pool.active_index()
                    );
                    last = FailureKind::QuotaExceeded;
                    continue;
                }
                Err(source) => {
                    warn!("Attempt {}/{}: {}", attempt, self.max_attempts, source);
                    return Err(GenerationError::Transport { attempt, source });
                }
            };

            let text = normalize(&raw);
            if text.is_empty() {
                warn!(
                    "Attempt {}/{}: empty response, retrying",
                    attempt, self.max_attempts
                );
                last = FailureKind::EmptyResponse;
                continue;
            }

            if classify(&text) == ResponseShape::Json
                && let Err(e) = serde_json::from_str::<serde_json::Value>(&text)
            {
                warn!(
                    "Attempt {}/{}: response is not valid JSON ({}), retrying with JSON directive",
                    attempt, self.max_attempts, e
                );
                current = request.with_json_directive();
                last = FailureKind::InvalidJson;
                continue;
            }

            info!("Received successful response on attempt {}", attempt);
            return Ok(text);
        }

        warn!(
            "Generation exhausted after {} attempts (last failure: {})",
            self.max_attempts, last
        );
        Err(GenerationError::Exhausted {
            attempts: self.max_attempts,
            last,
        })
    }
}
