//! Error types for the generation client.

use std::fmt;

/// Body substrings that mark a rate-limit or quota response.
const QUOTA_MARKERS: [&str; 6] = [
    "quota",
    "rate limit",
    "rate-limit",
    "ratelimit",
    "resource_exhausted",
    "too many requests",
];

/// Error constructing a [`CredentialPool`](crate::CredentialPool).
#[derive(Debug, thiserror::Error)]
pub enum PoolError {
    /// No credentials were supplied.
    #[error("credential pool requires at least one API key")]
    Empty,

    /// A supplied credential is empty or whitespace.
    #[error("API key at position {index} is blank")]
    BlankCredential {
        /// Zero-based position in the supplied list.
        index: usize,
    },
}

/// Failure of a single call to the generation endpoint.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TransportError {
    /// Request failed before a response arrived (network error, timeout, etc).
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Endpoint returned an error status.
    #[error("HTTP error: {status} - {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body (may contain error details).
        body: String,
    },

    /// Response body could not be read or the request could not be encoded.
    #[error("I/O error: {0}")]
    Body(String),

    /// Response body does not hold `candidates[0].content.parts[0].text`.
    #[error("unexpected response shape: {0}")]
    Shape(String),
}

impl TransportError {
    /// Whether this failure signals rate limiting or quota exhaustion.
    ///
    /// Detected from HTTP 429 or from quota-related wording in the error body,
    /// since the endpoint also reports exhausted quota under other statuses.
    #[must_use]
    pub fn is_quota(&self) -> bool {
        match self {
            Self::Status { status, body } => *status == 429 || mentions_quota(body),
            Self::Http(message) => mentions_quota(message),
            Self::Body(_) | Self::Shape(_) => false,
        }
    }
}

fn mentions_quota(text: &str) -> bool {
    let lower = text.to_lowercase();
    QUOTA_MARKERS.iter().any(|marker| lower.contains(marker))
}

/// Retryable failure kinds counted against the attempt budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Endpoint reported rate limiting or quota exhaustion.
    QuotaExceeded,
    /// Endpoint returned no text, or only fences and whitespace.
    EmptyResponse,
    /// Text looked like JSON but did not parse.
    InvalidJson,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::QuotaExceeded => "quota exceeded",
            Self::EmptyResponse => "empty response",
            Self::InvalidJson => "invalid JSON",
        };
        f.write_str(s)
    }
}

/// Error from [`GeminiClient::generate`](crate::GeminiClient::generate).
///
/// Both variants carry the attempt count so callers can decide whether to
/// present a fallback payload.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// Non-retryable endpoint failure.
    #[error("generation failed on attempt {attempt}: {source}")]
    Transport {
        /// One-based attempt that failed.
        attempt: u32,
        /// Underlying transport failure.
        #[source]
        source: TransportError,
    },

    /// Every attempt in the budget failed with a retryable error.
    #[error("generation exhausted after {attempts} attempts (last failure: {last})")]
    Exhausted {
        /// Attempts made.
        attempts: u32,
        /// Failure of the final attempt.
        last: FailureKind,
    },
}

impl GenerationError {
    /// Number of attempts made before the error was surfaced.
    #[must_use]
    pub fn attempts(&self) -> u32 {
        match self {
            Self::Transport { attempt, .. } => *attempt,
            Self::Exhausted { attempts, .. } => *attempts,
        }
    }

    /// Retryable failure kind, if the budget was exhausted.
    #[must_use]
    pub fn kind(&self) -> Option<FailureKind> {
        match self {
            Self::Transport { .. } => None,
            Self::Exhausted { last, .. } => Some(*last),
        }
    }
}
