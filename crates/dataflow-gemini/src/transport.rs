//! Single-shot calls to the generation endpoint.
//!
//! [`Transport`] is the seam between the retry logic and the network:
//! [`HttpTransport`] talks to the Gemini REST API, tests substitute a
//! scripted implementation.

use std::time::Duration;

use tracing::{debug, info};
use ureq::Agent;

use crate::credentials::Credential;
use crate::error::TransportError;
use crate::request::{GenerateContentResponse, GenerationRequest};

/// Default endpoint host.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Default API version path segment.
pub const DEFAULT_API_VERSION: &str = "v1beta";

/// Default model path segment.
pub const DEFAULT_MODEL: &str = "models/gemini-1.5-flash";

/// Default HTTP timeout for generation requests (60 seconds).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Sends one prompt and returns the raw generated text.
pub trait Transport: Send + Sync {
    /// Issue a single request with the given credential.
    ///
    /// Every call consumes quota; implementations must not cache.
    fn send(
        &self,
        credential: &Credential,
        request: &GenerationRequest,
    ) -> Result<String, TransportError>;
}

/// Create HTTP agent with the specified timeout.
///
/// Status codes are not turned into errors so the response body can be read
/// for quota detection.
pub fn create_agent(timeout: Duration) -> Agent {
    Agent::config_builder()
        .timeout_global(Some(timeout))
        .http_status_as_error(false)
        .build()
        .into()
}

/// [`Transport`] over the Gemini `generateContent` REST endpoint.
///
/// # Example
///
/// ```
/// use dataflow_gemini::HttpTransport;
///
/// let transport = HttpTransport::new("https://generativelanguage.googleapis.com")
///     .model("models/gemini-1.5-pro");
/// assert!(transport.endpoint().ends_with("models/gemini-1.5-pro:generateContent"));
/// ```
pub struct HttpTransport {
    agent: Agent,
    base_url: String,
    api_version: String,
    model: String,
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl HttpTransport {
    /// Create a transport for the given base URL with default version and model.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            agent: create_agent(DEFAULT_TIMEOUT),
            base_url: base_url.trim_end_matches('/').to_owned(),
            api_version: DEFAULT_API_VERSION.to_owned(),
            model: DEFAULT_MODEL.to_owned(),
        }
    }

    /// Set the API version segment (e.g., `v1beta`).
    #[must_use]
    pub fn api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    /// Set the model segment (e.g., `models/gemini-1.5-flash`).
    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the HTTP timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.agent = create_agent(timeout);
        self
    }

    /// Endpoint URL without the credential query.
    #[must_use]
    pub fn endpoint(&self) -> String {
        format!(
            "{}/{}/{}:generateContent",
            self.base_url,
            self.api_version.trim_matches('/'),
            self.model.trim_matches('/')
        )
    }
}

impl Transport for HttpTransport {
    fn send(
        &self,
        credential: &Credential,
        request: &GenerationRequest,
    ) -> Result<String, TransportError> {
        let endpoint = self.endpoint();
        let url = format!("{endpoint}?key={}", credential.expose());
        let payload = serde_json::to_vec(&request.to_body())
            .map_err(|e| TransportError::Body(e.to_string()))?;

        info!("Sending request to Gemini API: {}", endpoint);

        let response = self
            .agent
            .post(&url)
            .header("Content-Type", "application/json")
            .send(&payload[..])
            .map_err(|e| TransportError::Http(redact(&e.to_string(), credential)))?;

        let status = response.status().as_u16();
        let mut body_reader = response.into_body();

        if status >= 400 {
            let error_body = body_reader
                .read_to_string()
                .unwrap_or_else(|_| "(unable to read error body)".to_owned());
            return Err(TransportError::Status {
                status,
                body: redact(&error_body, credential),
            });
        }

        let body = body_reader
            .read_to_string()
            .map_err(|e| TransportError::Body(e.to_string()))?;
        debug!("Received {} bytes from Gemini API (status {})", body.len(), status);

        extract_text(&body)
    }
}

/// Pull `candidates[0].content.parts[0].text` out of a response body.
pub(crate) fn extract_text(body: &str) -> Result<String, TransportError> {
    let response: GenerateContentResponse =
        serde_json::from_str(body).map_err(|e| TransportError::Shape(e.to_string()))?;
    response.into_text().ok_or_else(|| {
        TransportError::Shape("missing candidates[0].content.parts[0].text".to_owned())
    })
}

/// Mask the credential wherever it was echoed back.
fn redact(text: &str, credential: &Credential) -> String {
    text.replace(credential.expose(), "<redacted>")
}
