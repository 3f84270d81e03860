//! Generation requests and the endpoint's JSON wire format.

use serde::{Deserialize, Serialize};

/// Directive appended when the model returns malformed JSON.
const JSON_DIRECTIVE: &str = "\n\nIMPORTANT: Your previous answer was not valid JSON. \
Return valid JSON only: a single JSON object with no markdown, code fences, comments or surrounding text.";

/// Sampling parameters sent as `generationConfig`.
///
/// Defaults lean deterministic and keep output short enough to avoid
/// truncated JSON.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub max_output_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.1,
            top_p: 0.1,
            top_k: 1,
            max_output_tokens: 2048,
        }
    }
}

/// Immutable prompt plus sampling configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    prompt: String,
    config: GenerationConfig,
}

impl GenerationRequest {
    /// Create a request with the default [`GenerationConfig`].
    #[must_use]
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            config: GenerationConfig::default(),
        }
    }

    /// Replace the sampling configuration.
    #[must_use]
    pub fn with_config(mut self, config: GenerationConfig) -> Self {
        self.config = config;
        self
    }

    /// Prompt text.
    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Sampling configuration.
    #[must_use]
    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Copy of this request with an explicit "valid JSON only" directive appended.
    #[must_use]
    pub fn with_json_directive(&self) -> Self {
        Self {
            prompt: format!("{}{JSON_DIRECTIVE}", self.prompt),
            config: self.config,
        }
    }

    /// Request body for `generateContent`.
    pub(crate) fn to_body(&self) -> GenerateContentBody<'_> {
        GenerateContentBody {
            contents: [Content {
                parts: [Part { text: &self.prompt }],
            }],
            generation_config: &self.config,
        }
    }
}

/// `{ contents: [{ parts: [{ text }] }], generationConfig }`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateContentBody<'a> {
    contents: [Content<'a>; 1],
    generation_config: &'a GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

/// Response of `generateContent`; only the generated text is read.
#[derive(Debug, Deserialize)]
pub(crate) struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Text at `candidates[0].content.parts[0].text`.
    pub(crate) fn into_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_body_shape() {
        let request = GenerationRequest::new("Describe a shop");
        let body = serde_json::to_value(request.to_body()).unwrap();

        assert_eq!(
            body,
            json!({
                "contents": [{"parts": [{"text": "Describe a shop"}]}],
                "generationConfig": {
                    "temperature": 0.1_f32,
                    "topP": 0.1_f32,
                    "topK": 1,
                    "maxOutputTokens": 2048
                }
            })
        );
    }

    #[test]
    fn test_with_config() {
        let config = GenerationConfig {
            temperature: 0.7,
            top_p: 0.9,
            top_k: 40,
            max_output_tokens: 512,
        };
        let request = GenerationRequest::new("p").with_config(config);
        assert_eq!(request.config(), &config);
    }

    #[test]
    fn test_json_directive_appended_to_original() {
        let request = GenerationRequest::new("Give me JSON");
        let strengthened = request.with_json_directive();

        assert!(strengthened.prompt().starts_with("Give me JSON"));
        assert!(strengthened.prompt().contains("valid JSON only"));
        assert_eq!(strengthened.config(), request.config());
        assert_eq!(request.prompt(), "Give me JSON");
    }

    #[test]
    fn test_response_text_extracted() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{"content": {"parts": [{"text": "erDiagram"}], "role": "model"}}],
            "usageMetadata": {"totalTokenCount": 10}
        }))
        .unwrap();

        assert_eq!(response.into_text(), Some("erDiagram".to_owned()));
    }

    #[test]
    fn test_response_missing_candidates() {
        let response: GenerateContentResponse =
            serde_json::from_value(json!({"promptFeedback": {"blockReason": "SAFETY"}})).unwrap();
        assert_eq!(response.into_text(), None);
    }

    #[test]
    fn test_response_missing_parts() {
        let response: GenerateContentResponse =
            serde_json::from_value(json!({"candidates": [{"finishReason": "MAX_TOKENS"}]})).unwrap();
        assert_eq!(response.into_text(), None);

        let response: GenerateContentResponse =
            serde_json::from_value(json!({"candidates": [{"content": {"parts": [{}]}}]})).unwrap();
        assert_eq!(response.into_text(), None);
    }
}
