//! Gemini `generateContent` client.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use ureq::Agent;

use super::{EnhanceError, Enhancer, TransformKind, compose_prompt};

pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
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
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateResponse {
    /// Text of the first candidate, parts concatenated.
    fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let text: String = parts.iter().filter_map(|p| p.text.as_deref()).collect();
        (!text.is_empty()).then_some(text)
    }
}

/// Calls the Gemini REST API with a single attempt per request.
pub struct GeminiEnhancer {
    api_key: Option<String>,
    model: String,
    endpoint: String,
    agent: Agent,
}

impl std::fmt::Debug for GeminiEnhancer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiEnhancer")
            .field("has_api_key", &self.api_key.is_some())
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl GeminiEnhancer {
    pub fn new(api_key: Option<String>, model: impl Into<String>) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(REQUEST_TIMEOUT))
            .build()
            .into();
        Self {
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            model: model.into(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            agent,
        }
    }

    /// Key from `GEMINI_API_KEY` (or `API_KEY`), model from
    /// `SPLITMARK_GEMINI_MODEL`.
    pub fn from_env() -> Self {
        let api_key = std::env::var("GEMINI_API_KEY")
            .ok()
            .or_else(|| std::env::var("API_KEY").ok());
        let model =
            std::env::var("SPLITMARK_GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        Self::new(api_key, model)
    }

    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn has_credentials(&self) -> bool {
        self.api_key.is_some()
    }

    fn url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }
}

impl Enhancer for GeminiEnhancer {
    fn enhance(&self, content: &str, kind: TransformKind) -> Result<String, EnhanceError> {
        let Some(api_key) = &self.api_key else {
            return Err(EnhanceError::MissingCredentials);
        };
        let prompt = compose_prompt(kind, content);
        let body = GenerateRequest {
            contents: [Content {
                parts: [Part { text: &prompt }],
            }],
        };

        let mut response = self
            .agent
            .post(&self.url())
            .header("x-goog-api-key", api_key.as_str())
            .send_json(&body)
            .map_err(|err| EnhanceError::Transport(err.to_string()))?;

        let parsed: GenerateResponse = response
            .body_mut()
            .read_json()
            .map_err(|err| EnhanceError::MalformedResponse(err.to_string()))?;

        Ok(parsed.text().unwrap_or_else(|| content.to_string()))
    }
}
