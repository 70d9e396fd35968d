//! Generative text client: multi-turn chat against a `generateContent` API.
//!
//! Sends the whole conversation as `contents` and returns the reply text.
//! Pure parsing in `parse_reply` for testability.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::api::client::build_http_client;
use crate::api::types::{ApiError, ErrorResponse};
use crate::config::{GenAiConfig, Timeouts};

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Speaker of one conversation turn, as named on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Model,
}

/// One turn of conversation history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub role: TurnRole,
    pub text: String,
}

// =============================================================================
// CLIENT
// =============================================================================

pub struct GenAiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GenAiClient {
    /// # Errors
    ///
    /// Returns [`ApiError::HttpClientBuild`] if the HTTP client fails to build.
    pub fn new(config: GenAiConfig, timeouts: Timeouts) -> Result<Self, ApiError> {
        let http = build_http_client(timeouts)?;
        Ok(Self {
            http,
            api_key: config.api_key,
            model: config.model,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Generate the next model turn for `turns`. The last turn is normally
    /// the user's question.
    ///
    /// # Errors
    ///
    /// Same failure classes as the backend client; a reply without text is
    /// [`ApiError::EmptyData`].
    pub async fn generate(&self, turns: &[Turn]) -> Result<String, ApiError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let body = GenerateRequest { contents: turns.iter().map(WireContent::from).collect() };

        debug!(model = %self.model, turns = turns.len(), "sending generate request");
        let response = self
            .http
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        if !status.is_success() {
            let error = parse_error(&text);
            warn!(model = %self.model, status = status.as_u16(), decoded = error.is_some(), "generate request failed");
            return Err(ApiError::Http { status: status.as_u16(), error });
        }

        parse_reply(&text)
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<WireContent<'a>>,
}

#[derive(Serialize)]
struct WireContent<'a> {
    role: TurnRole,
    parts: [WirePart<'a>; 1],
}

#[derive(Serialize)]
struct WirePart<'a> {
    text: &'a str,
}

impl<'a> From<&'a Turn> for WireContent<'a> {
    fn from(turn: &'a Turn) -> Self {
        Self { role: turn.role, parts: [WirePart { text: &turn.text }] }
    }
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ReplyPart>,
}

#[derive(Deserialize)]
struct ReplyPart {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorResponse,
}

// =============================================================================
// PARSING
// =============================================================================

fn parse_reply(json: &str) -> Result<String, ApiError> {
    let response: GenerateResponse = serde_json::from_str(json).map_err(|e| ApiError::Decode(e.to_string()))?;

    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.is_empty() {
        return Err(ApiError::EmptyData);
    }
    Ok(text)
}

fn parse_error(body: &str) -> Option<ErrorResponse> {
    serde_json::from_str::<ErrorEnvelope>(body)
        .map(|envelope| envelope.error)
        .ok()
}

#[cfg(test)]
#[path = "genai_test.rs"]
mod tests;
