//! API types: the one canonical schema for backend requests and responses.
//!
//! Wire names are snake_case. Every successful payload arrives inside the
//! `{code, data}` envelope; non-2xx bodies carry an [`ErrorResponse`].

use serde::{Deserialize, Serialize};

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by backend and generative API calls.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The server answered with a non-success status. `error` is the decoded
    /// error body, or `None` when the body was not a valid [`ErrorResponse`].
    #[error("API response error: status {status}")]
    Http { status: u16, error: Option<ErrorResponse> },

    /// The request never produced a response (no connectivity, DNS, timeout,
    /// or the body could not be read).
    #[error("network failure: {0}")]
    Network(String),

    /// A success body could not be deserialized.
    #[error("API response parse failed: {0}")]
    Decode(String),

    /// A success envelope arrived with `data: null`.
    #[error("API response carried no data")]
    EmptyData,

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl ApiError {
    /// `true` for transport-level failures, as opposed to HTTP-level ones.
    #[must_use]
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}

// =============================================================================
// ENVELOPES
// =============================================================================

/// Envelope around every successful payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Unwrap the payload, treating `data: null` as [`ApiError::EmptyData`].
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::EmptyData`] when the envelope has no payload.
    pub fn into_data(self) -> Result<T, ApiError> {
        self.data.ok_or(ApiError::EmptyData)
    }
}

/// Body of a non-2xx response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: i32,
    pub message: String,
    pub status: String,
}

// =============================================================================
// REQUESTS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignUpRequest {
    pub username: String,
    pub password: String,
    pub full_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub question: String,
}

// =============================================================================
// SUCCESS PAYLOADS
// =============================================================================

/// Tokens issued by `user/login`. Only `access_token` is used by the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginSuccess {
    pub access_token: String,
    pub access_token_expiry: i64,
    pub refresh_token: String,
    pub token_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignUpSuccess {
    pub username: String,
    pub full_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatSuccess {
    pub res: String,
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
