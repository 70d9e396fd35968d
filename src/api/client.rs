//! Backend chat API client.
//!
//! Thin HTTP wrapper over the three backend endpoints. Pure parsing lives in
//! [`parse_success`] and [`decode_error_response`] for testability.

use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::types::{
    ApiError, ApiResponse, ChatRequest, ChatSuccess, ErrorResponse, LoginRequest, LoginSuccess, SignUpRequest,
    SignUpSuccess,
};
use crate::config::Timeouts;

const LOGIN_PATH: &str = "user/login";
const SIGN_UP_PATH: &str = "user";
const CHAT_PATH: &str = "chat";

// =============================================================================
// CLIENT
// =============================================================================

/// HTTP client bound to one backend base URL. Constructed once and shared by
/// the repositories.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Build a client for `base_url`. Timeouts left unset fall back to the
    /// transport defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::HttpClientBuild`] if the HTTP client fails to build.
    pub fn new(base_url: &str, timeouts: Timeouts) -> Result<Self, ApiError> {
        let http = build_http_client(timeouts)?;
        Ok(Self { http, base_url: normalize_base_url(base_url) })
    }

    /// Base URL, always ending with `/`.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `POST user/login`.
    ///
    /// # Errors
    ///
    /// See [`ApiError`] for the failure classes.
    pub async fn login(&self, req: &LoginRequest) -> Result<ApiResponse<LoginSuccess>, ApiError> {
        self.post_json(LOGIN_PATH, None, req).await
    }

    /// `POST user`.
    ///
    /// # Errors
    ///
    /// See [`ApiError`] for the failure classes.
    pub async fn sign_up(&self, req: &SignUpRequest) -> Result<ApiResponse<SignUpSuccess>, ApiError> {
        self.post_json(SIGN_UP_PATH, None, req).await
    }

    /// `POST chat`, authorized with `Authorization: Bearer <token>`.
    ///
    /// # Errors
    ///
    /// See [`ApiError`] for the failure classes.
    pub async fn chat(&self, bearer_token: &str, req: &ChatRequest) -> Result<ApiResponse<ChatSuccess>, ApiError> {
        self.post_json(CHAT_PATH, Some(bearer_token), req).await
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        bearer_token: Option<&str>,
        body: &impl Serialize,
    ) -> Result<ApiResponse<T>, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.http.post(&url).json(body);
        if let Some(token) = bearer_token {
            request = request.bearer_auth(token);
        }

        debug!(%url, "sending API request");
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        if !status.is_success() {
            let error = decode_error_response(&text);
            warn!(%url, status = status.as_u16(), decoded = error.is_some(), "API request failed");
            return Err(ApiError::Http { status: status.as_u16(), error });
        }

        parse_success(&text)
    }
}

pub(crate) fn build_http_client(timeouts: Timeouts) -> Result<reqwest::Client, ApiError> {
    let mut builder = reqwest::Client::builder();
    if let Some(secs) = timeouts.request_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    if let Some(secs) = timeouts.connect_secs {
        builder = builder.connect_timeout(Duration::from_secs(secs));
    }
    builder
        .build()
        .map_err(|e| ApiError::HttpClientBuild(e.to_string()))
}

fn normalize_base_url(base_url: &str) -> String {
    format!("{}/", base_url.trim_end_matches('/'))
}

// =============================================================================
// PARSING
// =============================================================================

/// Decode a 2xx body into its envelope.
///
/// # Errors
///
/// Returns [`ApiError::Decode`] if the body is not a valid envelope for `T`.
pub fn parse_success<T: DeserializeOwned>(json: &str) -> Result<ApiResponse<T>, ApiError> {
    serde_json::from_str(json).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Decode a non-2xx body. An undecodable body yields `None`; the parse error
/// is only logged.
#[must_use]
pub fn decode_error_response(body: &str) -> Option<ErrorResponse> {
    match serde_json::from_str(body) {
        Ok(error) => Some(error),
        Err(e) => {
            warn!(error = %e, "error body is not a valid error response");
            None
        }
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
