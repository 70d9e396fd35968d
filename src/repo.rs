//! Repositories: request builders bound to the shared [`ApiClient`].
//!
//! Pure pass-through: build the payload from primitive arguments, delegate,
//! return the result unchanged. The traits exist so controllers can be
//! driven by mocks in tests.

use std::sync::Arc;

use crate::api::ApiClient;
use crate::api::types::{
    ApiError, ApiResponse, ChatRequest, ChatSuccess, LoginRequest, LoginSuccess, SignUpRequest, SignUpSuccess,
};

#[async_trait::async_trait]
pub trait UserRepo: Send + Sync {
    /// # Errors
    ///
    /// Propagates the API client's [`ApiError`].
    async fn sign_up(
        &self,
        username: &str,
        password: &str,
        full_name: &str,
    ) -> Result<ApiResponse<SignUpSuccess>, ApiError>;

    /// # Errors
    ///
    /// Propagates the API client's [`ApiError`].
    async fn login(&self, username: &str, password: &str) -> Result<ApiResponse<LoginSuccess>, ApiError>;
}

#[async_trait::async_trait]
pub trait ChatRepo: Send + Sync {
    /// # Errors
    ///
    /// Propagates the API client's [`ApiError`].
    async fn chat(&self, question: &str, access_token: &str) -> Result<ApiResponse<ChatSuccess>, ApiError>;
}

// =============================================================================
// NETWORK IMPLEMENTATIONS
// =============================================================================

pub struct NetworkUserRepo {
    api: Arc<ApiClient>,
}

impl NetworkUserRepo {
    #[must_use]
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }
}

#[async_trait::async_trait]
impl UserRepo for NetworkUserRepo {
    async fn sign_up(
        &self,
        username: &str,
        password: &str,
        full_name: &str,
    ) -> Result<ApiResponse<SignUpSuccess>, ApiError> {
        let req = SignUpRequest {
            username: username.to_string(),
            password: password.to_string(),
            full_name: full_name.to_string(),
        };
        self.api.sign_up(&req).await
    }

    async fn login(&self, username: &str, password: &str) -> Result<ApiResponse<LoginSuccess>, ApiError> {
        let req = LoginRequest { username: username.to_string(), password: password.to_string() };
        self.api.login(&req).await
    }
}

pub struct NetworkChatRepo {
    api: Arc<ApiClient>,
}

impl NetworkChatRepo {
    #[must_use]
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }
}

#[async_trait::async_trait]
impl ChatRepo for NetworkChatRepo {
    async fn chat(&self, question: &str, access_token: &str) -> Result<ApiResponse<ChatSuccess>, ApiError> {
        let req = ChatRequest { question: question.to_string() };
        self.api.chat(access_token, &req).await
    }
}

#[cfg(test)]
#[path = "repo_test.rs"]
mod tests;
