//! Shared test fixtures: an in-process backend, scripted repositories, and a
//! throwaway preference store.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::Notify;

use crate::api::types::{ApiError, ApiResponse, ChatSuccess, ErrorResponse, LoginSuccess, SignUpSuccess};
use crate::prefs::PreferenceStore;
use crate::repo::{ChatRepo, UserRepo};

pub const API_PREFIX: &str = "/api/v1";

// =============================================================================
// IN-PROCESS BACKEND
// =============================================================================

/// Serve `router` on an ephemeral localhost port and return the API base URL.
pub async fn spawn_backend(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}{API_PREFIX}/")
}

/// A base URL whose port had a listener a moment ago and now refuses
/// connections.
pub async fn unreachable_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}{API_PREFIX}/")
}

// =============================================================================
// RESULT BUILDERS
// =============================================================================

pub fn login_ok(token: &str) -> Result<ApiResponse<LoginSuccess>, ApiError> {
    Ok(ApiResponse {
        code: 200,
        data: Some(LoginSuccess {
            access_token: token.into(),
            access_token_expiry: 3600,
            refresh_token: "refresh".into(),
            token_type: "Bearer".into(),
        }),
    })
}

pub fn sign_up_ok(username: &str, full_name: &str) -> Result<ApiResponse<SignUpSuccess>, ApiError> {
    Ok(ApiResponse {
        code: 201,
        data: Some(SignUpSuccess { username: username.into(), full_name: full_name.into() }),
    })
}

pub fn chat_ok(res: &str) -> Result<ApiResponse<ChatSuccess>, ApiError> {
    Ok(ApiResponse { code: 200, data: Some(ChatSuccess { res: res.into() }) })
}

pub fn http_error(status: u16, message: &str) -> ApiError {
    ApiError::Http {
        status,
        error: Some(ErrorResponse { code: i32::from(status), message: message.into(), status: "error".into() }),
    }
}

pub fn network_error() -> ApiError {
    ApiError::Network("connection refused".into())
}

// =============================================================================
// SCRIPTED REPOSITORIES
// =============================================================================

/// Returns queued results in order; records every call.
#[derive(Default)]
pub struct MockUserRepo {
    logins: Mutex<VecDeque<Result<ApiResponse<LoginSuccess>, ApiError>>>,
    sign_ups: Mutex<VecDeque<Result<ApiResponse<SignUpSuccess>, ApiError>>>,
    calls: Mutex<Vec<String>>,
}

impl MockUserRepo {
    pub fn with_login(result: Result<ApiResponse<LoginSuccess>, ApiError>) -> Arc<Self> {
        Self::with_logins(vec![result])
    }

    pub fn with_logins(results: Vec<Result<ApiResponse<LoginSuccess>, ApiError>>) -> Arc<Self> {
        Arc::new(Self { logins: Mutex::new(results.into()), ..Self::default() })
    }

    pub fn with_sign_up(result: Result<ApiResponse<SignUpSuccess>, ApiError>) -> Arc<Self> {
        Self::with_sign_ups(vec![result])
    }

    pub fn with_sign_ups(results: Vec<Result<ApiResponse<SignUpSuccess>, ApiError>>) -> Arc<Self> {
        Arc::new(Self { sign_ups: Mutex::new(results.into()), ..Self::default() })
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl UserRepo for MockUserRepo {
    async fn sign_up(
        &self,
        username: &str,
        password: &str,
        full_name: &str,
    ) -> Result<ApiResponse<SignUpSuccess>, ApiError> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("sign_up {username} {password} {full_name}"));
        self.sign_ups
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::EmptyData))
    }

    async fn login(&self, username: &str, password: &str) -> Result<ApiResponse<LoginSuccess>, ApiError> {
        self.calls.lock().unwrap().push(format!("login {username} {password}"));
        self.logins
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::EmptyData))
    }
}

/// Chat repository that optionally holds every reply until `release` is
/// called, so tests can observe state while a request is in flight.
#[derive(Default)]
pub struct MockChatRepo {
    replies: Mutex<VecDeque<Result<ApiResponse<ChatSuccess>, ApiError>>>,
    gated: bool,
    gate: Notify,
    calls: Mutex<Vec<(String, String)>>,
}

impl MockChatRepo {
    pub fn new(replies: Vec<Result<ApiResponse<ChatSuccess>, ApiError>>) -> Arc<Self> {
        Arc::new(Self { replies: Mutex::new(replies.into()), ..Self::default() })
    }

    pub fn gated(replies: Vec<Result<ApiResponse<ChatSuccess>, ApiError>>) -> Arc<Self> {
        Arc::new(Self { replies: Mutex::new(replies.into()), gated: true, ..Self::default() })
    }

    /// Let one held request complete.
    pub fn release(&self) {
        self.gate.notify_one();
    }

    /// `(question, access_token)` per call.
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl ChatRepo for MockChatRepo {
    async fn chat(&self, question: &str, access_token: &str) -> Result<ApiResponse<ChatSuccess>, ApiError> {
        self.calls
            .lock()
            .unwrap()
            .push((question.to_string(), access_token.to_string()));
        if self.gated {
            self.gate.notified().await;
        }
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::EmptyData))
    }
}

// =============================================================================
// PREFERENCES
// =============================================================================

/// Preference store in a fresh temp directory. Keep the `TempDir` alive for
/// the duration of the test.
pub async fn temp_prefs() -> (tempfile::TempDir, Arc<PreferenceStore>) {
    let dir = tempfile::tempdir().unwrap();
    let store = PreferenceStore::open(dir.path().join("prefs.json")).await;
    (dir, Arc::new(store))
}
