//! Sign-in screen: credential input and one login request per submit.
//!
//! A successful login persists the access token before the snapshot flips
//! to `is_logged_in`; the chat screen reads the token from the same store.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{error, info, warn};

use super::{GENERIC_ERROR_MESSAGE, StateStore, TaskScope, failure_message};
use crate::api::types::ApiResponse;
use crate::prefs::PreferenceStore;
use crate::repo::UserRepo;

/// Sign-in screen snapshot.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SignInState {
    pub username: String,
    pub password: String,
    pub error: Option<String>,
    pub is_loading: bool,
    /// One-way signal: the presentation layer navigates away once set.
    pub is_logged_in: bool,
}

pub struct SignInController {
    shared: Arc<Shared>,
    tasks: TaskScope,
}

struct Shared {
    store: StateStore<SignInState>,
    users: Arc<dyn UserRepo>,
    prefs: Arc<PreferenceStore>,
}

impl SignInController {
    #[must_use]
    pub fn new(users: Arc<dyn UserRepo>, prefs: Arc<PreferenceStore>) -> Self {
        let shared = Shared { store: StateStore::default(), users, prefs };
        Self { shared: Arc::new(shared), tasks: TaskScope::new() }
    }

    #[must_use]
    pub fn state(&self) -> SignInState {
        self.shared.store.snapshot()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SignInState> {
        self.shared.store.subscribe()
    }

    pub fn on_username_change(&self, username: &str) {
        self.shared
            .store
            .update(|s| SignInState { username: username.to_string(), ..s.clone() });
    }

    pub fn on_password_change(&self, password: &str) {
        self.shared
            .store
            .update(|s| SignInState { password: password.to_string(), ..s.clone() });
    }

    /// Submit the current credentials. On success the access token is saved
    /// and the snapshot resets with `is_logged_in` set.
    pub fn on_sign_in_click(&self) {
        let mut credentials = (String::new(), String::new());
        self.shared.store.update(|s| {
            credentials = (s.username.clone(), s.password.clone());
            SignInState { is_loading: true, ..s.clone() }
        });

        let shared = Arc::clone(&self.shared);
        let (username, password) = credentials;
        self.tasks.spawn(async move {
            shared.sign_in(&username, &password).await;
        });
    }

    /// Acknowledge the displayed error.
    pub fn error_shown(&self) {
        self.shared
            .store
            .update(|s| SignInState { error: None, is_loading: false, ..s.clone() });
    }

    /// Wait for every outstanding submit to finish.
    pub async fn settle(&self) {
        self.tasks.settle().await;
    }

    /// Abort outstanding submits.
    pub fn shutdown(&self) {
        self.tasks.shutdown();
    }
}

impl Shared {
    async fn sign_in(&self, username: &str, password: &str) {
        let tokens = match self
            .users
            .login(username, password)
            .await
            .and_then(ApiResponse::into_data)
        {
            Ok(tokens) => tokens,
            Err(e) => {
                warn!(%username, error = %e, "login failed");
                self.fail(failure_message(&e));
                return;
            }
        };

        if let Err(e) = self.prefs.save_access_token(&tokens.access_token).await {
            error!(%username, error = %e, "failed to persist access token");
            self.fail(Some(GENERIC_ERROR_MESSAGE.to_string()));
            return;
        }

        info!(%username, "login succeeded");
        self.store
            .replace(SignInState { is_logged_in: true, ..SignInState::default() });
    }

    fn fail(&self, message: Option<String>) {
        self.store
            .update(|s| SignInState { error: message, is_loading: false, ..s.clone() });
    }
}

#[cfg(test)]
#[path = "sign_in_test.rs"]
mod tests;
