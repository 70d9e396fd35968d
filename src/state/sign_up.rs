//! Sign-up screen. Any 2xx counts as an account created.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{info, warn};

use super::{StateStore, TaskScope, failure_message};
use crate::repo::UserRepo;

/// Sign-up screen snapshot.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SignUpState {
    pub username: String,
    pub password: String,
    pub full_name: String,
    pub error_message: Option<String>,
    pub is_loading: bool,
    pub is_signed_up: bool,
}

pub struct SignUpController {
    shared: Arc<Shared>,
    tasks: TaskScope,
}

struct Shared {
    store: StateStore<SignUpState>,
    users: Arc<dyn UserRepo>,
}

impl SignUpController {
    #[must_use]
    pub fn new(users: Arc<dyn UserRepo>) -> Self {
        let shared = Shared { store: StateStore::default(), users };
        Self { shared: Arc::new(shared), tasks: TaskScope::new() }
    }

    #[must_use]
    pub fn state(&self) -> SignUpState {
        self.shared.store.snapshot()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SignUpState> {
        self.shared.store.subscribe()
    }

    /// Back to the initial snapshot, typically after `is_signed_up` was
    /// consumed by navigation.
    pub fn reset(&self) {
        self.shared.store.replace(SignUpState::default());
    }

    pub fn on_username_change(&self, username: &str) {
        self.shared
            .store
            .update(|s| SignUpState { username: username.to_string(), ..s.clone() });
    }

    pub fn on_password_change(&self, password: &str) {
        self.shared
            .store
            .update(|s| SignUpState { password: password.to_string(), ..s.clone() });
    }

    pub fn on_full_name_change(&self, full_name: &str) {
        self.shared
            .store
            .update(|s| SignUpState { full_name: full_name.to_string(), ..s.clone() });
    }

    pub fn on_confirm_click(&self) {
        let mut form = SignUpState::default();
        self.shared.store.update(|s| {
            form = s.clone();
            SignUpState { is_loading: true, ..s.clone() }
        });

        let shared = Arc::clone(&self.shared);
        self.tasks.spawn(async move {
            shared
                .sign_up(&form.username, &form.password, &form.full_name)
                .await;
        });
    }

    pub fn error_shown(&self) {
        self.shared
            .store
            .update(|s| SignUpState { error_message: None, is_loading: false, ..s.clone() });
    }

    pub async fn settle(&self) {
        self.tasks.settle().await;
    }

    pub fn shutdown(&self) {
        self.tasks.shutdown();
    }
}

impl Shared {
    async fn sign_up(&self, username: &str, password: &str, full_name: &str) {
        match self.users.sign_up(username, password, full_name).await {
            Ok(res) => {
                info!(%username, code = res.code, "sign-up succeeded");
                self.store
                    .replace(SignUpState { is_signed_up: true, ..SignUpState::default() });
            }
            Err(e) => {
                warn!(%username, error = %e, "sign-up failed");
                let message = failure_message(&e);
                self.store.update(|s| SignUpState {
                    error_message: message,
                    is_loading: false,
                    ..s.clone()
                });
            }
        }
    }
}

#[cfg(test)]
#[path = "sign_up_test.rs"]
mod tests;
