//! Application container.
//!
//! DESIGN
//! ======
//! Builds every long-lived component once from a [`ClientConfig`]: one
//! [`ApiClient`] shared by both repositories, one [`PreferenceStore`], and
//! the optional generative client. Controllers are handed out fresh per
//! screen and carry `Arc` clones of what they need.

use std::sync::Arc;

use tracing::info;

use crate::api::{ApiClient, ApiError};
use crate::config::ClientConfig;
use crate::genai::GenAiClient;
use crate::prefs::PreferenceStore;
use crate::repo::{ChatRepo, NetworkChatRepo, NetworkUserRepo, UserRepo};
use crate::state::chat::{AssistantResponder, BackendResponder, ChatController};
use crate::state::sign_in::SignInController;
use crate::state::sign_up::SignUpController;

pub struct AppContainer {
    prefs: Arc<PreferenceStore>,
    users: Arc<dyn UserRepo>,
    chats: Arc<dyn ChatRepo>,
    genai: Option<Arc<GenAiClient>>,
}

impl AppContainer {
    /// # Errors
    ///
    /// Returns an error if an HTTP client fails to build.
    pub async fn from_config(config: ClientConfig) -> Result<Self, ApiError> {
        let api = Arc::new(ApiClient::new(&config.base_url, config.timeouts)?);
        let prefs = Arc::new(PreferenceStore::open(config.prefs_path).await);
        let genai = match config.genai {
            Some(genai) => Some(Arc::new(GenAiClient::new(genai, config.timeouts)?)),
            None => None,
        };
        let users: Arc<dyn UserRepo> = Arc::new(NetworkUserRepo::new(Arc::clone(&api)));
        let chats: Arc<dyn ChatRepo> = Arc::new(NetworkChatRepo::new(Arc::clone(&api)));

        info!(
            base_url = api.base_url(),
            prefs = %prefs.path().display(),
            genai_model = genai.as_ref().map(|g| g.model()),
            "app container ready"
        );
        Ok(Self { prefs, users, chats, genai })
    }

    /// Store holding the access token shared by sign-in and backend chat.
    #[must_use]
    pub fn prefs(&self) -> &Arc<PreferenceStore> {
        &self.prefs
    }

    #[must_use]
    pub fn sign_in(&self) -> SignInController {
        SignInController::new(Arc::clone(&self.users), Arc::clone(&self.prefs))
    }

    #[must_use]
    pub fn sign_up(&self) -> SignUpController {
        SignUpController::new(Arc::clone(&self.users))
    }

    /// Chat screen talking to the custom backend.
    #[must_use]
    pub fn backend_chat(&self) -> ChatController {
        let responder = BackendResponder::new(Arc::clone(&self.chats), Arc::clone(&self.prefs));
        ChatController::new(Arc::new(responder))
    }

    /// Chat screen talking to the generative service, if one is configured.
    #[must_use]
    pub fn assistant_chat(&self) -> Option<ChatController> {
        let client = self.genai.as_ref()?;
        let responder = AssistantResponder::new(Arc::clone(client));
        Some(ChatController::new(Arc::new(responder)))
    }
}

#[cfg(test)]
#[path = "app_test.rs"]
mod tests;
