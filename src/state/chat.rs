//! Chat screen: optimistic message list plus one responder call per submit.
//!
//! A [`Responder`] decides where a turn goes: [`BackendResponder`] posts the
//! question to the custom backend with the stored access token,
//! [`AssistantResponder`] sends the whole conversation to the generative
//! text service.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::{StateStore, TaskScope, failure_message};
use crate::api::types::{ApiError, ApiResponse};
use crate::genai::{GenAiClient, Turn, TurnRole};
use crate::prefs::PreferenceStore;
use crate::repo::ChatRepo;

// =============================================================================
// STATE
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    User,
    Model,
}

/// One chat bubble. Kept only for the lifetime of the session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatMessage {
    pub text: String,
    pub role: Role,
}

impl ChatMessage {
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self { text: text.into(), role: Role::User }
    }

    #[must_use]
    pub fn model(text: impl Into<String>) -> Self {
        Self { text: text.into(), role: Role::Model }
    }
}

/// Chat screen snapshot.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChatState {
    pub input: String,
    pub is_loading: bool,
    pub error_message: Option<String>,
    pub messages: Vec<ChatMessage>,
}

// =============================================================================
// RESPONDERS
// =============================================================================

/// Produces the model's reply for a conversation whose last message is the
/// user's new question.
#[async_trait::async_trait]
pub trait Responder: Send + Sync {
    /// # Errors
    ///
    /// Returns an [`ApiError`] when the reply could not be obtained.
    async fn reply(&self, conversation: &[ChatMessage]) -> Result<String, ApiError>;
}

/// Custom backend: only the question is sent, authorized with the stored
/// access token.
pub struct BackendResponder {
    chats: Arc<dyn ChatRepo>,
    prefs: Arc<PreferenceStore>,
}

impl BackendResponder {
    #[must_use]
    pub fn new(chats: Arc<dyn ChatRepo>, prefs: Arc<PreferenceStore>) -> Self {
        Self { chats, prefs }
    }
}

#[async_trait::async_trait]
impl Responder for BackendResponder {
    async fn reply(&self, conversation: &[ChatMessage]) -> Result<String, ApiError> {
        let question = conversation.last().map_or("", |m| m.text.as_str());
        let access_token = self.prefs.current_access_token();
        if access_token.is_empty() {
            debug!("no stored access token, sending chat unauthenticated");
        }
        let success = self
            .chats
            .chat(question, &access_token)
            .await
            .and_then(ApiResponse::into_data)?;
        Ok(success.res)
    }
}

/// Generative service: the full conversation is sent as history.
pub struct AssistantResponder {
    client: Arc<GenAiClient>,
}

impl AssistantResponder {
    #[must_use]
    pub fn new(client: Arc<GenAiClient>) -> Self {
        Self { client }
    }
}

impl From<&ChatMessage> for Turn {
    fn from(message: &ChatMessage) -> Self {
        let role = match message.role {
            Role::User => TurnRole::User,
            Role::Model => TurnRole::Model,
        };
        Self { role, text: message.text.clone() }
    }
}

#[async_trait::async_trait]
impl Responder for AssistantResponder {
    async fn reply(&self, conversation: &[ChatMessage]) -> Result<String, ApiError> {
        let turns: Vec<Turn> = conversation.iter().map(Turn::from).collect();
        self.client.generate(&turns).await
    }
}

// =============================================================================
// CONTROLLER
// =============================================================================

pub struct ChatController {
    shared: Arc<Shared>,
    tasks: TaskScope,
}

struct Shared {
    store: StateStore<ChatState>,
    responder: Arc<dyn Responder>,
}

impl ChatController {
    #[must_use]
    pub fn new(responder: Arc<dyn Responder>) -> Self {
        let shared = Shared { store: StateStore::default(), responder };
        Self { shared: Arc::new(shared), tasks: TaskScope::new() }
    }

    #[must_use]
    pub fn state(&self) -> ChatState {
        self.shared.store.snapshot()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ChatState> {
        self.shared.store.subscribe()
    }

    pub fn on_input_change(&self, input: &str) {
        self.shared
            .store
            .update(|s| ChatState { input: input.to_string(), ..s.clone() });
    }

    /// Append the current input as a user message, clear the input, and ask
    /// the responder for a reply. Blank input is ignored.
    pub fn send_message(&self) {
        if self.shared.store.snapshot().input.trim().is_empty() {
            debug!("ignoring blank chat input");
            return;
        }

        let mut conversation = Vec::new();
        self.shared.store.update(|s| {
            let mut messages = s.messages.clone();
            messages.push(ChatMessage::user(s.input.clone()));
            conversation.clone_from(&messages);
            ChatState { input: String::new(), is_loading: true, messages, ..s.clone() }
        });

        let shared = Arc::clone(&self.shared);
        self.tasks.spawn(async move {
            shared.respond(&conversation).await;
        });
    }

    pub fn error_shown(&self) {
        self.shared
            .store
            .update(|s| ChatState { error_message: None, is_loading: false, ..s.clone() });
    }

    pub async fn settle(&self) {
        self.tasks.settle().await;
    }

    pub fn shutdown(&self) {
        self.tasks.shutdown();
    }
}

impl Shared {
    async fn respond(&self, conversation: &[ChatMessage]) {
        match self.responder.reply(conversation).await {
            Ok(reply) => {
                info!(turns = conversation.len(), "chat reply received");
                self.store.update(|s| {
                    let mut messages = s.messages.clone();
                    messages.push(ChatMessage::model(reply));
                    ChatState { is_loading: false, error_message: None, messages, ..s.clone() }
                });
            }
            Err(e) => {
                warn!(error = %e, "chat request failed");
                let message = failure_message(&e);
                self.store.update(|s| ChatState {
                    error_message: message,
                    is_loading: false,
                    ..s.clone()
                });
            }
        }
    }
}

#[cfg(test)]
#[path = "chat_test.rs"]
mod tests;
