//! Screen controllers and their immutable view-state snapshots.
//!
//! DESIGN
//! ======
//! State is split by screen (`sign_in`, `sign_up`, `chat`). Each controller
//! owns a [`StateStore`] holding its current snapshot and a [`TaskScope`]
//! holding its in-flight submits. UI events call controller methods; the
//! controller replaces the snapshot and, on submit, spawns one task that
//! calls a repository and folds the result back into the snapshot.
//!
//! ERROR HANDLING
//! ==============
//! Every failure is recovered here. [`failure_message`] maps an [`ApiError`]
//! to the text the screen shows; nothing propagates past a controller.

pub mod chat;
pub mod sign_in;
pub mod sign_up;
pub mod store;
pub mod tasks;

pub use store::StateStore;
pub use tasks::TaskScope;

use crate::api::types::ApiError;

pub const NETWORK_ERROR_MESSAGE: &str = "Network error, you may not have internet connection";
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong, please try again later";

/// Text to show for a failed request.
///
/// `None` means the failure carries no displayable detail (an HTTP error
/// whose body did not decode); the screen then shows no message.
#[must_use]
pub fn failure_message(err: &ApiError) -> Option<String> {
    match err {
        ApiError::Http { error, .. } => error.as_ref().map(|e| e.message.clone()),
        ApiError::Network(_) => Some(NETWORK_ERROR_MESSAGE.to_string()),
        ApiError::Decode(_) | ApiError::EmptyData | ApiError::HttpClientBuild(_) => {
            Some(GENERIC_ERROR_MESSAGE.to_string())
        }
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
