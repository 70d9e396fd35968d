use super::*;
use crate::state::{GENERIC_ERROR_MESSAGE, NETWORK_ERROR_MESSAGE};
use crate::api::types::{ApiError, ApiResponse};
use crate::test_helpers::{MockUserRepo, http_error, network_error, sign_up_ok};

fn filled(controller: &SignUpController) {
    controller.on_username_change("ana");
    controller.on_password_change("pw");
    controller.on_full_name_change("Ana Lima");
}

#[test]
fn sign_up_state_default_is_idle() {
    let state = SignUpState::default();
    assert!(state.full_name.is_empty());
    assert!(state.error_message.is_none());
    assert!(!state.is_loading);
    assert!(!state.is_signed_up);
}

#[tokio::test]
async fn form_fields_update_snapshot() {
    let users = MockUserRepo::with_sign_up(sign_up_ok("ana", "Ana Lima"));
    let controller = SignUpController::new(users.clone());
    filled(&controller);

    let state = controller.state();
    assert_eq!(state.username, "ana");
    assert_eq!(state.password, "pw");
    assert_eq!(state.full_name, "Ana Lima");
    assert!(users.calls().is_empty());
}

#[tokio::test]
async fn successful_sign_up_signals_signed_up() {
    let users = MockUserRepo::with_sign_up(sign_up_ok("ana", "Ana Lima"));
    let controller = SignUpController::new(users.clone());
    filled(&controller);

    controller.on_confirm_click();
    assert!(controller.state().is_loading);
    controller.settle().await;

    let state = controller.state();
    assert!(state.is_signed_up);
    assert!(!state.is_loading);
    assert!(state.username.is_empty());
    assert_eq!(users.calls(), vec!["sign_up ana pw Ana Lima".to_string()]);
}

#[tokio::test]
async fn sign_up_without_data_still_succeeds() {
    let users = MockUserRepo::with_sign_up(Ok(ApiResponse { code: 201, data: None }));
    let controller = SignUpController::new(users);

    controller.on_confirm_click();
    controller.settle().await;

    assert!(controller.state().is_signed_up);
}

#[tokio::test]
async fn connectivity_failure_keeps_signed_up_false() {
    let users = MockUserRepo::with_sign_up(Err(network_error()));
    let controller = SignUpController::new(users);
    filled(&controller);

    controller.on_confirm_click();
    controller.settle().await;

    let state = controller.state();
    assert_eq!(state.error_message.as_deref(), Some(NETWORK_ERROR_MESSAGE));
    assert!(!state.is_signed_up);
    assert!(!state.is_loading);
    assert_eq!(state.full_name, "Ana Lima");
}

#[tokio::test]
async fn conflict_shows_server_message() {
    let users = MockUserRepo::with_sign_up(Err(http_error(409, "username already taken")));
    let controller = SignUpController::new(users);
    filled(&controller);

    controller.on_confirm_click();
    controller.settle().await;

    assert_eq!(controller.state().error_message.as_deref(), Some("username already taken"));
}

#[tokio::test]
async fn undecodable_http_error_replaces_stale_message_with_none() {
    let users = MockUserRepo::with_sign_ups(vec![
        Err(http_error(409, "username already taken")),
        Err(ApiError::Http { status: 500, error: None }),
    ]);
    let controller = SignUpController::new(users);
    filled(&controller);

    controller.on_confirm_click();
    controller.settle().await;
    assert_eq!(controller.state().error_message.as_deref(), Some("username already taken"));

    controller.on_confirm_click();
    controller.settle().await;

    let state = controller.state();
    assert!(state.error_message.is_none());
    assert!(!state.is_loading);
    assert!(!state.is_signed_up);
}

#[tokio::test]
async fn decode_failure_shows_generic_message() {
    let users = MockUserRepo::with_sign_up(Err(ApiError::Decode("bad json".into())));
    let controller = SignUpController::new(users);

    controller.on_confirm_click();
    controller.settle().await;

    assert_eq!(controller.state().error_message.as_deref(), Some(GENERIC_ERROR_MESSAGE));
}

#[tokio::test]
async fn error_shown_is_idempotent() {
    let users = MockUserRepo::with_sign_up(Err(network_error()));
    let controller = SignUpController::new(users);
    filled(&controller);
    controller.on_confirm_click();
    controller.settle().await;

    controller.error_shown();
    let once = controller.state();
    controller.error_shown();

    assert!(once.error_message.is_none());
    assert!(!once.is_loading);
    assert_eq!(once, controller.state());
}

#[tokio::test]
async fn reset_returns_initial_snapshot() {
    let users = MockUserRepo::with_sign_up(sign_up_ok("ana", "Ana Lima"));
    let controller = SignUpController::new(users);
    filled(&controller);
    controller.on_confirm_click();
    controller.settle().await;
    assert!(controller.state().is_signed_up);

    controller.reset();
    assert_eq!(controller.state(), SignUpState::default());
}
