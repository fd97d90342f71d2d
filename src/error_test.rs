use std::error::Error as _;

use super::*;

#[test]
fn sign_in_message_advertises_demo_pair() {
    let err = SignInError::InvalidCredentials {
        source: BackendError::Status { status: 400, message: "Invalid login credentials".into() },
    };
    let msg = err.to_string();
    assert!(msg.contains("demo@chamber.law"));
    assert!(msg.contains("demo123456"));
}

#[test]
fn sign_in_message_hides_backend_text() {
    let err = SignInError::InvalidCredentials {
        source: BackendError::Status { status: 429, message: "Email rate limit exceeded".into() },
    };
    let msg = err.to_string();
    assert!(!msg.contains("rate limit"));
    assert!(!msg.contains("429"));
}

#[test]
fn sign_in_keeps_backend_cause_as_source() {
    let backend = BackendError::Request("connection reset".into());
    let err = SignInError::InvalidCredentials { source: backend.clone() };
    assert_eq!(err.backend_error(), &backend);
    let source = err.source().expect("source");
    assert_eq!(source.to_string(), "request failed: connection reset");
}

#[test]
fn profile_backend_error_is_transparent() {
    let backend = BackendError::Status { status: 403, message: "permission denied".into() };
    let err = ProfileError::from(backend.clone());
    assert_eq!(err.to_string(), backend.to_string());
}

#[test]
fn no_user_logged_in_message() {
    assert_eq!(ProfileError::NoUserLoggedIn.to_string(), "no user logged in");
}

#[test]
fn retryable_covers_transport_throttle_and_server_errors() {
    assert!(BackendError::Request("timeout".into()).retryable());
    assert!(BackendError::Status { status: 429, message: String::new() }.retryable());
    assert!(BackendError::Status { status: 503, message: String::new() }.retryable());
    assert!(!BackendError::Status { status: 400, message: String::new() }.retryable());
    assert!(!BackendError::NotFound("u-1".into()).retryable());
    assert!(!BackendError::NoSession.retryable());
}
