use std::time::Duration;

use time::macros::datetime;

use super::*;
use crate::model::Identity;
use crate::supabase::SupabaseConfig;

#[test]
fn password_grant_url_targets_token_endpoint() {
    assert_eq!(
        password_grant_url("https://abc.supabase.co"),
        "https://abc.supabase.co/auth/v1/token?grant_type=password"
    );
}

#[test]
fn logout_url_targets_logout_endpoint() {
    assert_eq!(logout_url("http://localhost:54321"), "http://localhost:54321/auth/v1/logout");
}

#[test]
fn password_grant_body_shape() {
    let body = PasswordGrant { email: "a@chamber.law", password: "pw" };
    assert_eq!(
        serde_json::to_value(&body).unwrap(),
        serde_json::json!({ "email": "a@chamber.law", "password": "pw" })
    );
}

// =============================================================
// parse_session_response
// =============================================================

#[test]
fn session_response_parses_grant() {
    let body = serde_json::json!({
        "access_token": "jwt",
        "token_type": "bearer",
        "expires_in": 3600,
        "refresh_token": "r-1",
        "user": {
            "id": "u-1",
            "email": "a@chamber.law",
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        }
    });
    let session = parse_session_response(StatusCode::OK, &body.to_string()).unwrap();
    assert_eq!(session.access_token, "jwt");
    assert_eq!(session.user.id, "u-1");
}

#[test]
fn session_response_rejected_grant_keeps_reason() {
    let body = r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#;
    let err = parse_session_response(StatusCode::BAD_REQUEST, body).unwrap_err();
    assert_eq!(err, BackendError::Status { status: 400, message: "Invalid login credentials".to_owned() });
}

// =============================================================
// Unreachable backend
// =============================================================

fn unreachable_client() -> SupabaseClient {
    SupabaseClient::new(SupabaseConfig::new("http://127.0.0.1:9", "anon-key")).unwrap()
}

fn stored_session() -> AuthSession {
    AuthSession {
        access_token: "access".to_owned(),
        token_type: "bearer".to_owned(),
        expires_in: Some(3600),
        refresh_token: None,
        user: Identity {
            id: "u-1".to_owned(),
            email: "a@chamber.law".to_owned(),
            created_at: datetime!(2024-01-01 00:00 UTC),
            updated_at: datetime!(2024-01-01 00:00 UTC),
        },
    }
}

#[tokio::test]
async fn failed_password_grant_caches_nothing() {
    let client = unreachable_client();
    let mut sub = client.subscribe();

    assert!(client.sign_in_with_password("a@chamber.law", "pw").await.is_err());

    assert_eq!(client.current_session().await.unwrap(), None);
    assert!(tokio::time::timeout(Duration::from_millis(50), sub.next()).await.is_err());
}

#[tokio::test]
async fn failed_remote_sign_out_still_clears_local_session() {
    let client = unreachable_client();
    client.restore_session(stored_session());
    let mut sub = client.subscribe();

    let err = client.sign_out().await.unwrap_err();

    assert_ne!(err, BackendError::NoSession);
    assert_eq!(client.current_session().await.unwrap(), None);
    assert_eq!(sub.next().await.map(|change| change.event), Some(AuthEvent::SignedOut));
}
