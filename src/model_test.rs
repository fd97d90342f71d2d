use super::*;
use time::macros::datetime;

fn profile() -> Profile {
    Profile {
        id: "u-1".to_owned(),
        tenant_id: "t-1".to_owned(),
        email: "alice@chamber.law".to_owned(),
        role: Role::Lawyer,
        full_name: "Alice".to_owned(),
        language: Language::En,
        created_at: datetime!(2024-01-01 00:00 UTC),
        updated_at: datetime!(2024-01-02 00:00 UTC),
    }
}

// =============================================================
// Wire names
// =============================================================

#[test]
fn role_uses_snake_case_on_the_wire() {
    assert_eq!(serde_json::to_value(Role::SeniorLawyer).unwrap(), serde_json::json!("senior_lawyer"));
    let role: Role = serde_json::from_value(serde_json::json!("paralegal")).unwrap();
    assert_eq!(role, Role::Paralegal);
}

#[test]
fn role_as_str_matches_serde() {
    for role in Role::ALL {
        assert_eq!(serde_json::to_value(role).unwrap(), serde_json::json!(role.as_str()));
    }
}

#[test]
fn language_from_code_rejects_unknown() {
    assert_eq!(Language::from_code("ar"), Some(Language::Ar));
    assert_eq!(Language::from_code("EN"), None);
    assert_eq!(Language::from_code("fr"), None);
}

#[test]
fn auth_event_uses_screaming_snake_case() {
    assert_eq!(serde_json::to_value(AuthEvent::TokenRefreshed).unwrap(), serde_json::json!("TOKEN_REFRESHED"));
}

// =============================================================
// Deserialization from backend payloads
// =============================================================

#[test]
fn profile_parses_users_row() {
    let row = serde_json::json!({
        "id": "u-1",
        "tenant_id": "t-1",
        "email": "alice@chamber.law",
        "role": "lawyer",
        "full_name": "Alice",
        "language": "en",
        "created_at": "2024-01-01T00:00:00+00:00",
        "updated_at": "2024-01-02T00:00:00+00:00"
    });
    let parsed: Profile = serde_json::from_value(row).unwrap();
    assert_eq!(parsed, profile());
}

#[test]
fn identity_ignores_extra_fields_and_defaults_email() {
    let user = serde_json::json!({
        "id": "u-9",
        "aud": "authenticated",
        "created_at": "2024-03-01T10:00:00.123456Z",
        "updated_at": "2024-03-01T10:00:00Z",
        "app_metadata": {}
    });
    let identity: Identity = serde_json::from_value(user).unwrap();
    assert_eq!(identity.id, "u-9");
    assert!(identity.email.is_empty());
}

#[test]
fn auth_session_defaults_token_type() {
    let payload = serde_json::json!({
        "access_token": "at",
        "user": {
            "id": "u-1",
            "email": "a@b.c",
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        }
    });
    let session: AuthSession = serde_json::from_value(payload).unwrap();
    assert_eq!(session.token_type, "bearer");
    assert!(session.refresh_token.is_none());
}

// =============================================================
// ProfileUpdate
// =============================================================

#[test]
fn update_serializes_only_present_keys() {
    let update = ProfileUpdate::default().full_name("Bob").language(Language::Ar);
    assert_eq!(
        serde_json::to_value(&update).unwrap(),
        serde_json::json!({ "full_name": "Bob", "language": "ar" })
    );
}

#[test]
fn empty_update_serializes_to_empty_object() {
    let update = ProfileUpdate::default();
    assert!(update.is_empty());
    assert_eq!(serde_json::to_value(&update).unwrap(), serde_json::json!({}));
}

#[test]
fn apply_overwrites_present_keys_only() {
    let before = profile();
    let mut after = before.clone();
    ProfileUpdate::default()
        .full_name("Alice B.")
        .role(Role::SeniorLawyer)
        .apply_to(&mut after);

    assert_eq!(after.full_name, "Alice B.");
    assert_eq!(after.role, Role::SeniorLawyer);
    assert_eq!(after.id, before.id);
    assert_eq!(after.tenant_id, before.tenant_id);
    assert_eq!(after.email, before.email);
    assert_eq!(after.language, before.language);
    assert_eq!(after.updated_at, before.updated_at);
}

#[test]
fn apply_merge_law_holds_for_each_single_key() {
    let updates = [
        ProfileUpdate { tenant_id: Some("t-2".to_owned()), ..ProfileUpdate::default() },
        ProfileUpdate { email: Some("new@chamber.law".to_owned()), ..ProfileUpdate::default() },
        ProfileUpdate::default().role(Role::Admin),
        ProfileUpdate::default().full_name("Zed"),
        ProfileUpdate::default().language(Language::Ar),
        ProfileUpdate { updated_at: Some(datetime!(2025-05-05 05:05 UTC)), ..ProfileUpdate::default() },
    ];

    for update in updates {
        let base = profile();
        let mut merged = base.clone();
        update.apply_to(&mut merged);

        let mut expected = serde_json::to_value(&base).unwrap();
        let patch = serde_json::to_value(&update).unwrap();
        for (key, value) in patch.as_object().unwrap() {
            expected[key] = value.clone();
        }
        assert_eq!(serde_json::to_value(&merged).unwrap(), expected, "update {update:?}");
    }
}

#[test]
fn empty_update_is_identity() {
    let mut merged = profile();
    ProfileUpdate::default().apply_to(&mut merged);
    assert_eq!(merged, profile());
}
