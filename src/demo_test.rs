use super::*;

#[test]
fn exact_pair_matches() {
    assert!(is_demo_credentials("demo@chamber.law", "demo123456"));
}

#[test]
fn near_misses_do_not_match() {
    assert!(!is_demo_credentials("Demo@chamber.law", "demo123456"));
    assert!(!is_demo_credentials("demo@chamber.law ", "demo123456"));
    assert!(!is_demo_credentials("demo@chamber.law", "demo12345"));
    assert!(!is_demo_credentials("demo@chamber.law", "DEMO123456"));
    assert!(!is_demo_credentials("", ""));
}

#[test]
fn demo_profile_belongs_to_demo_identity() {
    let now = OffsetDateTime::UNIX_EPOCH;
    let identity = demo_identity(now);
    let profile = demo_profile(now);
    assert_eq!(identity.id, "demo-user-id");
    assert_eq!(profile.id, identity.id);
    assert_eq!(profile.role, Role::SeniorLawyer);
    assert_eq!(profile.language, Language::En);
    assert!(is_demo_identity(&identity));
}
