use crate::VerificationToken;

use chrono::{Duration, Utc};
use uuid::Uuid;

#[test]
fn test_new_token_is_unused_with_fixed_window() {
    let token = VerificationToken::new("abc123".to_string(), "a@example.com", None);

    assert!(!token.used);
    assert_eq!(token.email, "a@example.com");
    assert_eq!(token.bound_identity_id, None);
    assert_eq!(
        (token.expires_at - token.created_at).num_seconds(),
        VerificationToken::TTL_SECS
    );
}

#[test]
fn test_new_token_carries_bound_identity() {
    let bound = Uuid::new_v4();
    let token = VerificationToken::new("abc123".to_string(), "a@example.com", Some(bound));

    assert_eq!(token.bound_identity_id, Some(bound));
}

#[test]
fn test_redeemable_within_window() {
    let token = VerificationToken::new("abc123".to_string(), "a@example.com", None);

    assert!(token.is_redeemable(Utc::now()));
    assert!(!token.is_expired(Utc::now()));
}

#[test]
fn test_not_redeemable_after_expiry() {
    let token = VerificationToken::new("abc123".to_string(), "a@example.com", None);
    let later = Utc::now() + Duration::seconds(VerificationToken::TTL_SECS + 1);

    assert!(token.is_expired(later));
    assert!(!token.is_redeemable(later));
}

#[test]
fn test_used_token_is_never_redeemable() {
    let mut token = VerificationToken::new("abc123".to_string(), "a@example.com", None);
    token.used = true;

    assert!(!token.is_redeemable(Utc::now()));
}
