use crate::{Identity, IdentityKind};

use std::str::FromStr;

#[test]
fn test_new_guest() {
    let identity = Identity::new_guest("device-1", "Alice");

    assert_eq!(identity.kind, IdentityKind::Guest);
    assert_eq!(identity.device_anchor.as_deref(), Some("device-1"));
    assert_eq!(identity.email, None);
    assert_eq!(identity.display_name, "Alice");
    assert!(identity.is_guest());
    assert!(!identity.has_verified_email());
    assert!(!identity.upgrade_prompt_dismissed);
}

#[test]
fn test_new_full_derives_display_name_from_local_part() {
    let identity = Identity::new_full("carol@example.com");

    assert_eq!(identity.kind, IdentityKind::Full);
    assert_eq!(identity.device_anchor, None);
    assert_eq!(identity.email.as_deref(), Some("carol@example.com"));
    assert_eq!(identity.display_name, "carol");
    assert!(!identity.is_guest());
    assert!(identity.has_verified_email());
}

#[test]
fn test_promote_to_claimed_keeps_id_and_anchor() {
    let mut identity = Identity::new_guest("device-2", "Bob");
    let id = identity.id;

    identity.promote_to_claimed("bob@example.com");

    assert_eq!(identity.id, id);
    assert_eq!(identity.kind, IdentityKind::Claimed);
    assert_eq!(identity.device_anchor.as_deref(), Some("device-2"));
    assert_eq!(identity.email.as_deref(), Some("bob@example.com"));
    assert_eq!(identity.display_name, "Bob");
}

#[test]
fn test_identity_kind_round_trip() {
    for kind in [IdentityKind::Guest, IdentityKind::Claimed, IdentityKind::Full] {
        assert_eq!(IdentityKind::from_str(kind.as_str()).unwrap(), kind);
    }
}

#[test]
fn test_identity_kind_rejects_unknown_value() {
    assert!(IdentityKind::from_str("anonymous").is_err());
}
