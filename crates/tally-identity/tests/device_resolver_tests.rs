mod common;

use common::{count_identities, create_test_pool};

use tally_core::IdentityKind;
use tally_db::IdentityRepository;
use tally_identity::{DeviceResolver, IdentityError};

use googletest::prelude::*;

#[tokio::test]
async fn given_unseen_device_when_resolved_then_guest_created() {
    // Given: an empty store
    let pool = create_test_pool().await;
    let resolver = DeviceResolver::new(IdentityRepository::new(pool.clone()));

    // When: resolving a fresh anchor
    let identity = resolver.resolve("device-1", "Alice").await.unwrap();

    // Then: a guest exists with the given anchor and name
    assert_that!(identity.kind, eq(IdentityKind::Guest));
    assert_that!(identity.device_anchor, some(eq("device-1")));
    assert_that!(identity.display_name, eq("Alice"));
    assert_that!(identity.email, none());
    assert_that!(count_identities(&pool).await, eq(1));
}

#[tokio::test]
async fn given_seen_device_when_resolved_again_then_same_identity_and_first_name_wins() {
    // Given: device-1 resolved once as Alice
    let pool = create_test_pool().await;
    let resolver = DeviceResolver::new(IdentityRepository::new(pool.clone()));
    let first = resolver.resolve("device-1", "Alice").await.unwrap();

    // When: the same device authenticates again under a different name
    let second = resolver.resolve("device-1", "Bob").await.unwrap();

    // Then: same identity, original name preserved
    assert_that!(second.id, eq(first.id));
    assert_that!(second.display_name, eq("Alice"));
    assert_that!(count_identities(&pool).await, eq(1));
}

#[tokio::test]
async fn given_two_simultaneous_resolutions_then_exactly_one_identity_created() {
    // Given: an unseen anchor
    let pool = create_test_pool().await;
    let resolver = DeviceResolver::new(IdentityRepository::new(pool.clone()));

    // When: two callers race on it
    let (a, b) = tokio::join!(
        resolver.resolve("device-1", "Alice"),
        resolver.resolve("device-1", "Alice")
    );

    // Then: both resolve to the one created identity
    let a = a.unwrap();
    let b = b.unwrap();
    assert_that!(a.id, eq(b.id));
    assert_that!(count_identities(&pool).await, eq(1));
}

#[tokio::test]
async fn given_empty_inputs_when_resolved_then_field_errors_reported() {
    let pool = create_test_pool().await;
    let resolver = DeviceResolver::new(IdentityRepository::new(pool.clone()));

    let result = resolver.resolve("", "   ").await;

    let Err(IdentityError::Validation { errors, .. }) = result else {
        panic!("expected validation failure");
    };
    let fields: Vec<&str> = errors.iter().map(|e| e.field).collect();
    assert_that!(fields, unordered_elements_are![eq(&"device_anchor"), eq(&"display_name")]);
    assert_that!(count_identities(&pool).await, eq(0));
}

#[tokio::test]
async fn given_surrounding_whitespace_when_resolved_then_name_stored_trimmed() {
    let pool = create_test_pool().await;
    let resolver = DeviceResolver::new(IdentityRepository::new(pool.clone()));

    let identity = resolver.resolve("device-1", "  Alice ").await.unwrap();

    assert_that!(identity.display_name, eq("Alice"));
}
