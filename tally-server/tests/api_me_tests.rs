//! Integration tests for session-authenticated profile handlers
mod common;

use crate::common::create_test_app_state;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use tower::ServiceExt;

use tally_server::routes::build_router;

async fn response_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

/// Guest-auth a device and return (identity id, session token)
async fn guest_session(app: &axum::Router, anchor: &str, name: &str) -> (String, String) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/auth/guest")
                .header("content-type", "application/json")
                .body(Body::from(
                    serde_json::json!({ "device_anchor": anchor, "display_name": name })
                        .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;
    (
        json["identity"]["id"].as_str().unwrap().to_string(),
        json["session_token"].as_str().unwrap().to_string(),
    )
}

#[tokio::test]
async fn test_me_requires_bearer_credential() {
    let state = create_test_app_state().await;
    let app = build_router(state.clone());

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/v1/me")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = response_json(response).await;
    assert_eq!(json["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_me_rejects_garbage_credential() {
    let state = create_test_app_state().await;
    let app = build_router(state.clone());

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/v1/me")
                .header("authorization", "Bearer not.a.valid.jwt")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_rejects_non_bearer_scheme() {
    let state = create_test_app_state().await;
    let app = build_router(state.clone());

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/v1/me")
                .header("authorization", "Basic dXNlcjpwYXNz")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_resolves_session_to_identity() {
    let state = create_test_app_state().await;
    let app = build_router(state.clone());
    let (identity_id, session_token) = guest_session(&app, "device-1", "Alice").await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/v1/me")
                .header("authorization", format!("Bearer {}", session_token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;
    assert_eq!(json["identity"]["id"], identity_id.as_str());
    assert_eq!(json["identity"]["display_name"], "Alice");
}

#[tokio::test]
async fn test_update_display_name_is_explicit_operation() {
    let state = create_test_app_state().await;
    let app = build_router(state.clone());
    let (identity_id, session_token) = guest_session(&app, "device-1", "Alice").await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PATCH")
                .uri("/api/v1/me/display-name")
                .header("authorization", format!("Bearer {}", session_token))
                .header("content-type", "application/json")
                .body(Body::from(
                    serde_json::json!({ "display_name": "Alicia" }).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;
    assert_eq!(json["identity"]["id"], identity_id.as_str());
    assert_eq!(json["identity"]["display_name"], "Alicia");

    // The rename sticks for subsequent guest auth from the same device
    let (_, _) = guest_session(&app, "device-1", "SomebodyElse").await;
    let check = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/v1/me")
                .header("authorization", format!("Bearer {}", session_token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let check_json = response_json(check).await;
    assert_eq!(check_json["identity"]["display_name"], "Alicia");
}

#[tokio::test]
async fn test_update_display_name_rejects_blank() {
    let state = create_test_app_state().await;
    let app = build_router(state.clone());
    let (_, session_token) = guest_session(&app, "device-1", "Alice").await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PATCH")
                .uri("/api/v1/me/display-name")
                .header("authorization", format!("Bearer {}", session_token))
                .header("content-type", "application/json")
                .body(Body::from(
                    serde_json::json!({ "display_name": "   " }).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = response_json(response).await;
    assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
}
