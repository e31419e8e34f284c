use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use auth_cell::router::auth_routes;
use shared_utils::test_utils::{JwtTestUtils, TestConfig, TestUser};

fn test_app(mock_server: &MockServer) -> (Router, TestConfig) {
    let config = TestConfig::with_store_url(&mock_server.uri());
    (auth_routes(config.to_arc()), config)
}

#[tokio::test]
async fn login_returns_the_session_payload() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "jwt-goes-here",
            "token_type": "bearer",
            "expires_in": 3600
        })))
        .mount(&mock_server)
        .await;

    let (app, _config) = test_app(&mock_server);
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/login")
                .header("content-type", "application/json")
                .body(Body::from(
                    r#"{"email":"admin@example.com","password":"hunter2"}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let session: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(session["access_token"], "jwt-goes-here");
}

#[tokio::test]
async fn bad_credentials_are_unauthorized() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": "invalid_grant"
        })))
        .mount(&mock_server)
        .await;

    let (app, _config) = test_app(&mock_server);
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/login")
                .header("content-type", "application/json")
                .body(Body::from(
                    r#"{"email":"admin@example.com","password":"wrong"}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn session_introspects_a_valid_token() {
    let mock_server = MockServer::start().await;
    let (app, config) = test_app(&mock_server);

    let admin = TestUser::default();
    let token = JwtTestUtils::create_test_token(&admin, &config.jwt_secret, None);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/session")
                .header("Authorization", format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let session: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(session["valid"], true);
    assert_eq!(session["user_id"], admin.id);
}

#[tokio::test]
async fn session_rejects_a_forged_token() {
    let mock_server = MockServer::start().await;
    let (app, _config) = test_app(&mock_server);

    let admin = TestUser::default();
    let token = JwtTestUtils::create_test_token(&admin, "some-other-secret-entirely", None);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/session")
                .header("Authorization", format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logout_passes_the_token_through() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/logout"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&mock_server)
        .await;

    let (app, _config) = test_app(&mock_server);
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/logout")
                .header("Authorization", "Bearer some-access-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}
