use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use tower::ServiceExt;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use practitioner_cell::router::practitioner_routes;
use shared_utils::test_utils::{JwtTestUtils, MockStoreResponses, TestConfig, TestUser};

fn test_app(mock_server: &MockServer) -> (Router, String) {
    let config = TestConfig::with_store_url(&mock_server.uri());
    let admin = TestUser::default();
    let token = JwtTestUtils::create_test_token(&admin, &config.jwt_secret, None);

    (practitioner_routes(config.to_arc()), token)
}

#[tokio::test]
async fn the_roster_is_public_and_ordered_by_name() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/practitioners"))
        .and(query_param("order", "name.asc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            MockStoreResponses::practitioner_row(1, "Dr. Adrian Ionescu", Some("Orthodontist")),
            MockStoreResponses::practitioner_row(2, "Dr. Alexandru Popescu", None),
        ])))
        .mount(&mock_server)
        .await;

    let (app, _token) = test_app(&mock_server);
    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let listing: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(listing["total"], 2);
    assert_eq!(listing["practitioners"][0]["name"], "Dr. Adrian Ionescu");
}

#[tokio::test]
async fn creating_requires_an_authenticated_session() {
    let mock_server = MockServer::start().await;
    let (app, _token) = test_app(&mock_server);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"name":"Dr. Maria Marinescu"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn an_admin_can_add_a_practitioner() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/practitioners"))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!([
            MockStoreResponses::practitioner_row(3, "Dr. Maria Marinescu", Some("Oral Surgeon")),
        ])))
        .mount(&mock_server)
        .await;

    let (app, token) = test_app(&mock_server);
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/")
                .header("Authorization", format!("Bearer {}", token))
                .header("content-type", "application/json")
                .body(Body::from(
                    r#"{"name":"Dr. Maria Marinescu","specialty":"Oral Surgeon"}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let practitioner: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(practitioner["id"], 3);
}

#[tokio::test]
async fn a_blank_name_is_rejected() {
    let mock_server = MockServer::start().await;
    let (app, token) = test_app(&mock_server);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/")
                .header("Authorization", format!("Bearer {}", token))
                .header("content-type", "application/json")
                .body(Body::from(r#"{"name":"   "}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn deleting_an_unknown_practitioner_is_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/rest/v1/practitioners"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&mock_server)
        .await;

    let (app, token) = test_app(&mock_server);
    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/99")
                .header("Authorization", format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
