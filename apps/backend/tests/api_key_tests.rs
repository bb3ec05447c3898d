mod common;

use actix_web::body::BoxBody;
use actix_web::dev::ServiceResponse;
use actix_web::http::StatusCode;
use actix_web::{test, HttpMessage};
use backend_test_support::assert_problem;
use scoreboard_backend::infra::state::build_state;
use scoreboard_backend::{ApiKeyOutcome, SecurityConfig};
use time::{Duration, OffsetDateTime};

use crate::common::{create_test_app, memory_db, memory_state};

fn outcome(resp: &ServiceResponse<BoxBody>) -> Option<ApiKeyOutcome> {
    resp.request().extensions().get::<ApiKeyOutcome>().copied()
}

#[actix_web::test]
async fn valid_key_passes() {
    let (state, key) = memory_state().await;
    let app = create_test_app(state).await;

    let req = test::TestRequest::get()
        .uri("/api/scores")
        .insert_header(("x-api-key", key.as_str()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(outcome(&resp), Some(ApiKeyOutcome::Accepted));
}

#[actix_web::test]
async fn missing_key_is_rejected() {
    let (state, _key) = memory_state().await;
    let app = create_test_app(state).await;

    let req = test::TestRequest::get().uri("/api/player-stats").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(outcome(&resp), Some(ApiKeyOutcome::Missing));
    let problem = assert_problem(resp, StatusCode::UNAUTHORIZED, "UNAUTHORIZED_MISSING_API_KEY").await;
    assert_eq!(problem.detail, "Missing API key");
}

#[actix_web::test]
async fn wrong_key_is_rejected() {
    let (state, _key) = memory_state().await;
    let app = create_test_app(state).await;

    let req = test::TestRequest::post()
        .uri("/api/scores")
        .insert_header(("x-api-key", "not-the-key"))
        .set_json(serde_json::json!({}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(outcome(&resp), Some(ApiKeyOutcome::Invalid));
    assert_problem(resp, StatusCode::UNAUTHORIZED, "UNAUTHORIZED_INVALID_API_KEY").await;
}

#[actix_web::test]
async fn expired_key_is_rejected() {
    let issued = OffsetDateTime::now_utc() - Duration::days(31);
    let state = build_state()
        .with_connection(memory_db().await)
        .with_security(SecurityConfig::new("old-key", issued, 30))
        .build()
        .await
        .unwrap();
    let app = create_test_app(state).await;

    let req = test::TestRequest::get()
        .uri("/api/scores")
        .insert_header(("x-api-key", "old-key"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(outcome(&resp), Some(ApiKeyOutcome::Expired));
    let problem = assert_problem(resp, StatusCode::UNAUTHORIZED, "UNAUTHORIZED_EXPIRED_API_KEY").await;
    assert_eq!(problem.detail, "API key expired");
}

#[actix_web::test]
async fn query_key_only_counts_for_websocket_upgrades() {
    let (state, key) = memory_state().await;
    let app = create_test_app(state).await;

    let req = test::TestRequest::get()
        .uri(&format!("/api/scores?api_key={key}"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem(resp, StatusCode::UNAUTHORIZED, "UNAUTHORIZED_MISSING_API_KEY").await;
}

#[actix_web::test]
async fn public_routes_need_no_key() {
    let (state, _key) = memory_state().await;
    let app = create_test_app(state).await;

    for uri in ["/", "/health"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK, "{uri}");
        assert_eq!(outcome(&resp), None, "{uri} never checks the key");
    }
}
