mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use backend_test_support::assert_problem;
use serde_json::{json, Value};

use crate::common::{create_test_app, memory_state};

#[actix_web::test]
async fn scores_crud_round_trip() {
    let (state, key) = memory_state().await;
    let app = create_test_app(state).await;
    let auth = ("x-api-key", key.clone());

    // create two rounds out of order
    for round in [2, 1] {
        let req = test::TestRequest::post()
            .uri("/api/scores")
            .insert_header(auth.clone())
            .set_json(json!({ "roundNumber": round, "tsim": round * 10 }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let req = test::TestRequest::get()
        .uri("/api/scores")
        .insert_header(auth.clone())
        .to_request();
    let rows: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    let rounds: Vec<i64> = rows.iter().map(|r| r["roundNumber"].as_i64().unwrap()).collect();
    assert_eq!(rounds, vec![1, 2]);
    assert_eq!(rows[0]["tsim"], 10);
    assert_eq!(rows[0]["mumSoup"], 0);
    let id = rows[0]["id"].as_i64().unwrap();

    let req = test::TestRequest::put()
        .uri(&format!("/api/scores/{id}"))
        .insert_header(auth.clone())
        .set_json(json!({ "jason": -4 }))
        .to_request();
    let updated: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!((updated["tsim"].as_i64(), updated["jason"].as_i64()), (Some(10), Some(-4)));

    let req = test::TestRequest::delete()
        .uri(&format!("/api/scores/{id}"))
        .insert_header(auth.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/scores/{id}"))
        .insert_header(auth)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem(resp, StatusCode::NOT_FOUND, "SCORE_NOT_FOUND").await;
}

#[actix_web::test]
async fn taken_round_number_is_reassigned() {
    let (state, key) = memory_state().await;
    let app = create_test_app(state).await;

    let mut assigned = Vec::new();
    for _ in 0..2 {
        let req = test::TestRequest::post()
            .uri("/api/scores")
            .insert_header(("x-api-key", key.as_str()))
            .set_json(json!({ "roundNumber": 1 }))
            .to_request();
        let created: Value = test::call_and_read_body_json(&app, req).await;
        assigned.push(created["roundNumber"].as_i64().unwrap());
    }
    assert_eq!(assigned, vec![1, 2]);
}

#[actix_web::test]
async fn player_stats_crud_round_trip() {
    let (state, key) = memory_state().await;
    let app = create_test_app(state).await;

    let req = test::TestRequest::post()
        .uri("/api/player-stats")
        .insert_header(("x-api-key", key.as_str()))
        .set_json(json!({ "playerName": "MumSoup" }))
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(created["winByOthers"], 0);
    let id = created["id"].as_i64().unwrap();

    let req = test::TestRequest::put()
        .uri(&format!("/api/player-stats/{id}"))
        .insert_header(("x-api-key", key.as_str()))
        .set_json(json!({ "paidOut": 2, "specialBonus": -1 }))
        .to_request();
    let updated: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(updated["paidOut"], 2);
    assert_eq!(updated["specialBonus"], -1);
    assert_eq!(updated["playerName"], "MumSoup");

    let req = test::TestRequest::get()
        .uri("/api/player-stats")
        .insert_header(("x-api-key", key.as_str()))
        .to_request();
    let rows: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(rows.len(), 1);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/player-stats/{id}"))
        .insert_header(("x-api-key", key.as_str()))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NO_CONTENT);
}

#[actix_web::test]
async fn request_errors_use_problem_details() {
    let (state, key) = memory_state().await;
    let app = create_test_app(state).await;

    let req = test::TestRequest::put()
        .uri("/api/scores/abc")
        .insert_header(("x-api-key", key.as_str()))
        .set_json(json!({}))
        .to_request();
    assert_problem(test::call_service(&app, req).await, StatusCode::BAD_REQUEST, "INVALID_RECORD_ID").await;

    let req = test::TestRequest::put()
        .uri("/api/scores/77")
        .insert_header(("x-api-key", key.as_str()))
        .set_json(json!({ "tsim": 1 }))
        .to_request();
    assert_problem(test::call_service(&app, req).await, StatusCode::NOT_FOUND, "SCORE_NOT_FOUND").await;

    let req = test::TestRequest::post()
        .uri("/api/scores")
        .insert_header(("x-api-key", key.as_str()))
        .insert_header(("content-type", "application/json"))
        .set_payload("{ not json")
        .to_request();
    assert_problem(test::call_service(&app, req).await, StatusCode::BAD_REQUEST, "BAD_REQUEST").await;

    let req = test::TestRequest::post()
        .uri("/api/player-stats")
        .insert_header(("x-api-key", key.as_str()))
        .set_json(json!({ "playerName": "  " }))
        .to_request();
    assert_problem(
        test::call_service(&app, req).await,
        StatusCode::UNPROCESSABLE_ENTITY,
        "VALIDATION_ERROR",
    )
    .await;
}

#[actix_web::test]
async fn health_reports_database_and_migrations() {
    let (state, _key) = memory_state().await;
    let app = create_test_app(state).await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["db"], "ok");
    assert_ne!(body["migrations"], "unknown");
    assert_eq!(body["app_version"], env!("CARGO_PKG_VERSION"));
}
