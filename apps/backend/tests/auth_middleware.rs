mod support;

use actix_http::Request;
use actix_web::body::{BoxBody, EitherBody};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::{header, StatusCode};
use actix_web::test;
use backend::state::security_config::SecurityConfig;
use serde_json::json;

use support::app_builder::create_test_app;
use support::auth::{bearer_header, mint_expired_token, mint_test_token};
use support::flows::{asset_json, post_json_ok};
use support::state::build_test_state;

/// Middleware rejections surface as service errors, not rendered
/// responses; capture the status and detail they would render with.
async fn call_and_capture_error<S>(app: &S, req: Request) -> (StatusCode, String)
where
    S: Service<Request, Response = ServiceResponse<EitherBody<BoxBody>>, Error = actix_web::Error>,
{
    let err = app.call(req).await.expect_err("expected an auth rejection");
    (err.as_response_error().status_code(), err.to_string())
}

#[actix_web::test]
async fn missing_authorization_header_is_rejected() {
    let state = build_test_state(5).await;
    let app = create_test_app(state)
        .with_prod_routes()
        .build()
        .await
        .expect("create test app");

    let req = test::TestRequest::post().uri("/match").to_request();
    let (status, detail) = call_and_capture_error(&app, req).await;
    assert_eq!(status.as_u16(), 401);
    assert_eq!(detail, "UnauthorizedMissingBearer");
}

#[actix_web::test]
async fn malformed_authorization_headers_are_rejected() {
    let state = build_test_state(5).await;
    let app = create_test_app(state)
        .with_prod_routes()
        .build()
        .await
        .expect("create test app");

    for raw in ["Token abc", "Bearer", "bearer abc.def.ghi", "Bearer a b"] {
        let req = test::TestRequest::post()
            .uri("/match")
            .insert_header((header::AUTHORIZATION, raw))
            .to_request();
        let (status, detail) = call_and_capture_error(&app, req).await;
        assert_eq!(status.as_u16(), 401, "header {raw:?}");
        assert_eq!(detail, "UnauthorizedMissingBearer", "header {raw:?}");
    }
}

#[actix_web::test]
async fn garbage_tokens_are_invalid() {
    let state = build_test_state(5).await;
    let app = create_test_app(state)
        .with_prod_routes()
        .build()
        .await
        .expect("create test app");

    let req = test::TestRequest::post()
        .uri("/match")
        .insert_header((header::AUTHORIZATION, "Bearer not.a.jwt"))
        .to_request();
    let (status, detail) = call_and_capture_error(&app, req).await;
    assert_eq!(status.as_u16(), 401);
    assert_eq!(detail, "UnauthorizedInvalidJwt");
}

#[actix_web::test]
async fn tokens_minted_with_a_foreign_secret_are_invalid() {
    let state = build_test_state(5).await;
    let app = create_test_app(state)
        .with_prod_routes()
        .build()
        .await
        .expect("create test app");

    let foreign = SecurityConfig::new(b"someone_elses_secret".to_vec());
    let token = mint_test_token("alice", Some("Alice"), &foreign);
    let req = test::TestRequest::post()
        .uri("/match")
        .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
        .to_request();
    let (status, detail) = call_and_capture_error(&app, req).await;
    assert_eq!(status.as_u16(), 401);
    assert_eq!(detail, "UnauthorizedInvalidJwt");
}

#[actix_web::test]
async fn expired_tokens_are_rejected() {
    let state = build_test_state(5).await;
    let sec = state.security.clone();
    let app = create_test_app(state)
        .with_prod_routes()
        .build()
        .await
        .expect("create test app");

    let token = mint_expired_token("alice", &sec);
    let req = test::TestRequest::post()
        .uri("/match")
        .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
        .to_request();
    let (status, detail) = call_and_capture_error(&app, req).await;
    assert_eq!(status.as_u16(), 401);
    assert_eq!(detail, "UnauthorizedExpiredJwt");
}

#[actix_web::test]
async fn a_valid_bearer_token_passes_through() {
    let state = build_test_state(5).await;
    let sec = state.security.clone();
    let app = create_test_app(state)
        .with_prod_routes()
        .build()
        .await
        .expect("create test app");

    let req = test::TestRequest::post()
        .uri("/automatch")
        .insert_header((header::AUTHORIZATION, bearer_header("alice", &sec)))
        .set_json(json!({"action": "cancel", "asset": asset_json("101", "epic")}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "cancelled");
    assert_eq!(body["removed"], false);
}

/// EventSource clients cannot set headers; the stream routes accept the
/// token as a query parameter instead.
#[actix_web::test]
async fn query_token_authenticates_stream_routes() {
    let state = build_test_state(5).await;
    let sec = state.security.clone();
    let streams = state.streams.clone();
    let app = create_test_app(state)
        .with_prod_routes()
        .build()
        .await
        .expect("create test app");

    let created = post_json_ok(
        &app,
        "alice",
        &sec,
        "/match",
        json!({"asset": asset_json("101", "epic")}),
    )
    .await;
    let match_id = created["id"].as_str().unwrap();

    let token = mint_test_token("alice", Some("Alice"), &sec);
    let req = test::TestRequest::get()
        .uri(&format!("/match/{match_id}/stream?token={token}"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);
    assert_eq!(
        resp.headers().get(header::CONTENT_TYPE).unwrap(),
        "text/event-stream"
    );

    // Tear the long-lived channel down instead of leaking it into the runtime.
    drop(resp);
    streams.cancel_all();
}

#[actix_web::test]
async fn stream_routes_reject_a_bad_query_token() {
    let state = build_test_state(5).await;
    let app = create_test_app(state)
        .with_prod_routes()
        .build()
        .await
        .expect("create test app");

    let req = test::TestRequest::get()
        .uri("/automatch/stream?rarity=epic&token=not.a.jwt")
        .to_request();
    let (status, detail) = call_and_capture_error(&app, req).await;
    assert_eq!(status.as_u16(), 401);
    assert_eq!(detail, "UnauthorizedInvalidJwt");
}
