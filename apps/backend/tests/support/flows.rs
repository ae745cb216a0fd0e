//! HTTP-level driving helpers shared by the route suites.
//!
//! Everything here goes through the real route table, so the flows exercise
//! the same extractors and middleware a client would.

use std::time::Duration;

use actix_http::Request;
use actix_web::body::{BoxBody, EitherBody};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::header;
use actix_web::test;
use backend::state::security_config::SecurityConfig;
use serde_json::{json, Value};

use super::auth::bearer_header;

/// A staked-asset payload in wire form. No collection, so settlement falls
/// back to the configured default.
pub fn asset_json(token_id: &str, rarity: &str) -> Value {
    json!({
        "tokenId": token_id,
        "name": format!("QuizPet #{token_id}"),
        "rarity": rarity,
    })
}

/// POST a JSON body as `sub` and return the raw response.
pub async fn post_json<S>(
    app: &S,
    sub: &str,
    sec: &SecurityConfig,
    uri: &str,
    body: Value,
) -> ServiceResponse<EitherBody<BoxBody>>
where
    S: Service<Request, Response = ServiceResponse<EitherBody<BoxBody>>, Error = actix_web::Error>,
{
    let req = test::TestRequest::post()
        .uri(uri)
        .insert_header((header::AUTHORIZATION, bearer_header(sub, sec)))
        .set_json(body)
        .to_request();
    test::call_service(app, req).await
}

/// POST a JSON body as `sub`, expecting success, and parse the response.
pub async fn post_json_ok<S>(
    app: &S,
    sub: &str,
    sec: &SecurityConfig,
    uri: &str,
    body: Value,
) -> Value
where
    S: Service<Request, Response = ServiceResponse<EitherBody<BoxBody>>, Error = actix_web::Error>,
{
    let resp = post_json(app, sub, sec, uri, body).await;
    assert_eq!(resp.status().as_u16(), 200, "POST {uri} did not succeed");
    test::read_body_json(resp).await
}

/// GET a path as `sub` and return the raw response.
pub async fn get_authed<S>(
    app: &S,
    sub: &str,
    sec: &SecurityConfig,
    uri: &str,
) -> ServiceResponse<EitherBody<BoxBody>>
where
    S: Service<Request, Response = ServiceResponse<EitherBody<BoxBody>>, Error = actix_web::Error>,
{
    let req = test::TestRequest::get()
        .uri(uri)
        .insert_header((header::AUTHORIZATION, bearer_header(sub, sec)))
        .to_request();
    test::call_service(app, req).await
}

/// GET a path as `sub`, expecting success, and parse the response.
pub async fn get_json_ok<S>(app: &S, sub: &str, sec: &SecurityConfig, uri: &str) -> Value
where
    S: Service<Request, Response = ServiceResponse<EitherBody<BoxBody>>, Error = actix_web::Error>,
{
    let resp = get_authed(app, sub, sec, uri).await;
    assert_eq!(resp.status().as_u16(), 200, "GET {uri} did not succeed");
    test::read_body_json(resp).await
}

/// Create a match as alice and seat bob, both with wallets recorded.
/// Returns the READY record.
pub async fn ready_match_over_http<S>(app: &S, sec: &SecurityConfig) -> Value
where
    S: Service<Request, Response = ServiceResponse<EitherBody<BoxBody>>, Error = actix_web::Error>,
{
    let created = post_json_ok(
        app,
        "alice",
        sec,
        "/match",
        json!({"asset": asset_json("101", "epic"), "walletAddress": "0xalice"}),
    )
    .await;
    let match_id = created["id"].as_str().expect("match id").to_string();

    post_json_ok(
        app,
        "bob",
        sec,
        "/match/join",
        json!({
            "matchId": match_id,
            "asset": asset_json("202", "epic"),
            "walletAddress": "0xbob",
        }),
    )
    .await
}

/// Poll the match until it reaches `expected`, or panic after two seconds.
pub async fn wait_for_status<S>(
    app: &S,
    sec: &SecurityConfig,
    match_id: &str,
    expected: &str,
) -> Value
where
    S: Service<Request, Response = ServiceResponse<EitherBody<BoxBody>>, Error = actix_web::Error>,
{
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    loop {
        let record = get_json_ok(app, "alice", sec, &format!("/match/{match_id}")).await;
        if record["status"] == expected {
            return record;
        }
        assert!(
            tokio::time::Instant::now() < deadline,
            "match {match_id} never reached {expected}, last state {}",
            record["status"]
        );
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

/// Drive a one-question match to FINISHED over HTTP: alice answers
/// correctly, bob does not, so alice wins and bob owes the stake.
/// The state must have been built with one question per match.
pub async fn finish_one_question_match<S>(app: &S, sec: &SecurityConfig) -> Value
where
    S: Service<Request, Response = ServiceResponse<EitherBody<BoxBody>>, Error = actix_web::Error>,
{
    let ready = ready_match_over_http(app, sec).await;
    let match_id = ready["id"].as_str().expect("match id").to_string();

    post_json_ok(app, "alice", sec, "/match/start", json!({"matchId": match_id})).await;
    let playing = wait_for_status(app, sec, &match_id, "IN_PROGRESS").await;

    let question = &playing["questions"][0];
    let question_id = question["id"].as_str().expect("question id");
    let correct = question["correctOption"].as_i64().expect("correct option");
    let options = question["options"].as_array().expect("options").len() as i64;

    post_json_ok(
        app,
        "alice",
        sec,
        "/match/answer",
        json!({
            "matchId": match_id,
            "questionId": question_id,
            "selectedOption": correct,
            "timeRemaining": 10.0,
        }),
    )
    .await;
    let finished = post_json_ok(
        app,
        "bob",
        sec,
        "/match/answer",
        json!({
            "matchId": match_id,
            "questionId": question_id,
            "selectedOption": (correct + 1) % options,
            "timeRemaining": 5.0,
        }),
    )
    .await;

    assert_eq!(finished["status"], "FINISHED");
    assert_eq!(finished["winner"], "A");
    finished
}
