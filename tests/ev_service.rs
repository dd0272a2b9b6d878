// End-to-end tests of the scoring-service client against an in-process server

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use nfl_ev::config::FormDefaults;
use nfl_ev::ev::rest::EvClient;
use nfl_ev::ev::types::{EvResponse, Side, WagerRequest};
use nfl_ev::ev::EvError;
use nfl_ev::tui::form::FieldKey;
use nfl_ev::tui::state::AppState;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Clone, Default)]
struct Seen {
    hits: Arc<AtomicUsize>,
    last: Arc<Mutex<Option<WagerRequest>>>,
}

async fn ev_ok(State(seen): State<Seen>, Json(req): Json<WagerRequest>) -> Json<EvResponse> {
    seen.hits.fetch_add(1, Ordering::SeqCst);
    let p_home = 0.62;
    let (p_model, market_price) = match req.side {
        Side::HomeYes => (p_home, 0.54),
        Side::HomeNo => (1.0 - p_home, 0.47),
    };
    *seen.last.lock().unwrap() = Some(req.clone());
    let edge_raw = p_model - market_price;
    Json(EvResponse {
        p_model,
        fair_price: p_model,
        market_price,
        fee_cost: req.fee_cost,
        edge_raw,
        edge_after_fees: edge_raw - req.fee_cost,
        ev_per_contract: edge_raw - req.fee_cost,
    })
}

async fn spawn_server() -> (String, Seen) {
    let seen = Seen::default();
    let app = Router::new()
        .route("/ev/game", post(ev_ok))
        .route(
            "/bad/ev/game",
            post(|| async { (StatusCode::BAD_REQUEST, "{\"detail\":\"No full-game moneyline market found\"}") }),
        )
        .route("/empty/ev/game", post(|| async { StatusCode::BAD_GATEWAY }))
        .route("/garbled/ev/game", post(|| async { "not json" }))
        .with_state(seen.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{}", addr), seen)
}

fn client(base: &str) -> EvClient {
    EvClient::new(base, Duration::from_secs(5)).unwrap()
}

fn app_state(endpoint: String) -> AppState {
    let defaults = FormDefaults {
        slug: "nfl-buf-hou-2025-11-20".to_string(),
        yardline: "BUF 12".to_string(),
        quarter: 4,
        clock: "0:30".to_string(),
        ..FormDefaults::default()
    };
    AppState::new(defaults, endpoint)
}

#[tokio::test]
async fn test_successful_submission_round_trip() {
    let (base, seen) = spawn_server().await;
    let ev = client(&base);
    let mut state = app_state(ev.endpoint());

    let request = state.begin_submit().expect("form is valid");
    let outcome = ev.evaluate_game(&request).await;
    state.finish_submit(outcome);

    assert_eq!(seen.hits.load(Ordering::SeqCst), 1);
    let sent = seen.last.lock().unwrap().clone().unwrap();
    assert_eq!(sent.state.seconds_remaining, 30);
    assert_eq!(sent.state.yardline_100, 88);
    assert_eq!(sent.side, Side::HomeYes);

    let result = state.result.expect("result stored");
    assert!((result.response.edge_after_fees - 0.07).abs() < 1e-9);
    assert!(state.page_error.is_none());
    assert!(!state.loading);
}

#[tokio::test]
async fn test_non_2xx_surfaces_body() {
    let (base, _) = spawn_server().await;
    let ev = client(&format!("{}/bad", base));
    let mut state = app_state(ev.endpoint());

    let request = state.begin_submit().unwrap();
    let outcome = ev.evaluate_game(&request).await;
    assert!(matches!(outcome, Err(EvError::Status { status: 400, .. })));
    state.finish_submit(outcome);

    assert_eq!(
        state.page_error.as_deref(),
        Some("{\"detail\":\"No full-game moneyline market found\"}")
    );
    assert!(state.result.is_none());
}

#[tokio::test]
async fn test_non_2xx_with_empty_body_surfaces_status_text() {
    let (base, _) = spawn_server().await;
    let ev = client(&format!("{}/empty", base));
    let mut state = app_state(ev.endpoint());

    let request = state.begin_submit().unwrap();
    state.finish_submit(ev.evaluate_game(&request).await);
    assert_eq!(state.page_error.as_deref(), Some("Bad Gateway"));
}

#[tokio::test]
async fn test_undecodable_body_is_an_error() {
    let (base, _) = spawn_server().await;
    let ev = client(&format!("{}/garbled", base));
    let request = app_state(ev.endpoint()).begin_submit().unwrap();
    assert!(matches!(ev.evaluate_game(&request).await, Err(EvError::Decode(_))));
}

#[tokio::test]
async fn test_unreachable_service_is_transport_error() {
    // Bind then drop to get a port nothing listens on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let ev = client(&format!("http://{}", addr));
    let mut state = app_state(ev.endpoint());
    let request = state.begin_submit().unwrap();
    let outcome = ev.evaluate_game(&request).await;
    assert!(matches!(outcome, Err(EvError::Transport(_))));
    state.finish_submit(outcome);
    assert!(state.page_error.is_some());
    assert!(!state.loading);
}

#[tokio::test]
async fn test_bad_yardline_never_reaches_server() {
    let (base, seen) = spawn_server().await;
    let ev = client(&base);
    let mut state = app_state(ev.endpoint());
    state.form.field_mut(FieldKey::Yardline).unwrap().value = "NYJ 10".to_string();

    assert!(state.begin_submit().is_none());
    assert_eq!(seen.hits.load(Ordering::SeqCst), 0);
    assert!(state.form.field(FieldKey::Yardline).unwrap().error.is_some());
}
