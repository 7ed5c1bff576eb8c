//! HTTP API tests using axum's oneshot pattern (via tower::ServiceExt), no
//! TCP binding needed.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use minesweeper_core::{Board, Game, GameState, MineCell, Overlay, ViewCell};
use minesweeper_protocol::{ErrorKind, ErrorResponse, GameResponse};
use minesweeper_server::{AppState, GameStore, MemoryGameStore, ServerConfig, create_router};
use tower::ServiceExt;

fn app_with(store: Arc<MemoryGameStore>) -> axum::Router {
    create_router(AppState {
        store,
        config: ServerConfig::default(),
    })
}

fn app() -> axum::Router {
    app_with(Arc::new(MemoryGameStore::new()))
}

/// Store holding game 1: a 3x3 board with a single mine at (0, 0).
fn corner_mine_store() -> Arc<MemoryGameStore> {
    let store = Arc::new(MemoryGameStore::new());
    let board = Board::from_mine_coords((3, 3), &[(0, 0)]).unwrap();
    let mut game = Game::new(board, Overlay::new((3, 3)))
        .unwrap()
        .with_duration_seconds(2);
    game.start();
    store.insert("corner".into(), "ana".into(), game);
    store
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn post_empty(uri: &str) -> Request<Body> {
    Request::post(uri).body(Body::empty()).unwrap()
}

async fn body_json<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ── health ───────────────────────────────────────────────────────────

#[tokio::test]
async fn health_returns_ok() {
    let resp = app()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let json: serde_json::Value = body_json(resp.into_body()).await;
    assert_eq!(json["status"], "ok");
}

// ── new game ─────────────────────────────────────────────────────────

#[tokio::test]
async fn new_game_is_all_hidden() {
    let request = Request::post("/games/new")
        .header("content-type", "application/json")
        .header("x-player", "ana")
        .body(Body::from(r#"{"rows": 4, "columns": 5, "mines": 3}"#))
        .unwrap();

    let resp = app().oneshot(request).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let game: GameResponse = body_json(resp.into_body()).await;
    assert_eq!(game.id, 1);
    assert_eq!(game.state, GameState::New);
    assert_eq!(game.player, "ana");
    assert_eq!(game.title, "Game for user ana");
    assert_eq!(game.duration_seconds, 90);
    assert_eq!(game.board_view.0.len(), 4);
    assert!(
        game.board_view
            .0
            .iter()
            .all(|row| row.len() == 5 && row.iter().all(|&cell| cell == ViewCell::Blank))
    );
}

#[tokio::test]
async fn new_game_rejects_too_many_mines() {
    let resp = app()
        .oneshot(post_json(
            "/games/new",
            serde_json::json!({ "rows": 3, "columns": 3, "mines": 9 }),
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let err: ErrorResponse = body_json(resp.into_body()).await;
    assert_eq!(err.kind, ErrorKind::InvalidParameters);
}

#[tokio::test]
async fn new_game_rejects_small_board() {
    let resp = app()
        .oneshot(post_json(
            "/games/new",
            serde_json::json!({ "rows": 2, "columns": 3, "mines": 1 }),
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn nearly_full_board_is_decided_by_first_reveal() {
    let app = app();
    let resp = app
        .clone()
        .oneshot(post_json(
            "/games/new",
            serde_json::json!({ "rows": 3, "columns": 3, "mines": 8 }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app
        .oneshot(post_json("/games/1/reveal", serde_json::json!({ "x": 1, "y": 1 })))
        .await
        .unwrap();

    let game: GameResponse = body_json(resp.into_body()).await;
    match game.board_view.0[1][1] {
        ViewCell::Open(MineCell::Mine) => assert_eq!(game.state, GameState::Lost),
        ViewCell::Open(MineCell::Count(8)) => assert_eq!(game.state, GameState::Won),
        other => panic!("unexpected cell {:?}", other),
    }
}

// ── lookups ──────────────────────────────────────────────────────────

#[tokio::test]
async fn unknown_game_is_not_found() {
    let resp = app()
        .oneshot(Request::get("/games/42").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let err: ErrorResponse = body_json(resp.into_body()).await;
    assert_eq!(err.kind, ErrorKind::NotFound);

    let resp = app().oneshot(post_empty("/games/42/tick")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_and_state_show_stored_games() {
    let app = app_with(corner_mine_store());

    let resp = app
        .clone()
        .oneshot(Request::get("/games").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let games: Vec<GameResponse> = body_json(resp.into_body()).await;
    assert_eq!(games.len(), 1);
    assert_eq!(games[0].title, "corner");

    let resp = app
        .oneshot(Request::get("/games/1/state").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let game: GameResponse = body_json(resp.into_body()).await;
    assert_eq!(game.state, GameState::Started);
}

// ── play ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn reveal_floods_and_wins() {
    let resp = app_with(corner_mine_store())
        .oneshot(post_json("/games/1/reveal", serde_json::json!({ "x": 2, "y": 2 })))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let json: serde_json::Value = body_json(resp.into_body()).await;
    assert_eq!(json["state"], "won");
    assert_eq!(
        json["board_view"],
        serde_json::json!([[" ", "1", "0"], ["1", "1", "0"], ["0", "0", "0"]])
    );
}

#[tokio::test]
async fn reveal_mine_loses() {
    let resp = app_with(corner_mine_store())
        .oneshot(post_json("/games/1/reveal", serde_json::json!({ "x": 0, "y": 0 })))
        .await
        .unwrap();

    let game: GameResponse = body_json(resp.into_body()).await;
    assert_eq!(game.state, GameState::Lost);
    assert_eq!(game.board_view.0[0][0], ViewCell::Open(MineCell::Mine));
}

#[tokio::test]
async fn out_of_range_reveal_is_rejected_without_change() {
    let store = corner_mine_store();
    let before = store.get(1).unwrap();

    let resp = app_with(store.clone())
        .oneshot(post_json("/games/1/reveal", serde_json::json!({ "x": 3, "y": -1 })))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let err: ErrorResponse = body_json(resp.into_body()).await;
    assert_eq!(err.kind, ErrorKind::InvalidCoordinate);
    assert_eq!(store.get(1).unwrap(), before);
}

#[tokio::test]
async fn malformed_field_body_gets_error_response() {
    let store = corner_mine_store();
    let before = store.get(1).unwrap();

    let resp = app_with(store.clone())
        .oneshot(post_json("/games/1/reveal", serde_json::json!({ "x": "a", "y": 0 })))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let err: ErrorResponse = body_json(resp.into_body()).await;
    assert_eq!(err.kind, ErrorKind::MalformedRequest);
    assert!(!err.error.is_empty());
    assert_eq!(store.get(1).unwrap(), before);
}

#[tokio::test]
async fn missing_content_type_gets_error_response() {
    let resp = app()
        .oneshot(
            Request::post("/games/new")
                .body(Body::from(r#"{"rows": 4, "columns": 5, "mines": 3}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    let err: ErrorResponse = body_json(resp.into_body()).await;
    assert_eq!(err.kind, ErrorKind::MalformedRequest);
}

#[tokio::test]
async fn non_numeric_game_id_gets_error_response() {
    let resp = app()
        .oneshot(Request::get("/games/abc").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let err: ErrorResponse = body_json(resp.into_body()).await;
    assert_eq!(err.kind, ErrorKind::MalformedRequest);
}

#[tokio::test]
async fn marks_show_in_view() {
    let app = app_with(corner_mine_store());

    app.clone()
        .oneshot(post_json("/games/1/mark_as_flag", serde_json::json!({ "x": 0, "y": 0 })))
        .await
        .unwrap();
    let resp = app
        .oneshot(post_json(
            "/games/1/mark_as_question",
            serde_json::json!({ "x": 2, "y": 1 }),
        ))
        .await
        .unwrap();

    let game: GameResponse = body_json(resp.into_body()).await;
    assert_eq!(game.board_view.0[0][0], ViewCell::Flag);
    assert_eq!(game.board_view.0[1][2], ViewCell::Question);
    assert_eq!(game.state, GameState::Started);
}

// ── lifecycle ────────────────────────────────────────────────────────

#[tokio::test]
async fn ticks_run_out_the_clock() {
    let app = app_with(corner_mine_store());

    let resp = app.clone().oneshot(post_empty("/games/1/tick")).await.unwrap();
    let game: GameResponse = body_json(resp.into_body()).await;
    assert_eq!(game.state, GameState::Started);
    assert_eq!(game.duration_seconds, 1);

    let resp = app.oneshot(post_empty("/games/1/tick")).await.unwrap();
    let game: GameResponse = body_json(resp.into_body()).await;
    assert_eq!(game.state, GameState::Timeout);
    assert_eq!(game.duration_seconds, 0);
}

#[tokio::test]
async fn pause_then_resume() {
    let app = app_with(corner_mine_store());

    let resp = app.clone().oneshot(post_empty("/games/1/pause")).await.unwrap();
    let game: GameResponse = body_json(resp.into_body()).await;
    assert_eq!(game.state, GameState::Paused);
    assert_eq!(game.duration_seconds, 2);

    let resp = app.oneshot(post_empty("/games/1/resume")).await.unwrap();
    let game: GameResponse = body_json(resp.into_body()).await;
    assert_eq!(game.state, GameState::Started);
    assert_eq!(game.duration_seconds, 1);
}

#[tokio::test]
async fn start_moves_new_game_to_started() {
    let app = app();
    app.clone()
        .oneshot(post_json(
            "/games/new",
            serde_json::json!({ "rows": 3, "columns": 3, "mines": 1, "duration_seconds": 30 }),
        ))
        .await
        .unwrap();

    let resp = app.oneshot(post_empty("/games/1/start")).await.unwrap();

    let game: GameResponse = body_json(resp.into_body()).await;
    assert_eq!(game.state, GameState::Started);
    assert_eq!(game.duration_seconds, 30);
}
