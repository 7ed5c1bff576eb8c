//! Axum HTTP boundary around the rules engine.
//!
//! Every game endpoint answers with a [`GameResponse`]. Win and loss are
//! decided here after each reveal; the engine only exposes the queries.
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | GET | `/games` | All stored games |
//! | POST | `/games/new` | Generate a board and store a new game |
//! | GET | `/games/:id`, `/games/:id/state` | One game |
//! | POST | `/games/:id/start` | new -> started |
//! | POST | `/games/:id/tick` | One elapsed second |
//! | POST | `/games/:id/pause` | Pause |
//! | POST | `/games/:id/resume` | Resume |
//! | POST | `/games/:id/mark_as_flag` | Flag a cell |
//! | POST | `/games/:id/mark_as_question` | Question-mark a cell |
//! | POST | `/games/:id/reveal` | Reveal a cell, then settle win/loss |

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::HeaderMap,
    routing::{get, post},
};
use minesweeper_core::{Game, GameConfig, GameError, GameId, RandomBoardGenerator};
use minesweeper_protocol::{FieldRequest, GameResponse, HealthResponse, NewGameRequest};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::ServerConfig;
use crate::error::{ApiError, ApiJson, ApiPath};
use crate::store::{GameEntry, GameStore};

/// Header naming the player a new game belongs to.
pub const PLAYER_HEADER: &str = "x-player";

const ANONYMOUS_PLAYER: &str = "anonymous";

/// Shared application state.
pub struct AppState {
    pub store: Arc<dyn GameStore>,
    pub config: ServerConfig,
}

type SharedState = Arc<AppState>;

type ApiResult = Result<Json<GameResponse>, ApiError>;

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .route("/games", get(list_games))
        .route("/games/new", post(new_game))
        .route("/games/:id", get(get_game))
        .route("/games/:id/state", get(get_game))
        .route("/games/:id/start", post(start))
        .route("/games/:id/tick", post(tick))
        .route("/games/:id/pause", post(pause))
        .route("/games/:id/resume", post(resume))
        .route("/games/:id/mark_as_flag", post(mark_as_flag))
        .route("/games/:id/mark_as_question", post(mark_as_question))
        .route("/games/:id/reveal", post(reveal))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(Arc::new(state))
}

fn game_response(entry: &GameEntry) -> GameResponse {
    GameResponse {
        id: entry.id,
        title: entry.title.clone(),
        state: entry.game.state(),
        board_view: entry.game.view(),
        duration_seconds: entry.game.duration_seconds(),
        player: entry.player.clone(),
    }
}

fn player_name(headers: &HeaderMap) -> String {
    headers
        .get(PLAYER_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or(ANONYMOUS_PLAYER)
        .to_string()
}

/// Runs `op` on the stored game and answers with the result.
fn apply(
    state: &AppState,
    id: GameId,
    mut op: impl FnMut(&mut Game) -> minesweeper_core::Result<()>,
) -> ApiResult {
    let entry = state
        .store
        .update(id, &mut |entry: &mut GameEntry| op(&mut entry.game))?;
    Ok(Json(game_response(&entry)))
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

async fn list_games(State(state): State<SharedState>) -> Json<Vec<GameResponse>> {
    Json(state.store.list().iter().map(game_response).collect())
}

async fn get_game(State(state): State<SharedState>, ApiPath(id): ApiPath<GameId>) -> ApiResult {
    let entry = state.store.get(id)?;
    Ok(Json(game_response(&entry)))
}

async fn new_game(
    State(state): State<SharedState>,
    headers: HeaderMap,
    ApiJson(req): ApiJson<NewGameRequest>,
) -> ApiResult {
    let player = player_name(&headers);
    let config = GameConfig::new(req.rows, req.columns, req.mines)?;
    let duration_seconds = req
        .duration_seconds
        .unwrap_or(state.config.default_duration_seconds);
    if duration_seconds < 1 {
        return Err(GameError::InvalidParameters("duration must be at least one second").into());
    }

    let game = Game::generate(config, RandomBoardGenerator::from_entropy())
        .with_duration_seconds(duration_seconds);
    let title = req
        .title
        .unwrap_or_else(|| format!("Game for user {}", player));

    let entry = state.store.insert(title, player, game);
    log::info!(
        "New game {} for {}: {}x{} with {} mines",
        entry.id,
        entry.player,
        config.rows(),
        config.cols(),
        config.mines()
    );
    Ok(Json(game_response(&entry)))
}

async fn start(State(state): State<SharedState>, ApiPath(id): ApiPath<GameId>) -> ApiResult {
    apply(&state, id, |game| {
        game.start();
        Ok(())
    })
}

/// One tick per elapsed second; the game times out when its duration runs out.
async fn tick(State(state): State<SharedState>, ApiPath(id): ApiPath<GameId>) -> ApiResult {
    apply(&state, id, |game| {
        if game.tick().is_finished() {
            log::info!("Game {} finished: {}", id, game.state());
        }
        Ok(())
    })
}

async fn pause(State(state): State<SharedState>, ApiPath(id): ApiPath<GameId>) -> ApiResult {
    apply(&state, id, |game| {
        game.pause();
        Ok(())
    })
}

async fn resume(State(state): State<SharedState>, ApiPath(id): ApiPath<GameId>) -> ApiResult {
    apply(&state, id, |game| {
        game.resume();
        Ok(())
    })
}

async fn mark_as_flag(
    State(state): State<SharedState>,
    ApiPath(id): ApiPath<GameId>,
    ApiJson(field): ApiJson<FieldRequest>,
) -> ApiResult {
    apply(&state, id, |game| {
        let coords = game.checked_coords(field.x, field.y)?;
        game.mark_flag_at(coords)
    })
}

async fn mark_as_question(
    State(state): State<SharedState>,
    ApiPath(id): ApiPath<GameId>,
    ApiJson(field): ApiJson<FieldRequest>,
) -> ApiResult {
    apply(&state, id, |game| {
        let coords = game.checked_coords(field.x, field.y)?;
        game.mark_question_at(coords)
    })
}

async fn reveal(
    State(state): State<SharedState>,
    ApiPath(id): ApiPath<GameId>,
    ApiJson(field): ApiJson<FieldRequest>,
) -> ApiResult {
    apply(&state, id, |game| {
        let coords = game.checked_coords(field.x, field.y)?;
        let outcome = game.settle_reveal(coords)?;
        if game.state().is_finished() {
            log::info!("Game {} finished: {}", id, game.state());
        } else if outcome.has_update() {
            log::debug!("Game {} revealed {:?}", id, coords);
        }
        Ok(())
    })
}
