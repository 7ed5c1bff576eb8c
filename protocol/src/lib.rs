//! JSON bodies exchanged with the HTTP boundary.

use minesweeper_core::{BoardView, GameId, GameState};
use serde::{Deserialize, Serialize};

/// `POST /games/new`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewGameRequest {
    pub rows: i64,
    pub columns: i64,
    pub mines: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Falls back to the server's configured duration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<i32>,
}

/// Body of the per-cell operations: reveal, flag, question mark.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRequest {
    pub x: i64,
    pub y: i64,
}

/// Renderable state of one game, returned by every game endpoint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameResponse {
    pub id: GameId,
    pub title: String,
    pub state: GameState,
    pub board_view: BoardView,
    pub duration_seconds: i32,
    pub player: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub kind: ErrorKind,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidParameters,
    InvalidCoordinate,
    InvalidData,
    NotFound,
    /// Body or path that could not be decoded.
    MalformedRequest,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use minesweeper_core::ViewCell;

    #[test]
    fn new_game_request_optional_fields() {
        let req: NewGameRequest =
            serde_json::from_str(r#"{"rows": 3, "columns": 4, "mines": 2}"#).unwrap();

        assert_eq!(req.columns, 4);
        assert_eq!(req.title, None);
        assert_eq!(req.duration_seconds, None);
    }

    #[test]
    fn game_response_wire_shape() {
        let response = GameResponse {
            id: 7,
            title: "Game for user ana".into(),
            state: GameState::Paused,
            board_view: BoardView(vec![vec![ViewCell::Blank, ViewCell::Flag]]),
            duration_seconds: 42,
            player: "ana".into(),
        };

        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["state"], "paused");
        assert_eq!(json["board_view"], serde_json::json!([[" ", "!"]]));
        assert_eq!(
            serde_json::from_value::<GameResponse>(json).unwrap(),
            response
        );
    }

    #[test]
    fn error_kind_is_snake_case() {
        let body = ErrorResponse {
            error: "Game 3 not found".into(),
            kind: ErrorKind::NotFound,
        };

        assert_eq!(
            serde_json::to_value(body).unwrap()["kind"],
            serde_json::json!("not_found")
        );
    }
}
