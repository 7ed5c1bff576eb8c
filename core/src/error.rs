use thiserror::Error;

use crate::GameId;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid parameters: {0}")]
    InvalidParameters(&'static str),
    #[error("Invalid coordinates ({x}, {y})")]
    InvalidCoordinate { x: i64, y: i64 },
    #[error("Game {0} not found")]
    NotFound(GameId),
    #[error("Unknown cell symbol {0:?}")]
    InvalidSymbol(String),
    #[error("Board shape does not match declared size")]
    InvalidBoardShape,
}

pub type Result<T> = core::result::Result<T, GameError>;
