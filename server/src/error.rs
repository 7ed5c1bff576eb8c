use axum::{
    Json,
    extract::{
        FromRequest, FromRequestParts,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use minesweeper_core::GameError;
use minesweeper_protocol::{ErrorKind, ErrorResponse};
use thiserror::Error;

/// Failure of a request, rendered as an [`ErrorResponse`] body.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Game(#[from] GameError),
    /// Body or path that could not be decoded, keeps axum's status.
    #[error("{message}")]
    Malformed { status: StatusCode, message: String },
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Game(GameError::InvalidParameters(_)) => ErrorKind::InvalidParameters,
            Self::Game(GameError::InvalidCoordinate { .. }) => ErrorKind::InvalidCoordinate,
            Self::Game(GameError::InvalidSymbol(_) | GameError::InvalidBoardShape) => {
                ErrorKind::InvalidData
            }
            Self::Game(GameError::NotFound(_)) => ErrorKind::NotFound,
            Self::Malformed { .. } => ErrorKind::MalformedRequest,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Malformed { status, .. } => *status,
            Self::Game(GameError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::Game(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Malformed {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::Malformed {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        log::debug!("Request failed with {}: {}", status, self);
        let body = ErrorResponse {
            error: self.to_string(),
            kind: self.kind(),
        };
        (status, Json(body)).into_response()
    }
}

/// `Json` extractor whose rejection is an [`ApiError`].
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// `Path` extractor whose rejection is an [`ApiError`].
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);
