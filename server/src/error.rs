use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use location_tracker_lib::{messages, MessageResponse};
use thiserror::Error;

/// Errors reach the caller only as a fixed message. Causes are logged where they happen.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{}", messages::INVALID_COORDINATES)]
    InvalidCoordinates,

    #[error("{}", messages::UNAUTHORIZED)]
    Unauthorized,

    #[error("{}", messages::SAVE_FAILED)]
    SaveFailed,

    #[error("{}", messages::LIST_FAILED)]
    ListFailed,

    #[error("{}", messages::CLEAR_FAILED)]
    ClearFailed,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::InvalidCoordinates => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::SaveFailed | AppError::ListFailed | AppError::ClearFailed => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, Json(MessageResponse::new(self.to_string()))).into_response()
    }
}
