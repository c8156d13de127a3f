use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::clients::lichess::LichessError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error(transparent)]
    Lichess(#[from] LichessError),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {msg}");
                (StatusCode::INTERNAL_SERVER_ERROR, msg.clone())
            }
            AppError::Lichess(e) => {
                let status = match e {
                    LichessError::UserNotFound(_) => StatusCode::NOT_FOUND,
                    LichessError::Stalled(_) => StatusCode::GATEWAY_TIMEOUT,
                    LichessError::Request(err) if err.is_timeout() => StatusCode::GATEWAY_TIMEOUT,
                    _ => StatusCode::BAD_GATEWAY,
                };
                tracing::warn!("Lichess error: {e}");
                (status, e.to_string())
            }
            AppError::Sqlx(e) => {
                tracing::error!("Database error: {e}");
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error".to_string())
            }
        };

        // {"detail": "message"}
        (status, Json(json!({ "detail": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let resp = AppError::Lichess(LichessError::UserNotFound("ghost".into())).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = AppError::Lichess(LichessError::Server(503)).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);

        let resp = AppError::Lichess(LichessError::Stalled(120)).into_response();
        assert_eq!(resp.status(), StatusCode::GATEWAY_TIMEOUT);

        let resp = AppError::BadRequest("Username cannot be blank".into()).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
