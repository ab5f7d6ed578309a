use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use sleeper_engine::EngineError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error("{0}")]
    BadRequest(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::Engine(err) => {
                let status = match &err {
                    EngineError::Validation { .. } | EngineError::AlreadyCancelled(_) => {
                        StatusCode::BAD_REQUEST
                    }
                    EngineError::NoAvailability => StatusCode::BAD_REQUEST,
                    EngineError::TicketNotFound(_) => StatusCode::NOT_FOUND,
                    EngineError::Inconsistent(_) => {
                        tracing::error!("internal engine error: {}", err);
                        StatusCode::INTERNAL_SERVER_ERROR
                    }
                };
                (status, err.code(), err.to_string())
            }
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", message),
        };

        let body = Json(json!({
            "error": message,
            "code": code,
        }));

        (status, body).into_response()
    }
}
