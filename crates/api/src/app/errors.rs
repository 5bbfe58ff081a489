//! Wire-level error model: five kinds, each with a fixed status and message.
//!
//! Every handler failure converges here; `IntoResponse` is the single
//! recovery point that renders the JSON error envelope.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use staffgate_core::DomainError;
use staffgate_infra::StoreError;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ApiError {
    #[error("invalid request")]
    InvalidRequest,

    #[error("unauthorized")]
    Unauthorized,

    #[error("data not found")]
    DataNotFound,

    #[error("database error")]
    DatabaseError,

    #[error("unknown error")]
    UnknownError,
}

impl ApiError {
    fn status(self) -> StatusCode {
        match self {
            ApiError::InvalidRequest => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::DataNotFound => StatusCode::NOT_FOUND,
            ApiError::DatabaseError => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::UnknownError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(self) -> &'static str {
        match self {
            ApiError::InvalidRequest => "invalid_request",
            ApiError::Unauthorized => "unauthorized",
            ApiError::DataNotFound => "not_found",
            ApiError::DatabaseError => "database_error",
            ApiError::UnknownError => "unknown_error",
        }
    }

    fn message(self) -> &'static str {
        match self {
            ApiError::InvalidRequest => "Invalid Request: Please check your request",
            ApiError::Unauthorized => "Unauthorized: Please check your credentials",
            ApiError::DataNotFound => "Data Not Found: Data not found",
            ApiError::DatabaseError => "Database Error: Error when executing query to database",
            ApiError::UnknownError => "Unknown Error: Unknown error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status(),
            Json(json!({
                "error": self.code(),
                "message": self.message(),
            })),
        )
            .into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => ApiError::DataNotFound,
            StoreError::Constraint(msg) => {
                tracing::warn!(error = %msg, "constraint violated");
                ApiError::DatabaseError
            }
            StoreError::Database(msg) => {
                tracing::error!(error = %msg, "database failure");
                ApiError::DatabaseError
            }
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        tracing::warn!(error = %err, "request rejected");
        ApiError::InvalidRequest
    }
}
