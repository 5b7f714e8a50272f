//! Errors returned by the request handlers and their JSON rendering.
//!
//! Every failure reaches the client as `{"error": "<message>"}` with the
//! status code picked by [`ApiError::status_code`].

use axum::{
    extract::rejection::PathRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

pub const TITLE_REQUIRED: &str = "Title is required and cannot be empty";
pub const TITLE_EMPTY: &str = "Title cannot be empty";
pub const COMPLETED_NOT_BOOLEAN: &str = "Completed must be a boolean";

#[derive(Debug, Error)]
pub enum ApiError {
    /// Input the caller can correct. Raised before the datastore is touched.
    #[error("{0}")]
    Validation(String),

    #[error("Todo not found")]
    NotFound,

    /// Anything the driver reports: connection loss, constraint violation, ...
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        tracing::debug!("rejected path parameter: {}", rejection.body_text());
        Self::validation("Invalid todo id")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if let ApiError::Database(err) = &self {
            tracing::error!("database error: {}", err);
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
