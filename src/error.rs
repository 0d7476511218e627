use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::db::DatabaseError;
use crate::scheduling::{Rejection, SchedulingError};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Scheduling error: {0}")]
    Scheduling(#[from] SchedulingError),

    /// A booking refused by the scheduling rules, with a message in the
    /// caller's language.
    #[error("Booking rejected ({}): {message}", rejection.code())]
    Rejected { rejection: Rejection, message: String },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Database(err) => match err {
                DatabaseError::NotFound => StatusCode::NOT_FOUND,
                DatabaseError::Duplicate
                | DatabaseError::SlotTaken { .. }
                | DatabaseError::InvalidTransition { .. } => StatusCode::CONFLICT,
                DatabaseError::InvalidInput(_) => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            AppError::Scheduling(_) | AppError::Validation(_) | AppError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Rejected { rejection, .. } if rejection.is_conflict() => StatusCode::CONFLICT,
            AppError::Rejected { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
        }
    }

    fn public_message(&self) -> &'static str {
        match self {
            AppError::Database(err) => match err {
                DatabaseError::NotFound => "Resource not found",
                DatabaseError::Duplicate => "Resource already exists",
                DatabaseError::SlotTaken { .. } => "Time slot already taken",
                DatabaseError::InvalidTransition { .. } => "Status change not allowed",
                DatabaseError::InvalidInput(_) => "Invalid input data",
                _ => "An internal server error occurred",
            },
            AppError::Scheduling(_) | AppError::Validation(_) => "Validation error",
            AppError::Rejected { .. } => "Booking rejected",
            AppError::NotFound(_) => "Resource not found",
            AppError::Conflict(_) => "Resource conflict",
            AppError::BadRequest(_) => "Bad request",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let body = match &self {
            AppError::Rejected { rejection, message } => {
                let mut body = serde_json::to_value(rejection).unwrap_or_else(|_| json!({}));
                if let Value::Object(fields) = &mut body {
                    fields.insert("ok".to_string(), Value::Bool(false));
                    fields.insert("error".to_string(), json!({ "message": message }));
                }
                body
            }
            // Internal details stay in the logs
            _ if status.is_server_error() => json!({
                "error": { "message": self.public_message() }
            }),
            _ => json!({
                "error": {
                    "message": self.public_message(),
                    "details": self.to_string(),
                }
            }),
        };

        (status, Json(body)).into_response()
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;
