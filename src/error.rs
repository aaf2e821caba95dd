//! Error types for the blog service.
//!
//! Every fallible path funnels into `AppError`, which renders the JSON error
//! body for API clients. `LoginRequired` is special: it renders as a 302 to
//! the login route so protected handlers share the redirect behavior of the
//! session middleware instead of returning 401s.

use actix_web::{error::ResponseError, http::header, http::StatusCode, HttpResponse};
use thiserror::Error;

use crate::routes::LOGIN_PATH;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Username already exists")]
    UsernameTaken,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Login required")]
    LoginRequired { next: String },

    #[error("Validation failed")]
    Validation(validator::ValidationErrors),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::UsernameTaken => StatusCode::CONFLICT,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::LoginRequired { .. } => StatusCode::FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        match self {
            AppError::LoginRequired { next } => HttpResponse::Found()
                .insert_header((header::LOCATION, format!("{}?next={}", LOGIN_PATH, next)))
                .finish(),
            AppError::Validation(errors) => {
                // Flatten to field -> [messages] so clients can re-render the
                // form with per-field errors.
                let fields: serde_json::Map<String, serde_json::Value> = errors
                    .field_errors()
                    .iter()
                    .map(|(field, errs)| {
                        let messages: Vec<serde_json::Value> = errs
                            .iter()
                            .map(|e| {
                                let msg = e
                                    .message
                                    .as_ref()
                                    .map(|m| m.to_string())
                                    .unwrap_or_else(|| e.code.to_string());
                                serde_json::Value::String(msg)
                            })
                            .collect();
                        (field.to_string(), serde_json::Value::Array(messages))
                    })
                    .collect();

                HttpResponse::build(status).json(serde_json::json!({
                    "error": "Validation failed",
                    "status": status.as_u16(),
                    "fields": fields,
                }))
            }
            // Don't leak internal details to clients
            AppError::Database(_) | AppError::Internal(_) => {
                HttpResponse::build(status).json(serde_json::json!({
                    "error": "Internal server error",
                    "status": status.as_u16(),
                }))
            }
            _ => HttpResponse::build(status).json(serde_json::json!({
                "error": self.to_string(),
                "status": status.as_u16(),
            })),
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        tracing::error!("Database error: {}", err);
        AppError::Database(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors)
    }
}
