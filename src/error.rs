// src/error.rs
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use thiserror::Error;

/// Error type shared by the service and handler layers.
#[derive(Error, Debug)]
pub enum AppError {
    /// Bad input, rejected before touching the store.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Lookup by id came back empty. Kept separate from Database so the
    /// handler layer can answer 404 instead of 500.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: i64 },

    /// An expense named in a confirm request was already consumed by an
    /// earlier settlement.
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn settlement_not_found(id: i64) -> Self {
        Self::NotFound {
            entity: "Settlement",
            id,
        }
    }

    pub fn expense_not_found(id: i64) -> Self {
        Self::NotFound {
            entity: "Expense",
            id,
        }
    }

    pub fn couple_not_found(id: i64) -> Self {
        Self::NotFound {
            entity: "Couple",
            id,
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::Json(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Auth(_) => StatusCode::UNAUTHORIZED,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "request failed");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
