use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use sqlx::SqlitePool;
use sqlx::pool::PoolConnection;
use thiserror::Error;
use tracing::error;
use validator::ValidationErrors;

use crate::error::StoreError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Validation failed")]
    Validation(Vec<String>),

    /// Body, query string or path that could not be parsed at all.
    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        ApiError::Store(StoreError::Database(err))
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        let mut details: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match &e.message {
                    Some(message) => message.to_string(),
                    None => format!("{field} is invalid"),
                })
            })
            .collect();
        details.sort();
        ApiError::Validation(details)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Store(StoreError::NotFound) => StatusCode::NOT_FOUND,
            ApiError::Store(StoreError::DuplicateCode(_) | StoreError::DuplicateEmail(_)) => {
                StatusCode::CONFLICT
            }
            ApiError::Store(StoreError::Database(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            ApiError::Validation(details) => json!({
                "message": "Validation failed",
                "details": details
            }),
            ApiError::BadRequest(message) => json!({ "message": message }),
            ApiError::Store(StoreError::NotFound) => json!({ "message": "Employee not found" }),
            ApiError::Store(err @ StoreError::DuplicateCode(_)) => json!({
                "message": "Duplicate Employee Code",
                "details": [err.to_string()]
            }),
            ApiError::Store(err @ StoreError::DuplicateEmail(_)) => json!({
                "message": "Duplicate Email",
                "details": [err.to_string()]
            }),
            ApiError::Store(StoreError::Database(e)) => {
                error!(error = %e, "Database error while handling request");
                json!({ "message": "Internal Server Error" })
            }
        };

        HttpResponse::build(self.status_code()).json(body)
    }
}

/// Checks a connection out of the pool for the lifetime of one request. It
/// goes back to the pool when dropped, whichever way the handler returns.
pub async fn acquire(pool: &SqlitePool) -> Result<PoolConnection<sqlx::Sqlite>, ApiError> {
    Ok(pool.acquire().await?)
}
