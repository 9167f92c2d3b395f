//! Errors raised by the employee, attendance and summary stores.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The employee (or the employee behind an attendance operation) does not exist.
    #[error("Employee not found")]
    NotFound,

    #[error("Employee with code \"{0}\" already exists")]
    DuplicateCode(String),

    #[error("An employee with email \"{0}\" is already registered")]
    DuplicateEmail(String),

    /// Anything the storage layer reports that is not one of the cases above.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;
