pub mod attendance;
pub mod dashboard;
pub mod employee;
pub mod error;
pub mod health;

pub use error::ApiError;
