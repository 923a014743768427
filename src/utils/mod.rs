//! Shared utilities

pub mod error;
pub mod password;
pub mod validation;

pub use error::{AppError, AppResult};
