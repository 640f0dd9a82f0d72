//! Shared error types for Medimark crates

pub mod errors;

pub use errors::{AppError, AppResult};
