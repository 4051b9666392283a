//! Convenience result type alias for DocMail.

use crate::error::AppError;

/// A specialized `Result` type for DocMail operations.
pub type AppResult<T> = Result<T, AppError>;
