//! Convenience result type alias for GridStudy.

use crate::error::AppError;

/// A specialized `Result` type for GridStudy operations.
pub type AppResult<T> = Result<T, AppError>;
