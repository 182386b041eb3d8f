pub mod devices;
pub mod preferences;

use axum::extract::{rejection::PathRejection, Path};

use crate::error::{AppError, AppResult};

/// Numeric user id from the last path segment; one trailing slash is ignored.
pub(crate) fn path_user_id(path: Result<Path<String>, PathRejection>) -> AppResult<i64> {
    let Path(raw) = path.map_err(|e| AppError::BadRequest(format!("Invalid URL format: {}", e)))?;
    raw.strip_suffix('/')
        .unwrap_or(&raw)
        .parse()
        .map_err(|_| AppError::BadRequest(format!("Invalid user ID format: {}", raw)))
}
