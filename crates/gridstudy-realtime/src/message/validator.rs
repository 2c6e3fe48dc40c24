//! Raw notification validation.

use gridstudy_core::error::AppError;

/// Rejects empty notifications and notifications over `max_size` bytes.
pub fn validate_inbound(raw: &str, max_size: usize) -> Result<(), AppError> {
    if raw.len() > max_size {
        return Err(AppError::validation(format!(
            "Notification exceeds maximum size of {} bytes",
            max_size
        )));
    }

    if raw.trim().is_empty() {
        return Err(AppError::validation("Empty notification"));
    }

    Ok(())
}
