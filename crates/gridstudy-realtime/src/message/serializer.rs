//! JSON decoding of raw notifications.

use gridstudy_core::result::AppResult;

use super::envelope::NotificationEnvelope;
use super::types::Notification;
use super::validator::validate_inbound;

/// Validates and decodes a raw notification.
pub fn decode(raw: &str, max_size: usize) -> AppResult<Notification> {
    validate_inbound(raw, max_size)?;
    let envelope = deserialize_envelope(raw)?;
    Notification::try_from(envelope)
}

/// Deserializes the envelope without interpreting its headers.
pub fn deserialize_envelope(raw: &str) -> AppResult<NotificationEnvelope> {
    Ok(serde_json::from_str(raw)?)
}
