//! # gridstudy-realtime
//!
//! Inbound side of the server push channel. The transport hands raw JSON
//! text to this crate, which provides:
//!
//! - Size and emptiness validation of raw notifications
//! - Decoding of the `headers`/`payload` envelope into a typed [`Notification`]
//! - Deduplication of identical notifications within a time window
//! - A [`NotificationDispatcher`] mapping each notification kind to equipment
//!   cache actions and directory explorer refreshes

pub mod message;
pub mod notification;

pub use message::types::Notification;
pub use notification::dispatcher::{DispatchOutcome, NotificationDispatcher};
