//! Notification deduplication and dispatch.

pub mod dedup;
pub mod dispatcher;

pub use dispatcher::NotificationDispatcher;
