//! Notification envelope, typed notifications, decoding, and validation.

pub mod envelope;
pub mod serializer;
pub mod types;
pub mod validator;

pub use serializer::decode;
