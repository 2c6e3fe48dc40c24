//! # gridstudy
//!
//! Offline driver for the GridStudy client state: a JSON fixture backend
//! standing in for the directory and network servers, and the logging setup
//! shared by the `gridstudy` binary.

pub mod fixture;
pub mod logging;

pub use fixture::FixtureBackend;
