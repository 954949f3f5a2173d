//! Common test utilities and helpers
//!
//! - Family tree fixtures
//! - A recording transport that can be told to fail
//! - Custom assertion macros

pub mod recording_transport;

pub use fixtures::*;
pub use recording_transport::*;
