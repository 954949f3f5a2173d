//! Shared Error Types
//!
//! Errors that can surface on either side of the member API boundary.
//!
//! # Error Categories
//!
//! - `SerializationError` - member JSON that can't be read or written
//!
//! Blank or otherwise unusable user input is not an error; the editing layer
//! ignores it.
//!
//! # Usage
//!
//! ```rust
//! use ensab::shared::{RawMember, SharedError};
//!
//! let error = RawMember::from_json("{ \"id\": 42 }").unwrap_err();
//! assert!(matches!(error, SharedError::SerializationError { .. }));
//! ```
use thiserror::Error;

/// Shared error types
#[derive(Debug, Error, Clone)]
pub enum SharedError {
    /// JSON serialization or deserialization error
    #[error("Serialization error: {message}")]
    SerializationError {
        /// Human-readable error message
        message: String,
    },
}

impl SharedError {
    /// Create a new serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::SerializationError {
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for SharedError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(format!("JSON error: {}", err))
    }
}
