//! Shared Module
//!
//! Types that cross the boundary between the editing layer and the member
//! API: the transfer forms of a member, the shared error type and the
//! application configuration.

/// Transfer forms of a family member
pub mod member;

/// Shared error types
pub mod error;

/// Application configuration
pub mod config;

/// Re-export commonly used types for convenience
pub use member::{RawMember, SonlessRawMember};
pub use error::SharedError;
pub use config::{AppConfig, AppConfigBuilder, ConfigError};
