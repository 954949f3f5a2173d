//! ensab - Family Tree Editing Core
//!
//! The client-side state and change-tracking layer of a family-tree editor.
//! A family is an in-memory tree of members that the user edits in place
//! (add sons, rename, change sex, remove). Local edits are diffed against the
//! last-synced baseline and flushed to the member API as three kinds of
//! call: create, update and delete.
//!
//! # Module Structure
//!
//! - **`shared`** - Types shared with the member API
//!   - `RawMember` / `SonlessRawMember` transfer forms
//!   - Shared error type
//!   - Application configuration
//!
//! - **`family_tree`** - The editing layer
//!   - `Member` tree and lineage parsing
//!   - Diff engine and commit plan
//!   - `EditSession` tying tree, baseline and focus together
//!   - `reqwest` transport for the member API, with a retry policy
//!   - Routes to a family page
//!
//! # Feature Flags
//!
//! - **`cli`** - builds the `ensab-sync` binary and pulls in
//!   `tracing-subscriber` for its log output
//!
//! # Concurrency
//!
//! Editing is single-threaded: a session is mutated through `&mut self` in
//! response to discrete user actions. The only async boundary is the
//! transport.

/// Shared types and data structures
pub mod shared;

/// Client-side family tree editing
pub mod family_tree;
