//! # Family Tree Editing
//!
//! Client-side state for editing one family: the live member tree, the
//! baseline it is diffed against, the commit plan that turns a diff into
//! member API calls, and the single-focus waitlist for edit panels.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use ensab::family_tree::{Config, EditSession, HttpTransport};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::load()?;
//! let transport = HttpTransport::new(config.clone());
//!
//! let mut session = EditSession::new_family("Hassan", config);
//! let root = session.root_id();
//! session.add_sons(root, "Ali, Omar", true);
//!
//! if session.is_dirty() {
//!     session.commit(&transport);
//! }
//! # Ok(())
//! # }
//! ```

pub mod commit;
pub mod config;
pub mod diff;
pub mod member;
pub mod navigation;
pub mod retry;
pub mod session;
pub mod transport;
pub mod waitlist;

pub use commit::{CommitError, CommitPlan, CommitReport, Method, RemoteCall};
pub use config::Config;
pub use diff::{compute_diff, Diff};
pub use member::Member;
pub use retry::{BackoffStrategy, RetryPolicy};
pub use session::EditSession;
pub use transport::{HttpTransport, MemberTransport, TransportError};
pub use waitlist::{Action, Waitlist};
