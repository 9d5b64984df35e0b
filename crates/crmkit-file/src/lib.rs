//! crmkit-file - Filesystem-backed document store and session provider.
//!
//! [`FileStore`] keeps one JSON file per record under
//! `<root>/collections/<collection>/`. [`FileAuth`] keeps bcrypt-hashed
//! accounts and the current session next to it, so a single directory holds
//! everything a local front end needs.

mod auth;
mod store;

pub use auth::{FileAuth, MIN_PASSWORD_LEN};
pub use store::FileStore;
