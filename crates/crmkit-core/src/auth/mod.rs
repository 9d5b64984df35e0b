//! Session collaborator types.
//!
//! The data-access layer never looks at identity; these types describe the
//! session gate that front ends put in front of it, and the API key a remote
//! store may require.

mod api_key;
mod credentials;
mod hub;
mod identity;

pub use api_key::ApiKey;
pub use credentials::Credentials;
pub use hub::{SessionCallback, SessionHub, Subscription};
pub use identity::Identity;
