//! Collaborator contracts: the remote document store and the session
//! provider.

mod session;
mod store;

pub use session::SessionProvider;
pub use store::{FetchConstraints, RemoteStore};
