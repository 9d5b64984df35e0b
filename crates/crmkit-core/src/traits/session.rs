//! Session provider trait.

use async_trait::async_trait;

use crate::Result;
use crate::auth::{Credentials, Identity, SessionCallback, Subscription};

/// Sign-in state for a front end.
///
/// Repositories never consult this; front ends use it to gate access.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// The identity currently signed in, if any.
    fn current(&self) -> Option<Identity>;

    /// Watch session changes.
    ///
    /// The callback runs immediately with the current identity and again on
    /// every transition, until the returned handle is dropped.
    fn subscribe(&self, callback: SessionCallback) -> Subscription;

    /// Register a new account and sign it in.
    async fn sign_up(&self, credentials: Credentials) -> Result<Identity>;

    /// Sign in to an existing account.
    async fn sign_in(&self, credentials: Credentials) -> Result<Identity>;

    /// Sign out. Signing out while signed out succeeds.
    async fn sign_out(&self) -> Result<()>;
}
