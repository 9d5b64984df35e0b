//! crmkit-core - Validated document-store access for business records.
//!
//! The central piece is [`Repository`]: a generic, per-collection handle
//! with create/read/update/delete and cursor-paginated listing over an
//! injected [`RemoteStore`]. Writes are checked against the collection's
//! [`Validation`] policy before any store call: strictly for creates,
//! partially for updates.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use crmkit_core::{Collections, ListOptions, MemoryStore, RepositoryFactory};
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), crmkit_core::Error> {
//! let factory = RepositoryFactory::new(Arc::new(MemoryStore::new()));
//! let collections = Collections::new(&factory)?;
//!
//! let customer = json!({"name": "Jane", "email": "jane@x.com"});
//! let id = collections
//!     .customers
//!     .create(customer.as_object().unwrap())
//!     .await?;
//!
//! let page = collections.customers.get_all(ListOptions::new().limit(10)).await?;
//! assert_eq!(page.items[0].id, id);
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod error;
pub mod memory;
pub mod record;
pub mod repo;
pub mod schema;
pub mod traits;
pub mod types;

pub use auth::{ApiKey, Credentials, Identity, SessionCallback, SessionHub, Subscription};
pub use error::Error;
pub use memory::MemoryStore;
pub use record::{Fields, RawDoc, Record};
pub use repo::{
    Collections, Cursor, Customer, CustomerPatch, ListOptions, ListingPage, Repository,
    RepositoryFactory,
};
pub use schema::{FieldKind, Schema, Validation};
pub use traits::{FetchConstraints, RemoteStore, SessionProvider};
pub use types::{CollectionName, RecordId, StoreUrl};

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
