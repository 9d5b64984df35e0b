//! crmkit-http - Document store over a small JSON REST protocol.
//!
//! [`HttpStore`] implements [`RemoteStore`](crmkit_core::RemoteStore) against
//! a document service rooted at a [`StoreUrl`](crmkit_core::StoreUrl):
//!
//! ```text
//! GET    {base}/v1/collections/{c}/documents?limit=N&startAfter=ID
//! GET    {base}/v1/collections/{c}/documents/{id}
//! POST   {base}/v1/collections/{c}/documents
//! PATCH  {base}/v1/collections/{c}/documents/{id}
//! DELETE {base}/v1/collections/{c}/documents/{id}
//! ```

mod client;
mod endpoints;
mod store;

pub use client::{DEFAULT_TIMEOUT, StoreClient};
pub use store::HttpStore;
