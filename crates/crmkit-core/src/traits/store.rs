//! Remote document store trait.

use async_trait::async_trait;

use crate::Result;
use crate::record::{Fields, RawDoc};
use crate::types::{CollectionName, RecordId};

/// Constraints accepted by [`RemoteStore::fetch_many`].
///
/// Deliberately minimal: a result cap and an exclusive lower bound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchConstraints {
    /// Maximum number of documents to return.
    pub limit: u32,
    /// Only return documents strictly after this one in store order.
    pub start_after: Option<RecordId>,
}

impl FetchConstraints {
    pub fn new(limit: u32) -> Self {
        Self {
            limit,
            start_after: None,
        }
    }

    pub fn start_after(mut self, id: RecordId) -> Self {
        self.start_after = Some(id);
        self
    }
}

/// An async document store.
///
/// Store order is ascending [`RecordId`] order and is stable while the
/// collection is not mutated. Every method is a single round trip; failures
/// surface as [`Error::Store`](crate::Error::Store).
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Fetch up to `constraints.limit` documents in store order.
    async fn fetch_many(
        &self,
        collection: &CollectionName,
        constraints: &FetchConstraints,
    ) -> Result<Vec<RawDoc>>;

    /// Fetch one document, or `None` if it does not exist.
    async fn fetch_one(&self, collection: &CollectionName, id: &RecordId)
    -> Result<Option<RawDoc>>;

    /// Insert a new document and return its assigned identifier.
    async fn insert(&self, collection: &CollectionName, fields: &Fields) -> Result<RecordId>;

    /// Merge `fields` into an existing document.
    ///
    /// Fields absent from `fields` are left untouched. Fails with
    /// [`StoreError::NotFound`](crate::error::StoreError::NotFound) if the
    /// document does not exist.
    async fn patch(&self, collection: &CollectionName, id: &RecordId, fields: &Fields)
    -> Result<()>;

    /// Remove a document. Removing a missing document succeeds.
    async fn remove(&self, collection: &CollectionName, id: &RecordId) -> Result<()>;
}
