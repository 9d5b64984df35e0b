//! In-memory document store.
//!
//! Keeps every collection in a sorted map behind an async lock. Useful for
//! tests and for embedding without persistence.

use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

use crate::Result;
use crate::error::StoreError;
use crate::record::{Fields, RawDoc};
use crate::traits::{FetchConstraints, RemoteStore};
use crate::types::{CollectionName, RecordId};

type Documents = BTreeMap<RecordId, Fields>;

/// A process-local [`RemoteStore`].
///
/// Clones share the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    collections: Arc<RwLock<BTreeMap<CollectionName, Documents>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents stored in `collection`.
    pub async fn len(&self, collection: &CollectionName) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map_or(0, BTreeMap::len)
    }
}

#[async_trait]
impl RemoteStore for MemoryStore {
    #[instrument(skip(self))]
    async fn fetch_many(
        &self,
        collection: &CollectionName,
        constraints: &FetchConstraints,
    ) -> Result<Vec<RawDoc>> {
        let collections = self.collections.read().await;
        let Some(docs) = collections.get(collection) else {
            return Ok(Vec::new());
        };

        let lower = match &constraints.start_after {
            Some(id) => Bound::Excluded(id),
            None => Bound::Unbounded,
        };

        Ok(docs
            .range::<RecordId, _>((lower, Bound::Unbounded))
            .take(constraints.limit as usize)
            .map(|(id, fields)| RawDoc::new(id.clone(), fields.clone()))
            .collect())
    }

    #[instrument(skip(self))]
    async fn fetch_one(
        &self,
        collection: &CollectionName,
        id: &RecordId,
    ) -> Result<Option<RawDoc>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .map(|fields| RawDoc::new(id.clone(), fields.clone())))
    }

    #[instrument(skip(self, fields))]
    async fn insert(&self, collection: &CollectionName, fields: &Fields) -> Result<RecordId> {
        let id = RecordId::generate();
        self.collections
            .write()
            .await
            .entry(collection.clone())
            .or_default()
            .insert(id.clone(), fields.clone());

        debug!(%id, "Inserted document");
        Ok(id)
    }

    #[instrument(skip(self, fields))]
    async fn patch(&self, collection: &CollectionName, id: &RecordId, fields: &Fields) -> Result<()> {
        let mut collections = self.collections.write().await;
        let stored = collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
            .ok_or_else(|| StoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            })?;

        for (key, value) in fields {
            stored.insert(key.clone(), value.clone());
        }

        debug!("Patched document");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn remove(&self, collection: &CollectionName, id: &RecordId) -> Result<()> {
        if let Some(docs) = self.collections.write().await.get_mut(collection) {
            docs.remove(id);
        }
        Ok(())
    }
}
