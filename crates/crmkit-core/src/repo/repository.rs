//! The generic collection repository and its factory.

use std::marker::PhantomData;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::Result;
use crate::error::{InvalidArgumentError, ValidationError};
use crate::record::{Fields, ID_FIELD, Record, from_fields, to_fields};
use crate::schema::Validation;
use crate::traits::{FetchConstraints, RemoteStore};
use crate::types::{CollectionName, RecordId};

use super::pagination::{Cursor, DEFAULT_LIMIT, ListOptions, ListingPage};

/// Builds repositories over one injected store.
#[derive(Clone)]
pub struct RepositoryFactory {
    store: Arc<dyn RemoteStore>,
}

impl RepositoryFactory {
    pub fn new(store: Arc<dyn RemoteStore>) -> Self {
        Self { store }
    }

    /// Produce the repository for `collection`.
    ///
    /// `validation` accepts a [`Schema`](crate::schema::Schema), an
    /// `Option<Schema>`, or a [`Validation`] directly; `None` means every
    /// object shape is accepted.
    pub fn make_repository<T>(
        &self,
        collection: CollectionName,
        validation: impl Into<Validation>,
    ) -> Repository<T> {
        Repository {
            store: Arc::clone(&self.store),
            collection,
            validation: Arc::new(validation.into()),
            _doc: PhantomData,
        }
    }

    /// The store every repository from this factory talks to.
    pub fn store(&self) -> &Arc<dyn RemoteStore> {
        &self.store
    }
}

impl std::fmt::Debug for RepositoryFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RepositoryFactory").finish_non_exhaustive()
    }
}

/// CRUD and paginated listing for one collection.
///
/// `T` is the document shape: a typed struct, or [`Fields`] for collections
/// that accept any object. Writes are validated before the store is called;
/// a rejected write has no side effects. Store failures are returned as-is,
/// without retry.
///
/// Holds no record state, so clones are cheap and may be used concurrently.
pub struct Repository<T> {
    store: Arc<dyn RemoteStore>,
    collection: CollectionName,
    validation: Arc<Validation>,
    _doc: PhantomData<fn() -> T>,
}

impl<T> Clone for Repository<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            collection: self.collection.clone(),
            validation: Arc::clone(&self.validation),
            _doc: PhantomData,
        }
    }
}

impl<T> std::fmt::Debug for Repository<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("collection", &self.collection)
            .field("validation", &self.validation)
            .finish_non_exhaustive()
    }
}

impl<T> Repository<T> {
    /// The collection this repository is bound to.
    pub fn collection(&self) -> &CollectionName {
        &self.collection
    }

    /// The validation policy applied to writes.
    pub fn validation(&self) -> &Validation {
        &self.validation
    }

    /// View the same collection through a different document type.
    ///
    /// Shares the store and validation policy.
    pub fn typed<U>(&self) -> Repository<U> {
        Repository {
            store: Arc::clone(&self.store),
            collection: self.collection.clone(),
            validation: Arc::clone(&self.validation),
            _doc: PhantomData,
        }
    }

    fn check_identifier_absent(fields: &Fields) -> std::result::Result<(), ValidationError> {
        if fields.contains_key(ID_FIELD) {
            return Err(ValidationError::new(
                ID_FIELD,
                "identifier is assigned by the store",
            ));
        }
        Ok(())
    }
}

impl<T> Repository<T>
where
    T: Serialize + DeserializeOwned + Send + Sync,
{
    /// List one page of records in store order.
    ///
    /// # Errors
    ///
    /// - [`InvalidArgumentError::ZeroLimit`] for `limit: Some(0)`
    /// - [`InvalidArgumentError::ForeignCursor`] for a cursor issued by
    ///   another collection
    /// - [`Error::Store`](crate::Error::Store) if the store call fails
    #[instrument(skip(self, options), fields(collection = %self.collection))]
    pub async fn get_all(&self, options: ListOptions) -> Result<ListingPage<T>> {
        let limit = options.limit.unwrap_or(DEFAULT_LIMIT);
        if limit == 0 {
            return Err(InvalidArgumentError::ZeroLimit.into());
        }

        let mut constraints = FetchConstraints::new(limit);
        if let Some(cursor) = &options.after {
            if cursor.collection() != &self.collection {
                return Err(InvalidArgumentError::ForeignCursor {
                    cursor: cursor.collection().to_string(),
                    collection: self.collection.to_string(),
                }
                .into());
            }
            constraints = constraints.start_after(cursor.after().clone());
        }

        let mut docs = self
            .store
            .fetch_many(&self.collection, &constraints)
            .await?;
        docs.truncate(limit as usize);

        let items = docs
            .into_iter()
            .map(|doc| Ok(Record::new(doc.id, from_fields(doc.fields)?)))
            .collect::<Result<Vec<Record<T>>>>()?;

        let cursor = if items.len() == limit as usize {
            items
                .last()
                .map(|record| Cursor::new(self.collection.clone(), record.id.clone()))
        } else {
            None
        };

        debug!(count = items.len(), more = cursor.is_some(), "Listed records");
        Ok(ListingPage { items, cursor })
    }

    /// Fetch one record. A missing record is `Ok(None)`.
    #[instrument(skip(self), fields(collection = %self.collection, %id))]
    pub async fn get_by_id(&self, id: &RecordId) -> Result<Option<Record<T>>> {
        match self.store.fetch_one(&self.collection, id).await? {
            Some(doc) => Ok(Some(Record::new(doc.id, from_fields(doc.fields)?))),
            None => Ok(None),
        }
    }

    /// Validate a complete record and insert it.
    ///
    /// Returns the store-assigned identifier. An `id` field in the input is
    /// rejected.
    #[instrument(skip(self, record), fields(collection = %self.collection))]
    pub async fn create(&self, record: &T) -> Result<RecordId> {
        let fields = to_fields(record)?;
        Self::check_identifier_absent(&fields)?;
        self.validation.validate_for_create(&fields)?;

        let id = self.store.insert(&self.collection, &fields).await?;
        debug!(%id, "Created record");
        Ok(id)
    }

    /// Validate a partial record and merge it into the stored one.
    ///
    /// Fields absent from `patch` keep their stored values. An `id` field in
    /// the patch is rejected.
    #[instrument(skip(self, patch), fields(collection = %self.collection, %id))]
    pub async fn update<P>(&self, id: &RecordId, patch: &P) -> Result<()>
    where
        P: Serialize + Sync + ?Sized,
    {
        let fields = to_fields(patch)?;
        Self::check_identifier_absent(&fields)?;
        self.validation.validate_for_update(&fields)?;

        self.store.patch(&self.collection, id, &fields).await
    }

    /// Remove a record. Deleting a missing record succeeds.
    #[instrument(skip(self), fields(collection = %self.collection, %id))]
    pub async fn delete(&self, id: &RecordId) -> Result<()> {
        self.store.remove(&self.collection, id).await
    }
}
