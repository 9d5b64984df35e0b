//! HTTP-backed remote store.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, instrument};

use crmkit_core::error::{Error, InvalidArgumentError, StoreError};
use crmkit_core::record::{Fields, RawDoc};
use crmkit_core::traits::{FetchConstraints, RemoteStore};
use crmkit_core::types::{CollectionName, RecordId};
use crmkit_core::{ApiKey, Result, StoreUrl};

use crate::client::{DEFAULT_TIMEOUT, StoreClient, is_not_found};
use crate::endpoints::*;

fn parse_id(raw: &str) -> Result<RecordId> {
    RecordId::new(raw).map_err(|_| {
        StoreError::Malformed {
            message: format!("store returned invalid record id '{}'", raw),
        }
        .into()
    })
}

/// A [`RemoteStore`] that talks to a document service over HTTPS.
#[derive(Debug, Clone)]
pub struct HttpStore {
    client: StoreClient,
}

impl HttpStore {
    /// Create a store for the given network URL.
    ///
    /// # Errors
    ///
    /// Fails with [`InvalidArgumentError::StoreUrl`] for `file://` URLs.
    pub fn new(url: StoreUrl, api_key: Option<ApiKey>) -> Result<Self> {
        Self::with_timeout(url, api_key, DEFAULT_TIMEOUT)
    }

    /// Create a store with an explicit per-request timeout.
    pub fn with_timeout(url: StoreUrl, api_key: Option<ApiKey>, timeout: Duration) -> Result<Self> {
        if !url.is_network() {
            return Err(InvalidArgumentError::StoreUrl {
                value: url.to_string(),
                reason: "HTTP store requires an http(s) URL".to_string(),
            }
            .into());
        }

        Ok(Self {
            client: StoreClient::with_timeout(url, api_key, timeout)?,
        })
    }

    /// Returns the store URL.
    pub fn url(&self) -> &StoreUrl {
        self.client.base()
    }
}

#[async_trait]
impl RemoteStore for HttpStore {
    #[instrument(skip(self), fields(%collection, limit = constraints.limit))]
    async fn fetch_many(
        &self,
        collection: &CollectionName,
        constraints: &FetchConstraints,
    ) -> Result<Vec<RawDoc>> {
        let query = ListDocumentsQuery {
            limit: constraints.limit,
            start_after: constraints.start_after.as_ref().map(RecordId::as_str),
        };

        let response: ListDocumentsResponse =
            self.client.get(&documents_path(collection), &query).await?;

        let docs = response
            .documents
            .into_iter()
            .map(|doc| Ok(RawDoc::new(parse_id(&doc.id)?, doc.fields)))
            .collect::<Result<Vec<_>>>()?;

        debug!(count = docs.len(), "Fetched documents");
        Ok(docs)
    }

    #[instrument(skip(self), fields(%collection, %id))]
    async fn fetch_one(
        &self,
        collection: &CollectionName,
        id: &RecordId,
    ) -> Result<Option<RawDoc>> {
        let no_query: [(&str, &str); 0] = [];
        let result: Result<DocumentBody> = self
            .client
            .get(&document_path(collection, id), &no_query)
            .await;

        match result {
            Ok(doc) => Ok(Some(RawDoc::new(parse_id(&doc.id)?, doc.fields))),
            Err(err) if is_not_found(&err) => {
                debug!("Document absent");
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    #[instrument(skip(self, fields), fields(%collection))]
    async fn insert(&self, collection: &CollectionName, fields: &Fields) -> Result<RecordId> {
        let response: InsertResponse = self
            .client
            .post(&documents_path(collection), &FieldsBody { fields })
            .await?;

        let id = parse_id(&response.id)?;
        debug!(%id, "Inserted document");
        Ok(id)
    }

    #[instrument(skip(self, fields), fields(%collection, %id))]
    async fn patch(
        &self,
        collection: &CollectionName,
        id: &RecordId,
        fields: &Fields,
    ) -> Result<()> {
        self.client
            .patch(&document_path(collection, id), &FieldsBody { fields })
            .await
            .map_err(|err| {
                if is_not_found(&err) {
                    Error::from(StoreError::NotFound {
                        collection: collection.to_string(),
                        id: id.to_string(),
                    })
                } else {
                    err
                }
            })
    }

    #[instrument(skip(self), fields(%collection, %id))]
    async fn remove(&self, collection: &CollectionName, id: &RecordId) -> Result<()> {
        match self.client.delete(&document_path(collection, id)).await {
            Ok(()) => Ok(()),
            Err(err) if is_not_found(&err) => {
                debug!("Document already absent");
                Ok(())
            }
            Err(err) => Err(err),
        }
    }
}
