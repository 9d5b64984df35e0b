//! HTTP client for the document service.

use std::time::Duration;

use reqwest::{RequestBuilder, Response};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, instrument, trace};

use crmkit_core::error::{Error, RejectedError, StoreError};
use crmkit_core::{ApiKey, Result, StoreUrl};

use crate::endpoints::ErrorResponse;

/// Per-request timeout applied unless overridden.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

fn map_reqwest(err: reqwest::Error) -> Error {
    if err.is_timeout() {
        StoreError::Timeout.into()
    } else if err.is_decode() {
        StoreError::Malformed {
            message: err.to_string(),
        }
        .into()
    } else {
        StoreError::Transport {
            message: err.to_string(),
        }
        .into()
    }
}

/// JSON-over-HTTP client bound to one store.
///
/// Cloning is cheap: clones share the connection pool.
#[derive(Debug, Clone)]
pub struct StoreClient {
    client: reqwest::Client,
    base: StoreUrl,
    api_key: Option<ApiKey>,
}

impl StoreClient {
    /// Create a client for the given store with the default timeout.
    pub fn new(base: StoreUrl, api_key: Option<ApiKey>) -> Result<Self> {
        Self::with_timeout(base, api_key, DEFAULT_TIMEOUT)
    }

    /// Create a client with an explicit per-request timeout.
    pub fn with_timeout(base: StoreUrl, api_key: Option<ApiKey>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("crmkit/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(map_reqwest)?;

        Ok(Self {
            client,
            base,
            api_key,
        })
    }

    /// Returns the store URL this client is configured for.
    pub fn base(&self) -> &StoreUrl {
        &self.base
    }

    /// GET a JSON resource.
    #[instrument(skip(self), fields(store = %self.base))]
    pub async fn get<Q, R>(&self, path: &str, query: &Q) -> Result<R>
    where
        Q: Serialize + std::fmt::Debug + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.base.api_url(path);
        debug!(%url, "GET");
        trace!(?query, "query parameters");

        let response = self.send(self.client.get(&url).query(query)).await?;
        response.json::<R>().await.map_err(map_reqwest)
    }

    /// POST a JSON body and decode the JSON reply.
    #[instrument(skip(self, body), fields(store = %self.base))]
    pub async fn post<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.base.api_url(path);
        debug!(%url, "POST");

        let response = self.send(self.client.post(&url).json(body)).await?;
        response.json::<R>().await.map_err(map_reqwest)
    }

    /// PATCH a JSON body, ignoring any reply.
    #[instrument(skip(self, body), fields(store = %self.base))]
    pub async fn patch<B>(&self, path: &str, body: &B) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        let url = self.base.api_url(path);
        debug!(%url, "PATCH");

        self.send(self.client.patch(&url).json(body)).await?;
        Ok(())
    }

    /// DELETE a resource.
    #[instrument(skip(self), fields(store = %self.base))]
    pub async fn delete(&self, path: &str) -> Result<()> {
        let url = self.base.api_url(path);
        debug!(%url, "DELETE");

        self.send(self.client.delete(&url)).await?;
        Ok(())
    }

    /// Send a request, turning non-2xx statuses into [`StoreError::Rejected`].
    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let request = match &self.api_key {
            Some(key) => request.bearer_auth(key.as_str()),
            None => request,
        };

        let response = request.send().await.map_err(map_reqwest)?;
        let status = response.status();
        trace!(status = %status, "response");

        if status.is_success() {
            Ok(response)
        } else {
            Err(StoreError::Rejected(Self::parse_error_response(response).await).into())
        }
    }

    async fn parse_error_response(response: Response) -> RejectedError {
        let status = response.status().as_u16();

        match response.json::<ErrorResponse>().await {
            Ok(body) => RejectedError::new(status, body.error, body.message),
            Err(_) => RejectedError::new(status, None, None),
        }
    }
}

/// True if the error is the store answering 404.
pub(crate) fn is_not_found(err: &Error) -> bool {
    matches!(err, Error::Store(StoreError::Rejected(rejected)) if rejected.status == 404)
}
