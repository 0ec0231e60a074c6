use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use shared::{
    domain::{Product, Vendor},
    error::ApiError,
    protocol::{PaginatedResult, QueryParams},
};
use url::Url;

use crate::error::FetchError;

/// Where the controller sends queries. Implementations must be idempotent
/// and read-only so superseded requests can be discarded freely.
#[async_trait]
pub trait QueryBoundary: Send + Sync {
    async fn fetch_products(
        &self,
        vendor_slug: &str,
        params: &QueryParams,
    ) -> Result<PaginatedResult<Product>, FetchError>;
}

#[derive(Clone)]
pub struct HttpQueryBoundary {
    http: Client,
    server_url: String,
}

impl HttpQueryBoundary {
    pub fn new(server_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), server_url)
    }

    pub fn with_client(http: Client, server_url: impl Into<String>) -> Self {
        let server_url = server_url.into().trim_end_matches('/').to_string();
        Self { http, server_url }
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    /// Server URL extended by `segments`, each percent-encoded as a single
    /// path segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, FetchError> {
        let invalid = || FetchError::InvalidServerUrl(self.server_url.clone());
        let mut url = Url::parse(&self.server_url).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|_| invalid())?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// `Ok(None)` when the vendor does not exist.
    pub async fn fetch_vendor(&self, vendor_slug: &str) -> Result<Option<Vendor>, FetchError> {
        let res = self
            .http
            .get(self.endpoint(&["vendors", vendor_slug])?)
            .send()
            .await?;
        if res.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Ok(Some(ensure_success(res).await?.json().await?))
    }

    pub async fn list_vendors(&self) -> Result<Vec<Vendor>, FetchError> {
        let res = self
            .http
            .get(self.endpoint(&["vendors"])?)
            .send()
            .await?;
        Ok(ensure_success(res).await?.json().await?)
    }
}

#[async_trait]
impl QueryBoundary for HttpQueryBoundary {
    async fn fetch_products(
        &self,
        vendor_slug: &str,
        params: &QueryParams,
    ) -> Result<PaginatedResult<Product>, FetchError> {
        let res = self
            .http
            .get(self.endpoint(&["products", vendor_slug])?)
            .query(&params.request_pairs())
            .send()
            .await?;
        Ok(ensure_success(res).await?.json().await?)
    }
}

async fn ensure_success(res: Response) -> Result<Response, FetchError> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }
    let (code, message) = match res.json::<ApiError>().await {
        Ok(error) => (Some(error.code), error.message),
        Err(_) => (None, status.to_string()),
    };
    Err(FetchError::Status {
        status: status.as_u16(),
        code,
        message,
    })
}

#[cfg(test)]
#[path = "tests/boundary_tests.rs"]
mod tests;
