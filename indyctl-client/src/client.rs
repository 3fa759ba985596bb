//! HTTP client for the admin API

use std::time::Duration;

use indyctl_core::{
    DisableTimeout, DisableTimeoutList, Store, StoreKey, StorePage, StoreType, VersionInfo,
};
use reqwest::header::{HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::ClientError;
use crate::result::{ApiFailure, ApiResult};

/// Package type segment that lists stores of every package type
pub const ALL_PACKAGE_TYPES: &str = "_all";

/// Package type segment that queries endpoints of every package type
pub const ALL_ENDPOINTS: &str = "all";

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Clone)]
pub struct IndyClient {
    http: Client,
    base: Url,
}

impl IndyClient {
    /// Build a client for `endpoint`, e.g. `http://127.0.0.1:4000`.
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, ClientError> {
        Self::with_options(endpoint, timeout, false)
    }

    pub fn with_options(
        endpoint: &str,
        timeout: Duration,
        insecure: bool,
    ) -> Result<Self, ClientError> {
        let base = Url::parse(endpoint).map_err(|e| ClientError::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            reason: e.to_string(),
        })?;
        if base.cannot_be_a_base() {
            return Err(ClientError::InvalidEndpoint {
                endpoint: endpoint.to_string(),
                reason: "not a base URL".to_string(),
            });
        }

        let mut builder = Client::builder().timeout(timeout);
        if insecure {
            builder = builder.danger_accept_invalid_certs(true);
        }
        let http = builder.build().map_err(ClientError::Build)?;

        Ok(Self { http, base })
    }

    pub fn endpoint(&self) -> &str {
        self.base.as_str()
    }

    /// GET /api/stats/package-type/keys
    pub async fn package_types(&self) -> Result<ApiResult<Vec<String>>, ClientError> {
        let url = self.url(&["api", "stats", "package-type", "keys"])?;
        self.fetch(self.http.get(url)).await
    }

    /// GET /api/stats/version-info
    pub async fn version_info(&self) -> Result<ApiResult<VersionInfo>, ClientError> {
        let url = self.url(&["api", "stats", "version-info"])?;
        self.fetch(self.http.get(url)).await
    }

    /// GET /api/admin/stores/{packageType}/{type}/{name}
    pub async fn get_store(&self, key: &StoreKey) -> Result<ApiResult<Store>, ClientError> {
        let url = self.store_url(key)?;
        self.fetch(self.http.get(url)).await
    }

    /// One page of stores of `store_type`.
    ///
    /// `package_type` of `None` lists every package type. `page` is the
    /// `next_page` cursor of the previous page.
    pub async fn get_stores(
        &self,
        package_type: Option<&str>,
        store_type: StoreType,
        page: Option<&str>,
    ) -> Result<ApiResult<StorePage>, ClientError> {
        let package_type = package_type.unwrap_or(ALL_PACKAGE_TYPES);
        let mut url = self.url(&["api", "admin", "stores", package_type, store_type.as_str()])?;
        if let Some(cursor) = page {
            url.query_pairs_mut().append_pair("page", cursor);
        }
        self.fetch(self.http.get(url)).await
    }

    /// Every store of `package_type` regardless of type; `None` means all.
    pub async fn get_endpoints(
        &self,
        package_type: Option<&str>,
    ) -> Result<ApiResult<StorePage>, ClientError> {
        let package_type = package_type.unwrap_or(ALL_ENDPOINTS);
        let url = self.url(&["api", "admin", "stores", "query", "endpoints", package_type])?;
        self.fetch(self.http.get(url)).await
    }

    /// POST the store. The server answers 204 with no body.
    pub async fn create_store(&self, store: &Store) -> Result<ApiResult<()>, ClientError> {
        let url = self.store_url(&store.store_key())?;
        let response = self.send(self.write(Method::POST, url, store)).await?;
        Ok(match response {
            Ok(_) => ApiResult::Success(()),
            Err(failure) => ApiResult::Failure(failure),
        })
    }

    /// PUT the store and return what the server stored.
    pub async fn update_store(&self, store: &Store) -> Result<ApiResult<Store>, ClientError> {
        let url = self.store_url(&store.store_key())?;
        self.fetch(self.write(Method::PUT, url, store)).await
    }

    /// GET /api/admin/schedule/store/{packageType}/{type}/{name}/disable-timeout
    pub async fn get_store_timeout(
        &self,
        key: &StoreKey,
    ) -> Result<ApiResult<DisableTimeout>, ClientError> {
        let url = self.url(&[
            "api",
            "admin",
            "schedule",
            "store",
            key.package_type(),
            key.store_type().as_str(),
            key.name(),
            "disable-timeout",
        ])?;
        self.fetch(self.http.get(url)).await
    }

    /// GET /api/admin/schedule/store/all/disable-timeout
    pub async fn get_all_timeouts(&self) -> Result<ApiResult<DisableTimeoutList>, ClientError> {
        let url = self.url(&["api", "admin", "schedule", "store", "all", "disable-timeout"])?;
        self.fetch(self.http.get(url)).await
    }

    fn store_url(&self, key: &StoreKey) -> Result<Url, ClientError> {
        self.url(&[
            "api",
            "admin",
            "stores",
            key.package_type(),
            key.store_type().as_str(),
            key.name(),
        ])
    }

    /// Append percent-encoded path segments to the base endpoint.
    fn url(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidEndpoint {
                endpoint: self.base.to_string(),
                reason: "not a base URL".to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn write(&self, method: Method, url: Url, store: &Store) -> RequestBuilder {
        self.http
            .request(method, url)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .json(store)
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<ApiResult<T>, ClientError> {
        match self.send(request).await? {
            Ok(response) => {
                let url = response.url().to_string();
                let value = response
                    .json::<T>()
                    .await
                    .map_err(|source| ClientError::Decode { url, source })?;
                Ok(ApiResult::Success(value))
            }
            Err(failure) => Ok(ApiResult::Failure(failure)),
        }
    }

    /// Send a request, splitting 2xx responses from server-reported failures.
    async fn send(
        &self,
        request: RequestBuilder,
    ) -> Result<Result<Response, ApiFailure>, ClientError> {
        let request = request
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .build()
            .map_err(ClientError::Build)?;
        let method = request.method().clone();
        let url = request.url().to_string();
        tracing::debug!(%method, %url, "sending request");

        let response = self
            .http
            .execute(request)
            .await
            .map_err(|source| ClientError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(Ok(response));
        }

        let text = match response.text().await {
            Ok(text) => text,
            Err(e) => {
                tracing::debug!(%method, %url, "failed to read error body: {}", e);
                String::new()
            }
        };
        let message = failure_message(status.as_u16(), &text);
        tracing::warn!(%method, %url, status = status.as_u16(), "{}", message);
        Ok(Err(ApiFailure::new(status.as_u16(), message)))
    }
}

/// Prefer the server's `{"error": ...}` message, then the raw body, then the reason phrase.
fn failure_message(status: u16, body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        return parsed.error;
    }
    let trimmed = body.trim();
    if !trimmed.is_empty() {
        return trimmed.to_string();
    }
    reqwest::StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("Unknown error")
        .to_string()
}
