//! Drive a [`StorePager`] against the API

use async_trait::async_trait;
use indyctl_core::{StorePage, StorePager, StoreType};

use crate::client::IndyClient;
use crate::error::ClientError;
use crate::result::ApiResult;
use crate::session::Session;

/// Anything that can produce listing pages by cursor
#[async_trait]
pub trait StorePageSource: Send + Sync {
    async fn fetch_page(&self, cursor: Option<&str>) -> Result<ApiResult<StorePage>, ClientError>;
}

/// Paged listing of one store type, optionally narrowed to a package type
#[derive(Debug, Clone)]
pub struct StoreListing<'a> {
    client: &'a IndyClient,
    package_type: Option<String>,
    store_type: StoreType,
}

impl<'a> StoreListing<'a> {
    pub fn new(client: &'a IndyClient, package_type: Option<&str>, store_type: StoreType) -> Self {
        Self {
            client,
            package_type: package_type.map(str::to_string),
            store_type,
        }
    }
}

#[async_trait]
impl StorePageSource for StoreListing<'_> {
    async fn fetch_page(&self, cursor: Option<&str>) -> Result<ApiResult<StorePage>, ClientError> {
        self.client
            .get_stores(self.package_type.as_deref(), self.store_type, cursor)
            .await
    }
}

/// Fetch pages into `pager` until it is exhausted, fails, or `max_pages` more pages are loaded.
///
/// A server failure leaves the pager in `Failed` with its items intact and
/// returns `Ok`. Transport errors fail the pager and are returned. If the
/// session closes, the in-flight page is discarded and `Cancelled` returned.
pub async fn fetch_all<S>(
    source: &S,
    pager: &mut StorePager,
    session: &Session,
    max_pages: Option<usize>,
) -> Result<usize, ClientError>
where
    S: StorePageSource + ?Sized,
{
    let mut fetched = 0;
    while max_pages.map_or(true, |max| fetched < max) {
        let Some(request) = pager.request_next() else {
            break;
        };

        match session.guard(source.fetch_page(request.cursor.as_deref())).await {
            Ok(Ok(ApiResult::Success(page))) => {
                pager.on_page(request.id, page);
                fetched += 1;
            }
            Ok(Ok(ApiResult::Failure(failure))) => {
                tracing::warn!("store listing failed: {}", failure);
                pager.on_error(request.id, failure.message);
                break;
            }
            Ok(Err(err)) => {
                pager.on_error(request.id, err.to_string());
                return Err(err);
            }
            Err(cancelled) => {
                pager.on_error(request.id, cancelled.to_string());
                return Err(cancelled);
            }
        }
    }
    Ok(fetched)
}
