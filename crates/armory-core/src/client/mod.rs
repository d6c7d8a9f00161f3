//! ============================================================================
//! Client Module - External Collaborator Interfaces
//! ============================================================================
//! Contains the async traits the engine consumes plus their reqwest-backed
//! implementations:
//! - CatalogSource / BackendCatalogClient: paginated primary catalog
//! - ReferenceSource / ReferenceApiClient: weapons, content tiers, themes
//! - OverlayStore / BackendOverlayClient: user collection + wishlist
//!
//! The engine only depends on the traits; the HTTP transport is a detail of
//! the implementations here.
//! ============================================================================

mod catalog;
mod collection;
mod reference;

pub use catalog::{BackendCatalogClient, CatalogPage, PageMeta, RawChroma, RawItem, RawLevel, RawTier};
pub use collection::{BackendOverlayClient, MembershipMetadata, MembershipRecord, OverlayList};
pub use reference::{CollectionRecord, ReferenceApiClient, TierRecord, WeaponRecord, WeaponSkinRef};

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;

use crate::types::CatalogError;

/// Source of the paginated primary catalog.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch one page of raw catalog records. Pages are 1-based.
    async fn fetch_page(&self, page: u32, per_page: u32) -> Result<CatalogPage, CatalogError>;
}

/// Source of the three auxiliary reference datasets.
#[async_trait]
pub trait ReferenceSource: Send + Sync {
    async fn fetch_weapons(&self) -> Result<Vec<WeaponRecord>, CatalogError>;
    async fn fetch_tiers(&self) -> Result<Vec<TierRecord>, CatalogError>;
    async fn fetch_collections(&self) -> Result<Vec<CollectionRecord>, CatalogError>;
}

/// Persistence collaborator for per-user membership (owned and wishlist).
#[async_trait]
pub trait OverlayStore: Send + Sync {
    /// Read the full remote membership list for one overlay list.
    async fn list(&self, list: OverlayList) -> Result<Vec<MembershipRecord>, CatalogError>;

    /// Create a membership entry, optionally with a favorite chroma.
    async fn add(
        &self,
        list: OverlayList,
        item_uuid: &str,
        favorite_chroma: Option<&str>,
    ) -> Result<(), CatalogError>;

    /// Delete a membership entry.
    async fn remove(&self, list: OverlayList, item_uuid: &str) -> Result<(), CatalogError>;

    /// Patch the favorite chroma of an existing membership entry.
    async fn set_favorite_chroma(
        &self,
        list: OverlayList,
        item_uuid: &str,
        chroma_uuid: &str,
    ) -> Result<(), CatalogError>;
}

/// Bound a collaborator call so a stuck network request cannot stall the
/// caller indefinitely. Expiry maps to `CatalogError::Timeout`.
pub(crate) async fn with_timeout<T, F>(limit: Duration, fut: F) -> Result<T, CatalogError>
where
    F: Future<Output = Result<T, CatalogError>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => Err(CatalogError::Timeout {
            seconds: limit.as_secs(),
        }),
    }
}

/// Attach the bearer token to a backend request when one is configured.
pub(crate) fn authorize(
    request: reqwest::RequestBuilder,
    token: &Option<String>,
) -> reqwest::RequestBuilder {
    match token {
        Some(token) => request.bearer_auth(token),
        None => request,
    }
}

/// Reject non-2xx responses, capturing the body for diagnostics.
pub(crate) async fn check_status(
    response: reqwest::Response,
) -> Result<reqwest::Response, CatalogError> {
    if !response.status().is_success() {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        return Err(CatalogError::UpstreamStatus { status, body });
    }
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn with_timeout_passes_through_fast_results() {
        let result = with_timeout(Duration::from_secs(1), async { Ok::<_, CatalogError>(7) }).await;
        assert_eq!(result.unwrap(), 7);
    }

    #[tokio::test(start_paused = true)]
    async fn with_timeout_maps_expiry_to_timeout_error() {
        let result = with_timeout(Duration::from_secs(1), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok::<_, CatalogError>(())
        })
        .await;
        assert!(matches!(result, Err(CatalogError::Timeout { seconds: 1 })));
    }
}
