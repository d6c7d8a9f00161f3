//! ============================================================================
//! Backend Catalog Client - Paginated Skin Catalog
//! ============================================================================
//! Fetches the primary catalog from the backend page by page:
//! GET {backend}/api/v1/skins?perPage={n}&page={n}
//! ============================================================================

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::{authorize, check_status, CatalogSource};
use crate::config::ClientConfig;
use crate::types::CatalogError;

/// One fetched page: the raw records plus pagination metadata.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogPage {
    #[serde(default)]
    pub data: Vec<RawItem>,
    pub meta: PageMeta,
}

/// Pagination metadata reported by the backend.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub total: u64,
    pub page: u32,
    pub per_page: u32,
    pub total_pages: u32,
}

/// A raw catalog record as the backend serves it. Foreign-key-like fields
/// may be absent or empty; the back-fill normalizer repairs them.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawItem {
    #[serde(default)]
    pub uuid: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    /// Legacy field name some records still carry instead of `image_url`.
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub weapon: Option<String>,
    #[serde(default)]
    pub collection: Option<String>,
    #[serde(default)]
    pub tier: Option<RawTier>,
    #[serde(default)]
    pub tier_id: Option<String>,
    #[serde(default)]
    pub levels: Vec<RawLevel>,
    #[serde(default)]
    pub chromas: Vec<RawChroma>,
}

/// Inline tier display metadata on a raw record.
#[derive(Debug, Clone, Deserialize)]
pub struct RawTier {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawLevel {
    #[serde(default)]
    pub uuid: String,
    #[serde(rename = "displayName", default)]
    pub display_name: Option<String>,
    #[serde(rename = "displayIcon", default)]
    pub display_icon: Option<String>,
    #[serde(rename = "streamedVideo", default)]
    pub streamed_video: Option<String>,
    /// Level-item category tag carried by the origin.
    #[serde(rename = "levelItem", default)]
    pub level_item: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawChroma {
    #[serde(default)]
    pub uuid: String,
    #[serde(rename = "displayName", default)]
    pub display_name: Option<String>,
    #[serde(rename = "displayIcon", default)]
    pub display_icon: Option<String>,
    #[serde(rename = "fullRender", default)]
    pub full_render: Option<String>,
    #[serde(default)]
    pub swatch: Option<String>,
    #[serde(rename = "streamedVideo", default)]
    pub streamed_video: Option<String>,
}

/// Reqwest-backed implementation of [`CatalogSource`].
pub struct BackendCatalogClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl BackendCatalogClient {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.backend_url.clone(),
            token: config.token.clone(),
        }
    }
}

#[async_trait]
impl CatalogSource for BackendCatalogClient {
    async fn fetch_page(&self, page: u32, per_page: u32) -> Result<CatalogPage, CatalogError> {
        let url = format!(
            "{}/api/v1/skins?perPage={}&page={}",
            self.base_url, per_page, page
        );
        debug!("Fetching catalog page {} from {}", page, url);

        let request = authorize(self.client.get(&url), &self.token);
        let response = check_status(request.send().await?).await?;
        let page: CatalogPage = response.json().await?;

        debug!(
            "Catalog page {}/{}: {} records",
            page.meta.page,
            page.meta.total_pages,
            page.data.len()
        );
        Ok(page)
    }
}
