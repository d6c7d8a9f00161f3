//! ============================================================================
//! Backend Overlay Client - User Collection & Wishlist Persistence
//! ============================================================================
//! CRUD over the per-user membership resources:
//! - GET    /api/v1/user/collection[?wishlist=1]
//! - POST   /api/v1/user/collection | /api/v1/user/wishlist
//! - DELETE /api/v1/user/collection/skin | /api/v1/user/wishlist/skin
//! - PATCH  .../favorite-chroma
//! ============================================================================

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{authorize, check_status, OverlayStore};
use crate::config::ClientConfig;
use crate::types::CatalogError;

/// Which membership list an overlay operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayList {
    Owned,
    Wishlist,
}

impl OverlayList {
    /// Resource root for create/patch requests.
    fn resource(&self) -> &'static str {
        match self {
            OverlayList::Owned => "/api/v1/user/collection",
            OverlayList::Wishlist => "/api/v1/user/wishlist",
        }
    }
}

/// One remote membership entry.
#[derive(Debug, Clone, Deserialize)]
pub struct MembershipRecord {
    pub skin_uuid: String,
    #[serde(default)]
    pub metadata: Option<MembershipMetadata>,
}

impl MembershipRecord {
    pub fn favorite_chroma(&self) -> Option<&str> {
        self.metadata
            .as_ref()
            .and_then(|m| m.favorite_chroma_uuid.as_deref())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MembershipMetadata {
    #[serde(default)]
    pub favorite_chroma_uuid: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MembershipListResponse {
    #[serde(default)]
    data: Vec<MembershipRecord>,
}

#[derive(Debug, Serialize)]
struct AddMembershipBody<'a> {
    skin_uuid: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    owned: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    favorite_chroma_uuid: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct FavoriteChromaBody<'a> {
    skin_uuid: &'a str,
    favorite_chroma_uuid: &'a str,
}

/// Reqwest-backed implementation of [`OverlayStore`].
pub struct BackendOverlayClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl BackendOverlayClient {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.backend_url.clone(),
            token: config.token.clone(),
        }
    }
}

#[async_trait]
impl OverlayStore for BackendOverlayClient {
    async fn list(&self, list: OverlayList) -> Result<Vec<MembershipRecord>, CatalogError> {
        // Both lists live under the collection resource; the wishlist is a
        // query-flag view of it.
        let url = match list {
            OverlayList::Owned => format!("{}/api/v1/user/collection", self.base_url),
            OverlayList::Wishlist => {
                format!("{}/api/v1/user/collection?wishlist=1", self.base_url)
            }
        };
        debug!("Fetching membership list from {}", url);

        let request = authorize(self.client.get(&url), &self.token);
        let response = check_status(request.send().await?).await?;
        let body: MembershipListResponse = response.json().await?;
        Ok(body.data)
    }

    async fn add(
        &self,
        list: OverlayList,
        item_uuid: &str,
        favorite_chroma: Option<&str>,
    ) -> Result<(), CatalogError> {
        let url = format!("{}{}", self.base_url, list.resource());
        let body = AddMembershipBody {
            skin_uuid: item_uuid,
            // The collection resource expects an explicit owned flag; the
            // wishlist resource has no such field.
            owned: match list {
                OverlayList::Owned => Some(true),
                OverlayList::Wishlist => None,
            },
            favorite_chroma_uuid: favorite_chroma,
        };
        debug!("Adding {} to {:?}", item_uuid, list);

        let request = authorize(self.client.post(&url).json(&body), &self.token);
        check_status(request.send().await?).await?;
        Ok(())
    }

    async fn remove(&self, list: OverlayList, item_uuid: &str) -> Result<(), CatalogError> {
        let url = format!(
            "{}{}/skin?skin_uuid={}",
            self.base_url,
            list.resource(),
            item_uuid
        );
        debug!("Removing {} from {:?}", item_uuid, list);

        let request = authorize(self.client.delete(&url), &self.token);
        check_status(request.send().await?).await?;
        Ok(())
    }

    async fn set_favorite_chroma(
        &self,
        list: OverlayList,
        item_uuid: &str,
        chroma_uuid: &str,
    ) -> Result<(), CatalogError> {
        let url = format!("{}{}/favorite-chroma", self.base_url, list.resource());
        let body = FavoriteChromaBody {
            skin_uuid: item_uuid,
            favorite_chroma_uuid: chroma_uuid,
        };
        debug!("Setting favorite chroma for {} in {:?}", item_uuid, list);

        let request = authorize(self.client.patch(&url).json(&body), &self.token);
        check_status(request.send().await?).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn membership_payload_parses_with_and_without_metadata() {
        let body = r#"{
            "data": [
                {"skin_uuid": "s1", "metadata": {"favorite_chroma_uuid": "ch9"}},
                {"skin_uuid": "s2", "metadata": null},
                {"skin_uuid": "s3"}
            ]
        }"#;

        let parsed: MembershipListResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.data.len(), 3);
        assert_eq!(parsed.data[0].favorite_chroma(), Some("ch9"));
        assert_eq!(parsed.data[1].favorite_chroma(), None);
        assert_eq!(parsed.data[2].favorite_chroma(), None);
    }

    #[test]
    fn add_body_omits_absent_fields() {
        let body = AddMembershipBody {
            skin_uuid: "s1",
            owned: None,
            favorite_chroma_uuid: None,
        };
        let json = serde_json::to_string(&body).unwrap();
        assert_eq!(json, r#"{"skin_uuid":"s1"}"#);

        let body = AddMembershipBody {
            skin_uuid: "s1",
            owned: Some(true),
            favorite_chroma_uuid: Some("ch1"),
        };
        let json = serde_json::to_string(&body).unwrap();
        assert!(json.contains(r#""owned":true"#));
        assert!(json.contains(r#""favorite_chroma_uuid":"ch1""#));
    }
}
