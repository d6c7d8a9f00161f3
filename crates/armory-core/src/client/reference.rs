//! ============================================================================
//! Reference API Client - Weapons, Content Tiers, Themes
//! ============================================================================
//! Fetches the three auxiliary reference datasets. Each endpoint is a single
//! unauthenticated GET returning `{ status, data: [...] }`.
//! ============================================================================

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::{check_status, ReferenceSource};
use crate::config::ClientConfig;
use crate::types::CatalogError;

/// Envelope the reference API wraps every payload in (`{ status, data }`).
#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    #[serde(default)]
    data: Vec<T>,
}

/// A weapon with its owned skin list (used to build the reverse index).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WeaponRecord {
    #[serde(default)]
    pub uuid: String,
    #[serde(rename = "displayName", default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub skins: Vec<WeaponSkinRef>,
}

/// A skin reference inside a weapon's ownership list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WeaponSkinRef {
    #[serde(default)]
    pub uuid: String,
    #[serde(rename = "displayName", default)]
    pub display_name: Option<String>,
}

/// A content tier (rarity) record.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TierRecord {
    #[serde(default)]
    pub uuid: String,
    #[serde(rename = "displayName", default)]
    pub display_name: Option<String>,
    #[serde(rename = "displayIcon", default)]
    pub display_icon: Option<String>,
}

/// A thematic collection record.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CollectionRecord {
    #[serde(default)]
    pub uuid: String,
    #[serde(rename = "displayName", default)]
    pub display_name: Option<String>,
}

/// Reqwest-backed implementation of [`ReferenceSource`].
pub struct ReferenceApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ReferenceApiClient {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.reference_url.clone(),
        }
    }

    async fn fetch<T: serde::de::DeserializeOwned + Default>(
        &self,
        path: &str,
    ) -> Result<Vec<T>, CatalogError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("Fetching reference dataset from {}", url);

        let response = check_status(self.client.get(&url).send().await?).await?;
        let envelope: ApiEnvelope<T> = response.json().await?;
        Ok(envelope.data)
    }
}

#[async_trait]
impl ReferenceSource for ReferenceApiClient {
    async fn fetch_weapons(&self) -> Result<Vec<WeaponRecord>, CatalogError> {
        self.fetch("/v1/weapons").await
    }

    async fn fetch_tiers(&self) -> Result<Vec<TierRecord>, CatalogError> {
        self.fetch("/v1/contenttiers").await
    }

    async fn fetch_collections(&self) -> Result<Vec<CollectionRecord>, CatalogError> {
        self.fetch("/v1/themes").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weapon_payload_parses_with_skin_list() {
        let body = r#"{
            "status": 200,
            "data": [
                {
                    "uuid": "w1",
                    "displayName": "Vandal",
                    "category": "EEquippableCategory::Rifle",
                    "skins": [{"uuid": "s1", "displayName": "Prime Vandal"}, {"uuid": "s2"}]
                }
            ]
        }"#;

        let envelope: ApiEnvelope<WeaponRecord> = serde_json::from_str(body).unwrap();
        let weapon = &envelope.data[0];
        assert_eq!(weapon.uuid, "w1");
        assert_eq!(weapon.display_name.as_deref(), Some("Vandal"));
        assert_eq!(weapon.skins.len(), 2);
        assert_eq!(weapon.skins[1].uuid, "s2");
    }

    #[test]
    fn tier_payload_tolerates_missing_icon() {
        let body = r#"{"status": 200, "data": [{"uuid": "t1", "displayName": "Deluxe"}]}"#;
        let envelope: ApiEnvelope<TierRecord> = serde_json::from_str(body).unwrap();
        assert_eq!(envelope.data[0].display_name.as_deref(), Some("Deluxe"));
        assert!(envelope.data[0].display_icon.is_none());
    }
}
