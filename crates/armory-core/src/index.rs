//! ============================================================================
//! Reference Index - Auxiliary Dataset Lookups
//! ============================================================================
//! Builds the lookup structures the back-fill normalizer and the filter UIs
//! need from the three reference datasets:
//! - tier uuid   -> display metadata (name + icon)
//! - theme uuid  -> display name
//! - weapon uuid -> display name
//! - item uuid   -> owning weapon uuid (reverse index, derived from each
//!   weapon's skin list)
//! ============================================================================

use std::collections::HashMap;
use std::time::Duration;

use tracing::{debug, warn};

use crate::client::{
    with_timeout, CollectionRecord, ReferenceSource, TierRecord, WeaponRecord,
};
use crate::types::{CatalogError, DictionaryEntry};

/// Display metadata for a content tier.
#[derive(Debug, Clone, PartialEq)]
pub struct TierMeta {
    pub name: String,
    pub image_url: String,
}

/// The merged reference lookups. Built once per run, read-only thereafter.
/// Any of the maps may be empty when its fetch failed; lookups then simply
/// miss and consumers degrade to "Unknown".
#[derive(Debug, Clone, Default)]
pub struct ReferenceIndex {
    pub tiers: HashMap<String, TierMeta>,
    pub collections: HashMap<String, String>,
    pub weapons: HashMap<String, String>,
    /// Reverse map: item uuid -> owning weapon uuid.
    pub weapon_by_item: HashMap<String, String>,
}

impl ReferenceIndex {
    /// Fetch all three datasets concurrently and build the index. Each fetch
    /// failure is logged and leaves its mapping empty; an empty mapping is a
    /// valid degraded state, never an error.
    pub async fn load(source: &dyn ReferenceSource, timeout: Duration) -> Self {
        let (weapons, tiers, collections) = tokio::join!(
            with_timeout(timeout, source.fetch_weapons()),
            with_timeout(timeout, source.fetch_tiers()),
            with_timeout(timeout, source.fetch_collections()),
        );

        let mut index = ReferenceIndex::default();

        match weapons.map_err(|e| CatalogError::reference("weapons", e)) {
            Ok(records) => index.index_weapons(&records),
            Err(e) => warn!("Weapon lookups degraded to empty: {}", e),
        }
        match tiers.map_err(|e| CatalogError::reference("contenttiers", e)) {
            Ok(records) => index.index_tiers(&records),
            Err(e) => warn!("Tier lookups degraded to empty: {}", e),
        }
        match collections.map_err(|e| CatalogError::reference("themes", e)) {
            Ok(records) => index.index_collections(&records),
            Err(e) => warn!("Collection lookups degraded to empty: {}", e),
        }

        debug!(
            "Reference index ready: {} weapons, {} tiers, {} collections, {} reverse entries",
            index.weapons.len(),
            index.tiers.len(),
            index.collections.len(),
            index.weapon_by_item.len()
        );
        index
    }

    /// Index the weapon dataset and derive the reverse item->weapon map.
    /// A later weapon claiming an already-indexed item uuid overwrites the
    /// earlier entry; this tie-break is defined behavior.
    pub fn index_weapons(&mut self, records: &[WeaponRecord]) {
        for weapon in records {
            if weapon.uuid.is_empty() {
                continue;
            }
            self.weapons.insert(
                weapon.uuid.clone(),
                weapon
                    .display_name
                    .clone()
                    .unwrap_or_else(|| "Unknown".to_string()),
            );
            for skin in &weapon.skins {
                if skin.uuid.is_empty() {
                    continue;
                }
                self.weapon_by_item
                    .insert(skin.uuid.clone(), weapon.uuid.clone());
            }
        }
    }

    pub fn index_tiers(&mut self, records: &[TierRecord]) {
        for tier in records {
            if tier.uuid.is_empty() {
                continue;
            }
            self.tiers.insert(
                tier.uuid.clone(),
                TierMeta {
                    name: tier
                        .display_name
                        .clone()
                        .unwrap_or_else(|| "Unknown".to_string()),
                    image_url: tier.display_icon.clone().unwrap_or_default(),
                },
            );
        }
    }

    pub fn index_collections(&mut self, records: &[CollectionRecord]) {
        for collection in records {
            if collection.uuid.is_empty() {
                continue;
            }
            self.collections.insert(
                collection.uuid.clone(),
                collection
                    .display_name
                    .clone()
                    .unwrap_or_else(|| "Unknown".to_string()),
            );
        }
    }

    pub fn weapon_for_item(&self, item_uuid: &str) -> Option<&str> {
        self.weapon_by_item.get(item_uuid).map(String::as_str)
    }

    pub fn tier_meta(&self, tier_id: &str) -> Option<&TierMeta> {
        self.tiers.get(tier_id)
    }

    /// Sorted `(uuid, label)` list for the weapon filter picker.
    pub fn weapon_dictionary(&self) -> Vec<DictionaryEntry> {
        Self::dictionary(&self.weapons)
    }

    /// Sorted `(uuid, label)` list for the collection filter picker.
    pub fn collection_dictionary(&self) -> Vec<DictionaryEntry> {
        Self::dictionary(&self.collections)
    }

    /// Sorted `(uuid, label)` list for the tier filter picker.
    pub fn tier_dictionary(&self) -> Vec<DictionaryEntry> {
        let mut entries: Vec<DictionaryEntry> = self
            .tiers
            .iter()
            .map(|(uuid, meta)| DictionaryEntry {
                value: uuid.clone(),
                label: meta.name.trim().to_string(),
            })
            .filter(|e| !e.value.is_empty() && !e.label.is_empty())
            .collect();
        entries.sort_by(|a, b| a.label.cmp(&b.label));
        entries
    }

    fn dictionary(map: &HashMap<String, String>) -> Vec<DictionaryEntry> {
        let mut entries: Vec<DictionaryEntry> = map
            .iter()
            .map(|(uuid, name)| DictionaryEntry {
                value: uuid.clone(),
                label: name.trim().to_string(),
            })
            .filter(|e| !e.value.is_empty() && !e.label.is_empty())
            .collect();
        entries.sort_by(|a, b| a.label.cmp(&b.label));
        entries
    }
}
