//! ============================================================================
//! Core Types for the Armory Catalog Engine
//! ============================================================================
//! Defines the normalized catalog entities, the filter state, and the engine
//! error taxonomy. Wire-level (raw) record shapes live next to the clients
//! that receive them; everything here is post-normalization.
//! ============================================================================

use serde::{Deserialize, Serialize};

/// A normalized catalog item (e.g. a weapon skin) with its variant lists.
///
/// `id` is a synthetic sequential identifier assigned at ingestion time and is
/// stable only within one ingestion run. `uuid` is origin-assigned, globally
/// unique, and the only identifier safe to persist or compare across runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: u64,
    pub uuid: String,
    pub name: String,
    pub image_url: String,
    /// Owning weapon uuid. Empty when the origin omitted it and the reverse
    /// index could not resolve it either.
    pub weapon_id: String,
    pub collection_id: String,
    pub tier_id: String,
    pub tier: TierDisplay,
    pub levels: Vec<LevelVariant>,
    pub chromas: Vec<ChromaVariant>,
}

/// Tier display metadata, kept as an explicit tagged state instead of
/// empty-string/null sentinels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum TierDisplay {
    Resolved { name: String, image_url: String },
    Unresolved,
}

impl TierDisplay {
    pub fn is_resolved(&self) -> bool {
        matches!(self, TierDisplay::Resolved { .. })
    }

    /// Display name for consumers; unresolved tiers render as "Unknown".
    pub fn display_name(&self) -> &str {
        match self {
            TierDisplay::Resolved { name, .. } => name,
            TierDisplay::Unresolved => "Unknown",
        }
    }
}

/// An ordered level variant of an item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelVariant {
    pub uuid: String,
    pub name: Option<String>,
    pub image: Option<String>,
    pub video: Option<String>,
}

/// An ordered chroma variant of an item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChromaVariant {
    pub uuid: String,
    pub name: Option<String>,
    pub image: Option<String>,
    pub full_render: Option<String>,
    pub swatch: Option<String>,
    pub video: Option<String>,
}

/// Active filter selections. Empty string means "no filter" for each field.
///
/// Identifier filters match exactly and case-sensitively; `search` is a
/// trimmed, case-folded substring match on the item name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterState {
    pub weapon: String,
    pub collection: String,
    pub tier: String,
    pub search: String,
}

impl FilterState {
    pub fn is_empty(&self) -> bool {
        self.weapon.is_empty()
            && self.collection.is_empty()
            && self.tier.is_empty()
            && self.search.trim().is_empty()
    }

    pub fn clear(&mut self) {
        self.weapon.clear();
        self.collection.clear();
        self.tier.clear();
        self.search.clear();
    }
}

/// A `(value, label)` pair for building filter pickers from reference data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DictionaryEntry {
    pub value: String,
    pub label: String,
}

/// Errors surfaced by the catalog engine.
///
/// The taxonomy mirrors the failure contract: reference fetches degrade to
/// empty mappings (non-fatal at the call site), a page fetch aborts the
/// ingestion run, overlay writes abort the single user-triggered operation,
/// and overlay reads degrade to empty sets.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("reference fetch failed ({dataset}): {source}")]
    Reference {
        dataset: &'static str,
        #[source]
        source: Box<CatalogError>,
    },

    #[error("catalog page {page} fetch failed: {source}")]
    PageFetch {
        page: u32,
        #[source]
        source: Box<CatalogError>,
    },

    #[error("overlay write failed ({operation}): {source}")]
    OverlayWrite {
        operation: &'static str,
        #[source]
        source: Box<CatalogError>,
    },

    #[error("overlay read failed: {source}")]
    OverlayRead {
        #[source]
        source: Box<CatalogError>,
    },

    #[error("http transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("upstream returned {status}: {body}")]
    UpstreamStatus { status: u16, body: String },

    #[error("request timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("catalog store lock poisoned")]
    StoreLock,
}

impl CatalogError {
    /// Wrap a transport error as a fatal page-fetch failure.
    pub fn page_fetch(page: u32, source: CatalogError) -> Self {
        CatalogError::PageFetch {
            page,
            source: Box::new(source),
        }
    }

    /// Wrap a transport error as a non-fatal reference failure.
    pub fn reference(dataset: &'static str, source: CatalogError) -> Self {
        CatalogError::Reference {
            dataset,
            source: Box::new(source),
        }
    }

    /// Wrap a transport error as a fatal overlay-write failure.
    pub fn overlay_write(operation: &'static str, source: CatalogError) -> Self {
        CatalogError::OverlayWrite {
            operation,
            source: Box::new(source),
        }
    }

    /// Wrap a transport error as a degradable overlay-read failure.
    pub fn overlay_read(source: CatalogError) -> Self {
        CatalogError::OverlayRead {
            source: Box::new(source),
        }
    }
}
