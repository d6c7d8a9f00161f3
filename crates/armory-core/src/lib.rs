//! ============================================================================
//! ARMORY-CORE: Catalog Aggregation Engine
//! ============================================================================
//! This crate handles all backend logic for the Armory catalog:
//! - Paginated catalog ingestion with progressive store updates
//! - Reference index building (weapons, tiers, themes) and back-fill
//! - In-memory catalog store and pure filter engine
//! - Per-user owned/wishlist overlay against the backend persistence API
//! ============================================================================

pub mod catalog;
pub mod client;
pub mod config;
pub mod filter;
pub mod index;
pub mod ingest;
pub mod normalize;
pub mod overlay;
pub mod store;
pub mod types;

// Re-export main types for convenience
pub use catalog::Catalog;
pub use client::{CatalogSource, OverlayList, OverlayStore, ReferenceSource};
pub use config::ClientConfig;
pub use filter::apply_filters;
pub use index::ReferenceIndex;
pub use ingest::{run_ingestion, IngestStats};
pub use overlay::UserOverlay;
pub use store::{CatalogStore, SharedCatalogStore};
pub use types::{CatalogError, FilterState, Item, TierDisplay};
