//! ============================================================================
//! Catalog Service - Engine Façade
//! ============================================================================
//! Wires the collaborators, the catalog store, the user overlay, and the
//! session filter state behind one surface. A UI layer re-derives whatever
//! reactivity it wants on top of this.
//! ============================================================================

use std::sync::Arc;

use crate::client::{
    BackendCatalogClient, BackendOverlayClient, CatalogSource, OverlayList, OverlayStore,
    ReferenceApiClient, ReferenceSource,
};
use crate::config::ClientConfig;
use crate::filter::apply_filters;
use crate::index::ReferenceIndex;
use crate::ingest::{run_ingestion, IngestStats};
use crate::overlay::UserOverlay;
use crate::store::{CatalogStore, SharedCatalogStore};
use crate::types::{CatalogError, DictionaryEntry, FilterState, Item};

/// The aggregation engine: merged catalog, reference lookups, user overlay,
/// and the active filter selections for this session.
pub struct Catalog {
    config: ClientConfig,
    catalog_source: Arc<dyn CatalogSource>,
    reference_source: Arc<dyn ReferenceSource>,
    overlay_store: Arc<dyn OverlayStore>,
    store: SharedCatalogStore,
    overlay: UserOverlay,
    filters: FilterState,
}

impl Catalog {
    /// Build a catalog wired to the HTTP collaborators from `config`.
    pub fn new(config: ClientConfig) -> Self {
        let catalog_source = Arc::new(BackendCatalogClient::new(&config));
        let reference_source = Arc::new(ReferenceApiClient::new(&config));
        let overlay_store = Arc::new(BackendOverlayClient::new(&config));
        Self::with_collaborators(config, catalog_source, reference_source, overlay_store)
    }

    /// Build a catalog over explicit collaborator implementations.
    pub fn with_collaborators(
        config: ClientConfig,
        catalog_source: Arc<dyn CatalogSource>,
        reference_source: Arc<dyn ReferenceSource>,
        overlay_store: Arc<dyn OverlayStore>,
    ) -> Self {
        Self {
            config,
            catalog_source,
            reference_source,
            overlay_store,
            store: CatalogStore::shared(),
            overlay: UserOverlay::new(),
            filters: FilterState::default(),
        }
    }

    /// Fetch the three reference datasets and install the resulting index.
    /// Individual fetch failures degrade to empty lookups, never an error.
    pub async fn load_reference(&self) -> Result<(), CatalogError> {
        let index =
            ReferenceIndex::load(self.reference_source.as_ref(), self.config.request_timeout).await;
        let mut guard = self.store.write().map_err(|_| CatalogError::StoreLock)?;
        guard.set_reference(index);
        Ok(())
    }

    /// Run a full catalog ingestion. The store updates progressively after
    /// every page; on failure the committed prefix is retained.
    pub async fn sync(&self) -> Result<IngestStats, CatalogError> {
        run_ingestion(
            self.catalog_source.as_ref(),
            &self.store,
            self.config.page_size,
            self.config.request_timeout,
        )
        .await
    }

    /// Shared handle to the underlying store, for consumers that want to
    /// poll it mid-ingestion.
    pub fn store(&self) -> SharedCatalogStore {
        Arc::clone(&self.store)
    }

    pub fn item_count(&self) -> Result<usize, CatalogError> {
        Ok(self.read_store()?.len())
    }

    /// Snapshot of the full merged catalog, in ingestion order.
    pub fn items(&self) -> Result<Vec<Item>, CatalogError> {
        Ok(self.read_store()?.snapshot())
    }

    // ========================================================================
    // Filtering
    // ========================================================================

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn set_filters(&mut self, filters: FilterState) {
        self.filters = filters;
    }

    pub fn clear_filters(&mut self) {
        self.filters.clear();
    }

    /// Current filters applied to the full catalog.
    pub fn filtered(&self) -> Result<Vec<Item>, CatalogError> {
        Ok(apply_filters(self.read_store()?.items(), &self.filters))
    }

    /// Current filters applied to the owned subset.
    pub fn filtered_owned(&self) -> Vec<Item> {
        apply_filters(self.overlay.owned(), &self.filters)
    }

    /// Current filters applied to the wishlist subset.
    pub fn filtered_wishlist(&self) -> Vec<Item> {
        apply_filters(self.overlay.wishlist(), &self.filters)
    }

    pub fn weapon_dictionary(&self) -> Result<Vec<DictionaryEntry>, CatalogError> {
        Ok(self.read_store()?.reference().weapon_dictionary())
    }

    pub fn collection_dictionary(&self) -> Result<Vec<DictionaryEntry>, CatalogError> {
        Ok(self.read_store()?.reference().collection_dictionary())
    }

    pub fn tier_dictionary(&self) -> Result<Vec<DictionaryEntry>, CatalogError> {
        Ok(self.read_store()?.reference().tier_dictionary())
    }

    // ========================================================================
    // User overlay
    // ========================================================================

    pub fn overlay(&self) -> &UserOverlay {
        &self.overlay
    }

    pub async fn add_owned(
        &mut self,
        uuid: &str,
        favorite_chroma: Option<&str>,
    ) -> Result<(), CatalogError> {
        let catalog = self.items()?;
        self.overlay
            .add_owned(
                self.overlay_store.as_ref(),
                &catalog,
                uuid,
                favorite_chroma,
                self.config.request_timeout,
            )
            .await
    }

    pub async fn remove_owned(&mut self, uuid: &str) -> Result<(), CatalogError> {
        self.overlay
            .remove_owned(self.overlay_store.as_ref(), uuid, self.config.request_timeout)
            .await
    }

    pub async fn add_wishlisted(
        &mut self,
        uuid: &str,
        favorite_chroma: Option<&str>,
    ) -> Result<(), CatalogError> {
        let catalog = self.items()?;
        self.overlay
            .add_wishlisted(
                self.overlay_store.as_ref(),
                &catalog,
                uuid,
                favorite_chroma,
                self.config.request_timeout,
            )
            .await
    }

    pub async fn remove_wishlisted(&mut self, uuid: &str) -> Result<(), CatalogError> {
        self.overlay
            .remove_wishlisted(self.overlay_store.as_ref(), uuid, self.config.request_timeout)
            .await
    }

    pub async fn set_favorite_chroma(
        &mut self,
        list: OverlayList,
        uuid: &str,
        chroma_uuid: &str,
    ) -> Result<(), CatalogError> {
        self.overlay
            .set_favorite_chroma(
                self.overlay_store.as_ref(),
                list,
                uuid,
                chroma_uuid,
                self.config.request_timeout,
            )
            .await
    }

    /// Refresh the owned membership from the remote collaborator. Read
    /// failures degrade to an empty set.
    pub async fn refresh_owned(&mut self) -> Result<(), CatalogError> {
        let (catalog, reference) = {
            let guard = self.read_store()?;
            (guard.snapshot(), guard.reference().clone())
        };
        self.overlay
            .refresh_owned(
                self.overlay_store.as_ref(),
                &catalog,
                &reference,
                self.config.request_timeout,
            )
            .await;
        Ok(())
    }

    /// Wishlist counterpart of [`refresh_owned`](Self::refresh_owned).
    pub async fn refresh_wishlist(&mut self) -> Result<(), CatalogError> {
        let (catalog, reference) = {
            let guard = self.read_store()?;
            (guard.snapshot(), guard.reference().clone())
        };
        self.overlay
            .refresh_wishlist(
                self.overlay_store.as_ref(),
                &catalog,
                &reference,
                self.config.request_timeout,
            )
            .await;
        Ok(())
    }

    fn read_store(&self) -> Result<std::sync::RwLockReadGuard<'_, CatalogStore>, CatalogError> {
        self.store.read().map_err(|_| CatalogError::StoreLock)
    }
}
