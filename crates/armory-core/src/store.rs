//! ============================================================================
//! Catalog Store - Authoritative In-Memory Catalog State
//! ============================================================================
//! Holds the merged, normalized item collection plus the reference index.
//! Shared as `Arc<RwLock<CatalogStore>>`; all mutation goes through the lock
//! so the contiguous-id and progressive-prefix invariants hold even with
//! concurrent readers.
//!
//! Lifecycle: created at process start, cleared at the start of each
//! ingestion run (`begin_run`), appended to after every fetched page.
//! ============================================================================

use std::sync::{Arc, RwLock};

use crate::index::ReferenceIndex;
use crate::types::Item;

/// Shared handle to the catalog store.
pub type SharedCatalogStore = Arc<RwLock<CatalogStore>>;

#[derive(Debug, Default)]
pub struct CatalogStore {
    items: Vec<Item>,
    reference: ReferenceIndex,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedCatalogStore {
        Arc::new(RwLock::new(Self::new()))
    }

    /// Clear stale items before a new ingestion run progressively repopulates
    /// the store. The reference index is kept; it is replaced separately.
    pub fn begin_run(&mut self) {
        self.items.clear();
    }

    /// Append one normalized page batch in ingestion order.
    pub fn append(&mut self, batch: Vec<Item>) {
        self.items.extend(batch);
    }

    /// Install a freshly built reference index.
    pub fn set_reference(&mut self, reference: ReferenceIndex) {
        self.reference = reference;
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn reference(&self) -> &ReferenceIndex {
        &self.reference
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Snapshot of the current items, in append order.
    pub fn snapshot(&self) -> Vec<Item> {
        self.items.clone()
    }

    pub fn find_by_uuid(&self, uuid: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.uuid == uuid)
    }
}
