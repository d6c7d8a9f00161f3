//! ============================================================================
//! User Overlay - Owned & Wishlist Membership State
//! ============================================================================
//! Two disjoint membership sets over catalog item uuids, each with an
//! optional favorite-chroma selection, synchronized against the external
//! persistence collaborator.
//!
//! Every mutation goes remote-first: the local mirror only changes after the
//! remote call succeeded, so a failed write leaves local state untouched.
//! Owning an item implies it should no longer be wished for: adding to the
//! owned set removes the item from the wishlist (promotion).
//! ============================================================================

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use tracing::{debug, warn};

use crate::client::{with_timeout, OverlayList, OverlayStore};
use crate::index::ReferenceIndex;
use crate::normalize::backfill_weapon;
use crate::types::{CatalogError, Item};

/// Local mirror of the user's remote membership state.
#[derive(Debug, Default)]
pub struct UserOverlay {
    owned: Vec<Item>,
    wishlist: Vec<Item>,
    /// item uuid -> favorite chroma uuid, per list.
    owned_favorites: HashMap<String, String>,
    wishlist_favorites: HashMap<String, String>,
}

impl UserOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn owned(&self) -> &[Item] {
        &self.owned
    }

    pub fn wishlist(&self) -> &[Item] {
        &self.wishlist
    }

    pub fn owned_count(&self) -> usize {
        self.owned.len()
    }

    pub fn wishlist_count(&self) -> usize {
        self.wishlist.len()
    }

    pub fn is_owned(&self, uuid: &str) -> bool {
        self.owned.iter().any(|item| item.uuid == uuid)
    }

    pub fn is_wishlisted(&self, uuid: &str) -> bool {
        self.wishlist.iter().any(|item| item.uuid == uuid)
    }

    pub fn favorite_chroma(&self, list: OverlayList, uuid: &str) -> Option<&str> {
        match list {
            OverlayList::Owned => self.owned_favorites.get(uuid).map(String::as_str),
            OverlayList::Wishlist => self.wishlist_favorites.get(uuid).map(String::as_str),
        }
    }

    /// Add an item to the owned set. Persists remotely first; on success
    /// mirrors locally and, if the item sits in the wishlist, promotes it by
    /// removing the wishlist membership as well.
    pub async fn add_owned(
        &mut self,
        remote: &dyn OverlayStore,
        catalog: &[Item],
        uuid: &str,
        favorite_chroma: Option<&str>,
        timeout: Duration,
    ) -> Result<(), CatalogError> {
        with_timeout(timeout, remote.add(OverlayList::Owned, uuid, favorite_chroma))
            .await
            .map_err(|e| CatalogError::overlay_write("add_owned", e))?;

        if !self.is_owned(uuid) {
            if let Some(item) = catalog.iter().find(|item| item.uuid == uuid) {
                self.owned.push(item.clone());
            }
        }
        if let Some(chroma) = favorite_chroma {
            self.owned_favorites
                .insert(uuid.to_string(), chroma.to_string());
        }

        if self.is_wishlisted(uuid) {
            debug!("Promoting {} from wishlist to owned", uuid);
            self.remove_wishlisted(remote, uuid, timeout).await?;
        }
        Ok(())
    }

    /// Remove an item from the owned set (remote first, then mirror).
    pub async fn remove_owned(
        &mut self,
        remote: &dyn OverlayStore,
        uuid: &str,
        timeout: Duration,
    ) -> Result<(), CatalogError> {
        with_timeout(timeout, remote.remove(OverlayList::Owned, uuid))
            .await
            .map_err(|e| CatalogError::overlay_write("remove_owned", e))?;

        self.owned.retain(|item| item.uuid != uuid);
        self.owned_favorites.remove(uuid);
        Ok(())
    }

    /// Add an item to the wishlist (no promotion side effect).
    pub async fn add_wishlisted(
        &mut self,
        remote: &dyn OverlayStore,
        catalog: &[Item],
        uuid: &str,
        favorite_chroma: Option<&str>,
        timeout: Duration,
    ) -> Result<(), CatalogError> {
        with_timeout(
            timeout,
            remote.add(OverlayList::Wishlist, uuid, favorite_chroma),
        )
        .await
        .map_err(|e| CatalogError::overlay_write("add_wishlisted", e))?;

        if !self.is_wishlisted(uuid) {
            if let Some(item) = catalog.iter().find(|item| item.uuid == uuid) {
                self.wishlist.push(item.clone());
            }
        }
        if let Some(chroma) = favorite_chroma {
            self.wishlist_favorites
                .insert(uuid.to_string(), chroma.to_string());
        }
        Ok(())
    }

    /// Remove an item from the wishlist (remote first, then mirror).
    pub async fn remove_wishlisted(
        &mut self,
        remote: &dyn OverlayStore,
        uuid: &str,
        timeout: Duration,
    ) -> Result<(), CatalogError> {
        with_timeout(timeout, remote.remove(OverlayList::Wishlist, uuid))
            .await
            .map_err(|e| CatalogError::overlay_write("remove_wishlisted", e))?;

        self.wishlist.retain(|item| item.uuid != uuid);
        self.wishlist_favorites.remove(uuid);
        Ok(())
    }

    /// Patch the favorite chroma for a membership entry. Membership is not
    /// validated locally; a rejection from the collaborator surfaces as the
    /// error and leaves the local mirror untouched.
    pub async fn set_favorite_chroma(
        &mut self,
        remote: &dyn OverlayStore,
        list: OverlayList,
        uuid: &str,
        chroma_uuid: &str,
        timeout: Duration,
    ) -> Result<(), CatalogError> {
        with_timeout(timeout, remote.set_favorite_chroma(list, uuid, chroma_uuid))
            .await
            .map_err(|e| CatalogError::overlay_write("set_favorite_chroma", e))?;

        let favorites = match list {
            OverlayList::Owned => &mut self.owned_favorites,
            OverlayList::Wishlist => &mut self.wishlist_favorites,
        };
        favorites.insert(uuid.to_string(), chroma_uuid.to_string());
        Ok(())
    }

    /// Re-fetch the remote owned membership and rebuild the local set against
    /// the current catalog snapshot. Read failure degrades to an empty set.
    pub async fn refresh_owned(
        &mut self,
        remote: &dyn OverlayStore,
        catalog: &[Item],
        reference: &ReferenceIndex,
        timeout: Duration,
    ) {
        let (items, favorites) =
            Self::refresh_list(remote, OverlayList::Owned, catalog, reference, timeout).await;
        self.owned = items;
        self.owned_favorites = favorites;
    }

    /// Wishlist counterpart of [`refresh_owned`](Self::refresh_owned).
    pub async fn refresh_wishlist(
        &mut self,
        remote: &dyn OverlayStore,
        catalog: &[Item],
        reference: &ReferenceIndex,
        timeout: Duration,
    ) {
        let (items, favorites) =
            Self::refresh_list(remote, OverlayList::Wishlist, catalog, reference, timeout).await;
        self.wishlist = items;
        self.wishlist_favorites = favorites;
    }

    /// Materialize one remote membership list against the catalog snapshot.
    /// Uuids the current snapshot does not contain are silently dropped; they
    /// reappear once a catalog run including them completes.
    async fn refresh_list(
        remote: &dyn OverlayStore,
        list: OverlayList,
        catalog: &[Item],
        reference: &ReferenceIndex,
        timeout: Duration,
    ) -> (Vec<Item>, HashMap<String, String>) {
        let records = match with_timeout(timeout, remote.list(list)).await {
            Ok(records) => records,
            Err(e) => {
                let e = CatalogError::overlay_read(e);
                warn!("Membership refresh failed, treating {:?} as empty: {}", list, e);
                return (Vec::new(), HashMap::new());
            }
        };

        let member_uuids: HashSet<&str> =
            records.iter().map(|r| r.skin_uuid.as_str()).collect();

        let mut items: Vec<Item> = catalog
            .iter()
            .filter(|item| member_uuids.contains(item.uuid.as_str()))
            .cloned()
            .collect();
        for item in &mut items {
            backfill_weapon(item, reference);
        }

        let favorites = records
            .iter()
            .filter_map(|r| {
                r.favorite_chroma()
                    .map(|chroma| (r.skin_uuid.clone(), chroma.to_string()))
            })
            .collect();

        debug!(
            "Refreshed {:?}: {} remote entries, {} materialized",
            list,
            records.len(),
            items.len()
        );
        (items, favorites)
    }
}
