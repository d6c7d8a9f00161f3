//! ============================================================================
//! Catalog Ingestion Pipeline
//! ============================================================================
//! Fetches the primary catalog page by page, normalizes each batch inline,
//! and appends it to the catalog store after every page (progressive
//! disclosure: a reader polling the store mid-run sees a strict prefix of
//! the final result, never a gap or a duplicate).
//!
//! Pages run strictly sequentially: synthetic-id assignment and the prefix
//! invariant depend on in-order completion. A page-fetch failure aborts the
//! run; the committed prefix stays in the store.
//! ============================================================================

use std::time::Duration;

use tracing::{debug, info};

use crate::client::{with_timeout, CatalogSource};
use crate::normalize::normalize;
use crate::store::SharedCatalogStore;
use crate::types::CatalogError;

/// Summary of one completed ingestion run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestStats {
    pub pages: u32,
    pub items: u64,
}

/// Run a full ingestion: clear the store, then fetch, normalize, and append
/// every page. Synthetic ids form the contiguous range `[0, items)` in
/// append order when the run completes.
pub async fn run_ingestion(
    source: &dyn CatalogSource,
    store: &SharedCatalogStore,
    page_size: u32,
    timeout: Duration,
) -> Result<IngestStats, CatalogError> {
    // Snapshot the reference index once: it is read-only for the whole run,
    // and later reference arrivals must not re-normalize earlier pages.
    let reference = {
        let guard = store.read().map_err(|_| CatalogError::StoreLock)?;
        guard.reference().clone()
    };

    {
        let mut guard = store.write().map_err(|_| CatalogError::StoreLock)?;
        guard.begin_run();
    }

    let mut page = 1u32;
    let mut next_id = 0u64;
    let mut pages_fetched = 0u32;

    loop {
        let fetched = with_timeout(timeout, source.fetch_page(page, page_size))
            .await
            .map_err(|e| CatalogError::page_fetch(page, e))?;

        // Defensive termination: inconsistent metadata must not loop forever.
        if fetched.data.is_empty() {
            debug!("Catalog page {} returned no records, ending run", page);
            break;
        }

        let batch: Vec<_> = fetched
            .data
            .iter()
            .map(|raw| {
                let item = normalize(raw, next_id, &reference);
                next_id += 1;
                item
            })
            .collect();

        {
            let mut guard = store.write().map_err(|_| CatalogError::StoreLock)?;
            guard.append(batch);
        }
        pages_fetched += 1;
        debug!(
            "Committed catalog page {}/{} ({} items so far)",
            fetched.meta.page, fetched.meta.total_pages, next_id
        );

        if fetched.meta.page >= fetched.meta.total_pages {
            break;
        }
        page += 1;
    }

    info!(
        "Catalog ingestion complete: {} items across {} pages",
        next_id, pages_fetched
    );
    Ok(IngestStats {
        pages: pages_fetched,
        items: next_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{CatalogPage, PageMeta, RawItem};
    use crate::index::ReferenceIndex;
    use crate::store::CatalogStore;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// In-memory catalog source: a scripted sequence of page results.
    struct FakeCatalogSource {
        pages: Mutex<Vec<Result<CatalogPage, CatalogError>>>,
    }

    impl FakeCatalogSource {
        fn new(pages: Vec<Result<CatalogPage, CatalogError>>) -> Self {
            Self {
                pages: Mutex::new(pages),
            }
        }
    }

    #[async_trait]
    impl CatalogSource for FakeCatalogSource {
        async fn fetch_page(&self, _page: u32, _per_page: u32) -> Result<CatalogPage, CatalogError> {
            self.pages.lock().unwrap().remove(0)
        }
    }

    fn raw(uuid: &str) -> RawItem {
        RawItem {
            uuid: uuid.to_string(),
            name: Some(format!("Skin {}", uuid)),
            ..RawItem::default()
        }
    }

    fn page(records: &[&str], page: u32, total_pages: u32) -> CatalogPage {
        CatalogPage {
            data: records.iter().map(|u| raw(u)).collect(),
            meta: PageMeta {
                total: 0,
                page,
                per_page: 2,
                total_pages,
            },
        }
    }

    fn transport_error() -> CatalogError {
        CatalogError::UpstreamStatus {
            status: 500,
            body: "boom".to_string(),
        }
    }

    #[tokio::test]
    async fn short_final_page_yields_contiguous_ids() {
        // perPage=2, totalPages=2, server returns 1 record on the last page.
        let source = FakeCatalogSource::new(vec![
            Ok(page(&["a", "b"], 1, 2)),
            Ok(page(&["c"], 2, 2)),
        ]);
        let store = CatalogStore::shared();

        let stats = run_ingestion(&source, &store, 2, Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(stats, IngestStats { pages: 2, items: 3 });

        let guard = store.read().unwrap();
        let ids: Vec<u64> = guard.items().iter().map(|i| i.id).collect();
        let uuids: Vec<&str> = guard.items().iter().map(|i| i.uuid.as_str()).collect();
        assert_eq!(ids, vec![0, 1, 2]);
        assert_eq!(uuids, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn zero_record_page_terminates_defensively() {
        // Metadata claims more pages, but the server has run dry.
        let source = FakeCatalogSource::new(vec![
            Ok(page(&["a", "b"], 1, 5)),
            Ok(page(&[], 2, 5)),
        ]);
        let store = CatalogStore::shared();

        let stats = run_ingestion(&source, &store, 2, Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(stats.items, 2);
        assert_eq!(store.read().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn page_failure_aborts_run_but_keeps_committed_prefix() {
        let source = FakeCatalogSource::new(vec![
            Ok(page(&["a", "b"], 1, 3)),
            Err(transport_error()),
        ]);
        let store = CatalogStore::shared();

        let err = run_ingestion(&source, &store, 2, Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::PageFetch { page: 2, .. }));

        // The prefix from page 1 is retained, ids still contiguous.
        let guard = store.read().unwrap();
        let ids: Vec<u64> = guard.items().iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![0, 1]);
    }

    #[tokio::test]
    async fn new_run_replaces_previous_snapshot() {
        let store = CatalogStore::shared();

        let first = FakeCatalogSource::new(vec![Ok(page(&["a", "b"], 1, 1))]);
        run_ingestion(&first, &store, 2, Duration::from_secs(5))
            .await
            .unwrap();

        let second = FakeCatalogSource::new(vec![Ok(page(&["c"], 1, 1))]);
        run_ingestion(&second, &store, 2, Duration::from_secs(5))
            .await
            .unwrap();

        let guard = store.read().unwrap();
        assert_eq!(guard.len(), 1);
        assert_eq!(guard.items()[0].uuid, "c");
        assert_eq!(guard.items()[0].id, 0);
    }

    #[tokio::test]
    async fn progressive_prefix_property_holds_across_pages() {
        // Drive two runs that share a prefix and compare snapshots: the
        // store after page k must be a prefix of the store after page k+1.
        let store = CatalogStore::shared();
        let one_page = FakeCatalogSource::new(vec![Ok(page(&["a", "b"], 1, 1))]);
        run_ingestion(&one_page, &store, 2, Duration::from_secs(5))
            .await
            .unwrap();
        let after_one = store.read().unwrap().snapshot();

        let two_pages = FakeCatalogSource::new(vec![
            Ok(page(&["a", "b"], 1, 2)),
            Ok(page(&["c"], 2, 2)),
        ]);
        run_ingestion(&two_pages, &store, 2, Duration::from_secs(5))
            .await
            .unwrap();
        let after_two = store.read().unwrap().snapshot();

        assert_eq!(&after_two[..after_one.len()], &after_one[..]);
    }

    #[tokio::test]
    async fn normalization_uses_reference_index_inline() {
        let store = CatalogStore::shared();
        {
            let mut reference = ReferenceIndex::default();
            reference
                .weapon_by_item
                .insert("s1".to_string(), "w1".to_string());
            store.write().unwrap().set_reference(reference);
        }

        let source = FakeCatalogSource::new(vec![Ok(page(&["s1"], 1, 1))]);
        run_ingestion(&source, &store, 2, Duration::from_secs(5))
            .await
            .unwrap();

        let guard = store.read().unwrap();
        assert_eq!(guard.items()[0].weapon_id, "w1");
    }
}
