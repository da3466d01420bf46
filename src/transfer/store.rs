//! Per-screen transfer cache
//!
//! A read-through cache of remote snapshots. It never mutates approval fields
//! itself: entries are only replaced by fresh fetches, marked stale by
//! invalidation, or dropped. Concurrent fetches of the same id race and the
//! last arrival wins, since every fetch is "current truth".
//!
//! After [`TransferStore::close`] all late fetch results are discarded.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, warn};

use super::adapters::TransferApi;
use super::error::TransferError;
use super::state::{TransferStatus, classify};
use super::types::{ListScope, TransferRequest};
use crate::api::ApiError;
use crate::core_types::{ChampionshipId, TransferId};

#[derive(Debug, Clone)]
struct CacheEntry {
    record: TransferRequest,
    stale: bool,
    fetched_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
struct Listing {
    scope: ListScope,
    ids: Vec<TransferId>,
    stale: bool,
}

pub struct TransferStore {
    api: Arc<dyn TransferApi>,
    entries: DashMap<TransferId, CacheEntry>,
    listings: DashMap<ChampionshipId, Listing>,
    closed: AtomicBool,
}

impl TransferStore {
    pub fn new(api: Arc<dyn TransferApi>) -> Self {
        Self {
            api,
            entries: DashMap::new(),
            listings: DashMap::new(),
            closed: AtomicBool::new(false),
        }
    }

    /// Fresh snapshot, if one is cached. Stale entries are not returned.
    pub fn get(&self, transfer_id: &str) -> Option<TransferRequest> {
        self.entries
            .get(transfer_id)
            .filter(|e| !e.stale)
            .map(|e| e.record.clone())
    }

    /// Classified status of a fresh snapshot
    pub fn status(&self, transfer_id: &str) -> Option<TransferStatus> {
        self.get(transfer_id).map(|r| classify(&r))
    }

    pub fn is_stale(&self, transfer_id: &str) -> bool {
        self.entries
            .get(transfer_id)
            .map(|e| e.stale)
            .unwrap_or(false)
    }

    pub fn fetched_at(&self, transfer_id: &str) -> Option<DateTime<Utc>> {
        self.entries.get(transfer_id).map(|e| e.fetched_at)
    }

    /// Fresh cached snapshot, fetching it first when missing or stale
    pub async fn current(&self, transfer_id: &str) -> Result<TransferRequest, TransferError> {
        match self.get(transfer_id) {
            Some(record) => Ok(record),
            None => self.refresh(transfer_id).await,
        }
    }

    /// Fetch one request and replace the cache entry.
    ///
    /// On failure the previous entry is left untouched. A `NotFound` answer
    /// means the request was withdrawn, so it is dropped from the cache.
    pub async fn refresh(&self, transfer_id: &str) -> Result<TransferRequest, TransferError> {
        self.ensure_open()?;
        let result = self.api.fetch(transfer_id).await;
        self.ensure_open()?;

        match result {
            Ok(record) => {
                self.insert(record.clone());
                Ok(record)
            }
            Err(ApiError::NotFound(msg)) => {
                debug!(transfer_id, "Transfer gone remotely, dropping cache entry");
                self.forget(transfer_id);
                Err(TransferError::NotFound(msg))
            }
            Err(e) => {
                warn!(transfer_id, error = %e, "Transfer refresh failed");
                Err(e.into())
            }
        }
    }

    /// Fetch a championship listing and remember its scope for later refreshes
    pub async fn refresh_championship(
        &self,
        championship_id: &str,
        scope: ListScope,
    ) -> Result<Vec<TransferRequest>, TransferError> {
        self.ensure_open()?;
        let result = self.api.list(championship_id, &scope).await;
        self.ensure_open()?;

        let records = result.map_err(|e| {
            warn!(championship_id, error = %e, "Transfer listing refresh failed");
            TransferError::from(e)
        })?;

        let ids = records.iter().map(|r| r.id.clone()).collect();
        for record in &records {
            self.insert(record.clone());
        }
        self.listings.insert(
            championship_id.to_string(),
            Listing {
                scope,
                ids,
                stale: false,
            },
        );
        debug!(championship_id, count = records.len(), "Transfer listing cached");
        Ok(records)
    }

    /// Re-fetch a listing with the scope it was last loaded with
    pub async fn refresh_known_championship(
        &self,
        championship_id: &str,
    ) -> Result<Vec<TransferRequest>, TransferError> {
        let scope = self
            .listings
            .get(championship_id)
            .map(|l| l.scope.clone())
            .unwrap_or(ListScope::All);
        self.refresh_championship(championship_id, scope).await
    }

    /// Fresh records of a cached listing, in listing order
    pub fn listing(&self, championship_id: &str) -> Vec<TransferRequest> {
        let ids = match self.listings.get(championship_id) {
            Some(l) if !l.stale => l.ids.clone(),
            _ => return vec![],
        };
        ids.iter().filter_map(|id| self.get(id)).collect()
    }

    /// Cached listing records whose classified status is `status`
    pub fn filter(&self, championship_id: &str, status: TransferStatus) -> Vec<TransferRequest> {
        self.listing(championship_id)
            .into_iter()
            .filter(|r| classify(r) == status)
            .collect()
    }

    pub fn has_listing(&self, championship_id: &str) -> bool {
        self.listings.contains_key(championship_id)
    }

    /// Whether the id is cached, fresh or stale
    pub fn contains(&self, transfer_id: &str) -> bool {
        self.entries.contains_key(transfer_id)
    }

    /// Mark one entry stale; it must be re-fetched before display
    pub fn invalidate(&self, transfer_id: &str) {
        if let Some(mut entry) = self.entries.get_mut(transfer_id) {
            entry.stale = true;
        }
    }

    /// Mark a listing and every request in that championship stale
    pub fn invalidate_championship(&self, championship_id: &str) {
        if let Some(mut listing) = self.listings.get_mut(championship_id) {
            listing.stale = true;
        }
        for mut entry in self.entries.iter_mut() {
            if entry.record.championship_id == championship_id {
                entry.stale = true;
            }
        }
    }

    /// Drop an id from the cache and from every listing
    pub fn forget(&self, transfer_id: &str) {
        self.entries.remove(transfer_id);
        for mut listing in self.listings.iter_mut() {
            listing.ids.retain(|id| id != transfer_id);
        }
    }

    /// Screen teardown: results arriving after this are discarded
    pub fn close(&self) {
        if !self.closed.swap(true, Ordering::SeqCst) {
            info!(entries = self.entries.len(), "Transfer store closed");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn ensure_open(&self) -> Result<(), TransferError> {
        if self.is_closed() {
            Err(TransferError::SessionClosed)
        } else {
            Ok(())
        }
    }

    fn insert(&self, record: TransferRequest) {
        self.entries.insert(
            record.id.clone(),
            CacheEntry {
                record,
                stale: false,
                fetched_at: Utc::now(),
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transfer::adapters::MockTransferApi;
    use crate::transfer::state::fixtures::*;
    use crate::transfer::types::{Approval, DebtStatus};

    fn store_with(records: Vec<TransferRequest>) -> (Arc<MockTransferApi>, TransferStore) {
        let api = Arc::new(MockTransferApi::with_records(records));
        let store = TransferStore::new(api.clone());
        (api, store)
    }

    fn pending(id: &str) -> TransferRequest {
        player_initiated(id, Approval::Approved, Approval::Pending, DebtStatus::Pending)
    }

    #[tokio::test]
    async fn test_refresh_populates_and_classifies() {
        let (api, store) = store_with(vec![pending("t-1")]);
        assert!(store.get("t-1").is_none());

        store.refresh("t-1").await.unwrap();
        assert_eq!(store.status("t-1"), Some(TransferStatus::Pending));
        assert!(store.fetched_at("t-1").is_some());
        assert_eq!(api.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_current_uses_cache_until_invalidated() {
        let (api, store) = store_with(vec![pending("t-1")]);
        store.current("t-1").await.unwrap();
        store.current("t-1").await.unwrap();
        assert_eq!(api.fetch_count(), 1);

        store.invalidate("t-1");
        assert!(store.is_stale("t-1"));
        assert!(store.get("t-1").is_none());
        store.current("t-1").await.unwrap();
        assert_eq!(api.fetch_count(), 2);
        assert!(!store.is_stale("t-1"));
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_previous_entry() {
        let (api, store) = store_with(vec![pending("t-1")]);
        store.refresh("t-1").await.unwrap();
        let before = store.get("t-1").unwrap();

        api.set_fail_fetch(Some(ApiError::Transport("timeout".into())));
        let err = store.refresh("t-1").await.unwrap_err();
        assert!(err.is_retryable());
        assert_eq!(store.get("t-1"), Some(before));
    }

    #[tokio::test]
    async fn test_not_found_drops_entry() {
        let (api, store) = store_with(vec![pending("t-1")]);
        store.refresh_championship("champ-1", ListScope::All).await.unwrap();
        assert_eq!(store.listing("champ-1").len(), 1);

        api.set_fail_fetch(Some(ApiError::NotFound("t-1".into())));
        let err = store.refresh("t-1").await.unwrap_err();
        assert!(matches!(err, TransferError::NotFound(_)));
        assert!(!store.contains("t-1"));
        assert!(store.listing("champ-1").is_empty());
    }

    #[tokio::test]
    async fn test_listing_and_filter() {
        let (api, store) = store_with(vec![
            pending("t-1"),
            player_initiated("t-2", Approval::Approved, Approval::Rejected, DebtStatus::Pending),
            player_initiated("t-3", Approval::Approved, Approval::Approved, DebtStatus::Pending),
        ]);
        let listed = store.refresh_championship("champ-1", ListScope::All).await.unwrap();
        assert_eq!(listed.len(), 3);
        assert_eq!(api.list_count(), 1);

        let ids = |v: Vec<TransferRequest>| v.into_iter().map(|r| r.id).collect::<Vec<_>>();
        assert_eq!(ids(store.filter("champ-1", TransferStatus::Pending)), vec!["t-1"]);
        assert_eq!(ids(store.filter("champ-1", TransferStatus::Rejected)), vec!["t-2"]);
        assert_eq!(ids(store.filter("champ-1", TransferStatus::InProgress)), vec!["t-3"]);
        assert!(store.filter("champ-1", TransferStatus::Completed).is_empty());
    }

    #[tokio::test]
    async fn test_invalidate_championship_marks_everything_stale() {
        let (_api, store) = store_with(vec![pending("t-1"), pending("t-2")]);
        store.refresh_championship("champ-1", ListScope::All).await.unwrap();

        store.invalidate_championship("champ-1");
        assert!(store.listing("champ-1").is_empty());
        assert!(store.is_stale("t-1"));
        assert!(store.is_stale("t-2"));

        store.refresh_known_championship("champ-1").await.unwrap();
        assert_eq!(store.listing("champ-1").len(), 2);
    }

    #[tokio::test]
    async fn test_last_arrival_wins() {
        let (api, store) = store_with(vec![pending("t-1")]);
        store.refresh("t-1").await.unwrap();

        api.put_record(player_initiated(
            "t-1",
            Approval::Approved,
            Approval::Rejected,
            DebtStatus::Pending,
        ));
        store.refresh("t-1").await.unwrap();
        assert_eq!(store.status("t-1"), Some(TransferStatus::Rejected));
    }

    #[tokio::test]
    async fn test_closed_store_discards_results() {
        let (api, store) = store_with(vec![pending("t-1")]);
        store.close();
        store.close();
        assert!(store.is_closed());

        let err = store.refresh("t-1").await.unwrap_err();
        assert_eq!(err, TransferError::SessionClosed);
        assert_eq!(api.fetch_count(), 0);
        assert!(store.get("t-1").is_none());
    }
}
