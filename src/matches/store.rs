//! Per-screen match cache
//!
//! Same contract as the transfer cache: snapshots are replaced by fetches,
//! marked stale by invalidation, and discarded after close. The one local
//! write is [`MatchStore::apply_schedule`], used after a reschedule was
//! confirmed by the remote scheduler.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, warn};

use super::adapters::MatchApi;
use super::error::MatchError;
use super::types::{MatchRecord, MatchSchedule};
use crate::api::ApiError;
use crate::core_types::MatchId;

#[derive(Debug, Clone)]
struct CacheEntry {
    record: MatchRecord,
    stale: bool,
    fetched_at: DateTime<Utc>,
}

pub struct MatchStore {
    api: Arc<dyn MatchApi>,
    entries: DashMap<MatchId, CacheEntry>,
    closed: AtomicBool,
}

impl MatchStore {
    pub fn new(api: Arc<dyn MatchApi>) -> Self {
        Self {
            api,
            entries: DashMap::new(),
            closed: AtomicBool::new(false),
        }
    }

    pub fn get(&self, match_id: &str) -> Option<MatchRecord> {
        self.entries
            .get(match_id)
            .filter(|e| !e.stale)
            .map(|e| e.record.clone())
    }

    pub fn is_stale(&self, match_id: &str) -> bool {
        self.entries
            .get(match_id)
            .map(|e| e.stale)
            .unwrap_or(false)
    }

    pub fn contains(&self, match_id: &str) -> bool {
        self.entries.contains_key(match_id)
    }

    pub fn fetched_at(&self, match_id: &str) -> Option<DateTime<Utc>> {
        self.entries.get(match_id).map(|e| e.fetched_at)
    }

    pub async fn current(&self, match_id: &str) -> Result<MatchRecord, MatchError> {
        match self.get(match_id) {
            Some(record) => Ok(record),
            None => self.refresh(match_id).await,
        }
    }

    pub async fn refresh(&self, match_id: &str) -> Result<MatchRecord, MatchError> {
        self.ensure_open()?;
        let result = self.api.fetch(match_id).await;
        self.ensure_open()?;

        match result {
            Ok(record) => {
                self.entries.insert(
                    record.id.clone(),
                    CacheEntry {
                        record: record.clone(),
                        stale: false,
                        fetched_at: Utc::now(),
                    },
                );
                Ok(record)
            }
            Err(ApiError::NotFound(msg)) => {
                debug!(match_id, "Match gone remotely, dropping cache entry");
                self.entries.remove(match_id);
                Err(MatchError::NotFound(msg))
            }
            Err(e) => {
                warn!(match_id, error = %e, "Match refresh failed");
                Err(e.into())
            }
        }
    }

    /// Write a schedule the remote scheduler has committed.
    ///
    /// Returns `false` when the match is not cached; the caller should then
    /// fetch it instead.
    pub fn apply_schedule(&self, match_id: &str, schedule: MatchSchedule) -> bool {
        if self.is_closed() {
            return false;
        }
        match self.entries.get_mut(match_id) {
            Some(mut entry) => {
                entry.record.schedule = schedule;
                true
            }
            None => false,
        }
    }

    pub fn invalidate(&self, match_id: &str) {
        if let Some(mut entry) = self.entries.get_mut(match_id) {
            entry.stale = true;
        }
    }

    /// Mark every cached match of a championship stale; returns their ids
    pub fn invalidate_championship(&self, championship_id: &str) -> Vec<MatchId> {
        let mut ids = vec![];
        for mut entry in self.entries.iter_mut() {
            if entry.record.championship_id == championship_id {
                entry.stale = true;
                ids.push(entry.key().clone());
            }
        }
        ids
    }

    pub fn close(&self) {
        if !self.closed.swap(true, Ordering::SeqCst) {
            info!(entries = self.entries.len(), "Match store closed");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn ensure_open(&self) -> Result<(), MatchError> {
        if self.is_closed() {
            Err(MatchError::SessionClosed)
        } else {
            Ok(())
        }
    }
}
