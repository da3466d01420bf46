//! Realtime invalidations for the match cache

use async_trait::async_trait;
use tracing::{debug, warn};

use super::store::MatchStore;
use crate::realtime::{EventKind, Invalidation, InvalidationHandler};

#[async_trait]
impl InvalidationHandler for MatchStore {
    async fn on_invalidate(&self, inv: &Invalidation) {
        let stale = match inv.kind {
            EventKind::MatchResultUpdated => {
                let ids: Vec<String> = inv
                    .targets()
                    .into_iter()
                    .filter(|id| self.contains(id))
                    .collect();
                for id in &ids {
                    self.invalidate(id);
                }
                ids
            }
            EventKind::ChampionshipStatusChanged => inv
                .targets()
                .iter()
                .flat_map(|championship_id| self.invalidate_championship(championship_id))
                .collect(),
            EventKind::TransferUpdated => {
                debug!(scope = %inv.scope, "Transfer event ignored by match store");
                return;
            }
        };

        for match_id in stale {
            if let Err(e) = self.refresh(&match_id).await {
                warn!(match_id, error = %e, "Match refresh after invalidation failed");
            }
        }
    }
}
