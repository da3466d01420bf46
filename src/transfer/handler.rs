//! Realtime invalidations for the transfer cache

use async_trait::async_trait;
use tracing::{debug, warn};

use super::store::TransferStore;
use crate::realtime::{ChannelScope, EventKind, Invalidation, InvalidationHandler};

#[async_trait]
impl InvalidationHandler for TransferStore {
    async fn on_invalidate(&self, inv: &Invalidation) {
        match inv.kind {
            EventKind::ChampionshipStatusChanged => {
                for championship_id in inv.targets() {
                    self.invalidate_championship(&championship_id);
                    if self.has_listing(&championship_id) {
                        if let Err(e) = self.refresh_known_championship(&championship_id).await {
                            warn!(championship_id, error = %e, "Listing refresh after status change failed");
                        }
                    }
                }
            }
            EventKind::TransferUpdated => {
                let mut unknown = inv.ids.is_empty();
                for transfer_id in &inv.ids {
                    if !self.contains(transfer_id) {
                        unknown = true;
                        continue;
                    }
                    self.invalidate(transfer_id);
                    if let Err(e) = self.refresh(transfer_id).await {
                        warn!(transfer_id, error = %e, "Transfer refresh after update failed");
                    }
                }
                // new or unnamed requests can only show up through the listing
                if let ChannelScope::Championship(championship_id) = &inv.scope {
                    if unknown && self.has_listing(championship_id) {
                        self.invalidate_championship(championship_id);
                        if let Err(e) = self.refresh_known_championship(championship_id).await {
                            warn!(championship_id, error = %e, "Listing refresh after update failed");
                        }
                    }
                }
            }
            EventKind::MatchResultUpdated => {
                debug!(scope = %inv.scope, "Match event ignored by transfer store");
            }
        }
    }
}
