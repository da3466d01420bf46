//! Action Gateway
//!
//! The only writer of approval state. Every operation validates the actor
//! against the store's current snapshot before any remote call, and after the
//! call the cache entry is invalidated and re-fetched; fields are never
//! patched optimistically.
//!
//! There is no forced fetch before an action. A cached entry is trusted until
//! the realtime channel or a previous failure marks it stale; the server
//! still has the last word and answers an outdated action with a conflict.
//!
//! # Validation order
//!
//! 1. at most one in-flight mutation per transfer id
//! 2. role applicable to the request type
//! 3. aggregate status not terminal
//! 4. targeted field still `PENDING`

use dashmap::DashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::adapters::TransferApi;
use super::error::TransferError;
use super::state::{TransferStatus, classify};
use super::store::TransferStore;
use super::types::{Actor, Approval, Decision, TransferRequest};
use crate::core_types::TransferId;
use crate::error::FailureKind;

/// Releases the in-flight slot for a transfer id on drop
struct InFlightGuard<'a> {
    set: &'a DashSet<TransferId>,
    transfer_id: TransferId,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.set.remove(&self.transfer_id);
    }
}

pub struct ActionGateway {
    api: Arc<dyn TransferApi>,
    store: Arc<TransferStore>,
    in_flight: DashSet<TransferId>,
}

impl ActionGateway {
    pub fn new(api: Arc<dyn TransferApi>, store: Arc<TransferStore>) -> Self {
        Self {
            api,
            store,
            in_flight: DashSet::new(),
        }
    }

    pub fn store(&self) -> &Arc<TransferStore> {
        &self.store
    }

    /// Whether a mutation for this id is outstanding
    pub fn is_in_flight(&self, transfer_id: &str) -> bool {
        self.in_flight.contains(transfer_id)
    }

    pub async fn approve(&self, transfer_id: &str, actor: &Actor) -> Result<(), TransferError> {
        self.decide(transfer_id, actor, Decision::Approve).await
    }

    pub async fn reject(&self, transfer_id: &str, actor: &Actor) -> Result<(), TransferError> {
        self.decide(transfer_id, actor, Decision::Reject).await
    }

    /// Soft-delete a request that is still `Pending`
    pub async fn withdraw(&self, transfer_id: &str, actor: &Actor) -> Result<(), TransferError> {
        let _guard = self.acquire(transfer_id)?;
        let record = self.store.current(transfer_id).await?;
        check_withdraw(&record, actor)?;

        match self.api.soft_delete(transfer_id, actor).await {
            Ok(()) => {
                info!(transfer_id, actor = %actor.user_id, "Transfer withdrawn");
                self.store.forget(transfer_id);
                Ok(())
            }
            Err(e) => Err(self.handle_failure(transfer_id, e.into()).await),
        }
    }

    async fn decide(
        &self,
        transfer_id: &str,
        actor: &Actor,
        decision: Decision,
    ) -> Result<(), TransferError> {
        let _guard = self.acquire(transfer_id)?;
        let record = self.store.current(transfer_id).await?;
        check_decision(&record, actor)?;

        let request_type = record.request_type();
        debug!(
            transfer_id,
            role = %actor.role,
            decision = %decision,
            request_type = %request_type,
            "Submitting transfer decision"
        );

        match self
            .api
            .decide(request_type, transfer_id, decision, actor)
            .await
        {
            Ok(()) => {
                info!(
                    transfer_id,
                    role = %actor.role,
                    decision = %decision,
                    "Transfer decision accepted"
                );
                self.store.invalidate(transfer_id);
                if let Err(e) = self.store.refresh(transfer_id).await {
                    // Entry stays stale and is re-fetched on next display.
                    warn!(transfer_id, error = %e, "Re-fetch after decision failed");
                }
                Ok(())
            }
            Err(e) => Err(self.handle_failure(transfer_id, e.into()).await),
        }
    }

    fn acquire(&self, transfer_id: &str) -> Result<InFlightGuard<'_>, TransferError> {
        if !self.in_flight.insert(transfer_id.to_string()) {
            return Err(TransferError::ActionInFlight(transfer_id.to_string()));
        }
        Ok(InFlightGuard {
            set: &self.in_flight,
            transfer_id: transfer_id.to_string(),
        })
    }

    /// Conflicts force a re-fetch so the screen shows the actual state, and a
    /// 404 means another actor withdrew the request, so it leaves the cache.
    /// Other failures leave the cache entry as it was.
    async fn handle_failure(&self, transfer_id: &str, err: TransferError) -> TransferError {
        match err.kind() {
            FailureKind::Conflict => {
                warn!(transfer_id, error = %err, "Transfer state conflict, forcing re-fetch");
                self.store.invalidate(transfer_id);
                if let Err(e) = self.store.refresh(transfer_id).await {
                    warn!(transfer_id, error = %e, "Forced re-fetch failed");
                }
            }
            _ if matches!(err, TransferError::NotFound(_)) => {
                info!(transfer_id, "Transfer withdrawn remotely, dropping it");
                self.store.forget(transfer_id);
            }
            _ => {
                warn!(transfer_id, error = %err, kind = %err.kind(), "Transfer action failed");
            }
        }
        err
    }
}

/// Local legality of an approve/reject by `actor` on `record`
pub fn check_decision(record: &TransferRequest, actor: &Actor) -> Result<(), TransferError> {
    let current = record
        .approvals
        .field(actor.role)
        .ok_or(TransferError::RoleNotApplicable {
            role: actor.role,
            request_type: record.request_type(),
        })?;

    let status = classify(record);
    if status.is_terminal() {
        return Err(TransferError::TerminalState(status));
    }

    if current != Approval::Pending {
        return Err(TransferError::AlreadyResolved {
            role: actor.role,
            current,
        });
    }
    Ok(())
}

/// Local legality of a withdrawal by `actor` on `record`
pub fn check_withdraw(record: &TransferRequest, actor: &Actor) -> Result<(), TransferError> {
    let status = classify(record);
    if status != TransferStatus::Pending {
        return Err(TransferError::NotWithdrawable(status));
    }
    let expected = record.request_type().initiator();
    if actor.role != expected {
        return Err(TransferError::NotInitiator { expected });
    }
    Ok(())
}
