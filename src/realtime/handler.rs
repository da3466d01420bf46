use async_trait::async_trait;

use super::messages::Invalidation;

/// A cache that reacts to realtime invalidations.
///
/// Implementations mark the named entries stale and re-fetch the ones the
/// screen shows. They never apply message payloads as state.
#[async_trait]
pub trait InvalidationHandler: Send + Sync {
    async fn on_invalidate(&self, inv: &Invalidation);
}
