//! Screen session
//!
//! Everything one open screen owns: fresh transfer and match caches, the
//! action gateway and reprogram negotiator writing through them, and the
//! realtime channel for the screen's scope. Nothing here is shared between
//! screens.
//!
//! Closing the session closes both caches first, so fetches still in flight
//! are discarded, then closes the channel with a normal close code.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::api::{ApiClient, ApiError};
use crate::config::{AppConfig, RealtimeConfig, ReprogramConfig};
use crate::matches::{HttpMatchApi, MatchApi, MatchStore};
use crate::realtime::{
    ChannelHandle, ChannelScope, Connector, InvalidationHandler, RealtimeChannel, RealtimeEvent,
    ReconnectPolicy, WsConnector,
};
use crate::reprogram::{HttpScheduleApi, ReprogramNegotiator, ScheduleApi};
use crate::transfer::{ActionGateway, HttpTransferApi, TransferApi, TransferStore};

const DISPATCHER_STOP_TIMEOUT: Duration = Duration::from_secs(2);

/// Remote adapters and settings shared by the sessions of one process
#[derive(Clone)]
pub struct SessionDeps {
    pub transfer_api: Arc<dyn TransferApi>,
    pub match_api: Arc<dyn MatchApi>,
    pub schedule_api: Arc<dyn ScheduleApi>,
    pub connector: Arc<dyn Connector>,
    pub realtime: RealtimeConfig,
    pub reprogram: ReprogramConfig,
}

impl SessionDeps {
    /// HTTP and WebSocket adapters for the configured backend
    pub fn from_config(config: &AppConfig) -> Result<Self, ApiError> {
        let client = ApiClient::new(&config.api)?;
        Ok(Self {
            transfer_api: Arc::new(HttpTransferApi::new(client.clone())),
            match_api: Arc::new(HttpMatchApi::new(client.clone())),
            schedule_api: Arc::new(HttpScheduleApi::new(client)),
            connector: Arc::new(WsConnector),
            realtime: config.realtime.clone(),
            reprogram: config.reprogram.clone(),
        })
    }
}

pub struct ScreenSession {
    scope: ChannelScope,
    transfers: Arc<TransferStore>,
    matches: Arc<MatchStore>,
    gateway: ActionGateway,
    negotiator: ReprogramNegotiator,
    live: Arc<AtomicBool>,
    channel: Option<ChannelHandle>,
    dispatcher: Option<JoinHandle<()>>,
    events: Option<mpsc::UnboundedReceiver<RealtimeEvent>>,
}

impl ScreenSession {
    /// Open a screen. Must be called from within a tokio runtime when the
    /// realtime channel is enabled.
    pub fn open(scope: ChannelScope, deps: &SessionDeps) -> Self {
        let transfers = Arc::new(TransferStore::new(deps.transfer_api.clone()));
        let matches = Arc::new(MatchStore::new(deps.match_api.clone()));
        let gateway = ActionGateway::new(deps.transfer_api.clone(), transfers.clone());
        let negotiator = ReprogramNegotiator::new(
            deps.schedule_api.clone(),
            matches.clone(),
            deps.reprogram.proposal_ttl(),
        );
        let live = Arc::new(AtomicBool::new(false));

        let (channel, dispatcher, events) = if deps.realtime.enabled {
            let policy = ReconnectPolicy::fixed(deps.realtime.reconnect_delay());
            let (handle, rx) = RealtimeChannel::spawn(
                scope.clone(),
                &deps.realtime.base_url,
                policy,
                deps.connector.clone(),
            );
            let (observer_tx, observer_rx) = mpsc::unbounded_channel();
            let handlers: Vec<Arc<dyn InvalidationHandler>> = vec![
                transfers.clone() as Arc<dyn InvalidationHandler>,
                matches.clone(),
            ];
            let task = tokio::spawn(dispatch(
                scope.clone(),
                rx,
                handlers,
                live.clone(),
                observer_tx,
            ));
            (Some(handle), Some(task), Some(observer_rx))
        } else {
            debug!(%scope, "Realtime disabled, screen relies on manual refresh");
            (None, None, None)
        };

        info!(%scope, realtime = deps.realtime.enabled, "Screen session opened");
        Self {
            scope,
            transfers,
            matches,
            gateway,
            negotiator,
            live,
            channel,
            dispatcher,
            events,
        }
    }

    pub fn scope(&self) -> &ChannelScope {
        &self.scope
    }

    pub fn transfers(&self) -> &Arc<TransferStore> {
        &self.transfers
    }

    pub fn matches(&self) -> &Arc<MatchStore> {
        &self.matches
    }

    pub fn gateway(&self) -> &ActionGateway {
        &self.gateway
    }

    pub fn negotiator(&self) -> &ReprogramNegotiator {
        &self.negotiator
    }

    /// Whether the realtime channel is currently connected
    pub fn is_live(&self) -> bool {
        self.live.load(Ordering::SeqCst)
    }

    /// Channel events, forwarded after the caches have handled them.
    /// Available once; `None` when realtime is disabled.
    pub fn take_events(&mut self) -> Option<mpsc::UnboundedReceiver<RealtimeEvent>> {
        self.events.take()
    }

    pub async fn close(mut self) {
        self.transfers.close();
        self.matches.close();

        if let Some(channel) = self.channel.take() {
            channel.close().await;
        }
        if let Some(task) = self.dispatcher.take() {
            let abort = task.abort_handle();
            if tokio::time::timeout(DISPATCHER_STOP_TIMEOUT, task).await.is_err() {
                warn!(scope = %self.scope, "Dispatcher did not stop in time, aborting");
                abort.abort();
            }
        }
        self.live.store(false, Ordering::SeqCst);
        info!(scope = %self.scope, "Screen session closed");
    }
}

impl Drop for ScreenSession {
    fn drop(&mut self) {
        self.transfers.close();
        self.matches.close();
        if let Some(task) = self.dispatcher.take() {
            task.abort();
        }
    }
}

async fn dispatch(
    scope: ChannelScope,
    mut rx: mpsc::UnboundedReceiver<RealtimeEvent>,
    handlers: Vec<Arc<dyn InvalidationHandler>>,
    live: Arc<AtomicBool>,
    observer: mpsc::UnboundedSender<RealtimeEvent>,
) {
    while let Some(event) = rx.recv().await {
        match &event {
            RealtimeEvent::Connected => live.store(true, Ordering::SeqCst),
            RealtimeEvent::Disconnected {
                close_code,
                reconnect_in,
            } => {
                live.store(false, Ordering::SeqCst);
                if reconnect_in.is_some() {
                    warn!(%scope, close_code, "Realtime degraded, manual refresh still available");
                }
            }
            RealtimeEvent::Invalidate(inv) => {
                for handler in &handlers {
                    handler.on_invalidate(inv).await;
                }
            }
        }
        // nobody listening is fine
        let _ = observer.send(event);
    }
    live.store(false, Ordering::SeqCst);
    debug!(%scope, "Dispatcher stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matches::adapters::MockMatchApi;
    use crate::realtime::Frame;
    use crate::realtime::transport::mock::{Script, ScriptedConnector};
    use crate::reprogram::adapters::MockScheduleApi;
    use crate::transfer::TransferStatus;
    use crate::transfer::adapters::MockTransferApi;
    use crate::transfer::state::fixtures::player_initiated;
    use crate::transfer::types::{Approval, DebtStatus};

    fn deps(
        transfers: Arc<MockTransferApi>,
        connector: Arc<ScriptedConnector>,
        enabled: bool,
    ) -> SessionDeps {
        SessionDeps {
            transfer_api: transfers,
            match_api: Arc::new(MockMatchApi::with_records(vec![])),
            schedule_api: Arc::new(MockScheduleApi::new()),
            connector,
            realtime: RealtimeConfig {
                enabled,
                base_url: "ws://test/ws".into(),
                reconnect_delay_ms: 20,
            },
            reprogram: ReprogramConfig::default(),
        }
    }

    async fn next(rx: &mut mpsc::UnboundedReceiver<RealtimeEvent>) -> Option<RealtimeEvent> {
        tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .expect("timed out waiting for session event")
    }

    #[tokio::test]
    async fn test_invalidation_refreshes_open_screen() {
        let api = Arc::new(MockTransferApi::with_records(vec![player_initiated(
            "t-1",
            Approval::Approved,
            Approval::Pending,
            DebtStatus::Pending,
        )]));
        let connector = Arc::new(ScriptedConnector::new(vec![Script::Delayed {
            delay: Duration::from_millis(50),
            frames: vec![Frame::Text(
                r#"{"type":"transfer_update","affected":["t-1"]}"#.into(),
            )],
        }]));
        let mut session = ScreenSession::open(
            ChannelScope::Championship("champ-1".into()),
            &deps(api.clone(), connector.clone(), true),
        );
        let mut events = session.take_events().unwrap();
        assert!(session.take_events().is_none());

        session.transfers().refresh("t-1").await.unwrap();
        // another actor rejects meanwhile
        api.put_record(player_initiated(
            "t-1",
            Approval::Approved,
            Approval::Rejected,
            DebtStatus::Pending,
        ));

        assert_eq!(next(&mut events).await, Some(RealtimeEvent::Connected));
        assert!(session.is_live());
        assert!(matches!(
            next(&mut events).await,
            Some(RealtimeEvent::Invalidate(_))
        ));
        assert_eq!(
            session.transfers().status("t-1"),
            Some(TransferStatus::Rejected)
        );
        assert_eq!(api.fetch_count(), 2);

        session.close().await;
        assert_eq!(connector.client_closes(), 1);
    }

    #[tokio::test]
    async fn test_close_discards_late_results() {
        let api = Arc::new(MockTransferApi::new());
        let connector = Arc::new(ScriptedConnector::new(vec![Script::Frames(vec![])]));
        let mut session = ScreenSession::open(
            ChannelScope::Match("m-1".into()),
            &deps(api.clone(), connector.clone(), true),
        );
        let mut events = session.take_events().unwrap();
        assert_eq!(next(&mut events).await, Some(RealtimeEvent::Connected));

        let transfers = session.transfers().clone();
        let matches = session.matches().clone();
        session.close().await;

        assert!(transfers.is_closed());
        assert!(matches.is_closed());
        assert_eq!(connector.client_closes(), 1);
        assert_eq!(next(&mut events).await, None);

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(connector.attempts(), 1);
    }

    #[tokio::test]
    async fn test_realtime_disabled() {
        let api = Arc::new(MockTransferApi::new());
        let connector = Arc::new(ScriptedConnector::new(vec![]));
        let mut session = ScreenSession::open(
            ChannelScope::Championship("champ-1".into()),
            &deps(api, connector.clone(), false),
        );
        assert!(session.take_events().is_none());
        assert!(!session.is_live());
        session.close().await;
        assert_eq!(connector.attempts(), 0);
    }
}
