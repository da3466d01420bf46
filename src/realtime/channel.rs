//! Realtime channel task
//!
//! One task per subscribed scope. It owns the connection, turns recognized
//! messages into [`RealtimeEvent::Invalidate`], and reconnects after abnormal
//! closures with the configured fixed delay.
//!
//! ```text
//!            connect ok                 close 1000/1001
//! CONNECTING ─────────▶ OPEN ─────────────────────────▶ STOPPED
//!     ▲                  │
//!     │  delay elapsed   │ any other close / read error
//!     └──── WAITING ◀────┘
//! ```
//!
//! Teardown through [`ChannelHandle`] is allowed in every state and closes
//! an open connection with code 1000.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::messages::{ChannelScope, Invalidation, parse_message};
use super::policy::{Closure, ReconnectPolicy, close_code};
use super::transport::{Connection, Connector, Frame};

const TEARDOWN_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RealtimeEvent {
    Connected,
    Invalidate(Invalidation),
    /// `reconnect_in` is `None` when the channel stops for good
    Disconnected {
        close_code: u16,
        reconnect_in: Option<Duration>,
    },
}

pub struct RealtimeChannel;

impl RealtimeChannel {
    /// Start a channel task for `scope`.
    ///
    /// Events stop when the receiver is dropped or the handle is closed.
    pub fn spawn(
        scope: ChannelScope,
        base_url: &str,
        policy: ReconnectPolicy,
        connector: Arc<dyn Connector>,
    ) -> (ChannelHandle, mpsc::UnboundedReceiver<RealtimeEvent>) {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let url = scope.url(base_url);

        let task = tokio::spawn(run(
            scope.clone(),
            url,
            policy,
            connector,
            event_tx,
            shutdown_rx,
        ));

        let handle = ChannelHandle {
            scope,
            shutdown: Some(shutdown_tx),
            task: Some(task),
        };
        (handle, event_rx)
    }
}

/// Owner side of a channel task
pub struct ChannelHandle {
    scope: ChannelScope,
    shutdown: Option<watch::Sender<bool>>,
    task: Option<JoinHandle<()>>,
}

impl ChannelHandle {
    pub fn scope(&self) -> &ChannelScope {
        &self.scope
    }

    pub fn is_finished(&self) -> bool {
        self.task.as_ref().map(|t| t.is_finished()).unwrap_or(true)
    }

    /// Tear the channel down and wait for the task to exit
    pub async fn close(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(true);
        }
        if let Some(task) = self.task.take() {
            let abort = task.abort_handle();
            if tokio::time::timeout(TEARDOWN_TIMEOUT, task).await.is_err() {
                warn!(scope = %self.scope, "Realtime channel did not stop in time, aborting");
                abort.abort();
            }
        }
    }
}

impl Drop for ChannelHandle {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(true);
        }
    }
}

async fn run(
    scope: ChannelScope,
    url: String,
    policy: ReconnectPolicy,
    connector: Arc<dyn Connector>,
    events: mpsc::UnboundedSender<RealtimeEvent>,
    mut shutdown: watch::Receiver<bool>,
) {
    loop {
        if *shutdown.borrow() {
            break;
        }

        let attempt = tokio::select! {
            _ = shutdown.changed() => break,
            res = connector.connect(&url) => res,
        };

        let conn = match attempt {
            Ok(conn) => conn,
            Err(e) => {
                let delay = policy.on_connect_failure();
                warn!(%scope, code = e.code(), kind = %e.kind(), error = %e, delay_ms = delay.as_millis() as u64, "Realtime connect failed");
                let _ = events.send(RealtimeEvent::Disconnected {
                    close_code: close_code::ABNORMAL,
                    reconnect_in: Some(delay),
                });
                if wait_or_shutdown(&mut shutdown, delay).await {
                    break;
                }
                continue;
            }
        };

        info!(%scope, "Realtime channel connected");
        if events.send(RealtimeEvent::Connected).is_err() {
            break;
        }

        let code = match pump(&scope, conn, &events, &mut shutdown).await {
            Some(code) => code,
            None => break,
        };

        let reconnect_in = policy.on_close(Closure::from_code(code));
        let _ = events.send(RealtimeEvent::Disconnected {
            close_code: code,
            reconnect_in,
        });

        match reconnect_in {
            None => {
                info!(%scope, close_code = code, "Realtime channel closed by server");
                break;
            }
            Some(delay) => {
                warn!(%scope, close_code = code, delay_ms = delay.as_millis() as u64, "Realtime channel dropped, reconnecting");
                if wait_or_shutdown(&mut shutdown, delay).await {
                    break;
                }
            }
        }
    }
    debug!(%scope, "Realtime channel task exited");
}

/// Read frames until the connection closes (`Some(code)`) or the channel is
/// torn down (`None`).
async fn pump(
    scope: &ChannelScope,
    mut conn: Box<dyn Connection>,
    events: &mpsc::UnboundedSender<RealtimeEvent>,
    shutdown: &mut watch::Receiver<bool>,
) -> Option<u16> {
    loop {
        let frame = tokio::select! {
            _ = shutdown.changed() => {
                conn.close().await;
                info!(%scope, "Realtime channel torn down");
                return None;
            }
            frame = conn.next_frame() => frame,
        };

        match frame {
            Frame::Text(text) => match parse_message(&text, scope) {
                Ok(Some(inv)) => {
                    debug!(%scope, kind = %inv.kind, ids = ?inv.ids, "Invalidation received");
                    if events.send(RealtimeEvent::Invalidate(inv)).is_err() {
                        conn.close().await;
                        return None;
                    }
                }
                Ok(None) => debug!(%scope, "Ignoring unrecognized realtime message"),
                Err(e) => warn!(%scope, code = e.code(), error = %e, "Dropping malformed realtime message"),
            },
            Frame::Closed { code } => return Some(code),
        }
    }
}

/// Sleep for `delay`; `true` if the channel was torn down meanwhile
async fn wait_or_shutdown(shutdown: &mut watch::Receiver<bool>, delay: Duration) -> bool {
    tokio::select! {
        _ = shutdown.changed() => true,
        _ = tokio::time::sleep(delay) => false,
    }
}
