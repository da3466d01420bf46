//! Realtime Invalidation Channel
//!
//! Server push over WebSocket, one channel per championship or match screen.
//! Messages only say *which* entities changed; caches re-fetch them.
//!
//! # Invariants
//!
//! 1. **Invalidate, Never Apply**: payload contents are not merged into state
//! 2. **Unknown Is Ignored**: unrecognized event types are dropped silently
//! 3. **Fixed Reconnect**: abnormal closures reconnect after one fixed delay
//! 4. **Clean Teardown**: closing a screen closes its channel with 1000

pub mod channel;
pub mod error;
pub mod handler;
pub mod messages;
pub mod policy;
pub mod transport;

pub use channel::{ChannelHandle, RealtimeChannel, RealtimeEvent};
pub use error::RealtimeError;
pub use handler::InvalidationHandler;
pub use messages::{ChannelScope, EventKind, Invalidation, parse_message};
pub use policy::{Closure, ReconnectPolicy};
pub use transport::{Connection, Connector, Frame, WsConnector};
