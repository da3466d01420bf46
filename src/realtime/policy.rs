//! Reconnection policy
//!
//! One fixed-delay policy for every channel scope. Normal and going-away
//! closures end the channel; anything else, including a dropped connection
//! or a failed connect, schedules another attempt after the delay. Attempts
//! repeat until the owning screen tears the channel down.

use std::time::Duration;

/// RFC 6455 close codes the policy cares about
pub mod close_code {
    pub const NORMAL: u16 = 1000;
    pub const GOING_AWAY: u16 = 1001;
    /// Close frame without a status code
    pub const NO_STATUS: u16 = 1005;
    /// Connection lost without a close frame
    pub const ABNORMAL: u16 = 1006;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Closure {
    Normal,
    GoingAway,
    Abnormal(u16),
}

impl Closure {
    pub fn from_code(code: u16) -> Self {
        match code {
            close_code::NORMAL => Closure::Normal,
            close_code::GOING_AWAY => Closure::GoingAway,
            other => Closure::Abnormal(other),
        }
    }

    #[inline]
    pub fn is_clean(&self) -> bool {
        matches!(self, Closure::Normal | Closure::GoingAway)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    delay: Duration,
}

impl ReconnectPolicy {
    pub fn fixed(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Delay before the next attempt, or `None` to stop
    pub fn on_close(&self, closure: Closure) -> Option<Duration> {
        if closure.is_clean() {
            None
        } else {
            Some(self.delay)
        }
    }

    /// Connect failures are treated like abnormal closures
    pub fn on_connect_failure(&self) -> Duration {
        self.delay
    }
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self::fixed(Duration::from_secs(3))
    }
}
