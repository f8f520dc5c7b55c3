//! Link state machine over {Disconnected, Connecting, Connected}.
//!
//! ```text
//!                 interface down
//!   Disconnected ───────────────▶ Connecting
//!        ▲                          │
//!        │ attempts exhausted       │ associated
//!        └──────────────────────────┤
//!                                   ▼
//!                               Connected ──(interface down)──▶ Connecting
//! ```
//!
//! One check per main cycle.  A connect attempt is bounded by
//! `connect_attempts × connect_attempt_delay_ms`, so an unreachable access
//! point never stalls the loop for longer than that.

use log::{info, warn};

use crate::config::SystemConfig;

use super::events::AppEvent;
use super::ports::{ConnectivityPort, EventSink};
use super::state::{DeviceState, LinkState};

/// Edge reported by [`Link::check`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkTransition {
    Up,
    Down,
}

pub struct Link {
    attempts: u8,
    attempt_delay_ms: u32,
}

impl Link {
    pub fn new(cfg: &SystemConfig) -> Self {
        Self {
            attempts: cfg.connect_attempts,
            attempt_delay_ms: cfg.connect_attempt_delay_ms,
        }
    }

    /// Advance the state machine once.  Returns `Some(Up)` whenever the link
    /// (re)enters `Connected`, `Some(Down)` when a connected link is lost
    /// and not immediately recovered.
    pub fn check(
        &self,
        state: &mut DeviceState,
        net: &mut impl ConnectivityPort,
        sink: &mut impl EventSink,
    ) -> Option<LinkTransition> {
        if net.is_connected() {
            if state.link == LinkState::Connected {
                return None;
            }
            state.link = LinkState::Connected;
            sink.emit(&AppEvent::LinkUp);
            return Some(LinkTransition::Up);
        }

        let was_connected = state.link == LinkState::Connected;
        if was_connected {
            warn!("Link: lost");
            sink.emit(&AppEvent::LinkDown);
            state.set_sentinel();
        }

        state.link = LinkState::Connecting;
        match net.connect(self.attempts, self.attempt_delay_ms) {
            Ok(()) => {
                info!("Link: connected");
                state.link = LinkState::Connected;
                sink.emit(&AppEvent::LinkUp);
                Some(LinkTransition::Up)
            }
            Err(e) => {
                warn!("Link: connect failed: {}", e);
                state.link = LinkState::Disconnected;
                sink.emit(&AppEvent::ConnectFailed);
                was_connected.then_some(LinkTransition::Down)
            }
        }
    }
}
