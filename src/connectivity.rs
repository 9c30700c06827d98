//! Connectivity supervisor: owns the network session and its state machine.
//!
//! ```text
//!   Disconnected ──connect ok──▶ Connected(session)
//!        │ fail                      │ address lost
//!        ▼                           ▼
//!   Disconnected              Reconnecting ──connect ok──▶ Connected(new session)
//!                                  │ fail
//!                                  ▼
//!                             Reconnecting
//! ```
//!
//! ## Reconnection policy
//!
//! State is only reassessed on the health-check tick (default every 5 s).
//! Retries happen at that fixed cadence with no backoff or jitter.  The one
//! exception is [`ConnectivitySupervisor::renew_session`], which the
//! dispatcher calls synchronously after a failed send.

use core::fmt;
use core::net::SocketAddrV4;

use log::{info, warn};

use crate::app::ports::NetworkPort;
use crate::config::Credentials;
use crate::error::ConnectError;
use crate::timer::IntervalTimer;

// ───────────────────────────────────────────────────────────────
// State
// ───────────────────────────────────────────────────────────────

/// Session state.  The session handle lives inside `Connected`, so replacing
/// the variant drops (and thereby releases) the old handle.
pub enum ConnectivityState<S> {
    Disconnected,
    Connected(S),
    Reconnecting,
}

impl<S> ConnectivityState<S> {
    pub fn status(&self) -> LinkStatus {
        match self {
            Self::Disconnected => LinkStatus::Disconnected,
            Self::Connected(_) => LinkStatus::Connected,
            Self::Reconnecting => LinkStatus::Reconnecting,
        }
    }
}

/// Session-free view of [`ConnectivityState`] for presentation and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkStatus {
    Disconnected,
    Connected,
    Reconnecting,
}

impl fmt::Display for LinkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disconnected => write!(f, "disconnected"),
            Self::Connected => write!(f, "connected"),
            Self::Reconnecting => write!(f, "reconnecting"),
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Supervisor
// ───────────────────────────────────────────────────────────────

pub struct ConnectivitySupervisor<N: NetworkPort> {
    net: N,
    credentials: Credentials,
    target: SocketAddrV4,
    state: ConnectivityState<N::Session>,
    health: IntervalTimer,
    sessions_opened: u32,
}

impl<N: NetworkPort> ConnectivitySupervisor<N> {
    pub fn new(net: N, credentials: Credentials, target: SocketAddrV4, health_period_ms: u64) -> Self {
        Self {
            net,
            credentials,
            target,
            state: ConnectivityState::Disconnected,
            health: IntervalTimer::new(health_period_ms),
            sessions_opened: 0,
        }
    }

    pub fn is_health_check_due(&self, now_ms: u64) -> bool {
        self.health.is_due(now_ms)
    }

    /// Run one health check and advance the state machine.
    ///
    /// Returns the new status.
    pub fn tick(&mut self, now_ms: u64) -> LinkStatus {
        self.health.reset(now_ms);

        let previous = core::mem::replace(&mut self.state, ConnectivityState::Disconnected);
        self.state = match previous {
            ConnectivityState::Disconnected => match self.establish() {
                Ok(session) => ConnectivityState::Connected(session),
                Err(e) => {
                    warn!("link: connect failed ({}), staying disconnected", e);
                    ConnectivityState::Disconnected
                }
            },
            ConnectivityState::Connected(session) => {
                if self.net.current_address().is_some() {
                    ConnectivityState::Connected(session)
                } else {
                    warn!("link: address lost, releasing session");
                    drop(session);
                    ConnectivityState::Reconnecting
                }
            }
            ConnectivityState::Reconnecting => match self.establish() {
                Ok(session) => ConnectivityState::Connected(session),
                Err(e) => {
                    warn!("link: reconnect failed ({})", e);
                    ConnectivityState::Reconnecting
                }
            },
        };
        self.status()
    }

    /// Replace the current session with a brand-new one, bypassing the
    /// health-check cadence.
    ///
    /// The old session is released before the new one is opened.  On failure
    /// the supervisor is left in `Reconnecting` and the next health check
    /// retries.
    pub fn renew_session(&mut self) -> Result<(), ConnectError> {
        self.state = ConnectivityState::Reconnecting;
        match self.establish() {
            Ok(session) => {
                self.state = ConnectivityState::Connected(session);
                Ok(())
            }
            Err(e) => {
                warn!("link: session renewal failed ({})", e);
                Err(e)
            }
        }
    }

    /// Join the network if needed and open a session to the target.
    fn establish(&mut self) -> Result<N::Session, ConnectError> {
        self.net.connect(&self.credentials)?;
        let address = self.net.current_address().ok_or(ConnectError::NoAddress)?;
        let session = self.net.open_session(self.target)?;
        self.sessions_opened = self.sessions_opened.wrapping_add(1);
        info!("link: session #{} open {} -> {}", self.sessions_opened, address, self.target);
        Ok(session)
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn status(&self) -> LinkStatus {
        self.state.status()
    }

    pub fn is_connected(&self) -> bool {
        matches!(self.state, ConnectivityState::Connected(_))
    }

    /// The live session, only while `Connected`.
    pub fn session_mut(&mut self) -> Option<&mut N::Session> {
        match &mut self.state {
            ConnectivityState::Connected(session) => Some(session),
            _ => None,
        }
    }

    /// Sessions opened since boot.
    pub fn sessions_opened(&self) -> u32 {
        self.sessions_opened
    }

    pub fn network(&self) -> &N {
        &self.net
    }

    pub fn network_mut(&mut self) -> &mut N {
        &mut self.net
    }
}
