//! Outbound event dispatch with a single retry.
//!
//! Delivery is best-effort: one send on the current session, and on a
//! transport failure one more send on a freshly built session.  If that
//! fails too the event is dropped.  Nothing is queued for replay.

use log::{debug, warn};

use crate::app::events::OutboundEvent;
use crate::app::ports::{EventEncoder, NetworkPort, SessionPort};
use crate::connectivity::ConnectivitySupervisor;
use crate::error::SendError;

/// Upper bound on send attempts per event (original + one retry).
pub const MAX_ATTEMPTS: u8 = 2;

/// Delivery counters since boot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchStats {
    /// Events that reached the transport.
    pub delivered: u32,
    /// Events that needed the retry (whether or not it succeeded).
    pub retried: u32,
    pub dropped: u32,
    /// Total `send` calls.
    pub attempts: u32,
}

pub struct EventDispatcher<E> {
    encoder: E,
    stats: DispatchStats,
}

impl<E: EventEncoder> EventDispatcher<E> {
    pub fn new(encoder: E) -> Self {
        Self {
            encoder,
            stats: DispatchStats::default(),
        }
    }

    /// Send `event` on the supervisor's session, retrying once on a fresh
    /// session.
    ///
    /// Returns the number of attempts used on success.
    pub fn dispatch<N: NetworkPort>(
        &mut self,
        supervisor: &mut ConnectivitySupervisor<N>,
        event: &OutboundEvent,
    ) -> Result<u8, SendError> {
        let bytes = self.encoder.encode_event(event.path, &event.args);

        let first = match supervisor.session_mut() {
            Some(session) => {
                self.stats.attempts += 1;
                session.send(&bytes)
            }
            None => Err(SendError::NoSession),
        };
        let Err(first_err) = first else {
            self.stats.delivered += 1;
            debug!("dispatch: {} delivered ({} bytes)", event.path, bytes.len());
            return Ok(1);
        };

        warn!("dispatch: {} send failed ({}), renewing session", event.path, first_err);
        self.stats.retried += 1;

        let retry = match supervisor.renew_session() {
            Ok(()) => match supervisor.session_mut() {
                Some(session) => {
                    self.stats.attempts += 1;
                    session.send(&bytes)
                }
                None => Err(SendError::NoSession),
            },
            Err(e) => Err(SendError::RenewFailed(e)),
        };

        match retry {
            Ok(()) => {
                self.stats.delivered += 1;
                debug!("dispatch: {} delivered on retry", event.path);
                Ok(MAX_ATTEMPTS)
            }
            Err(e) => {
                self.stats.dropped += 1;
                warn!("dispatch: {} dropped after retry ({})", event.path, e);
                Err(e)
            }
        }
    }

    pub fn stats(&self) -> DispatchStats {
        self.stats
    }
}
