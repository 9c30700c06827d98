//! Touch arbitration: channel identity, per-tick selection and release hysteresis.
//!
//! ```text
//!   sensor ──scan──▶ Option<Channel> ──update──▶ TouchEdge
//!                    (lowest index wins)         Pressed / Held / Released / None
//! ```
//!
//! Simultaneous touches are not chorded: the scan stops at the first active
//! channel in ascending order.  The arbiter then latches that channel and
//! only releases it after `release_polls` consecutive empty polls, so a
//! finger flickering on the electrode edge produces one press, not many.

use core::fmt;

use crate::app::ports::TouchSensorPort;
use crate::error::SensorFault;

// ───────────────────────────────────────────────────────────────
// Channel
// ───────────────────────────────────────────────────────────────

/// One capacitive input, index `0..12`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Channel(u8);

impl Channel {
    /// Number of channels on the sensor.
    pub const COUNT: u8 = 12;

    /// `None` for indices outside `0..12`.
    pub const fn new(index: u8) -> Option<Self> {
        if index < Self::COUNT {
            Some(Self(index))
        } else {
            None
        }
    }

    /// 0-based index.
    pub const fn index(self) -> u8 {
        self.0
    }

    /// 1-based number printed on the pad labels.
    pub const fn pad_number(self) -> u8 {
        self.0 + 1
    }

    /// All channels in ascending order.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..Self::COUNT).map(Self)
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ch{}", self.0)
    }
}

// ───────────────────────────────────────────────────────────────
// TouchState
// ───────────────────────────────────────────────────────────────

/// The loop's view of the current touch.
///
/// Invariant: `active_channel.is_some() == activated_at.is_some()`.  The
/// fields are private so the only way to change them is through methods
/// that keep the pair consistent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TouchState {
    active_channel: Option<Channel>,
    activated_at: Option<u64>,
}

impl TouchState {
    pub fn active_channel(&self) -> Option<Channel> {
        self.active_channel
    }

    /// Timestamp (ms) of the last tick the active channel was seen.
    pub fn activated_at(&self) -> Option<u64> {
        self.activated_at
    }

    pub fn is_active(&self) -> bool {
        self.active_channel.is_some()
    }

    /// Record `channel` as seen at `now_ms`.
    pub fn activate(&mut self, channel: Channel, now_ms: u64) {
        self.active_channel = Some(channel);
        self.activated_at = Some(now_ms);
    }

    pub fn clear(&mut self) {
        self.active_channel = None;
        self.activated_at = None;
    }

    /// Whether at least `timeout_ms` passed since the last activation.
    /// Always `false` when inactive.
    pub fn is_expired(&self, now_ms: u64, timeout_ms: u64) -> bool {
        self.activated_at
            .is_some_and(|at| now_ms.saturating_sub(at) >= timeout_ms)
    }
}

// ───────────────────────────────────────────────────────────────
// TouchArbiter
// ───────────────────────────────────────────────────────────────

/// Result of one arbiter update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchEdge {
    /// A channel became the winner this tick.
    Pressed(Channel),
    /// The latched channel is still reported active.
    Held(Channel),
    /// The latched channel was released after hysteresis.
    Released(Channel),
    /// Nothing is reported active this tick.
    None,
}

pub struct TouchArbiter {
    latched: Option<Channel>,
    empty_polls: u8,
    release_polls: u8,
}

impl TouchArbiter {
    /// `release_polls` is clamped to at least 1.
    pub fn new(release_polls: u8) -> Self {
        Self {
            latched: None,
            empty_polls: 0,
            release_polls: release_polls.max(1),
        }
    }

    /// Scan channels `0..12` in ascending order and return the first active
    /// one.  Side-effect-free apart from the sensor reads themselves.
    pub fn scan(sensor: &mut impl TouchSensorPort) -> Result<Option<Channel>, SensorFault> {
        for channel in Channel::all() {
            if sensor.is_touched(channel)? {
                return Ok(Some(channel));
            }
        }
        Ok(None)
    }

    /// Scan the sensor and feed the result through [`update`](Self::update).
    ///
    /// On a sensor fault the arbiter state is left untouched; the caller
    /// decides how to treat the tick.
    pub fn poll(&mut self, sensor: &mut impl TouchSensorPort) -> Result<TouchEdge, SensorFault> {
        let reading = Self::scan(sensor)?;
        Ok(self.update(reading))
    }

    /// Advance the latch with one scan result.
    pub fn update(&mut self, reading: Option<Channel>) -> TouchEdge {
        match reading {
            Some(channel) => {
                self.empty_polls = 0;
                if self.latched == Some(channel) {
                    TouchEdge::Held(channel)
                } else {
                    self.latched = Some(channel);
                    TouchEdge::Pressed(channel)
                }
            }
            None => {
                let Some(held) = self.latched else {
                    return TouchEdge::None;
                };
                self.empty_polls = self.empty_polls.saturating_add(1);
                if self.empty_polls >= self.release_polls {
                    self.latched = None;
                    self.empty_polls = 0;
                    TouchEdge::Released(held)
                } else {
                    TouchEdge::None
                }
            }
        }
    }

    /// Forget the latched channel so the next touch is a fresh press.
    pub fn reset(&mut self) {
        self.latched = None;
        self.empty_polls = 0;
    }

    /// Currently latched channel, if any.
    pub fn latched(&self) -> Option<Channel> {
        self.latched
    }
}
