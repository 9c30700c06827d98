//! Port traits: the hexagonal boundary between the control loop and the outside world.
//!
//! ```text
//!   Driver / Adapter ──▶ Port trait ──▶ MainLoop (domain)
//! ```
//!
//! Chip drivers (`drivers/`) and platform adapters (`adapters/`) implement
//! these traits.  The [`MainLoop`](super::main_loop::MainLoop) consumes them
//! via generics, so the domain core never touches hardware directly and the
//! whole loop runs on the host against mocks.
//!
//! All port errors are typed; callers must handle every variant explicitly.

use core::net::{Ipv4Addr, SocketAddrV4};

use embedded_hal::delay::DelayNs;

use crate::config::Credentials;
use crate::error::{ConnectError, SendError, SensorFault};
use crate::feedback::Rgb;
use crate::touch::Channel;

use super::events::{AppEvent, EventArg};

// ───────────────────────────────────────────────────────────────
// Touch sensor port (hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port for the twelve-channel capacitive sensor.
pub trait TouchSensorPort {
    /// Whether `channel` currently reports a touch.
    fn is_touched(&mut self, channel: Channel) -> Result<bool, SensorFault>;
}

// ───────────────────────────────────────────────────────────────
// LED strip port (domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Addressable LED strip.  Writes are fire-and-forget at this layer.
pub trait LedStripPort {
    /// Number of pixels on the strip.
    fn pixel_count(&self) -> usize;

    /// Stage one pixel; takes effect on the next [`show`](Self::show).
    fn set_pixel(&mut self, index: usize, colour: Rgb);

    /// Latch staged pixels out to the strip.
    fn show(&mut self);

    /// Stage every pixel to `colour`.
    fn fill(&mut self, colour: Rgb);
}

// ───────────────────────────────────────────────────────────────
// Display port (domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Text fields shown on the status display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextField {
    /// Connectivity line.
    Status,
    /// Touch prompt / last touched pad.
    TouchMessage,
}

pub trait DisplayPort {
    fn set_text(&mut self, field: TextField, text: &str);

    /// Push staged text to the panel.
    fn refresh(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Network ports (domain ↔ radio)
// ───────────────────────────────────────────────────────────────

/// Station-mode radio plus the ability to open an outbound session.
pub trait NetworkPort {
    type Session: SessionPort;

    /// Join the configured network.  Must succeed without side effects when
    /// already associated.
    fn connect(&mut self, credentials: &Credentials) -> Result<(), ConnectError>;

    /// Address currently assigned to the station interface, if any.
    fn current_address(&self) -> Option<Ipv4Addr>;

    /// Open a fresh outbound session to `target`.
    fn open_session(&mut self, target: SocketAddrV4) -> Result<Self::Session, ConnectError>;
}

/// An established outbound session.  Dropping it releases the transport.
pub trait SessionPort {
    fn send(&mut self, bytes: &[u8]) -> Result<(), SendError>;
}

/// Serialises a logical event into wire bytes.
pub trait EventEncoder {
    fn encode_event(&self, path: &str, args: &[EventArg]) -> Vec<u8>;
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Monotonic time source that can also block the calling task.
pub trait ClockPort: DelayNs {
    /// Milliseconds since boot.  Never goes backwards.
    fn now_ms(&self) -> u64;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The loop emits structured [`AppEvent`]s through this port.  Adapters
/// decide where they go (serial log, test recorder, ...).
pub trait EventSink {
    fn emit(&mut self, event: &AppEvent);
}
