//! Application events, inbound and outbound.
//!
//! [`AppEvent`]s are emitted by the [`MainLoop`](super::main_loop::MainLoop)
//! through the [`EventSink`](super::ports::EventSink) port for logging.
//! [`OutboundEvent`]s are the messages sent to the remote listener.

use crate::connectivity::LinkStatus;
use crate::error::{SendError, SensorFault};
use crate::touch::Channel;

/// Path of the touch message understood by the listener.
pub const TOUCH_PATH: &str = "/touch";

/// Structured events emitted by the control loop.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The loop has started and rendered its first frame.
    Started,

    /// A pad was newly pressed.
    Touched(Channel),

    /// A held pad was released (after hysteresis).
    Released(Channel),

    /// The idle timeout elapsed; touch state and LEDs were reset.
    IdleReset,

    /// The connectivity supervisor moved between states.
    LinkChanged { from: LinkStatus, to: LinkStatus },

    /// An outbound event reached the transport.
    EventDelivered { channel: Channel, attempts: u8 },

    /// An outbound event was dropped after the retry failed.
    EventDropped { channel: Channel, error: SendError },

    /// The touch sensor could not be read this tick.
    SensorFault(SensorFault),

    /// Periodic telemetry snapshot.
    Telemetry(TelemetryData),
}

/// A point-in-time telemetry snapshot suitable for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TelemetryData {
    pub link: LinkStatus,
    pub tick_count: u64,
    pub active_channel: Option<Channel>,
    pub delivered: u32,
    pub retried: u32,
    pub dropped: u32,
    pub sensor_faults: u32,
}

/// A typed argument of an outbound message.
#[derive(Debug, Clone, PartialEq)]
pub enum EventArg {
    Int(i32),
    Float(f32),
    Str(heapless::String<32>),
}

/// One message for the remote listener.  Built fresh per send.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundEvent {
    pub path: &'static str,
    pub args: heapless::Vec<EventArg, 4>,
}

impl OutboundEvent {
    /// `{"/touch", [channel]}` with the 0-based channel index.
    pub fn touch(channel: Channel) -> Self {
        let mut args = heapless::Vec::new();
        // Capacity 4, one push: cannot fail.
        let _ = args.push(EventArg::Int(i32::from(channel.index())));
        Self { path: TOUCH_PATH, args }
    }
}
