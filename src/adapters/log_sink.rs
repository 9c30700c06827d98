//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (which goes to UART / USB-CDC in production).  Each
//! event becomes one line with a fixed tag so the serial stream can be
//! grepped.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Telemetry(t) => {
                info!(
                    "TELEM | link={} | ticks={} | active={} | sent={} retried={} dropped={} | \
                     sensor_faults={}",
                    t.link,
                    t.tick_count,
                    t.active_channel.map_or(-1, |c| i32::from(c.index())),
                    t.delivered,
                    t.retried,
                    t.dropped,
                    t.sensor_faults,
                );
            }
            AppEvent::Touched(channel) => {
                info!("TOUCH | pressed {} (pad #{})", channel, channel.pad_number());
            }
            AppEvent::Released(channel) => {
                info!("TOUCH | released {}", channel);
            }
            AppEvent::IdleReset => {
                info!("TOUCH | idle, strip cleared");
            }
            AppEvent::LinkChanged { from, to } => {
                info!("LINK  | {} -> {}", from, to);
            }
            AppEvent::EventDelivered { channel, attempts } => {
                info!("SEND  | /touch {} ok (attempts={})", channel.index(), attempts);
            }
            AppEvent::EventDropped { channel, error } => {
                warn!("SEND  | /touch {} dropped: {}", channel.index(), error);
            }
            AppEvent::SensorFault(fault) => {
                warn!("SENSE | read failed: {}", fault);
            }
            AppEvent::Started => {
                info!("START | control loop running");
            }
        }
    }
}
