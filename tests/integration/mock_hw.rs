//! Mock hardware for integration tests.
//!
//! Every mock records what the loop asked of it so tests can assert on the
//! full history.  Time is simulated: the [`MockClock`] only advances when
//! the loop sleeps, so a 2.2 s fill sweep costs no wall-clock time.

use std::cell::{Cell, RefCell};
use std::net::{Ipv4Addr, SocketAddrV4};
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use riverpad::app::events::AppEvent;
use riverpad::app::ports::{
    ClockPort, DisplayPort, EventSink, LedStripPort, NetworkPort, SessionPort, TextField, TouchSensorPort,
};
use riverpad::config::Credentials;
use riverpad::error::{ConnectError, SendError, SensorFault};
use riverpad::feedback::{COLOUR_OFF, Rgb};
use riverpad::touch::Channel;

// ── Touch sensor ──────────────────────────────────────────────

/// Sensor driven by a 12-bit mask; `fault` makes every read fail.
#[derive(Default)]
pub struct MockSensor {
    pub mask: u16,
    pub fault: bool,
}

impl TouchSensorPort for MockSensor {
    fn is_touched(&mut self, channel: Channel) -> Result<bool, SensorFault> {
        if self.fault {
            return Err(SensorFault::BusError);
        }
        Ok(self.mask & (1 << channel.index()) != 0)
    }
}

// ── LED strip ─────────────────────────────────────────────────

pub struct RecordingStrip {
    pub pixels: Vec<Rgb>,
    /// Colour of every sweep, recorded when pixel 0 is set.
    pub sweeps: Vec<Rgb>,
    /// Batch writes of `COLOUR_OFF`.
    pub clears: u32,
    pub shows: u32,
}

#[allow(dead_code)]
impl RecordingStrip {
    pub fn new(count: usize) -> Self {
        Self {
            pixels: vec![COLOUR_OFF; count],
            sweeps: Vec::new(),
            clears: 0,
            shows: 0,
        }
    }

    pub fn is_dark(&self) -> bool {
        self.pixels.iter().all(|&p| p == COLOUR_OFF)
    }
}

impl LedStripPort for RecordingStrip {
    fn pixel_count(&self) -> usize {
        self.pixels.len()
    }

    fn set_pixel(&mut self, index: usize, colour: Rgb) {
        if index == 0 {
            self.sweeps.push(colour);
        }
        self.pixels[index] = colour;
    }

    fn show(&mut self) {
        self.shows += 1;
    }

    fn fill(&mut self, colour: Rgb) {
        if colour == COLOUR_OFF {
            self.clears += 1;
        }
        self.pixels.fill(colour);
    }
}

// ── Display ───────────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingDisplay {
    pub status: String,
    pub touch: String,
    pub refreshes: u32,
}

impl DisplayPort for RecordingDisplay {
    fn set_text(&mut self, field: TextField, text: &str) {
        match field {
            TextField::Status => self.status = text.to_owned(),
            TextField::TouchMessage => self.touch = text.to_owned(),
        }
    }

    fn refresh(&mut self) {
        self.refreshes += 1;
    }
}

// ── Network ───────────────────────────────────────────────────

/// Shared between the network mock and every session it opens.
#[derive(Default)]
pub struct Wire {
    /// Outcome of each `send` call in order; missing entries succeed.
    pub outcomes: Vec<bool>,
    pub calls: usize,
    pub sent: Vec<Vec<u8>>,
}

pub struct WireSession(Rc<RefCell<Wire>>);

impl SessionPort for WireSession {
    fn send(&mut self, bytes: &[u8]) -> Result<(), SendError> {
        let mut w = self.0.borrow_mut();
        let ok = w.outcomes.get(w.calls).copied().unwrap_or(true);
        w.calls += 1;
        if ok {
            w.sent.push(bytes.to_vec());
            Ok(())
        } else {
            Err(SendError::Transport)
        }
    }
}

pub struct MockNetwork {
    /// Outcome of each `connect` join in order; missing entries succeed.
    pub connect_script: Vec<bool>,
    pub connects: usize,
    pub associated: bool,
    pub sessions: usize,
    pub wire: Rc<RefCell<Wire>>,
}

#[allow(dead_code)]
impl MockNetwork {
    pub fn new(connect_script: Vec<bool>, send_outcomes: Vec<bool>) -> Self {
        Self {
            connect_script,
            connects: 0,
            associated: false,
            sessions: 0,
            wire: Rc::new(RefCell::new(Wire {
                outcomes: send_outcomes,
                ..Wire::default()
            })),
        }
    }
}

impl NetworkPort for MockNetwork {
    type Session = WireSession;

    fn connect(&mut self, _credentials: &Credentials) -> Result<(), ConnectError> {
        if self.associated {
            return Ok(());
        }
        let ok = self.connect_script.get(self.connects).copied().unwrap_or(true);
        self.connects += 1;
        if ok {
            self.associated = true;
            Ok(())
        } else {
            Err(ConnectError::ConnectionFailed)
        }
    }

    fn current_address(&self) -> Option<Ipv4Addr> {
        self.associated.then(|| Ipv4Addr::new(192, 168, 4, 20))
    }

    fn open_session(&mut self, _target: SocketAddrV4) -> Result<WireSession, ConnectError> {
        self.sessions += 1;
        Ok(WireSession(self.wire.clone()))
    }
}

// ── Clock ─────────────────────────────────────────────────────

/// Simulated monotonic clock in microseconds.  Clones share the same time.
#[derive(Clone, Default)]
pub struct MockClock {
    now_us: Rc<Cell<u64>>,
}

#[allow(dead_code)]
impl MockClock {
    pub fn advance_ms(&self, ms: u64) {
        self.now_us.set(self.now_us.get() + ms * 1_000);
    }
}

impl DelayNs for MockClock {
    fn delay_ns(&mut self, ns: u32) {
        self.now_us.set(self.now_us.get() + u64::from(ns) / 1_000);
    }

    fn delay_us(&mut self, us: u32) {
        self.now_us.set(self.now_us.get() + u64::from(us));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.now_us.set(self.now_us.get() + u64::from(ms) * 1_000);
    }
}

impl ClockPort for MockClock {
    fn now_ms(&self) -> u64 {
        self.now_us.get() / 1_000
    }
}

// ── Event sink ────────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
