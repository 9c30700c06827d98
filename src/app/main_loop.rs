//! The control loop, the hexagonal core of the installation.
//!
//! [`MainLoop`] owns every hardware handle (moved in through [`Board`]) and
//! all shared state.  Each [`tick`](MainLoop::tick) runs the components in a
//! fixed order on a single task:
//!
//! ```text
//!  1. health check due?  ──▶ ConnectivitySupervisor::tick
//!  2. TouchArbiter::poll ──▶ TouchEdge
//!  3. Pressed            ──▶ TouchState, FeedbackAnimator::animate, EventDispatcher::dispatch
//!     Held               ──▶ TouchState (refresh)
//!  4. idle timeout       ──▶ TouchState::clear, TouchArbiter::reset, FeedbackAnimator::clear
//!  5. StatusPresenter    ──▶ DisplayPort (only when the text changed)
//!  6. sleep the remainder of the tick period
//! ```
//!
//! The fill sweep in step 3 blocks; the loop does not observe the sensor
//! until it finishes.

use log::info;

use crate::config::SystemConfig;
use crate::connectivity::{ConnectivitySupervisor, LinkStatus};
use crate::dispatch::{DispatchStats, EventDispatcher};
use crate::feedback::FeedbackAnimator;
use crate::status::{StatusPresenter, StatusView};
use crate::timer::IntervalTimer;
use crate::touch::{Channel, TouchArbiter, TouchEdge, TouchState};

use super::events::{AppEvent, OutboundEvent, TelemetryData};
use super::ports::{
    ClockPort, DisplayPort, EventEncoder, EventSink, LedStripPort, NetworkPort, TextField, TouchSensorPort,
};

/// Every resource the loop drives, constructed once at startup.
pub struct Board<S, L, D, N, E, C> {
    pub sensor: S,
    pub strip: L,
    pub display: D,
    pub network: N,
    pub encoder: E,
    pub clock: C,
}

pub struct MainLoop<S, L, D, N: NetworkPort, E, C> {
    sensor: S,
    arbiter: TouchArbiter,
    animator: FeedbackAnimator<L>,
    supervisor: ConnectivitySupervisor<N>,
    dispatcher: EventDispatcher<E>,
    display: D,
    clock: C,

    touch: TouchState,
    telemetry: IntervalTimer,
    idle_timeout_ms: u64,
    tick_period_ms: u64,

    last_view: Option<StatusView>,
    last_link: LinkStatus,
    tick_count: u64,
    sensor_faults: u32,
}

impl<S, L, D, N, E, C> MainLoop<S, L, D, N, E, C>
where
    S: TouchSensorPort,
    L: LedStripPort,
    D: DisplayPort,
    N: NetworkPort,
    E: EventEncoder,
    C: ClockPort,
{
    /// Build the loop.  `config` is assumed to be validated already.
    pub fn new(board: Board<S, L, D, N, E, C>, config: &SystemConfig) -> Self {
        let supervisor = ConnectivitySupervisor::new(
            board.network,
            config.credentials.clone(),
            config.osc_target(),
            u64::from(config.health_check_interval_ms),
        );

        Self {
            sensor: board.sensor,
            arbiter: TouchArbiter::new(config.release_polls),
            animator: FeedbackAnimator::new(board.strip, config.fill_step_ms),
            supervisor,
            dispatcher: EventDispatcher::new(board.encoder),
            display: board.display,
            clock: board.clock,

            touch: TouchState::default(),
            telemetry: IntervalTimer::new(u64::from(config.telemetry_interval_secs) * 1000),
            idle_timeout_ms: u64::from(config.idle_timeout_ms),
            tick_period_ms: u64::from(config.tick_interval_ms),

            last_view: None,
            last_link: LinkStatus::Disconnected,
            tick_count: 0,
            sensor_faults: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Blank the strip and show the initial status before the first tick.
    pub fn start(&mut self, sink: &mut impl EventSink) {
        self.animator.clear();
        self.present();
        sink.emit(&AppEvent::Started);
        info!("MainLoop started (tick {} ms)", self.tick_period_ms);
    }

    /// Start, then tick forever.
    pub fn run(&mut self, sink: &mut impl EventSink) -> ! {
        self.start(sink);
        loop {
            self.tick(sink);
        }
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one full cycle, including the trailing sleep.
    pub fn tick(&mut self, sink: &mut impl EventSink) {
        let started = self.clock.now_ms();
        self.tick_count += 1;

        // 1. Connectivity health check on its own cadence
        if self.supervisor.is_health_check_due(started) {
            self.supervisor.tick(started);
            self.note_link(sink);
        }

        // 2. Touch arbitration; a faulty read counts as an empty poll
        let edge = match self.arbiter.poll(&mut self.sensor) {
            Ok(edge) => edge,
            Err(fault) => {
                self.sensor_faults = self.sensor_faults.wrapping_add(1);
                sink.emit(&AppEvent::SensorFault(fault));
                self.arbiter.update(None)
            }
        };
        let now = self.clock.now_ms();

        // 3. Selected channel
        match edge {
            TouchEdge::Pressed(channel) => {
                sink.emit(&AppEvent::Touched(channel));
                self.animator.animate(channel, &mut self.clock);
                // Idle countdown starts once the strip is fully lit.
                self.touch.activate(channel, self.clock.now_ms());
                if self.supervisor.is_connected() {
                    self.send_touch(channel, sink);
                }
            }
            TouchEdge::Held(channel) => self.touch.activate(channel, now),
            TouchEdge::Released(channel) => sink.emit(&AppEvent::Released(channel)),
            TouchEdge::None => {}
        }

        // 4. Idle reset
        let selected = matches!(edge, TouchEdge::Pressed(_) | TouchEdge::Held(_));
        if !selected && self.touch.is_expired(now, self.idle_timeout_ms) {
            self.touch.clear();
            self.arbiter.reset();
            self.animator.clear();
            sink.emit(&AppEvent::IdleReset);
        }

        // 5. Display
        self.present();

        if self.telemetry.is_due(now) {
            self.telemetry.reset(now);
            sink.emit(&AppEvent::Telemetry(self.build_telemetry()));
        }

        // 6. Sleep out the rest of the period
        let elapsed = self.clock.now_ms().saturating_sub(started);
        if elapsed < self.tick_period_ms {
            self.clock.delay_ms((self.tick_period_ms - elapsed) as u32);
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn build_telemetry(&self) -> TelemetryData {
        let stats = self.dispatcher.stats();
        TelemetryData {
            link: self.supervisor.status(),
            tick_count: self.tick_count,
            active_channel: self.touch.active_channel(),
            delivered: stats.delivered,
            retried: stats.retried,
            dropped: stats.dropped,
            sensor_faults: self.sensor_faults,
        }
    }

    pub fn touch_state(&self) -> TouchState {
        self.touch
    }

    pub fn link_status(&self) -> LinkStatus {
        self.supervisor.status()
    }

    pub fn dispatch_stats(&self) -> DispatchStats {
        self.dispatcher.stats()
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn sensor_mut(&mut self) -> &mut S {
        &mut self.sensor
    }

    pub fn strip(&self) -> &L {
        self.animator.strip()
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn network(&self) -> &N {
        self.supervisor.network()
    }

    pub fn network_mut(&mut self) -> &mut N {
        self.supervisor.network_mut()
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    // ── Internal ──────────────────────────────────────────────

    fn send_touch(&mut self, channel: Channel, sink: &mut impl EventSink) {
        let event = OutboundEvent::touch(channel);
        match self.dispatcher.dispatch(&mut self.supervisor, &event) {
            Ok(attempts) => sink.emit(&AppEvent::EventDelivered { channel, attempts }),
            Err(error) => sink.emit(&AppEvent::EventDropped { channel, error }),
        }
        // A retry may have rebuilt (or lost) the session.
        self.note_link(sink);
    }

    fn note_link(&mut self, sink: &mut impl EventSink) {
        let link = self.supervisor.status();
        if link != self.last_link {
            sink.emit(&AppEvent::LinkChanged {
                from: self.last_link,
                to: link,
            });
            self.last_link = link;
        }
    }

    fn present(&mut self) {
        let view = StatusPresenter::render(self.supervisor.status(), &self.touch);
        if self.last_view.as_ref() == Some(&view) {
            return;
        }
        self.display.set_text(TextField::Status, view.status);
        self.display.set_text(TextField::TouchMessage, &view.touch);
        self.display.refresh();
        self.last_view = Some(view);
    }
}
