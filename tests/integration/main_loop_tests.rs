//! MainLoop integration tests: full ticks against recording mocks.

use riverpad::adapters::osc::OscEncoder;
use riverpad::app::events::{AppEvent, EventArg};
use riverpad::app::main_loop::{Board, MainLoop};
use riverpad::app::ports::{ClockPort, EventEncoder};
use riverpad::config::{Credentials, SystemConfig};
use riverpad::connectivity::LinkStatus;
use riverpad::error::SendError;
use riverpad::feedback::colour_of;
use riverpad::touch::Channel;

use crate::mock_hw::{MockClock, MockNetwork, MockSensor, RecordingDisplay, RecordingSink, RecordingStrip};

type TestLoop = MainLoop<MockSensor, RecordingStrip, RecordingDisplay, MockNetwork, OscEncoder, MockClock>;

// ── Helpers ───────────────────────────────────────────────────

fn config() -> SystemConfig {
    SystemConfig {
        credentials: Credentials::new("RiverNet", "password1").unwrap(),
        ..SystemConfig::default()
    }
}

fn make_loop(network: MockNetwork) -> (TestLoop, RecordingSink) {
    make_loop_with(network, &config())
}

fn make_loop_with(network: MockNetwork, cfg: &SystemConfig) -> (TestLoop, RecordingSink) {
    let board = Board {
        sensor: MockSensor::default(),
        strip: RecordingStrip::new(usize::from(cfg.led_count)),
        display: RecordingDisplay::default(),
        network,
        encoder: OscEncoder::new(),
        clock: MockClock::default(),
    };
    let mut lp = MainLoop::new(board, cfg);
    let mut sink = RecordingSink::default();
    lp.start(&mut sink);
    (lp, sink)
}

fn online_loop(send_outcomes: Vec<bool>) -> (TestLoop, RecordingSink) {
    make_loop(MockNetwork::new(vec![], send_outcomes))
}

fn ch(i: u8) -> Channel {
    Channel::new(i).unwrap()
}

fn touch_bytes(index: i32) -> Vec<u8> {
    OscEncoder.encode_event("/touch", &[EventArg::Int(index)])
}

fn tick_n(lp: &mut TestLoop, sink: &mut RecordingSink, n: usize) {
    for _ in 0..n {
        lp.tick(sink);
    }
}

/// Tick until `ms` of simulated time have passed.
fn tick_for(lp: &mut TestLoop, sink: &mut RecordingSink, ms: u64) {
    let from = lp.clock().now_ms();
    while lp.clock().now_ms() - from < ms {
        lp.tick(sink);
    }
}

// ── Boot ──────────────────────────────────────────────────────

#[test]
fn start_blanks_strip_and_shows_initial_status() {
    let (lp, sink) = online_loop(vec![]);
    assert_eq!(lp.strip().clears, 1);
    assert!(lp.strip().is_dark());
    assert_eq!(lp.display().status, "No WiFi");
    assert_eq!(lp.display().touch, "Touch a pad!");
    assert_eq!(sink.events, vec![AppEvent::Started]);
}

#[test]
fn first_tick_connects() {
    let (mut lp, mut sink) = online_loop(vec![]);
    lp.tick(&mut sink);
    assert_eq!(lp.link_status(), LinkStatus::Connected);
    assert_eq!(lp.display().status, "W-Osc");
    assert!(sink.events.contains(&AppEvent::LinkChanged {
        from: LinkStatus::Disconnected,
        to: LinkStatus::Connected,
    }));
}

// ── Scenario: press, hold, idle reset ─────────────────────────

#[test]
fn held_pad_animates_and_sends_once_then_idles_out() {
    let (mut lp, mut sink) = online_loop(vec![]);

    lp.sensor_mut().mask = 1 << 3;
    tick_n(&mut lp, &mut sink, 3);
    assert_eq!(lp.strip().sweeps, vec![colour_of(ch(3))]);
    assert_eq!(lp.display().touch, "Touched pad #4!");

    lp.sensor_mut().mask = 0;
    tick_for(&mut lp, &mut sink, 6_000);

    assert_eq!(lp.strip().sweeps.len(), 1, "one sweep for one press");
    assert_eq!(lp.network().wire.borrow().sent, vec![touch_bytes(3)]);
    assert_eq!(lp.strip().clears, 2, "boot clear plus idle clear");
    assert!(lp.strip().is_dark());
    assert_eq!(lp.display().touch, "Touch a pad!");
    assert!(!lp.touch_state().is_active());
    assert_eq!(sink.count(|e| *e == AppEvent::IdleReset), 1);
    assert_eq!(sink.count(|e| matches!(e, AppEvent::Touched(_))), 1);
    assert_eq!(sink.count(|e| *e == AppEvent::Released(ch(3))), 1);
}

#[test]
fn idle_reset_waits_for_full_timeout() {
    let (mut lp, mut sink) = online_loop(vec![]);
    lp.sensor_mut().mask = 1 << 0;
    lp.tick(&mut sink);
    let last_seen = lp.touch_state().activated_at().unwrap();
    lp.sensor_mut().mask = 0;

    while lp.clock().now_ms() < last_seen + 4_900 {
        lp.tick(&mut sink);
    }
    assert!(lp.touch_state().is_active());
    assert_eq!(sink.count(|e| *e == AppEvent::IdleReset), 0);

    tick_for(&mut lp, &mut sink, 200);
    assert!(!lp.touch_state().is_active());
}

#[test]
fn strip_stays_lit_for_full_timeout_after_sweep() {
    let (mut lp, mut sink) = online_loop(vec![]);
    lp.sensor_mut().mask = 1 << 3;
    lp.tick(&mut sink);
    let sweep_end = lp.clock().now_ms();
    lp.sensor_mut().mask = 0;

    let mut cleared_at = None;
    for _ in 0..1_000 {
        let tick_start = lp.clock().now_ms();
        lp.tick(&mut sink);
        if sink.count(|e| *e == AppEvent::IdleReset) == 1 {
            cleared_at = Some(tick_start);
            break;
        }
    }
    let cleared_at = cleared_at.expect("idle reset never happened");
    assert!(
        cleared_at - sweep_end >= u64::from(config().idle_timeout_ms),
        "lit for only {} ms after the sweep",
        cleared_at - sweep_end
    );
}

#[test]
fn same_pad_after_idle_reset_is_a_fresh_press() {
    // Release hysteresis longer than the idle timeout.
    let cfg = SystemConfig {
        release_polls: 60,
        ..config()
    };
    let (mut lp, mut sink) = make_loop_with(MockNetwork::new(vec![], vec![]), &cfg);
    lp.sensor_mut().mask = 1 << 3;
    lp.tick(&mut sink);
    lp.sensor_mut().mask = 0;
    for _ in 0..1_000 {
        lp.tick(&mut sink);
        if sink.count(|e| *e == AppEvent::IdleReset) == 1 {
            break;
        }
    }
    assert_eq!(lp.display().touch, "Touch a pad!");

    lp.sensor_mut().mask = 1 << 3;
    lp.tick(&mut sink);
    assert_eq!(lp.strip().sweeps.len(), 2);
    assert_eq!(lp.network().wire.borrow().sent, vec![touch_bytes(3), touch_bytes(3)]);
    assert_eq!(lp.display().touch, "Touched pad #4!");
}

#[test]
fn holding_a_pad_keeps_it_active() {
    let (mut lp, mut sink) = online_loop(vec![]);
    lp.sensor_mut().mask = 1 << 6;
    tick_for(&mut lp, &mut sink, 8_000);
    assert!(lp.touch_state().is_active());
    assert_eq!(lp.strip().sweeps.len(), 1);
    assert_eq!(sink.count(|e| *e == AppEvent::IdleReset), 0);
}

#[test]
fn lowest_channel_wins_simultaneous_touch() {
    let (mut lp, mut sink) = online_loop(vec![]);
    lp.sensor_mut().mask = (1 << 2) | (1 << 7) | (1 << 11);
    lp.tick(&mut sink);
    assert_eq!(lp.touch_state().active_channel(), Some(ch(2)));
    assert_eq!(lp.strip().sweeps, vec![colour_of(ch(2))]);
    assert_eq!(lp.network().wire.borrow().sent, vec![touch_bytes(2)]);
}

#[test]
fn new_pad_after_release_is_a_new_press() {
    let (mut lp, mut sink) = online_loop(vec![]);
    lp.sensor_mut().mask = 1 << 1;
    lp.tick(&mut sink);
    lp.sensor_mut().mask = 0;
    tick_n(&mut lp, &mut sink, 2);
    lp.sensor_mut().mask = 1 << 9;
    lp.tick(&mut sink);

    assert_eq!(lp.strip().sweeps, vec![colour_of(ch(1)), colour_of(ch(9))]);
    assert_eq!(lp.network().wire.borrow().sent, vec![touch_bytes(1), touch_bytes(9)]);
    assert_eq!(lp.display().touch, "Touched pad #10!");
}

#[test]
fn sweep_blocks_for_pixel_count_times_step() {
    let (mut lp, mut sink) = online_loop(vec![]);
    lp.sensor_mut().mask = 1 << 4;
    let before = lp.clock().now_ms();
    lp.tick(&mut sink);
    // 44 pixels × 50 ms, longer than the tick period so no extra sleep.
    assert_eq!(lp.clock().now_ms() - before, 2_200);
    assert_eq!(lp.strip().shows, 1 + 44);
}

// ── Scenario: connect retries ─────────────────────────────────

#[test]
fn status_stays_no_wifi_until_connect_succeeds() {
    let (mut lp, mut sink) = make_loop(MockNetwork::new(vec![false, false, false, true], vec![]));

    let mut after_each_check = Vec::new();
    let mut seen = 0;
    for _ in 0..1_000 {
        lp.tick(&mut sink);
        if lp.network().connects > seen {
            seen = lp.network().connects;
            after_each_check.push(lp.display().status.clone());
        }
        if seen == 4 {
            break;
        }
    }
    assert_eq!(after_each_check, vec!["No WiFi", "No WiFi", "No WiFi", "W-Osc"]);
}

#[test]
fn press_while_offline_animates_without_sending() {
    let (mut lp, mut sink) = make_loop(MockNetwork::new(vec![false], vec![]));
    lp.sensor_mut().mask = 1 << 5;
    lp.tick(&mut sink);

    assert_eq!(lp.strip().sweeps.len(), 1);
    assert_eq!(lp.network().wire.borrow().calls, 0);
    assert_eq!(lp.dispatch_stats().dropped, 0);
    assert_eq!(sink.count(|e| matches!(e, AppEvent::EventDropped { .. })), 0);
}

#[test]
fn lost_address_shows_reconnecting_then_recovers() {
    let (mut lp, mut sink) = online_loop(vec![]);
    lp.tick(&mut sink);
    lp.network_mut().associated = false;

    tick_for(&mut lp, &mut sink, 5_000);
    assert_eq!(lp.link_status(), LinkStatus::Reconnecting);
    assert_eq!(lp.display().status, "WiFi connecting....");

    tick_for(&mut lp, &mut sink, 5_000);
    assert_eq!(lp.link_status(), LinkStatus::Connected);
    assert_eq!(lp.display().status, "W-Osc");
    assert_eq!(lp.network().sessions, 2);
}

// ── Scenario: dispatch retry ──────────────────────────────────

#[test]
fn single_send_failure_is_retried_and_delivered_once() {
    let (mut lp, mut sink) = online_loop(vec![false, true]);
    lp.sensor_mut().mask = 1 << 3;
    lp.tick(&mut sink);

    let wire = lp.network().wire.clone();
    assert_eq!(wire.borrow().calls, 2);
    assert_eq!(wire.borrow().sent, vec![touch_bytes(3)]);
    assert_eq!(lp.network().sessions, 2, "retry used a fresh session");
    assert_eq!(lp.dispatch_stats().delivered, 1);
    assert_eq!(lp.dispatch_stats().retried, 1);
    assert!(sink.events.contains(&AppEvent::EventDelivered {
        channel: ch(3),
        attempts: 2,
    }));
    assert_eq!(lp.display().status, "W-Osc");
}

#[test]
fn double_send_failure_drops_event_and_loop_continues() {
    let (mut lp, mut sink) = online_loop(vec![false, false]);
    lp.sensor_mut().mask = 1 << 3;
    lp.tick(&mut sink);

    assert_eq!(lp.network().wire.borrow().calls, 2, "never more than two attempts");
    assert!(lp.network().wire.borrow().sent.is_empty());
    assert_eq!(lp.dispatch_stats().dropped, 1);
    assert!(sink.events.contains(&AppEvent::EventDropped {
        channel: ch(3),
        error: SendError::Transport,
    }));

    // Release, then press another pad: the next event goes through.
    lp.sensor_mut().mask = 0;
    tick_n(&mut lp, &mut sink, 2);
    lp.sensor_mut().mask = 1 << 8;
    lp.tick(&mut sink);

    assert_eq!(lp.network().wire.borrow().sent, vec![touch_bytes(8)]);
    assert_eq!(lp.dispatch_stats().delivered, 1);
    assert_eq!(lp.touch_state().active_channel(), Some(ch(8)));
    assert_eq!(lp.link_status(), LinkStatus::Connected);
}

// ── Faults, telemetry, display ────────────────────────────────

#[test]
fn sensor_fault_counts_as_empty_poll() {
    let (mut lp, mut sink) = online_loop(vec![]);
    lp.sensor_mut().mask = 1 << 2;
    lp.tick(&mut sink);

    lp.sensor_mut().fault = true;
    tick_n(&mut lp, &mut sink, 2);
    assert_eq!(sink.count(|e| matches!(e, AppEvent::SensorFault(_))), 2);
    assert_eq!(sink.count(|e| *e == AppEvent::Released(ch(2))), 1);

    lp.sensor_mut().fault = false;
    lp.sensor_mut().mask = 1 << 2;
    lp.tick(&mut sink);
    assert_eq!(lp.strip().sweeps.len(), 2, "re-touch after release is a new press");
    assert_eq!(lp.build_telemetry().sensor_faults, 2);
}

#[test]
fn telemetry_on_first_tick_and_every_minute() {
    let (mut lp, mut sink) = online_loop(vec![]);
    lp.tick(&mut sink);
    assert_eq!(sink.count(|e| matches!(e, AppEvent::Telemetry(_))), 1);

    tick_for(&mut lp, &mut sink, 59_000);
    assert_eq!(sink.count(|e| matches!(e, AppEvent::Telemetry(_))), 1);

    tick_for(&mut lp, &mut sink, 1_100);
    assert_eq!(sink.count(|e| matches!(e, AppEvent::Telemetry(_))), 2);

    let Some(AppEvent::Telemetry(t)) = sink.events.iter().rev().find(|e| matches!(e, AppEvent::Telemetry(_)))
    else {
        unreachable!()
    };
    assert_eq!(t.link, LinkStatus::Connected);
    assert!(t.tick_count > 600);
}

#[test]
fn display_is_only_refreshed_on_change() {
    let (mut lp, mut sink) = online_loop(vec![]);
    lp.tick(&mut sink);
    let after_connect = lp.display().refreshes;
    tick_n(&mut lp, &mut sink, 20);
    assert_eq!(lp.display().refreshes, after_connect);

    lp.sensor_mut().mask = 1 << 0;
    lp.tick(&mut sink);
    assert_eq!(lp.display().refreshes, after_connect + 1);
}

#[test]
fn idle_tick_sleeps_out_the_period() {
    let (mut lp, mut sink) = online_loop(vec![]);
    lp.tick(&mut sink);
    let before = lp.clock().now_ms();
    tick_n(&mut lp, &mut sink, 10);
    assert_eq!(lp.clock().now_ms() - before, 1_000);
    assert_eq!(lp.tick_count(), 11);
}
