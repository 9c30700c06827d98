//! Riverpad Firmware — Main Entry Point
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  Mpr121          NeoPixelStrip   Oled           SystemClock    │
//! │  (TouchSensor)   (LedStrip)      (Display)      (ClockPort)    │
//! │  WifiAdapter     OscEncoder      LogEventSink                  │
//! │  (Network)       (EventEncoder)  (EventSink)                   │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              MainLoop (pure logic)                     │    │
//! │  │  TouchArbiter · FeedbackAnimator · Connectivity ·      │    │
//! │  │  EventDispatcher · StatusPresenter                     │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use log::{error, info};

use esp_idf_hal::gpio::{AnyIOPin, AnyOutputPin};
use esp_idf_hal::i2c::{I2cConfig, I2cDriver};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::rmt::TxRmtDriver;
use esp_idf_hal::rmt::config::TransmitConfig;
use esp_idf_hal::units::Hertz;
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use esp_idf_svc::wifi::{BlockingWifi, EspWifi};

use riverpad::adapters::log_sink::LogEventSink;
use riverpad::adapters::osc::OscEncoder;
use riverpad::adapters::time::SystemClock;
use riverpad::adapters::wifi::WifiAdapter;
use riverpad::app::main_loop::{Board, MainLoop};
use riverpad::config::SystemConfig;
use riverpad::drivers::mpr121::Mpr121;
use riverpad::drivers::neopixel::NeoPixelStrip;
use riverpad::drivers::oled::Oled;
use riverpad::error::Error;
use riverpad::pins;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Riverpad v{}                        ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration ──────────────────────────────────────
    let config = SystemConfig::from_build_env()
        .and_then(|c| c.validate().map(|()| c))
        .map_err(|e| {
            error!("Config rejected: {}, halting", e);
            Error::from(e)
        })?;
    info!(
        "Config: ssid='{}' target={} leds={}",
        config.credentials.ssid,
        config.osc_target(),
        config.led_count
    );

    let peripherals = Peripherals::take()?;
    let i2c_config = I2cConfig::new().baudrate(Hertz(pins::I2C_FREQ_HZ));

    // ── 3. Touch sensor (I2C0) ────────────────────────────────
    // SAFETY: each GPIO number is claimed exactly once during bring-up.
    let touch_bus = I2cDriver::new(
        peripherals.i2c0,
        unsafe { AnyIOPin::new(pins::TOUCH_I2C_SDA_GPIO) },
        unsafe { AnyIOPin::new(pins::TOUCH_I2C_SCL_GPIO) },
        &i2c_config,
    )?;
    let mut sensor = Mpr121::new(touch_bus, pins::MPR121_ADDR);
    sensor.init().map_err(Error::from)?;

    // ── 4. Status display (I2C1) ──────────────────────────────
    let oled_bus = I2cDriver::new(
        peripherals.i2c1,
        unsafe { AnyIOPin::new(pins::OLED_I2C_SDA_GPIO) },
        unsafe { AnyIOPin::new(pins::OLED_I2C_SCL_GPIO) },
        &i2c_config,
    )?;
    let display = Oled::new(oled_bus);

    // ── 5. NeoPixel strip (RMT) ───────────────────────────────
    let tx = TxRmtDriver::new(
        peripherals.rmt.channel0,
        unsafe { AnyOutputPin::new(pins::NEOPIXEL_DATA_GPIO) },
        &TransmitConfig::new().clock_divider(1),
    )?;
    let strip = NeoPixelStrip::new(tx, usize::from(config.led_count), config.led_brightness_percent)?;

    // ── 6. WiFi station ───────────────────────────────────────
    let sysloop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take()?;
    let wifi = BlockingWifi::wrap(EspWifi::new(peripherals.modem, sysloop.clone(), Some(nvs))?, sysloop)?;
    let network = WifiAdapter::new(wifi);

    // ── 7. Control loop ───────────────────────────────────────
    let board = Board {
        sensor,
        strip,
        display,
        network,
        encoder: OscEncoder::new(),
        clock: SystemClock::new(),
    };
    let mut main_loop = MainLoop::new(board, &config);
    main_loop.run(&mut LogEventSink::new())
}
