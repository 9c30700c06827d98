//! MPR121 12-channel capacitive touch controller.
//!
//! Talks to the chip through any `embedded_hal::i2c::I2c` bus, so the same
//! driver runs on the ESP-IDF I2C peripheral and on a host-side mock.
//!
//! Bring-up follows the vendor quick-start sequence: soft reset, stop mode,
//! per-electrode thresholds, baseline filter settings, then run mode with all
//! twelve electrodes enabled.  Thresholds are fixed defaults; per-pad tuning
//! is done on the breakout, not here.

use embedded_hal::i2c::I2c;
use log::{debug, error, info};

use crate::app::ports::TouchSensorPort;
use crate::error::SensorFault;
use crate::touch::Channel;

// ── Register map (subset) ─────────────────────────────────────

const REG_TOUCH_STATUS_L: u8 = 0x00;
const REG_MHD_RISING: u8 = 0x2B;
const REG_TOUCH_THRESHOLD_0: u8 = 0x41;
const REG_RELEASE_THRESHOLD_0: u8 = 0x42;
const REG_DEBOUNCE: u8 = 0x5B;
const REG_CONFIG1: u8 = 0x5C;
const REG_CONFIG2: u8 = 0x5D;
const REG_ECR: u8 = 0x5E;
const REG_SOFT_RESET: u8 = 0x80;

const SOFT_RESET_MAGIC: u8 = 0x63;
/// CONFIG2 reads back this value after a successful reset.
const CONFIG2_RESET_VALUE: u8 = 0x24;
/// Baseline tracking enabled, electrodes 0-11 in run mode.
const ECR_RUN_ALL: u8 = 0x8F;
/// Over-current flag, bit 7 of the high status byte.
const STATUS_OVCF: u16 = 1 << 15;

pub const DEFAULT_TOUCH_THRESHOLD: u8 = 12;
pub const DEFAULT_RELEASE_THRESHOLD: u8 = 6;

/// Baseline filter registers 0x2B..=0x35 (rising, falling, touched).
const BASELINE_FILTER: [u8; 11] = [0x01, 0x01, 0x0E, 0x00, 0x01, 0x05, 0x01, 0x00, 0x00, 0x00, 0x00];

pub struct Mpr121<I2C> {
    i2c: I2C,
    address: u8,
    /// Status bitmap latched when channel 0 is queried.
    snapshot: u16,
}

impl<I2C: I2c> Mpr121<I2C> {
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self {
            i2c,
            address,
            snapshot: 0,
        }
    }

    /// Reset and configure the controller.  Fatal at boot if it fails.
    pub fn init(&mut self) -> Result<(), SensorFault> {
        self.write_register(REG_SOFT_RESET, SOFT_RESET_MAGIC)?;
        self.write_register(REG_ECR, 0x00)?;

        let config2 = self.read_register(REG_CONFIG2)?;
        if config2 != CONFIG2_RESET_VALUE {
            error!("MPR121: unexpected CONFIG2 0x{:02X} after reset", config2);
            return Err(SensorFault::BusError);
        }

        self.set_thresholds(DEFAULT_TOUCH_THRESHOLD, DEFAULT_RELEASE_THRESHOLD)?;

        for (offset, value) in BASELINE_FILTER.iter().enumerate() {
            self.write_register(REG_MHD_RISING + offset as u8, *value)?;
        }
        self.write_register(REG_DEBOUNCE, 0x00)?;
        self.write_register(REG_CONFIG1, 0x10)?; // 16 µA charge current
        self.write_register(REG_CONFIG2, 0x20)?; // 0.5 µs charge time

        self.write_register(REG_ECR, ECR_RUN_ALL)?;
        info!("MPR121: ready at 0x{:02X}", self.address);
        Ok(())
    }

    /// Program the same touch/release threshold on every electrode.
    pub fn set_thresholds(&mut self, touch: u8, release: u8) -> Result<(), SensorFault> {
        for channel in Channel::all() {
            let base = channel.index() * 2;
            self.write_register(REG_TOUCH_THRESHOLD_0 + base, touch)?;
            self.write_register(REG_RELEASE_THRESHOLD_0 + base, release)?;
        }
        Ok(())
    }

    /// 12-bit touch bitmap, bit `n` set when electrode `n` is touched.
    pub fn touched_mask(&mut self) -> Result<u16, SensorFault> {
        let mut buf = [0u8; 2];
        self.i2c
            .write_read(self.address, &[REG_TOUCH_STATUS_L], &mut buf)
            .map_err(|e| {
                debug!("MPR121: status read failed: {:?}", e);
                SensorFault::BusError
            })?;
        let raw = u16::from_le_bytes(buf);
        if raw & STATUS_OVCF != 0 {
            return Err(SensorFault::OverCurrent);
        }
        Ok(raw & 0x0FFF)
    }

    pub fn release(self) -> I2C {
        self.i2c
    }

    fn write_register(&mut self, register: u8, value: u8) -> Result<(), SensorFault> {
        self.i2c
            .write(self.address, &[register, value])
            .map_err(|_| SensorFault::BusError)
    }

    fn read_register(&mut self, register: u8) -> Result<u8, SensorFault> {
        let mut buf = [0u8; 1];
        self.i2c
            .write_read(self.address, &[register], &mut buf)
            .map_err(|_| SensorFault::BusError)?;
        Ok(buf[0])
    }
}

/// One status read per scan: querying channel 0 latches the whole bitmap and
/// the remaining channels are answered from it.
impl<I2C: I2c> TouchSensorPort for Mpr121<I2C> {
    fn is_touched(&mut self, channel: Channel) -> Result<bool, SensorFault> {
        if channel.index() == 0 {
            self.snapshot = self.touched_mask()?;
        }
        Ok(self.snapshot & (1 << channel.index()) != 0)
    }
}
