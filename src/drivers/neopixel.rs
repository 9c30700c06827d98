//! WS2812B ("NeoPixel") LED strip driver.
//!
//! Keeps a frame buffer of staged pixels; [`show`](LedStripPort::show)
//! applies the global brightness and clocks the frame out.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: one RMT TX channel generates the 800 kHz bit stream (GRB,
//! MSB first).
//! On host/test: the latched frame is kept in memory for inspection.

use crate::app::ports::LedStripPort;
use crate::feedback::{COLOUR_OFF, Rgb};

#[cfg(target_os = "espidf")]
use esp_idf_hal::rmt::{PinState, Pulse, TxRmtDriver, VariableLengthSignal};

pub struct NeoPixelStrip {
    staged: Vec<Rgb>,
    brightness: u8,
    frames: u32,
    #[cfg(not(target_os = "espidf"))]
    latched: Vec<Rgb>,
    #[cfg(target_os = "espidf")]
    tx: TxRmtDriver<'static>,
    /// (T0H, T0L, T1H, T1L) bit timings in RMT ticks.
    #[cfg(target_os = "espidf")]
    pulses: (Pulse, Pulse, Pulse, Pulse),
}

/// Scale a colour by `brightness` (0–255).
pub fn scale(colour: Rgb, brightness: u8) -> Rgb {
    let br = brightness as u16;
    let (r, g, b) = colour;
    (
        ((r as u16 * br) / 255) as u8,
        ((g as u16 * br) / 255) as u8,
        ((b as u16 * br) / 255) as u8,
    )
}

/// Convert a 1–100 % setting to the 0–255 scale factor.
fn brightness_from_percent(percent: u8) -> u8 {
    ((u16::from(percent.min(100)) * 255) / 100) as u8
}

impl NeoPixelStrip {
    #[cfg(not(target_os = "espidf"))]
    pub fn new(pixel_count: usize, brightness_percent: u8) -> Self {
        Self {
            staged: vec![COLOUR_OFF; pixel_count],
            brightness: brightness_from_percent(brightness_percent),
            frames: 0,
            latched: vec![COLOUR_OFF; pixel_count],
        }
    }

    /// Wrap an RMT channel already bound to the data pin.
    #[cfg(target_os = "espidf")]
    pub fn new(
        tx: TxRmtDriver<'static>,
        pixel_count: usize,
        brightness_percent: u8,
    ) -> Result<Self, esp_idf_sys::EspError> {
        use core::time::Duration;

        let ticks_hz = tx.counter_clock()?;
        let pulses = (
            Pulse::new_with_duration(ticks_hz, PinState::High, &Duration::from_nanos(350))?,
            Pulse::new_with_duration(ticks_hz, PinState::Low, &Duration::from_nanos(800))?,
            Pulse::new_with_duration(ticks_hz, PinState::High, &Duration::from_nanos(700))?,
            Pulse::new_with_duration(ticks_hz, PinState::Low, &Duration::from_nanos(600))?,
        );
        Ok(Self {
            staged: vec![COLOUR_OFF; pixel_count],
            brightness: brightness_from_percent(brightness_percent),
            frames: 0,
            tx,
            pulses,
        })
    }

    /// Frames latched since construction.
    pub fn frames(&self) -> u32 {
        self.frames
    }

    /// The frame most recently clocked out (after brightness scaling).
    #[cfg(not(target_os = "espidf"))]
    pub fn latched(&self) -> &[Rgb] {
        &self.latched
    }

    // ── Platform-specific ─────────────────────────────────────

    #[cfg(target_os = "espidf")]
    fn platform_write(&mut self) {
        let (t0h, t0l, t1h, t1l) = self.pulses;
        let mut signal = VariableLengthSignal::with_capacity(self.staged.len() * 24 * 2);
        for &colour in &self.staged {
            let (r, g, b) = scale(colour, self.brightness);
            let grb = (u32::from(g) << 16) | (u32::from(r) << 8) | u32::from(b);
            for bit in (0..24).rev() {
                let pair = if grb & (1 << bit) != 0 { [&t1h, &t1l] } else { [&t0h, &t0l] };
                if let Err(e) = signal.push(pair) {
                    log::warn!("NeoPixel: signal build failed: {}", e);
                    return;
                }
            }
        }
        if let Err(e) = self.tx.start_blocking(&signal) {
            log::warn!("NeoPixel: RMT write failed: {}", e);
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_write(&mut self) {
        for (out, &colour) in self.latched.iter_mut().zip(&self.staged) {
            *out = scale(colour, self.brightness);
        }
    }
}

impl LedStripPort for NeoPixelStrip {
    fn pixel_count(&self) -> usize {
        self.staged.len()
    }

    fn set_pixel(&mut self, index: usize, colour: Rgb) {
        if let Some(px) = self.staged.get_mut(index) {
            *px = colour;
        }
    }

    fn show(&mut self) {
        self.platform_write();
        self.frames = self.frames.wrapping_add(1);
    }

    fn fill(&mut self, colour: Rgb) {
        self.staged.fill(colour);
    }
}
