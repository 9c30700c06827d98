//! LED feedback: pad colour palette and the blocking fill sweep.
//!
//! A press lights the strip pixel by pixel in the pad's colour with a fixed
//! per-pixel delay, producing a visible "fill" rather than an instant flash.
//! The sweep blocks the calling task; at 44 pixels × 50 ms the loop is busy
//! for about 2.2 s and touches during that window are seen on the next tick.

use embedded_hal::delay::DelayNs;

use crate::app::ports::LedStripPort;
use crate::touch::Channel;

/// Colour as (R, G, B) tuple, each 0–255.
pub type Rgb = (u8, u8, u8);

pub const COLOUR_OFF: Rgb = (0, 0, 0);

/// One colour per pad, river themed.
pub const PAD_PALETTE: [Rgb; 12] = [
    (139, 69, 19),   // earth
    (47, 79, 79),    // river stones
    (102, 205, 170), // shallow water
    (0, 100, 0),     // algae
    (32, 178, 170),  // clean river water
    (218, 165, 32),  // pollution
    (95, 158, 160),  // river reflection
    (70, 130, 180),  // deep water
    (240, 248, 255), // foam
    (128, 128, 0),   // murky water
    (255, 228, 196), // skin
    (255, 127, 80),  // warning
];

/// Colour for a raw pad index; anything outside `0..12` is off.
pub fn colour_for_index(index: usize) -> Rgb {
    PAD_PALETTE.get(index).copied().unwrap_or(COLOUR_OFF)
}

pub fn colour_of(channel: Channel) -> Rgb {
    colour_for_index(usize::from(channel.index()))
}

/// Drives the fill/clear animation on an owned LED strip.
pub struct FeedbackAnimator<L> {
    strip: L,
    step_ms: u32,
}

impl<L: LedStripPort> FeedbackAnimator<L> {
    pub fn new(strip: L, step_ms: u32) -> Self {
        Self { strip, step_ms }
    }

    /// Sweep the strip to the channel's colour, one pixel per `step_ms`.
    ///
    /// Blocks on `delay` for `pixel_count × step_ms`.
    pub fn animate(&mut self, channel: Channel, delay: &mut impl DelayNs) {
        let colour = colour_of(channel);
        log::debug!("feedback: fill {} with {:?}", channel, colour);
        for index in 0..self.strip.pixel_count() {
            self.strip.set_pixel(index, colour);
            self.strip.show();
            delay.delay_ms(self.step_ms);
        }
    }

    /// Turn every pixel off in one batch write.
    pub fn clear(&mut self) {
        self.strip.fill(COLOUR_OFF);
        self.strip.show();
    }

    pub fn strip(&self) -> &L {
        &self.strip
    }
}
