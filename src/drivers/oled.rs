//! SSD1306 128x32 status panel.
//!
//! Two text rows, one per [`TextField`].  Text is staged with
//! [`set_text`](DisplayPort::set_text) and drawn into the frame buffer on
//! [`refresh`](DisplayPort::refresh), which also flushes it over I2C.
//! Panel errors are logged and otherwise ignored; the loop keeps running
//! with a dark screen.

use core::fmt::Write as _;

use embedded_graphics::mono_font::ascii::FONT_6X10;
use embedded_graphics::mono_font::{MonoTextStyle, MonoTextStyleBuilder};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::Text;
use log::warn;
use ssd1306::I2CDisplayInterface;
use ssd1306::Ssd1306;
use ssd1306::mode::BufferedGraphicsMode;
use ssd1306::prelude::*;

use crate::app::ports::{DisplayPort, TextField};

type Panel<I2C> = Ssd1306<I2CInterface<I2C>, DisplaySize128x32, BufferedGraphicsMode<DisplaySize128x32>>;

/// 21 columns of 6 px fit on the panel; the rest is cut.
const ROW_CHARS: usize = 21;

/// Baselines for the two rows.
const STATUS_Y: i32 = 10;
const TOUCH_Y: i32 = 26;

pub struct Oled<I2C> {
    panel: Panel<I2C>,
    status: heapless::String<ROW_CHARS>,
    touch: heapless::String<ROW_CHARS>,
    flushes: u32,
}

fn text_style() -> MonoTextStyle<'static, BinaryColor> {
    MonoTextStyleBuilder::new()
        .font(&FONT_6X10)
        .text_color(BinaryColor::On)
        .build()
}

/// Copy `text` into `dst`, dropping whatever does not fit.
fn stage<const N: usize>(dst: &mut heapless::String<N>, text: &str) {
    dst.clear();
    for c in text.chars() {
        if dst.write_char(c).is_err() {
            break;
        }
    }
}

impl<I2C: embedded_hal::i2c::I2c> Oled<I2C> {
    /// Initialise the panel and blank it.
    pub fn new(i2c: I2C) -> Self {
        let interface = I2CDisplayInterface::new(i2c);
        let mut panel =
            Ssd1306::new(interface, DisplaySize128x32, DisplayRotation::Rotate0).into_buffered_graphics_mode();
        if let Err(e) = panel.init() {
            warn!("OLED: init failed: {:?}", e);
        }
        panel.clear_buffer();
        if let Err(e) = panel.flush() {
            warn!("OLED: initial flush failed: {:?}", e);
        }
        Self {
            panel,
            status: heapless::String::new(),
            touch: heapless::String::new(),
            flushes: 0,
        }
    }

    /// Staged text for `field`, as it will be (or was) drawn.
    pub fn text(&self, field: TextField) -> &str {
        match field {
            TextField::Status => &self.status,
            TextField::TouchMessage => &self.touch,
        }
    }

    /// Successful flushes since construction.
    pub fn flushes(&self) -> u32 {
        self.flushes
    }
}

impl<I2C: embedded_hal::i2c::I2c> DisplayPort for Oled<I2C> {
    fn set_text(&mut self, field: TextField, text: &str) {
        match field {
            TextField::Status => stage(&mut self.status, text),
            TextField::TouchMessage => stage(&mut self.touch, text),
        }
    }

    fn refresh(&mut self) {
        self.panel.clear_buffer();
        let style = text_style();
        let _ = Text::new(&self.status, Point::new(0, STATUS_Y), style).draw(&mut self.panel);
        let _ = Text::new(&self.touch, Point::new(0, TOUCH_Y), style).draw(&mut self.panel);
        match self.panel.flush() {
            Ok(()) => self.flushes = self.flushes.wrapping_add(1),
            Err(e) => warn!("OLED: flush failed: {:?}", e),
        }
    }
}
