//! Chip drivers for the installation's peripherals.
//!
//! Each driver implements one port trait from [`crate::app::ports`].

pub mod mpr121;
pub mod neopixel;
pub mod oled;
