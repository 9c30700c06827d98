//! GPIO / peripheral pin assignments for the Riverpad controller board.
//!
//! Every peripheral is wired up in `main.rs` from these numbers.
//!
//! Target: ESP32-S3 Feather-format board.

// ---------------------------------------------------------------------------
// Touch sensor (MPR121 breakout) — I2C0
// ---------------------------------------------------------------------------

pub const TOUCH_I2C_SDA_GPIO: i32 = 3;
pub const TOUCH_I2C_SCL_GPIO: i32 = 4;
/// MPR121 with ADDR tied to GND.
pub const MPR121_ADDR: u8 = 0x5A;

// ---------------------------------------------------------------------------
// Status display (SSD1306 128x32 OLED) — I2C1
// ---------------------------------------------------------------------------

/// The OLED sits on its own bus so the sensor and panel drivers can each own
/// an I2C peripheral outright.
pub const OLED_I2C_SDA_GPIO: i32 = 41;
pub const OLED_I2C_SCL_GPIO: i32 = 40;

/// Both buses run in fast mode.
pub const I2C_FREQ_HZ: u32 = 400_000;

// ---------------------------------------------------------------------------
// NeoPixel strip (WS2812B) — RMT channel 0
// ---------------------------------------------------------------------------

pub const NEOPIXEL_DATA_GPIO: i32 = 7;
