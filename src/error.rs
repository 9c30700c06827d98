//! Unified error types for the Riverpad firmware.
//!
//! Each component boundary returns its own small error enum; all of them
//! convert into the top-level [`Error`] so bring-up code can use `?`
//! uniformly.  Every variant is `Copy` so errors can be logged, counted and
//! passed around the control loop without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The touch sensor could not be read.
    Sensor(SensorFault),
    /// The radio could not join the network or open a session.
    Connect(ConnectError),
    /// An outbound event could not be delivered.
    Send(SendError),
    /// Boot-time configuration is invalid.
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Connect(e) => write!(f, "connect: {e}"),
            Self::Send(e) => write!(f, "send: {e}"),
            Self::Config(e) => write!(f, "config: {e}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Sensor faults
// ---------------------------------------------------------------------------

/// The capacitive sensor could not be read.
///
/// Distinct from "no touch": the loop logs it and treats the tick as empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorFault {
    /// The I2C transaction with the sensor failed.
    BusError,
    /// Channel index outside `0..12`.
    InvalidChannel(u8),
    /// The sensor reported an over-current condition on its electrodes.
    OverCurrent,
}

impl fmt::Display for SensorFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BusError => write!(f, "I2C bus error"),
            Self::InvalidChannel(ch) => write!(f, "invalid channel {ch}"),
            Self::OverCurrent => write!(f, "electrode over-current"),
        }
    }
}

impl From<SensorFault> for Error {
    fn from(e: SensorFault) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// Connect errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectError {
    NoCredentials,
    InvalidSsid,
    InvalidPassword,
    ConnectionFailed,
    /// Associated with the AP but no DHCP lease.
    NoAddress,
    /// The outbound socket could not be created.
    SessionUnavailable,
}

impl fmt::Display for ConnectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoCredentials => write!(f, "no WiFi credentials configured"),
            Self::InvalidSsid => write!(f, "SSID invalid (must be 1-32 printable ASCII bytes)"),
            Self::InvalidPassword => write!(f, "password invalid (must be 8-64 bytes for WPA2, or empty for open)"),
            Self::ConnectionFailed => write!(f, "WiFi connection failed"),
            Self::NoAddress => write!(f, "no IPv4 address assigned"),
            Self::SessionUnavailable => write!(f, "outbound session could not be opened"),
        }
    }
}

impl From<ConnectError> for Error {
    fn from(e: ConnectError) -> Self {
        Self::Connect(e)
    }
}

// ---------------------------------------------------------------------------
// Send errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendError {
    /// The transport rejected the datagram (broken pipe, no route, ...).
    Transport,
    /// There is no established session to send on.
    NoSession,
    /// The retry could not get a fresh session.
    RenewFailed(ConnectError),
}

impl fmt::Display for SendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport => write!(f, "transport failure"),
            Self::NoSession => write!(f, "no session"),
            Self::RenewFailed(e) => write!(f, "session renewal failed: {}", e),
        }
    }
}

impl From<SendError> for Error {
    fn from(e: SendError) -> Self {
        Self::Send(e)
    }
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// Configuration problems.  Fatal at startup only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The configuration document could not be parsed.
    Malformed,
    /// A field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed => write!(f, "malformed configuration"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}
