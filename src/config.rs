//! System configuration parameters
//!
//! Every tunable of the installation lives in [`SystemConfig`].  The core
//! takes these as constructor parameters and never re-reads them; values are
//! validated once at boot by [`SystemConfig::validate`].
//!
//! Two independent constructors, each starting from [`SystemConfig::default`]:
//! - [`SystemConfig::from_build_env`] overlays the compile-time `WIFI_SSID`,
//!   `WIFI_PASSWORD` and `OSC_TARGET` variables.  The firmware boots with this.
//! - [`SystemConfig::from_json`] fills missing fields with defaults and does
//!   not consult the build environment.  Used by hosts and tests.

use core::net::{Ipv4Addr, SocketAddrV4};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// WiFi station credentials.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub ssid: heapless::String<32>,
    pub password: heapless::String<64>,
}

impl Credentials {
    /// Build validated credentials from borrowed strings.
    pub fn new(ssid: &str, password: &str) -> Result<Self, ConfigError> {
        validate_ssid(ssid)?;
        validate_password(password)?;
        let mut c = Self::default();
        c.ssid
            .push_str(ssid)
            .map_err(|_| ConfigError::ValidationFailed("wifi_ssid longer than 32 bytes"))?;
        c.password
            .push_str(password)
            .map_err(|_| ConfigError::ValidationFailed("wifi_password longer than 64 bytes"))?;
        Ok(c)
    }
}

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    // --- Network ---
    pub credentials: Credentials,
    /// Multicast group the touch events are sent to.
    pub osc_target_addr: [u8; 4],
    pub osc_target_port: u16,

    // --- LED strip ---
    pub led_count: u16,
    /// Global brightness (1-100%).
    pub led_brightness_percent: u8,
    /// Per-pixel delay of the fill sweep (milliseconds).
    pub fill_step_ms: u32,

    // --- Touch ---
    /// Consecutive empty polls before a held pad counts as released.
    pub release_polls: u8,
    /// Inactivity after which the touch text and LEDs reset (milliseconds).
    pub idle_timeout_ms: u32,

    // --- Timing ---
    /// Main loop tick period (milliseconds)
    pub tick_interval_ms: u32,
    /// Connectivity health-check period (milliseconds)
    pub health_check_interval_ms: u32,
    /// Telemetry report interval (seconds)
    pub telemetry_interval_secs: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            credentials: Credentials::default(),
            osc_target_addr: [224, 0, 0, 1],
            osc_target_port: 5000,

            led_count: 44,
            led_brightness_percent: 50,
            fill_step_ms: 50,

            release_polls: 2,
            idle_timeout_ms: 5_000,

            tick_interval_ms: 100,           // 10 Hz
            health_check_interval_ms: 5_000, // every 5 s
            telemetry_interval_secs: 60,     // 1/min
        }
    }
}

impl SystemConfig {
    /// Parse a JSON configuration document.  Absent fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| {
            log::error!("config: JSON parse failed: {}", e);
            ConfigError::Malformed
        })
    }

    /// Defaults overlaid with credentials and target baked in at build time.
    pub fn from_build_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(ssid) = option_env!("WIFI_SSID") {
            config.credentials = Credentials::new(ssid, option_env!("WIFI_PASSWORD").unwrap_or(""))?;
        }
        if let Some(target) = option_env!("OSC_TARGET") {
            let addr: SocketAddrV4 = target
                .parse()
                .map_err(|_| ConfigError::ValidationFailed("OSC_TARGET must be ip:port"))?;
            config.osc_target_addr = addr.ip().octets();
            config.osc_target_port = addr.port();
        }
        Ok(config)
    }

    /// Destination of outbound touch events.
    pub fn osc_target(&self) -> SocketAddrV4 {
        SocketAddrV4::new(Ipv4Addr::from(self.osc_target_addr), self.osc_target_port)
    }

    /// Reject configurations the installation cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_ssid(&self.credentials.ssid)?;
        validate_password(&self.credentials.password)?;

        let target = self.osc_target();
        if target.ip().is_unspecified() || target.port() == 0 {
            return Err(ConfigError::ValidationFailed("osc target must be a concrete address and port"));
        }
        if self.led_count == 0 {
            return Err(ConfigError::ValidationFailed("led_count must be non-zero"));
        }
        if self.led_brightness_percent == 0 || self.led_brightness_percent > 100 {
            return Err(ConfigError::ValidationFailed("led_brightness_percent must be 1-100"));
        }
        if self.release_polls == 0 {
            return Err(ConfigError::ValidationFailed("release_polls must be non-zero"));
        }
        if !(50..=1000).contains(&self.tick_interval_ms) {
            return Err(ConfigError::ValidationFailed("tick_interval_ms must be 50-1000"));
        }
        if self.idle_timeout_ms == 0 || self.health_check_interval_ms == 0 || self.telemetry_interval_secs == 0 {
            return Err(ConfigError::ValidationFailed("intervals must be non-zero"));
        }
        if self.health_check_interval_ms < self.tick_interval_ms {
            return Err(ConfigError::ValidationFailed("health check must not run faster than the tick"));
        }
        Ok(())
    }
}

// ───────────────────────────────────────────────────────────────
// Validation
// ───────────────────────────────────────────────────────────────

fn is_printable_ascii(s: &str) -> bool {
    s.bytes().all(|b| (0x20..=0x7E).contains(&b))
}

fn validate_ssid(ssid: &str) -> Result<(), ConfigError> {
    if ssid.is_empty() || ssid.len() > 32 || !is_printable_ascii(ssid) {
        return Err(ConfigError::ValidationFailed("wifi_ssid must be 1-32 printable ASCII bytes"));
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), ConfigError> {
    if password.is_empty() {
        return Ok(());
    }
    if password.len() < 8 || password.len() > 64 {
        return Err(ConfigError::ValidationFailed("wifi_password must be 8-64 bytes or empty"));
    }
    Ok(())
}
