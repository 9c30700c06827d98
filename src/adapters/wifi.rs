//! WiFi station-mode adapter.
//!
//! Implements [`NetworkPort`], the hexagonal boundary for network
//! connectivity.  Sessions are plain UDP sockets ([`UdpSession`]) opened
//! once the station has an address.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: real ESP-IDF WiFi driver calls via `esp_idf_svc::wifi`.
//! - **all other targets**: simulation stubs for host-side tests.
//!
//! Reconnection policy lives in the connectivity supervisor; this adapter
//! only performs one blocking join per call.

use core::net::{Ipv4Addr, SocketAddrV4};

use log::info;

use crate::app::ports::NetworkPort;
use crate::config::Credentials;
use crate::error::ConnectError;

use super::udp::UdpSession;

#[cfg(target_os = "espidf")]
use esp_idf_svc::wifi::{AuthMethod, BlockingWifi, ClientConfiguration, Configuration, EspWifi};

// ───────────────────────────────────────────────────────────────
// WiFi adapter
// ───────────────────────────────────────────────────────────────

pub struct WifiAdapter {
    #[cfg(target_os = "espidf")]
    wifi: BlockingWifi<EspWifi<'static>>,
    #[cfg(not(target_os = "espidf"))]
    sim: SimRadio,
    joins: u32,
}

/// Host-side stand-in for the radio.
#[cfg(not(target_os = "espidf"))]
#[derive(Debug, Default)]
struct SimRadio {
    associated: bool,
    /// Remaining joins that fail before one succeeds.
    failures_pending: u32,
}

impl WifiAdapter {
    /// Take ownership of an initialised (not yet started) driver.
    #[cfg(target_os = "espidf")]
    pub fn new(wifi: BlockingWifi<EspWifi<'static>>) -> Self {
        Self { wifi, joins: 0 }
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn new() -> Self {
        Self {
            sim: SimRadio::default(),
            joins: 0,
        }
    }

    /// Successful joins since boot.
    pub fn joins(&self) -> u32 {
        self.joins
    }

    /// Simulation: make the next `count` joins fail.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_fail_next(&mut self, count: u32) {
        self.sim.failures_pending = count;
    }

    /// Simulation: drop the association as if the AP went away.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_drop_link(&mut self) {
        self.sim.associated = false;
    }

    // ── Platform-specific ─────────────────────────────────────

    #[cfg(target_os = "espidf")]
    fn platform_is_associated(&self) -> bool {
        self.wifi.is_connected().unwrap_or(false) && self.wifi.is_up().unwrap_or(false)
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_is_associated(&self) -> bool {
        self.sim.associated
    }

    #[cfg(target_os = "espidf")]
    fn platform_join(&mut self, credentials: &Credentials) -> Result<(), ConnectError> {
        let config = Configuration::Client(ClientConfiguration {
            ssid: credentials
                .ssid
                .as_str()
                .try_into()
                .map_err(|_| ConnectError::InvalidSsid)?,
            password: credentials
                .password
                .as_str()
                .try_into()
                .map_err(|_| ConnectError::InvalidPassword)?,
            auth_method: if credentials.password.is_empty() {
                AuthMethod::None
            } else {
                AuthMethod::WPA2Personal
            },
            ..Default::default()
        });

        let step = |what: &str, r: Result<(), esp_idf_svc::sys::EspError>| {
            r.map_err(|e| {
                log::warn!("WiFi: {} failed: {}", what, e);
                ConnectError::ConnectionFailed
            })
        };
        step("set_configuration", self.wifi.set_configuration(&config))?;
        if !self.wifi.is_started().unwrap_or(false) {
            step("start", self.wifi.start())?;
        }
        step("connect", self.wifi.connect())?;
        step("wait_netif_up", self.wifi.wait_netif_up())?;
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_join(&mut self, credentials: &Credentials) -> Result<(), ConnectError> {
        if self.sim.failures_pending > 0 {
            self.sim.failures_pending -= 1;
            log::warn!("WiFi(sim): join '{}' failed", credentials.ssid);
            return Err(ConnectError::ConnectionFailed);
        }
        self.sim.associated = true;
        Ok(())
    }

    #[cfg(target_os = "espidf")]
    fn platform_address(&self) -> Option<Ipv4Addr> {
        let info = self.wifi.wifi().sta_netif().get_ip_info().ok()?;
        Some(info.ip).filter(|ip| !ip.is_unspecified())
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_address(&self) -> Option<Ipv4Addr> {
        Some(Ipv4Addr::LOCALHOST)
    }
}

#[cfg(not(target_os = "espidf"))]
impl Default for WifiAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl NetworkPort for WifiAdapter {
    type Session = UdpSession;

    fn connect(&mut self, credentials: &Credentials) -> Result<(), ConnectError> {
        if credentials.ssid.is_empty() {
            return Err(ConnectError::NoCredentials);
        }
        if self.platform_is_associated() {
            return Ok(());
        }
        self.platform_join(credentials)?;
        self.joins = self.joins.wrapping_add(1);
        info!("WiFi: joined '{}'", credentials.ssid);
        Ok(())
    }

    fn current_address(&self) -> Option<Ipv4Addr> {
        if !self.platform_is_associated() {
            return None;
        }
        self.platform_address()
    }

    fn open_session(&mut self, target: SocketAddrV4) -> Result<UdpSession, ConnectError> {
        if !self.platform_is_associated() {
            return Err(ConnectError::SessionUnavailable);
        }
        UdpSession::open(target)
    }
}
