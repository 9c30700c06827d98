//! UDP datagram session to the OSC listener.
//!
//! The socket is bound to an ephemeral local port and `connect`ed to the
//! target, so `send` never needs the address again.  Multicast targets get
//! a TTL of 1 so packets stay on the local segment.  Works unchanged on
//! ESP-IDF (lwIP behind `std::net`) and on the host.

use std::net::{Ipv4Addr, SocketAddrV4, UdpSocket};

use log::{debug, warn};

use crate::app::ports::SessionPort;
use crate::error::{ConnectError, SendError};

pub const MULTICAST_TTL: u32 = 1;

pub struct UdpSession {
    socket: UdpSocket,
    target: SocketAddrV4,
}

impl UdpSession {
    pub fn open(target: SocketAddrV4) -> Result<Self, ConnectError> {
        let socket = UdpSocket::bind(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, 0)).map_err(|e| {
            warn!("udp: bind failed: {}", e);
            ConnectError::SessionUnavailable
        })?;
        if target.ip().is_multicast() {
            socket.set_multicast_ttl_v4(MULTICAST_TTL).map_err(|e| {
                warn!("udp: multicast ttl: {}", e);
                ConnectError::SessionUnavailable
            })?;
        }
        socket.connect(target).map_err(|e| {
            warn!("udp: connect to {} failed: {}", target, e);
            ConnectError::SessionUnavailable
        })?;
        debug!("udp: session to {} open", target);
        Ok(Self { socket, target })
    }

    pub fn target(&self) -> SocketAddrV4 {
        self.target
    }
}

impl SessionPort for UdpSession {
    fn send(&mut self, bytes: &[u8]) -> Result<(), SendError> {
        match self.socket.send(bytes) {
            Ok(n) if n == bytes.len() => Ok(()),
            Ok(n) => {
                warn!("udp: short send {}/{} bytes", n, bytes.len());
                Err(SendError::Transport)
            }
            Err(e) => {
                warn!("udp: send to {} failed: {}", self.target, e);
                Err(SendError::Transport)
            }
        }
    }
}
