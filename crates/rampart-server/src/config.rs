//! Network-edge configuration and validation.

use std::error::Error;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

/// Errors detected during [`ServerConfig::validate()`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ServerConfigError {
    /// `input_redundancy` is zero; clients would get a useless hint.
    ZeroRedundancy,
    /// `socket_read_timeout` is zero; the ingress thread could never
    /// observe shutdown.
    ZeroReadTimeout,
    /// `input_queue_capacity` is zero.
    ZeroQueueCapacity,
    /// `heartbeat_interval` is zero.
    ZeroHeartbeat,
}

impl fmt::Display for ServerConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroRedundancy => write!(f, "input_redundancy must be at least 1"),
            Self::ZeroReadTimeout => write!(f, "socket_read_timeout must be non-zero"),
            Self::ZeroQueueCapacity => write!(f, "input_queue_capacity must be at least 1"),
            Self::ZeroHeartbeat => write!(f, "heartbeat_interval must be non-zero"),
        }
    }
}

impl Error for ServerConfigError {}

/// Network-edge tunables.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address to bind the datagram socket to. Port 0 picks an
    /// ephemeral port (useful in tests).
    pub bind_addr: SocketAddr,
    /// Heartbeat cadence hint advertised in the welcome.
    pub heartbeat_interval: Duration,
    /// Input redundancy hint advertised in the welcome: how many recent
    /// frames a client should pack into each input message.
    pub input_redundancy: u32,
    /// Read timeout on the ingress socket; bounds how long shutdown
    /// waits for the ingress thread.
    pub socket_read_timeout: Duration,
    /// Bounded capacity of the ingress→tick frame channel.
    pub input_queue_capacity: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 47_900),
            heartbeat_interval: Duration::from_secs(2),
            input_redundancy: 3,
            socket_read_timeout: Duration::from_millis(250),
            input_queue_capacity: 1024,
        }
    }
}

impl ServerConfig {
    /// Validate all structural invariants.
    pub fn validate(&self) -> Result<(), ServerConfigError> {
        if self.input_redundancy == 0 {
            return Err(ServerConfigError::ZeroRedundancy);
        }
        if self.socket_read_timeout.is_zero() {
            return Err(ServerConfigError::ZeroReadTimeout);
        }
        if self.input_queue_capacity == 0 {
            return Err(ServerConfigError::ZeroQueueCapacity);
        }
        if self.heartbeat_interval.is_zero() {
            return Err(ServerConfigError::ZeroHeartbeat);
        }
        Ok(())
    }
}
