//! Server startup errors.

use crate::config::ServerConfigError;
use rampart_sim::ConfigError;
use std::error::Error;
use std::fmt;

/// Errors that abort server startup.
///
/// Once running, nothing propagates here: per-packet and per-command
/// failures are handled (and logged) where they occur.
#[derive(Debug)]
pub enum ServerError {
    /// Simulation configuration failed validation.
    Sim(ConfigError),
    /// Network configuration failed validation.
    Net(ServerConfigError),
    /// The datagram socket could not be bound or configured.
    Socket(std::io::Error),
    /// A long-lived thread could not be spawned.
    ThreadSpawn {
        /// Which thread, and why.
        reason: String,
    },
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sim(e) => write!(f, "simulation config: {e}"),
            Self::Net(e) => write!(f, "server config: {e}"),
            Self::Socket(e) => write!(f, "datagram socket: {e}"),
            Self::ThreadSpawn { reason } => write!(f, "thread spawn failed: {reason}"),
        }
    }
}

impl Error for ServerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sim(e) => Some(e),
            Self::Net(e) => Some(e),
            Self::Socket(e) => Some(e),
            Self::ThreadSpawn { .. } => None,
        }
    }
}

impl From<ConfigError> for ServerError {
    fn from(e: ConfigError) -> Self {
        Self::Sim(e)
    }
}

impl From<ServerConfigError> for ServerError {
    fn from(e: ServerConfigError) -> Self {
        Self::Net(e)
    }
}

impl From<std::io::Error> for ServerError {
    fn from(e: std::io::Error) -> Self {
        Self::Socket(e)
    }
}
