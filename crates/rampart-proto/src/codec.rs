//! Datagram payload encoding and decoding.
//!
//! One datagram carries exactly one tagged JSON document. Decode
//! failures surface as [`CodecError`]; the ingress reader drops the
//! packet silently (spoofed or corrupt traffic is not worth a reply).

use crate::messages::{ClientMessage, ServerMessage};
use std::error::Error;
use std::fmt;

/// A malformed datagram payload.
#[derive(Debug)]
pub struct CodecError(serde_json::Error);

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "malformed datagram: {}", self.0)
    }
}

impl Error for CodecError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.0)
    }
}

impl From<serde_json::Error> for CodecError {
    fn from(e: serde_json::Error) -> Self {
        Self(e)
    }
}

/// Decode a client→server datagram payload.
pub fn decode_client(bytes: &[u8]) -> Result<ClientMessage, CodecError> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Encode a server→client message into a datagram payload.
pub fn encode_server(message: &ServerMessage) -> Result<Vec<u8>, CodecError> {
    Ok(serde_json::to_vec(message)?)
}

/// Encode a client→server message (used by clients and tests).
pub fn encode_client(message: &ClientMessage) -> Result<Vec<u8>, CodecError> {
    Ok(serde_json::to_vec(message)?)
}

/// Decode a server→client datagram payload (used by clients and tests).
pub fn decode_server(bytes: &[u8]) -> Result<ServerMessage, CodecError> {
    Ok(serde_json::from_slice(bytes)?)
}
