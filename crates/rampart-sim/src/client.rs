//! Per-client connection and resource state.

use rampart_core::{ClientId, EntityId};
use std::collections::BTreeSet;
use std::net::SocketAddr;
use std::time::Instant;

/// A connected client.
///
/// Created by the handshake on first contact from a new return address;
/// destroyed (with all owned entities) when `last_seen` exceeds the
/// liveness timeout.
#[derive(Clone, Debug)]
pub struct Client {
    /// Assigned at handshake.
    pub id: ClientId,
    /// Display name from the hello message.
    pub name: String,
    /// Datagram return address.
    pub addr: SocketAddr,
    /// When the server last heard from this client.
    pub last_seen: Instant,
    /// Current money balance.
    pub money: f64,
    /// Highest input-frame sequence number already applied. Frames at or
    /// below this are redundant resends and are skipped.
    pub last_processed_seq: u64,
    /// Entities owned by this client, kept sorted for deterministic
    /// teardown on eviction.
    pub owned_entities: BTreeSet<EntityId>,
}

impl Client {
    /// Create a client record at handshake time.
    pub fn new(id: ClientId, name: String, addr: SocketAddr, now: Instant, money: f64) -> Self {
        Self {
            id,
            name,
            addr,
            last_seen: now,
            money,
            last_processed_seq: 0,
            owned_entities: BTreeSet::new(),
        }
    }
}
