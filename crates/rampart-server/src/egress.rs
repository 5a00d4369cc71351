//! Snapshot building and datagram broadcast.

use rampart_proto::{encode_server, EntityState, PlayerState, ServerMessage, SnapshotPayload};
use rampart_sim::World;
use std::net::{SocketAddr, UdpSocket};

/// Serialize the world's public state. Called under the world lock;
/// it only reads, and the broadcast happens after release.
pub(crate) fn build_snapshot(world: &World) -> SnapshotPayload {
    SnapshotPayload {
        tick: world.tick().0,
        baseline_tick: 0,
        entities: world.entities().values().map(EntityState::from).collect(),
        players: world
            .clients()
            .values()
            .map(|c| {
                (
                    c.id.0,
                    PlayerState {
                        id: c.id.0,
                        name: c.name.clone(),
                        money: c.money,
                    },
                )
            })
            .collect(),
    }
}

/// Send one encoded message to every recipient. Send failures are
/// logged and never block or abort the tick.
pub(crate) fn broadcast(socket: &UdpSocket, message: &ServerMessage, recipients: &[SocketAddr]) {
    let bytes = match encode_server(message) {
        Ok(bytes) => bytes,
        Err(e) => {
            log::error!("failed to encode outbound message: {e}");
            return;
        }
    };
    for addr in recipients {
        if let Err(e) = socket.send_to(&bytes, addr) {
            log::warn!("send to {addr} failed: {e}");
        }
    }
}
