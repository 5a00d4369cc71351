//! Handshake: client admission and the one-shot welcome payload.

use crate::config::ServerConfig;
use rampart_core::ClientId;
use rampart_proto::{FeatureRect, TerrainData, TerrainTile, WelcomePayload};
use rampart_sim::World;

/// Build the welcome for a freshly admitted (or re-greeting) client.
///
/// This is the only delivery of map terrain; snapshots never resend it.
/// Called under the world lock; it only reads.
pub(crate) fn welcome_for(world: &World, client: ClientId, net: &ServerConfig) -> WelcomePayload {
    let map = world.map();
    WelcomePayload {
        client_id: client.0,
        tick_rate: world.config().tick_rate_hz,
        heartbeat_interval: net.heartbeat_interval.as_secs_f64(),
        input_redundancy: net.input_redundancy,
        tile_size: map.tile_size(),
        arena_tiles_width: map.width(),
        arena_tiles_height: map.height(),
        terrain_data: TerrainData {
            default_type: map.default_terrain().kind.clone(),
            tiles: map
                .override_tiles()
                .map(|(pos, terrain)| TerrainTile {
                    x: pos.x,
                    y: pos.y,
                    kind: terrain.kind.clone(),
                    passable: terrain.passable,
                    height: terrain.height,
                })
                .collect(),
            features: map
                .features()
                .iter()
                .map(|f| FeatureRect {
                    kind: f.kind.clone(),
                    x: f.origin.x,
                    y: f.origin.y,
                    width: f.width,
                    height: f.height,
                    passable: f.passable,
                })
                .collect(),
        },
    }
}
