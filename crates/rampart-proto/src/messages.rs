//! Message shapes for both wire directions, plus conversion of inbound
//! command frames into simulation input frames.

use crate::num;
use rampart_core::{
    ClientId, CommandPayload, EntityId, EntityKind, FormationKind, InputFrame, TickId, TilePos,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ── Client → server ──────────────────────────────────────────────

/// Any message a client may send.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum ClientMessage {
    /// Request to join the match.
    Hello(HelloPayload),
    /// One or more recent command frames (redundant resends included).
    Input(InputPayload),
    /// Liveness heartbeat.
    Ping(PingPayload),
}

/// Payload of a `hello`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HelloPayload {
    /// Client build identifier, logged but not validated.
    pub client_version: String,
    /// Requested display name.
    pub player_name: String,
}

/// Payload of an `input`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputPayload {
    /// The sender's assigned client id.
    #[serde(deserialize_with = "num::tolerant_u32")]
    pub client_id: u32,
    /// The last few command frames, newest last.
    pub commands: Vec<CommandFrame>,
}

/// Payload of a `ping`. Empty on the wire.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PingPayload {}

/// One command frame: a batch of commands stamped with the client's
/// frame sequence number and target tick.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandFrame {
    /// Per-client monotonic frame counter; the deduplication key.
    #[serde(deserialize_with = "num::tolerant_u64")]
    pub sequence: u64,
    /// The client-stamped tick this frame targets.
    #[serde(deserialize_with = "num::tolerant_u64")]
    pub tick: u64,
    /// Commands in frame order.
    pub commands: Vec<WireCommand>,
}

impl CommandFrame {
    /// Convert this frame into a simulation input frame for `client`.
    ///
    /// Commands that name an unknown building type or formation are
    /// dropped here; they could never apply.
    pub fn to_input_frame(&self, client: ClientId) -> InputFrame {
        InputFrame {
            client,
            sequence: self.sequence,
            tick: TickId(self.tick),
            commands: self
                .commands
                .iter()
                .filter_map(WireCommand::to_payload)
                .collect(),
        }
    }
}

/// A single command inside a frame.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum WireCommand {
    /// Move units toward a tile.
    Move(MoveCommand),
    /// Place a building.
    Build(BuildCommand),
    /// Damage a target entity.
    Attack(AttackCommand),
}

impl WireCommand {
    /// Convert into a simulation command payload, or `None` when the
    /// command references an unknown kind and can never apply.
    pub fn to_payload(&self) -> Option<CommandPayload> {
        match self {
            WireCommand::Move(m) => Some(CommandPayload::Move {
                unit_ids: m.unit_ids.iter().map(|&id| EntityId(id)).collect(),
                target: TilePos::new(m.target_tile_x, m.target_tile_y),
                formation: FormationKind::from_wire(&m.formation)?,
            }),
            WireCommand::Build(b) => EntityKind::from_wire(&b.building_type).map(|kind| {
                CommandPayload::Build {
                    kind,
                    tile: TilePos::new(b.tile_x, b.tile_y),
                }
            }),
            WireCommand::Attack(a) => Some(CommandPayload::Attack {
                target: EntityId(a.target_id),
            }),
        }
    }
}

/// Payload of a `move` command.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveCommand {
    /// Units the client wants moved.
    #[serde(deserialize_with = "num::tolerant_u32_vec")]
    pub unit_ids: Vec<u32>,
    /// Destination column.
    #[serde(deserialize_with = "num::tolerant_i32")]
    pub target_tile_x: i32,
    /// Destination row.
    #[serde(deserialize_with = "num::tolerant_i32")]
    pub target_tile_y: i32,
    /// Requested layout: `"box"`, `"line"`, or `"spread"`.
    pub formation: String,
}

/// Payload of a `build` command.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildCommand {
    /// Wire name of the building kind.
    pub building_type: String,
    /// Footprint origin column.
    #[serde(deserialize_with = "num::tolerant_i32")]
    pub tile_x: i32,
    /// Footprint origin row.
    #[serde(deserialize_with = "num::tolerant_i32")]
    pub tile_y: i32,
}

/// Payload of an `attack` command.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttackCommand {
    /// The entity to damage.
    #[serde(deserialize_with = "num::tolerant_u32")]
    pub target_id: u32,
}

// ── Server → client ──────────────────────────────────────────────

/// Any message the server may send.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum ServerMessage {
    /// Handshake reply: session parameters and the one-shot map
    /// bootstrap. Terrain is never resent after this.
    Welcome(WelcomePayload),
    /// Full world state at the end of a tick.
    Snapshot(SnapshotPayload),
    /// Heartbeat reply.
    Pong(PongPayload),
}

/// Payload of a `pong`. Empty on the wire.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PongPayload {}

/// Payload of a `welcome`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WelcomePayload {
    /// The id assigned to the joining client.
    pub client_id: u32,
    /// Simulation steps per second.
    pub tick_rate: u32,
    /// Suggested seconds between pings.
    pub heartbeat_interval: f64,
    /// Suggested number of redundant frames per input message.
    pub input_redundancy: u32,
    /// World units per tile.
    pub tile_size: u32,
    /// Map width in tiles.
    pub arena_tiles_width: i32,
    /// Map height in tiles.
    pub arena_tiles_height: i32,
    /// The map's terrain, delivered exactly once.
    pub terrain_data: TerrainData,
}

/// Terrain bootstrap inside a welcome.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TerrainData {
    /// Terrain type applied to every tile without an override.
    pub default_type: String,
    /// Sparse terrain overrides.
    pub tiles: Vec<TerrainTile>,
    /// Rectangular map features.
    pub features: Vec<FeatureRect>,
}

/// One overridden tile in the terrain bootstrap.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TerrainTile {
    /// Tile column.
    pub x: i32,
    /// Tile row.
    pub y: i32,
    /// Terrain type name.
    #[serde(rename = "type")]
    pub kind: String,
    /// Whether units may stand here.
    pub passable: bool,
    /// Elevation for rendering.
    pub height: f64,
}

/// One feature rectangle in the terrain bootstrap.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureRect {
    /// Feature type name.
    #[serde(rename = "type")]
    pub kind: String,
    /// Left edge column.
    pub x: i32,
    /// Top edge row.
    pub y: i32,
    /// Width in tiles.
    pub width: u32,
    /// Height in tiles.
    pub height: u32,
    /// Whether units may stand inside.
    pub passable: bool,
}

/// Payload of a `snapshot`: the full authoritative world.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotPayload {
    /// The tick this snapshot reflects.
    pub tick: u64,
    /// Reserved for delta compression; always zero (snapshots are full).
    pub baseline_tick: u64,
    /// Every entity's public fields.
    pub entities: Vec<EntityState>,
    /// Every client's public fields, keyed by client id.
    pub players: BTreeMap<u32, PlayerState>,
}

/// Public fields of one entity.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityState {
    /// Stable entity id.
    pub id: u32,
    /// Owning client id, or zero for neutral.
    pub owner_id: u32,
    /// Kind wire name.
    #[serde(rename = "type")]
    pub kind: String,
    /// Authoritative column.
    pub tile_x: i32,
    /// Authoritative row.
    pub tile_y: i32,
    /// Waypoint column currently moved toward.
    pub target_tile_x: i32,
    /// Waypoint row currently moved toward.
    pub target_tile_y: i32,
    /// Interpolation fraction in `[0, 1)`.
    pub move_progress: f64,
    /// Current hit points.
    pub health: i32,
    /// Hit points at creation.
    pub max_health: i32,
    /// Footprint width; present only for buildings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footprint_width: Option<u32>,
    /// Footprint height; present only for buildings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footprint_height: Option<u32>,
}

impl From<&rampart_core::Entity> for EntityState {
    fn from(e: &rampart_core::Entity) -> Self {
        Self {
            id: e.id.0,
            owner_id: e.owner.0,
            kind: e.kind.wire_name().to_string(),
            tile_x: e.tile.x,
            tile_y: e.tile.y,
            target_tile_x: e.target_tile.x,
            target_tile_y: e.target_tile.y,
            move_progress: e.move_progress,
            health: e.health,
            max_health: e.max_health,
            footprint_width: e.is_building().then_some(e.footprint_w),
            footprint_height: e.is_building().then_some(e.footprint_h),
        }
    }
}

/// Public fields of one client.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerState {
    /// Client id.
    pub id: u32,
    /// Display name.
    pub name: String,
    /// Money balance.
    pub money: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hello_round_trips_through_the_tagged_shape() {
        let json = r#"{"type":"hello","data":{"clientVersion":"0.3.1","playerName":"ada"}}"#;
        let msg: ClientMessage = serde_json::from_str(json).unwrap();
        match &msg {
            ClientMessage::Hello(h) => {
                assert_eq!(h.player_name, "ada");
                assert_eq!(h.client_version, "0.3.1");
            }
            other => panic!("expected hello, got {other:?}"),
        }
    }

    #[test]
    fn input_frames_convert_to_sim_frames() {
        let json = r#"{
            "type": "input",
            "data": {
                "clientId": 3,
                "commands": [{
                    "sequence": 9,
                    "tick": 41.0,
                    "commands": [
                        { "type": "move", "data": {
                            "unitIds": [5, 6.0],
                            "targetTileX": 12, "targetTileY": 7.0,
                            "formation": "line"
                        }},
                        { "type": "build", "data": {
                            "buildingType": "generator", "tileX": 3, "tileY": 4
                        }},
                        { "type": "attack", "data": { "targetId": 17 } }
                    ]
                }]
            }
        }"#;
        let msg: ClientMessage = serde_json::from_str(json).unwrap();
        let ClientMessage::Input(input) = msg else {
            panic!("expected input");
        };
        assert_eq!(input.client_id, 3);
        let frame = input.commands[0].to_input_frame(ClientId(3));
        assert_eq!(frame.sequence, 9);
        assert_eq!(frame.tick, TickId(41));
        assert_eq!(frame.commands.len(), 3);
        match &frame.commands[0] {
            CommandPayload::Move {
                unit_ids,
                target,
                formation,
            } => {
                assert_eq!(unit_ids, &vec![EntityId(5), EntityId(6)]);
                assert_eq!(*target, TilePos::new(12, 7));
                assert_eq!(*formation, FormationKind::Line);
            }
            other => panic!("expected move, got {other:?}"),
        }
    }

    #[test]
    fn unknown_kinds_are_dropped_in_conversion() {
        let frame = CommandFrame {
            sequence: 1,
            tick: 0,
            commands: vec![
                WireCommand::Build(BuildCommand {
                    building_type: "fortress".into(),
                    tile_x: 0,
                    tile_y: 0,
                }),
                WireCommand::Move(MoveCommand {
                    unit_ids: vec![1],
                    target_tile_x: 0,
                    target_tile_y: 0,
                    formation: "wedge".into(),
                }),
                WireCommand::Attack(AttackCommand { target_id: 9 }),
            ],
        };
        let converted = frame.to_input_frame(ClientId(1));
        assert_eq!(converted.commands.len(), 1);
        assert!(matches!(converted.commands[0], CommandPayload::Attack { .. }));
    }

    #[test]
    fn snapshot_units_omit_footprints_buildings_carry_them() {
        use rampart_core::{ClientId, Entity, EntityKind};
        let unit = Entity::spawn(EntityId(1), ClientId(2), EntityKind::Worker, TilePos::new(3, 4));
        let hq = Entity::spawn(
            EntityId(2),
            ClientId(2),
            EntityKind::Headquarters,
            TilePos::new(6, 6),
        );
        let unit_json = serde_json::to_value(EntityState::from(&unit)).unwrap();
        let hq_json = serde_json::to_value(EntityState::from(&hq)).unwrap();
        assert!(unit_json.get("footprintWidth").is_none());
        assert_eq!(hq_json["footprintWidth"], 2);
        assert_eq!(hq_json["footprintHeight"], 2);
        assert_eq!(unit_json["type"], "worker");
        assert_eq!(unit_json["tileX"], 3);
    }

    #[test]
    fn snapshot_players_serialize_keyed_by_id() {
        let mut players = BTreeMap::new();
        players.insert(
            7,
            PlayerState {
                id: 7,
                name: "ada".into(),
                money: 125.5,
            },
        );
        let snap = SnapshotPayload {
            tick: 40,
            baseline_tick: 0,
            entities: Vec::new(),
            players,
        };
        let v = serde_json::to_value(ServerMessage::Snapshot(snap)).unwrap();
        assert_eq!(v["type"], "snapshot");
        assert_eq!(v["data"]["players"]["7"]["money"], 125.5);
        assert_eq!(v["data"]["baselineTick"], 0);
    }
}
