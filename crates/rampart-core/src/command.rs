//! Command payloads and input frames for the ingress pipeline.

use crate::entity::EntityKind;
use crate::id::{ClientId, EntityId, TickId, TilePos};

/// Requested multi-unit movement layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormationKind {
    /// `ceil(sqrt(n)) x ceil(sqrt(n))` grid truncated to `n` cells.
    Box,
    /// Single rank perpendicular to the direction of travel.
    Line,
    /// Spiral expanding outward from the tip.
    Spread,
}

impl FormationKind {
    /// Lowercase wire name.
    pub fn wire_name(self) -> &'static str {
        match self {
            FormationKind::Box => "box",
            FormationKind::Line => "line",
            FormationKind::Spread => "spread",
        }
    }

    /// Parse a wire name back into a kind.
    pub fn from_wire(name: &str) -> Option<FormationKind> {
        match name {
            "box" => Some(FormationKind::Box),
            "line" => Some(FormationKind::Line),
            "spread" => Some(FormationKind::Spread),
            _ => None,
        }
    }
}

/// A single validated-at-dispatch command from a client.
///
/// Handlers reject semantically invalid commands silently (the client
/// infers failure from the next snapshot), so payloads carry raw client
/// intent without pre-validation.
#[derive(Clone, Debug, PartialEq)]
pub enum CommandPayload {
    /// Move the listed units toward a target tile, in formation when
    /// more than one unit is eligible.
    Move {
        /// Units the client wants moved; filtered to owned workers.
        unit_ids: Vec<EntityId>,
        /// Commanded destination; the formation tip lands here.
        target: TilePos,
        /// Requested layout for multi-unit moves.
        formation: FormationKind,
    },
    /// Place a building of `kind` with its footprint origin at `tile`.
    Build {
        /// Building kind; must be buildable per its definition.
        kind: EntityKind,
        /// Footprint origin tile.
        tile: TilePos,
    },
    /// Deal one hit of damage to the target entity.
    Attack {
        /// The entity to damage.
        target: EntityId,
    },
}

/// One command frame from a client, as drained from the input queue.
///
/// Clients resend the last few frames in every input message for loss
/// tolerance; `sequence` deduplicates replays and `tick` establishes the
/// deterministic processing order across clients.
#[derive(Clone, Debug, PartialEq)]
pub struct InputFrame {
    /// The issuing client.
    pub client: ClientId,
    /// Per-client monotonic frame sequence number.
    pub sequence: u64,
    /// The client-stamped tick this frame targets.
    pub tick: TickId,
    /// Commands to apply, in frame order.
    pub commands: Vec<CommandPayload>,
}

impl InputFrame {
    /// The deterministic processing sort key: frames apply in `(tick,
    /// client, sequence)` order regardless of network arrival order.
    pub fn sort_key(&self) -> (TickId, ClientId, u64) {
        (self.tick, self.client, self.sequence)
    }
}
