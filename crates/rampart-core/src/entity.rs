//! The entity model and the per-kind definition table.
//!
//! Entity behavior that varies by kind (cost, footprint, hit points,
//! income) lives in a static [`EntityDef`] table consulted at dispatch
//! time, not in per-kind types.

use crate::id::{ClientId, EntityId, FormationId, TilePos};

/// The tagged set of entity kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// Mobile worker unit; the only kind that accepts move commands.
    Worker,
    /// Income-producing building.
    Generator,
    /// Headquarters building created at handshake.
    Headquarters,
}

impl EntityKind {
    /// All kinds, in definition-table order.
    pub const ALL: [EntityKind; 3] = [
        EntityKind::Worker,
        EntityKind::Generator,
        EntityKind::Headquarters,
    ];

    /// Static definition record for this kind.
    pub fn def(self) -> &'static EntityDef {
        match self {
            EntityKind::Worker => &WORKER_DEF,
            EntityKind::Generator => &GENERATOR_DEF,
            EntityKind::Headquarters => &HEADQUARTERS_DEF,
        }
    }

    /// Lowercase wire name used in snapshots and build commands.
    pub fn wire_name(self) -> &'static str {
        match self {
            EntityKind::Worker => "worker",
            EntityKind::Generator => "generator",
            EntityKind::Headquarters => "hq",
        }
    }

    /// Parse a wire name back into a kind.
    pub fn from_wire(name: &str) -> Option<EntityKind> {
        EntityKind::ALL.into_iter().find(|k| k.wire_name() == name)
    }
}

/// Per-kind definition consulted by command handlers and production.
#[derive(Clone, Debug, PartialEq)]
pub struct EntityDef {
    /// Money cost to create via a build command.
    pub cost: f64,
    /// Footprint in tiles; `(0, 0)` for units.
    pub footprint: (u32, u32),
    /// Hit points at creation.
    pub max_health: i32,
    /// Money produced per second while alive.
    pub income_per_second: f64,
    /// Whether attack commands may target this kind.
    pub attackable: bool,
    /// Whether this kind can be placed via a build command.
    pub buildable: bool,
}

static WORKER_DEF: EntityDef = EntityDef {
    cost: 50.0,
    footprint: (0, 0),
    max_health: 50,
    income_per_second: 0.0,
    attackable: true,
    buildable: false,
};

static GENERATOR_DEF: EntityDef = EntityDef {
    cost: 100.0,
    footprint: (1, 1),
    max_health: 100,
    income_per_second: 5.0,
    attackable: true,
    buildable: true,
};

static HEADQUARTERS_DEF: EntityDef = EntityDef {
    cost: 400.0,
    footprint: (2, 2),
    max_health: 500,
    income_per_second: 1.0,
    attackable: true,
    buildable: false,
};

/// A single entity in the world: a unit or a building.
///
/// The `path*` and `blocked_ticks` fields are server-private movement
/// state and are never serialized into snapshots.
#[derive(Clone, Debug)]
pub struct Entity {
    /// Stable identifier.
    pub id: EntityId,
    /// Owning client, or [`ClientId::NEUTRAL`].
    pub owner: ClientId,
    /// Tagged kind; per-kind data comes from [`EntityKind::def`].
    pub kind: EntityKind,
    /// Current authoritative tile.
    pub tile: TilePos,
    /// The waypoint currently being moved toward (equals `tile` when idle).
    pub target_tile: TilePos,
    /// Fraction in `[0, 1)` of the way from `tile` to `target_tile`.
    pub move_progress: f64,
    /// Current hit points; entities at `health <= 0` are removed.
    pub health: i32,
    /// Hit points at creation.
    pub max_health: i32,
    /// Footprint width in tiles (0 for units).
    pub footprint_w: u32,
    /// Footprint height in tiles (0 for units).
    pub footprint_h: u32,
    /// Remaining waypoints to the ultimate goal. Server-private.
    pub path: Vec<TilePos>,
    /// Index into `path` of the waypoint being traversed. Server-private.
    pub path_index: usize,
    /// Consecutive ticks the next waypoint has been obstructed.
    pub blocked_ticks: u32,
    /// Back-pointer to the formation group this unit belongs to, if any.
    pub formation: Option<FormationId>,
}

impl Entity {
    /// Create an entity of `kind` at `tile` with the kind's full health
    /// and footprint.
    pub fn spawn(id: EntityId, owner: ClientId, kind: EntityKind, tile: TilePos) -> Self {
        let def = kind.def();
        Self {
            id,
            owner,
            kind,
            tile,
            target_tile: tile,
            move_progress: 0.0,
            health: def.max_health,
            max_health: def.max_health,
            footprint_w: def.footprint.0,
            footprint_h: def.footprint.1,
            path: Vec::new(),
            path_index: 0,
            blocked_ticks: 0,
            formation: None,
        }
    }

    /// Whether this entity is a building (has a non-empty footprint).
    pub fn is_building(&self) -> bool {
        self.footprint_w > 0 && self.footprint_h > 0
    }

    /// Whether this entity is a mobile unit.
    pub fn is_unit(&self) -> bool {
        !self.is_building()
    }

    /// Whether this entity currently has a path to follow.
    pub fn is_moving(&self) -> bool {
        !self.path.is_empty()
    }

    /// The final waypoint of the current path, if any.
    ///
    /// A moving unit reserves this tile; intermediate waypoints are not
    /// reserved.
    pub fn path_destination(&self) -> Option<TilePos> {
        self.path.last().copied()
    }

    /// Iterate the tiles of this building's footprint. Empty for units.
    pub fn footprint_tiles(&self) -> impl Iterator<Item = TilePos> + '_ {
        let origin = self.tile;
        let (w, h) = (self.footprint_w as i32, self.footprint_h as i32);
        (0..h).flat_map(move |dy| (0..w).map(move |dx| origin.offset(dx, dy)))
    }

    /// Whether this entity occupies `tile`: footprint membership for
    /// buildings, exact position for units.
    pub fn occupies(&self, tile: TilePos) -> bool {
        if self.is_building() {
            tile.x >= self.tile.x
                && tile.x < self.tile.x + self.footprint_w as i32
                && tile.y >= self.tile.y
                && tile.y < self.tile.y + self.footprint_h as i32
        } else {
            self.tile == tile
        }
    }

    /// Drop the current path and movement state, leaving the unit idle
    /// on its authoritative tile.
    pub fn clear_path(&mut self) {
        self.path.clear();
        self.path_index = 0;
        self.target_tile = self.tile;
        self.move_progress = 0.0;
        self.blocked_ticks = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_round_trip() {
        for kind in EntityKind::ALL {
            assert_eq!(EntityKind::from_wire(kind.wire_name()), Some(kind));
        }
        assert_eq!(EntityKind::from_wire("barracks"), None);
    }

    #[test]
    fn worker_is_a_unit() {
        let e = Entity::spawn(EntityId(1), ClientId(1), EntityKind::Worker, TilePos::new(3, 3));
        assert!(e.is_unit());
        assert!(!e.is_building());
        assert_eq!(e.footprint_tiles().count(), 0);
        assert!(e.occupies(TilePos::new(3, 3)));
        assert!(!e.occupies(TilePos::new(3, 4)));
    }

    #[test]
    fn headquarters_footprint_covers_four_tiles() {
        let e = Entity::spawn(
            EntityId(1),
            ClientId(1),
            EntityKind::Headquarters,
            TilePos::new(5, 5),
        );
        assert!(e.is_building());
        let tiles: Vec<_> = e.footprint_tiles().collect();
        assert_eq!(tiles.len(), 4);
        for tile in tiles {
            assert!(e.occupies(tile));
        }
        assert!(!e.occupies(TilePos::new(7, 5)));
        assert!(!e.occupies(TilePos::new(4, 5)));
    }

    #[test]
    fn spawn_uses_definition_table() {
        let e = Entity::spawn(EntityId(9), ClientId(2), EntityKind::Generator, TilePos::new(0, 0));
        assert_eq!(e.health, EntityKind::Generator.def().max_health);
        assert_eq!(e.max_health, e.health);
        assert_eq!((e.footprint_w, e.footprint_h), (1, 1));
    }

    #[test]
    fn clear_path_resets_movement_state() {
        let mut e = Entity::spawn(EntityId(1), ClientId(1), EntityKind::Worker, TilePos::new(0, 0));
        e.path = vec![TilePos::new(1, 0), TilePos::new(2, 0)];
        e.path_index = 1;
        e.target_tile = TilePos::new(2, 0);
        e.move_progress = 0.5;
        e.blocked_ticks = 7;
        e.clear_path();
        assert!(!e.is_moving());
        assert_eq!(e.target_tile, e.tile);
        assert_eq!(e.move_progress, 0.0);
        assert_eq!(e.blocked_ticks, 0);
    }
}
