//! The authoritative world state and its occupancy predicates.

use crate::client::Client;
use crate::config::{ConfigError, SimConfig};
use crate::formation::FormationGroup;
use crate::path::{self, PathScratch};
use indexmap::IndexMap;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use rampart_core::{
    ClientId, Entity, EntityId, EntityKind, FormationId, IdAllocator, TickId, TilePos,
};
use rampart_map::TileMap;
use std::net::SocketAddr;
use std::time::Instant;

/// All authoritative match state.
///
/// Owned by the tick context; the network edge only ever touches it
/// under the world lock and never across I/O. Entities, clients, and
/// formations are kept in insertion-ordered maps so that per-tick
/// iteration (and therefore the whole simulation) is deterministic.
pub struct World {
    map: TileMap,
    config: SimConfig,
    tick: TickId,
    entities: IndexMap<EntityId, Entity>,
    clients: IndexMap<ClientId, Client>,
    formations: IndexMap<FormationId, FormationGroup>,
    ids: IdAllocator,
    rng: ChaCha8Rng,
    scratch: PathScratch,
}

impl World {
    /// Create a world over an immutable map.
    pub fn new(map: TileMap, config: SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        Ok(Self {
            map,
            config,
            tick: TickId(0),
            entities: IndexMap::new(),
            clients: IndexMap::new(),
            formations: IndexMap::new(),
            ids: IdAllocator::new(),
            rng,
            scratch: PathScratch::new(),
        })
    }

    /// The immutable match map.
    pub fn map(&self) -> &TileMap {
        &self.map
    }

    /// The simulation configuration.
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// The current tick (number of completed steps).
    pub fn tick(&self) -> TickId {
        self.tick
    }

    pub(crate) fn advance_tick(&mut self) {
        self.tick = TickId(self.tick.0 + 1);
    }

    /// All entities in insertion order.
    pub fn entities(&self) -> &IndexMap<EntityId, Entity> {
        &self.entities
    }

    /// All clients in insertion order.
    pub fn clients(&self) -> &IndexMap<ClientId, Client> {
        &self.clients
    }

    /// All live formation groups in insertion order.
    pub fn formations(&self) -> &IndexMap<FormationId, FormationGroup> {
        &self.formations
    }

    /// Look up an entity.
    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    /// Look up a client.
    pub fn client(&self, id: ClientId) -> Option<&Client> {
        self.clients.get(&id)
    }

    pub(crate) fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    pub(crate) fn client_mut(&mut self, id: ClientId) -> Option<&mut Client> {
        self.clients.get_mut(&id)
    }

    pub(crate) fn formations_mut(&mut self) -> &mut IndexMap<FormationId, FormationGroup> {
        &mut self.formations
    }

    pub(crate) fn next_formation_id(&mut self) -> FormationId {
        self.ids.next_formation()
    }

    // ── Occupancy predicates ─────────────────────────────────────

    /// Whether any building footprint covers `tile`.
    pub fn building_blocks(&self, tile: TilePos) -> bool {
        self.entities
            .values()
            .any(|e| e.is_building() && e.occupies(tile))
    }

    /// Whether any unit (of any owner) is standing on `tile`.
    pub fn unit_occupies(&self, tile: TilePos) -> bool {
        self.entities
            .values()
            .any(|e| e.is_unit() && e.tile == tile)
    }

    /// Whether a foreign-owned unit is at `tile` or has reserved it as
    /// its final path destination.
    ///
    /// Same-owner units are transparent, so this is asked with the
    /// moving unit's owner; `exclude` is the moving unit itself.
    fn foreign_unit_blocks(&self, owner: ClientId, exclude: EntityId, tile: TilePos) -> bool {
        self.entities.values().any(|e| {
            e.is_unit()
                && e.id != exclude
                && e.owner != owner
                && (e.tile == tile || e.path_destination() == Some(tile))
        })
    }

    /// The full passability predicate for a unit owned by `owner`:
    /// terrain allows standing, no building footprint covers the tile,
    /// and no foreign unit occupies or reserves it.
    ///
    /// This single predicate backs both pathfinding and the per-tick
    /// blocked check, so the two can never disagree.
    pub fn passable_for(&self, owner: ClientId, exclude: EntityId, tile: TilePos) -> bool {
        self.map.terrain_passable(tile)
            && !self.building_blocks(tile)
            && !self.foreign_unit_blocks(owner, exclude, tile)
    }

    /// Whether a `w x h` rectangle at `origin` is clear for placement:
    /// every tile in bounds, terrain-passable, and free of buildings and
    /// units of any owner.
    pub fn area_clear(&self, origin: TilePos, w: u32, h: u32) -> bool {
        (0..h as i32).all(|dy| {
            (0..w as i32).all(|dx| {
                let tile = origin.offset(dx, dy);
                self.map.terrain_passable(tile)
                    && !self.building_blocks(tile)
                    && !self.unit_occupies(tile)
            })
        })
    }

    /// Compute a path for the unit `exclude` owned by `owner`, reusing
    /// the world's pathfinding scratch.
    pub(crate) fn route(
        &mut self,
        owner: ClientId,
        exclude: EntityId,
        start: TilePos,
        goal: TilePos,
    ) -> Vec<TilePos> {
        let mut scratch = std::mem::take(&mut self.scratch);
        let found = path::find_path(
            self.map.width(),
            self.map.height(),
            |t| self.passable_for(owner, exclude, t),
            start,
            goal,
            &mut scratch,
        );
        self.scratch = scratch;
        found
    }

    // ── Entity lifecycle ─────────────────────────────────────────

    /// Create an entity and register it with its owner.
    pub fn spawn_entity(&mut self, owner: ClientId, kind: EntityKind, tile: TilePos) -> EntityId {
        let id = self.ids.next_entity();
        self.entities.insert(id, Entity::spawn(id, owner, kind, tile));
        if let Some(client) = self.clients.get_mut(&owner) {
            client.owned_entities.insert(id);
        }
        id
    }

    /// Remove an entity, detaching it from its owner and any formation.
    pub fn remove_entity(&mut self, id: EntityId) {
        let Some(entity) = self.entities.shift_remove(&id) else {
            return;
        };
        if let Some(client) = self.clients.get_mut(&entity.owner) {
            client.owned_entities.remove(&id);
        }
        if let Some(fid) = entity.formation {
            self.drop_formation_member(fid, id);
        }
    }

    /// Remove `unit` from whatever formation it belongs to, if any.
    /// A group left with no members is destroyed.
    pub(crate) fn detach_from_formation(&mut self, unit: EntityId) {
        let Some(fid) = self
            .entities
            .get_mut(&unit)
            .and_then(|e| e.formation.take())
        else {
            return;
        };
        self.drop_formation_member(fid, unit);
    }

    fn drop_formation_member(&mut self, fid: FormationId, unit: EntityId) {
        if let Some(group) = self.formations.get_mut(&fid) {
            group.members.retain(|m| *m != unit);
            if group.members.is_empty() {
                self.formations.shift_remove(&fid);
            }
        }
    }

    // ── Client lifecycle ─────────────────────────────────────────

    /// Admit a new client: allocate an id, place its starting kit
    /// (headquarters plus starting workers) at the next spawn point,
    /// and fund it with the configured starting money.
    ///
    /// Returns `None` when the client budget is exhausted; the caller
    /// drops the hello silently.
    pub fn admit_client(&mut self, name: &str, addr: SocketAddr, now: Instant) -> Option<ClientId> {
        if self.clients.len() >= self.config.max_clients {
            return None;
        }
        let id = self.ids.next_client();

        // Spawn point chosen by join order; maps without spawn points
        // fall back to the map center.
        let (spawn_tile, radius) = match self.map.spawn_points() {
            [] => (
                TilePos::new(self.map.width() / 2, self.map.height() / 2),
                4u32,
            ),
            points => {
                let sp = points[self.clients.len() % points.len()];
                (sp.tile, sp.radius.max(1))
            }
        };

        self.clients.insert(
            id,
            Client::new(id, name.to_string(), addr, now, self.config.starting_money),
        );

        let hq = EntityKind::Headquarters.def().footprint;
        if let Some(origin) =
            self.map
                .nearest_matching(spawn_tile, radius.max(4), |t| self.area_clear(t, hq.0, hq.1))
        {
            self.spawn_entity(id, EntityKind::Headquarters, origin);
        } else {
            log::warn!("no headquarters placement near {spawn_tile} for client {id}");
        }

        for _ in 0..self.config.starting_workers {
            let jitter = self.jittered_open_tile(spawn_tile, radius);
            let tile = jitter.or_else(|| {
                self.map
                    .nearest_matching(spawn_tile, radius.max(4), |t| self.area_clear(t, 1, 1))
            });
            match tile {
                Some(tile) => {
                    self.spawn_entity(id, EntityKind::Worker, tile);
                }
                None => {
                    log::warn!("no worker placement near {spawn_tile} for client {id}");
                    break;
                }
            }
        }

        Some(id)
    }

    /// A seeded-random open tile within `radius` of `center`, or `None`
    /// after a bounded number of attempts (the caller falls back to a
    /// deterministic ring scan).
    fn jittered_open_tile(&mut self, center: TilePos, radius: u32) -> Option<TilePos> {
        let r = radius as i32;
        for _ in 0..16 {
            let dx = self.rng.random_range(-r..=r);
            let dy = self.rng.random_range(-r..=r);
            let tile = center.offset(dx, dy);
            if self.area_clear(tile, 1, 1) {
                return Some(tile);
            }
        }
        None
    }

    /// Find the client registered with this return address.
    pub fn client_by_addr(&self, addr: SocketAddr) -> Option<&Client> {
        self.clients.values().find(|c| c.addr == addr)
    }

    /// Refresh a client's liveness timestamp. Returns false for an
    /// unknown client.
    pub fn touch_client(&mut self, id: ClientId, now: Instant) -> bool {
        match self.clients.get_mut(&id) {
            Some(client) => {
                client.last_seen = now;
                true
            }
            None => false,
        }
    }

    /// Refresh liveness for whichever client answers to `addr`.
    pub fn touch_client_by_addr(&mut self, addr: SocketAddr, now: Instant) -> Option<ClientId> {
        let id = self.client_by_addr(addr)?.id;
        self.touch_client(id, now);
        Some(id)
    }

    /// Evict a client and destroy everything it owns.
    pub fn remove_client(&mut self, id: ClientId) {
        let Some(client) = self.clients.shift_remove(&id) else {
            return;
        };
        for entity in client.owned_entities {
            self.remove_entity(entity);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rampart_test_utils::{open_map, test_addr};

    fn test_world() -> World {
        World::new(open_map(20, 20), SimConfig::default()).unwrap()
    }

    #[test]
    fn admit_client_places_starting_kit() {
        let mut world = test_world();
        let now = Instant::now();
        let id = world.admit_client("alice", test_addr(1), now).unwrap();

        let client = world.client(id).unwrap();
        assert_eq!(client.money, world.config().starting_money);
        let hqs = world
            .entities()
            .values()
            .filter(|e| e.kind == EntityKind::Headquarters && e.owner == id)
            .count();
        let workers = world
            .entities()
            .values()
            .filter(|e| e.kind == EntityKind::Worker && e.owner == id)
            .count();
        assert_eq!(hqs, 1);
        assert_eq!(workers, world.config().starting_workers as usize);
        assert_eq!(
            client.owned_entities.len(),
            1 + world.config().starting_workers as usize
        );
    }

    #[test]
    fn admit_client_rejects_over_budget() {
        let mut world = World::new(
            open_map(40, 40),
            SimConfig {
                max_clients: 2,
                ..SimConfig::default()
            },
        )
        .unwrap();
        let now = Instant::now();
        assert!(world.admit_client("a", test_addr(1), now).is_some());
        assert!(world.admit_client("b", test_addr(2), now).is_some());
        assert!(world.admit_client("c", test_addr(3), now).is_none());
    }

    #[test]
    fn same_seed_places_identically() {
        let mut a = test_world();
        let mut b = test_world();
        let now = Instant::now();
        a.admit_client("p", test_addr(1), now);
        b.admit_client("p", test_addr(1), now);
        let tiles_a: Vec<_> = a.entities().values().map(|e| e.tile).collect();
        let tiles_b: Vec<_> = b.entities().values().map(|e| e.tile).collect();
        assert_eq!(tiles_a, tiles_b);
    }

    #[test]
    fn remove_client_destroys_owned_entities() {
        let mut world = test_world();
        let now = Instant::now();
        let id = world.admit_client("alice", test_addr(1), now).unwrap();
        assert!(!world.entities().is_empty());
        world.remove_client(id);
        assert!(world.entities().values().all(|e| e.owner != id));
        assert!(world.client(id).is_none());
    }

    #[test]
    fn own_units_are_transparent_foreign_units_block() {
        let mut world = test_world();
        let friendly_owner = ClientId(100);
        let enemy_owner = ClientId(200);
        let mover = world.spawn_entity(friendly_owner, EntityKind::Worker, TilePos::new(1, 1));
        world.spawn_entity(friendly_owner, EntityKind::Worker, TilePos::new(2, 1));
        world.spawn_entity(enemy_owner, EntityKind::Worker, TilePos::new(3, 1));

        assert!(world.passable_for(friendly_owner, mover, TilePos::new(2, 1)));
        assert!(!world.passable_for(friendly_owner, mover, TilePos::new(3, 1)));
    }

    #[test]
    fn foreign_path_destination_is_reserved() {
        let mut world = test_world();
        let mover = world.spawn_entity(ClientId(100), EntityKind::Worker, TilePos::new(0, 0));
        let enemy = world.spawn_entity(ClientId(200), EntityKind::Worker, TilePos::new(9, 9));
        world.entity_mut(enemy).unwrap().path =
            vec![TilePos::new(8, 9), TilePos::new(7, 9)];

        // The enemy's final destination (7, 9) is reserved; its
        // intermediate waypoint (8, 9) is not.
        assert!(!world.passable_for(ClientId(100), mover, TilePos::new(7, 9)));
        assert!(world.passable_for(ClientId(100), mover, TilePos::new(8, 9)));
    }

    #[test]
    fn buildings_block_everyone() {
        let mut world = test_world();
        let owner = ClientId(100);
        let mover = world.spawn_entity(owner, EntityKind::Worker, TilePos::new(0, 0));
        world.spawn_entity(owner, EntityKind::Headquarters, TilePos::new(5, 5));

        // Own building footprint still blocks movement.
        assert!(!world.passable_for(owner, mover, TilePos::new(5, 5)));
        assert!(!world.passable_for(owner, mover, TilePos::new(6, 6)));
        assert!(world.passable_for(owner, mover, TilePos::new(7, 5)));
    }

    #[test]
    fn remove_entity_detaches_formation_membership() {
        let mut world = test_world();
        let owner = ClientId(100);
        let a = world.spawn_entity(owner, EntityKind::Worker, TilePos::new(1, 1));
        let b = world.spawn_entity(owner, EntityKind::Worker, TilePos::new(2, 1));
        let fid = world.next_formation_id();
        world.formations_mut().insert(
            fid,
            FormationGroup {
                id: fid,
                kind: rampart_core::FormationKind::Box,
                leader: a,
                members: vec![a, b],
                target: TilePos::new(9, 9),
                is_moving: true,
            },
        );
        world.entity_mut(a).unwrap().formation = Some(fid);
        world.entity_mut(b).unwrap().formation = Some(fid);

        world.remove_entity(a);
        assert_eq!(world.formations().get(&fid).unwrap().members, vec![b]);
        world.remove_entity(b);
        assert!(world.formations().get(&fid).is_none());
    }
}
