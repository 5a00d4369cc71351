//! Formation group assembly: orientation, slot layout, legalization,
//! and per-unit path launch.
//!
//! A group is bookkeeping only. Travel is per-unit pathfinding; the
//! group exists so a later command for any member can pull it out of
//! the old group, and so the group can be retired once every member has
//! arrived at or given up on its slot.

use crate::world::World;
use rampart_core::{ClientId, EntityId, FormationId, FormationKind, TilePos};
use std::collections::HashSet;

/// Transient multi-unit movement bookkeeping.
#[derive(Clone, Debug)]
pub struct FormationGroup {
    /// Assigned at creation.
    pub id: FormationId,
    /// Requested layout.
    pub kind: FormationKind,
    /// The tip unit (closest to the target at creation time); occupies
    /// the commanded tile itself.
    pub leader: EntityId,
    /// Every unit assigned to this group.
    pub members: Vec<EntityId>,
    /// The leader's destination: the tip of the formation.
    pub target: TilePos,
    /// True until every member has stopped moving.
    pub is_moving: bool,
}

/// One of the eight compass directions, classified from the movement
/// vector. The formation tip faces this way; other slots extend
/// backward along the opposite direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Octant {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Octant {
    /// Classify the direction from `from` toward `to`. `y` grows south,
    /// so North is negative `y`. A zero vector defaults to East.
    fn classify(from: (f64, f64), to: TilePos) -> Octant {
        let dx = f64::from(to.x) - from.0;
        let dy = f64::from(to.y) - from.1;
        if dx == 0.0 && dy == 0.0 {
            return Octant::East;
        }
        // Bucket the angle into eight 45-degree sectors centered on the
        // compass directions; angle 0 is East, positive angles turn south.
        let sector = (dy.atan2(dx) / std::f64::consts::FRAC_PI_4).round() as i32;
        match sector.rem_euclid(8) {
            0 => Octant::East,
            1 => Octant::SouthEast,
            2 => Octant::South,
            3 => Octant::SouthWest,
            4 => Octant::West,
            5 => Octant::NorthWest,
            6 => Octant::North,
            _ => Octant::NorthEast,
        }
    }

    /// Unit step in the movement direction.
    fn forward(self) -> (i32, i32) {
        match self {
            Octant::North => (0, -1),
            Octant::NorthEast => (1, -1),
            Octant::East => (1, 0),
            Octant::SouthEast => (1, 1),
            Octant::South => (0, 1),
            Octant::SouthWest => (-1, 1),
            Octant::West => (-1, 0),
            Octant::NorthWest => (-1, -1),
        }
    }

    /// Unit step perpendicular to the movement direction.
    fn lateral(self) -> (i32, i32) {
        let (fx, fy) = self.forward();
        (-fy, fx)
    }
}

/// Project a `(back, side)` offset in formation-local space onto the
/// map: the tip sits at `target`, `back` extends against the movement
/// direction, `side` extends perpendicular to it.
fn slot_tile(target: TilePos, octant: Octant, back: i32, side: i32) -> TilePos {
    let (fx, fy) = octant.forward();
    let (lx, ly) = octant.lateral();
    TilePos::new(
        target.x - back * fx + side * lx,
        target.y - back * fy + side * ly,
    )
}

/// Raw slot tiles for `n` units before legalization, slot 0 first.
fn layout_slots(
    world: &World,
    owner: ClientId,
    kind: FormationKind,
    target: TilePos,
    octant: Octant,
    n: usize,
) -> Vec<TilePos> {
    match kind {
        FormationKind::Box => {
            let width = (n as f64).sqrt().ceil() as i32;
            (0..n as i32)
                .map(|i| slot_tile(target, octant, i / width, i % width))
                .collect()
        }
        FormationKind::Line => (0..n as i32)
            .map(|i| slot_tile(target, octant, 0, i))
            .collect(),
        FormationKind::Spread => {
            // Spiral outward from the tip along the four cardinal
            // directions, skipping impassable cells as we go.
            let mut slots = vec![target];
            let mut distance = 1i32;
            // The map bounds the spiral; bail out well before scanning
            // the whole grid in degenerate cases.
            let max_distance = world.map().width() + world.map().height();
            while slots.len() < n && distance <= max_distance {
                for (dx, dy) in [(0, -1), (1, 0), (0, 1), (-1, 0)] {
                    if slots.len() >= n {
                        break;
                    }
                    let tile = target.offset(dx * distance, dy * distance);
                    if world.passable_for(owner, EntityId(0), tile) {
                        slots.push(tile);
                    }
                }
                distance += 1;
            }
            // Degenerate maps may not supply n distinct cells; pad with
            // the tip and let legalization spread the duplicates.
            while slots.len() < n {
                slots.push(target);
            }
            slots
        }
    }
}

/// Build a formation group for `units` (already filtered to the owner's
/// workers, at least two) and launch every member toward its slot.
pub(crate) fn assemble(
    world: &mut World,
    owner: ClientId,
    mut units: Vec<EntityId>,
    target: TilePos,
    kind: FormationKind,
) {
    // Closest unit to the target becomes the tip; ties break on id so
    // assembly is deterministic.
    units.sort_by_key(|id| {
        let tile = world.entity(*id).map(|e| e.tile).unwrap_or(target);
        (tile.manhattan(target), *id)
    });

    let centroid = {
        let mut sx = 0.0;
        let mut sy = 0.0;
        for id in &units {
            let tile = world.entity(*id).map(|e| e.tile).unwrap_or(target);
            sx += f64::from(tile.x);
            sy += f64::from(tile.y);
        }
        let n = units.len() as f64;
        (sx / n, sy / n)
    };
    let octant = Octant::classify(centroid, target);
    let raw_slots = layout_slots(world, owner, kind, target, octant, units.len());

    let fid = world.next_formation_id();
    let search_radius = world.config().goal_search_radius;
    let mut assigned: HashSet<TilePos> = HashSet::new();

    for (unit, raw) in units.iter().copied().zip(raw_slots) {
        let start = match world.entity(unit) {
            Some(e) => e.tile,
            None => continue,
        };
        // Legalize: the computed slot may be impassable or already
        // claimed; scan outward for the nearest free alternative.
        let slot = if world.passable_for(owner, unit, raw) && !assigned.contains(&raw) {
            Some(raw)
        } else {
            world.map().nearest_matching(raw, search_radius, |t| {
                world.passable_for(owner, unit, t) && !assigned.contains(&t)
            })
        };

        let entity = world.entity_mut(unit).expect("member exists");
        entity.formation = Some(fid);
        let Some(slot) = slot else {
            log::debug!("no legal slot near {raw} for unit {unit}");
            entity.clear_path();
            continue;
        };
        assigned.insert(slot);

        if slot == start {
            entity.clear_path();
            continue;
        }
        let found = world.route(owner, unit, start, slot);
        let entity = world.entity_mut(unit).expect("member exists");
        if found.is_empty() {
            log::debug!("no path to slot {slot} for unit {unit}");
            entity.clear_path();
        } else {
            entity.path = found;
            entity.path_index = 0;
            entity.move_progress = 0.0;
            entity.blocked_ticks = 0;
        }
    }

    let leader = units[0];
    world.formations_mut().insert(
        fid,
        FormationGroup {
            id: fid,
            kind,
            leader,
            members: units,
            target,
            is_moving: true,
        },
    );
}

/// Retire groups whose members have all arrived or given up, clearing
/// each member's back-pointer.
pub(crate) fn update_groups(world: &mut World) {
    let finished: Vec<FormationId> = world
        .formations()
        .iter()
        .filter(|(_, group)| {
            group
                .members
                .iter()
                .all(|m| world.entity(*m).is_none_or(|e| !e.is_moving()))
        })
        .map(|(id, _)| *id)
        .collect();
    for fid in finished {
        if let Some(mut group) = world.formations_mut().shift_remove(&fid) {
            group.is_moving = false;
            for member in group.members {
                if let Some(entity) = world.entity_mut(member) {
                    entity.formation = None;
                }
            }
        }
    }
}
