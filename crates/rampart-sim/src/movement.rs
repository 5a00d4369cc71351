//! Per-tick waypoint traversal for moving units.

use crate::world::World;
use rampart_core::EntityId;

/// Tolerance when testing `move_progress` against 1.0, so that a
/// traversal of `n` equal float increments completes in `n` ticks
/// rather than occasionally spilling into `n + 1`.
const PROGRESS_EPSILON: f64 = 1e-9;

/// Advance every unit with a non-empty path by one tick.
///
/// Units are processed in entity insertion order. The blocked check and
/// pathfinding share one passability predicate, so a unit never routes
/// through a tile it would then refuse to enter.
pub(crate) fn advance_units(world: &mut World) {
    let movers: Vec<EntityId> = world
        .entities()
        .values()
        .filter(|e| e.is_unit() && e.is_moving())
        .map(|e| e.id)
        .collect();
    let progress_step = world.config().movement_speed * world.config().dt();
    let reroute_threshold = world.config().reroute_threshold;

    for id in movers {
        let Some(entity) = world.entity(id) else {
            continue;
        };
        let owner = entity.owner;
        let current = entity.tile;
        if entity.path_index >= entity.path.len() {
            world.entity_mut(id).expect("mover exists").clear_path();
            continue;
        }
        let waypoint = entity.path[entity.path_index];

        if !world.passable_for(owner, id, waypoint) {
            let entity = world.entity_mut(id).expect("mover exists");
            entity.target_tile = waypoint;
            entity.blocked_ticks += 1;
            if entity.blocked_ticks < reroute_threshold {
                continue;
            }
            // Obstructed long enough: recompute from the current tile to
            // the ultimate goal under current occupancy.
            let goal = *entity.path.last().expect("path is non-empty");
            let fresh = world.route(owner, id, current, goal);
            let entity = world.entity_mut(id).expect("mover exists");
            if fresh.is_empty() {
                log::debug!("unit {id} found no route to {goal}, going idle");
                entity.clear_path();
            } else {
                entity.path = fresh;
                entity.path_index = 0;
                entity.blocked_ticks = 0;
                entity.move_progress = 0.0;
                entity.target_tile = entity.path[0];
            }
            continue;
        }

        let entity = world.entity_mut(id).expect("mover exists");
        entity.target_tile = waypoint;
        entity.blocked_ticks = 0;
        entity.move_progress += progress_step;
        if entity.move_progress + PROGRESS_EPSILON >= 1.0 {
            entity.tile = waypoint;
            entity.move_progress = 0.0;
            entity.path_index += 1;
            if entity.path_index >= entity.path.len() {
                entity.clear_path();
            }
        }
    }
}
