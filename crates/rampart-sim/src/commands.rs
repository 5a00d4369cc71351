//! Command dispatch: validate-then-mutate handlers for move, build,
//! and attack.
//!
//! Rejections are values, not wire traffic: the stepper logs them at
//! debug level and the client infers failure from the next snapshot.

use crate::formation;
use crate::world::World;
use rampart_core::{
    ClientId, CommandError, CommandPayload, EntityId, EntityKind, FormationKind, TilePos,
};

/// Apply a single command from `client` to the world.
pub(crate) fn dispatch(
    world: &mut World,
    client: ClientId,
    command: &CommandPayload,
) -> Result<(), CommandError> {
    if world.client(client).is_none() {
        return Err(CommandError::UnknownClient { client });
    }
    match command {
        CommandPayload::Move {
            unit_ids,
            target,
            formation,
        } => handle_move(world, client, unit_ids, *target, *formation),
        CommandPayload::Build { kind, tile } => handle_build(world, client, *kind, *tile),
        CommandPayload::Attack { target } => handle_attack(world, client, *target),
    }
}

/// Move the client's workers toward `target`, in formation when more
/// than one unit is eligible.
fn handle_move(
    world: &mut World,
    client: ClientId,
    unit_ids: &[EntityId],
    target: TilePos,
    formation: FormationKind,
) -> Result<(), CommandError> {
    let eligible: Vec<EntityId> = unit_ids
        .iter()
        .copied()
        .filter(|id| {
            world
                .entity(*id)
                .is_some_and(|e| e.owner == client && e.kind == EntityKind::Worker)
        })
        .collect();
    if eligible.is_empty() {
        return Err(CommandError::NoEligibleUnits);
    }

    // A fresh move command supersedes any prior group membership.
    for id in &eligible {
        world.detach_from_formation(*id);
    }

    if eligible.len() == 1 {
        launch_single(world, client, eligible[0], target);
    } else {
        formation::assemble(world, client, eligible, target, formation);
    }
    Ok(())
}

/// Path one unit to `target`, relocating an impassable goal to the
/// nearest passable tile within the bounded search radius. Gives up
/// silently when no goal or no path exists.
fn launch_single(world: &mut World, client: ClientId, unit: EntityId, target: TilePos) {
    let start = world.entity(unit).expect("eligibility checked").tile;
    let goal = if world.passable_for(client, unit, target) {
        Some(target)
    } else {
        world
            .map()
            .nearest_matching(target, world.config().goal_search_radius, |t| {
                world.passable_for(client, unit, t)
            })
    };
    let Some(goal) = goal else {
        log::debug!("no passable goal near {target} for unit {unit}");
        world.entity_mut(unit).expect("eligibility checked").clear_path();
        return;
    };
    if goal == start {
        world.entity_mut(unit).expect("eligibility checked").clear_path();
        return;
    }

    let found = world.route(client, unit, start, goal);
    let entity = world.entity_mut(unit).expect("eligibility checked");
    if found.is_empty() {
        log::debug!("no path from {start} to {goal} for unit {unit}");
        entity.clear_path();
    } else {
        entity.path = found;
        entity.path_index = 0;
        entity.move_progress = 0.0;
        entity.blocked_ticks = 0;
    }
}

/// Place a building, charging the owner its cost.
fn handle_build(
    world: &mut World,
    client: ClientId,
    kind: EntityKind,
    tile: TilePos,
) -> Result<(), CommandError> {
    let def = kind.def();
    if !def.buildable {
        return Err(CommandError::NotBuildable {
            kind: kind.wire_name(),
        });
    }
    let available = world.client(client).expect("dispatch checked").money;
    if available < def.cost {
        return Err(CommandError::InsufficientFunds {
            required: def.cost,
            available,
        });
    }
    let (w, h) = def.footprint;
    for dy in 0..h as i32 {
        for dx in 0..w as i32 {
            let t = tile.offset(dx, dy);
            if !world.map().in_bounds(t) {
                return Err(CommandError::OutOfBounds { tile: t });
            }
            if !world.map().terrain_passable(t)
                || world.building_blocks(t)
                || world.unit_occupies(t)
            {
                return Err(CommandError::Impassable { tile: t });
            }
        }
    }
    world.client_mut(client).expect("dispatch checked").money -= def.cost;
    world.spawn_entity(client, kind, tile);
    Ok(())
}

/// Deal one hit of damage; a target at zero or less is removed.
fn handle_attack(
    world: &mut World,
    client: ClientId,
    target: EntityId,
) -> Result<(), CommandError> {
    let Some(entity) = world.entity(target) else {
        return Err(CommandError::UnknownEntity { entity: target });
    };
    if entity.owner == client {
        return Err(CommandError::OwnTarget { entity: target });
    }
    if !entity.kind.def().attackable {
        return Err(CommandError::NotAttackable { entity: target });
    }
    let damage = world.config().attack_damage;
    let entity = world.entity_mut(target).expect("just looked up");
    entity.health -= damage;
    if entity.health <= 0 {
        world.remove_entity(target);
    }
    Ok(())
}
