//! End-to-end simulation scenarios driven through the public stepper.

use rampart_core::{
    ClientId, CommandPayload, EntityId, EntityKind, FormationKind, InputFrame, TickId, TilePos,
};
use rampart_sim::{SimConfig, World};
use rampart_test_utils::{fixture_map, test_addr};
use std::time::Instant;

fn move_frame(
    client: ClientId,
    sequence: u64,
    units: Vec<EntityId>,
    target: TilePos,
    formation: FormationKind,
) -> InputFrame {
    InputFrame {
        client,
        sequence,
        tick: TickId(0),
        commands: vec![CommandPayload::Move {
            unit_ids: units,
            target,
            formation,
        }],
    }
}

/// The world-state invariants that must hold at every tick boundary.
fn assert_invariants(world: &World) {
    for entity in world.entities().values() {
        assert!(
            world.map().in_bounds(entity.tile),
            "entity {} at {} is out of bounds",
            entity.id,
            entity.tile
        );
        if entity.is_building() {
            for tile in entity.footprint_tiles() {
                assert!(world.map().in_bounds(tile));
                assert!(
                    world.map().terrain_passable(tile),
                    "building {} footprint covers impassable {tile}",
                    entity.id
                );
            }
        }
        if entity.is_moving() {
            let waypoint = entity.path[entity.path_index];
            assert!(
                entity.tile.is_neighbour4(waypoint),
                "entity {} waypoint {waypoint} not adjacent to {}",
                entity.id,
                entity.tile
            );
        }
        assert!(entity.health > 0);
        assert!((0.0..1.0).contains(&entity.move_progress));
    }
    // No two building footprints overlap.
    let buildings: Vec<_> = world
        .entities()
        .values()
        .filter(|e| e.is_building())
        .collect();
    for (i, a) in buildings.iter().enumerate() {
        for b in &buildings[i + 1..] {
            for tile in a.footprint_tiles() {
                assert!(!b.occupies(tile), "buildings {} and {} overlap", a.id, b.id);
            }
        }
    }
}

#[test]
fn unit_navigates_around_a_rock() {
    // 20x10 grass with a single rock at (10, 5); kit spawns far away.
    let map = fixture_map(20, 10, &[(10, 5)], &[(0, 2, 2, 2)]);
    let mut world = World::new(map, SimConfig::default()).unwrap();
    let now = Instant::now();
    let client = world.admit_client("a", test_addr(1), now).unwrap();
    let worker = world.spawn_entity(client, EntityKind::Worker, TilePos::new(5, 5));

    world.step(
        now,
        vec![move_frame(
            client,
            1,
            vec![worker],
            TilePos::new(15, 5),
            FormationKind::Box,
        )],
    );
    let planned = world.entity(worker).unwrap().path.clone();
    assert!(
        !planned.contains(&TilePos::new(10, 5)),
        "path must route around the rock"
    );

    for _ in 0..59 {
        world.step(now, Vec::new());
        assert_invariants(&world);
    }
    let e = world.entity(worker).unwrap();
    assert_eq!(e.tile, TilePos::new(15, 5), "worker must arrive within 60 ticks");
    assert!(!e.is_moving());
}

#[test]
fn five_worker_box_formation_near_a_rock_cluster() {
    // 20x15 grass with a 3x2 rock cluster at (9..11, 7..8).
    let rocks: Vec<(i32, i32)> = (9..=11).flat_map(|x| (7..=8).map(move |y| (x, y))).collect();
    let map = fixture_map(20, 15, &rocks, &[(0, 17, 2, 2)]);
    let mut world = World::new(map, SimConfig::default()).unwrap();
    let now = Instant::now();
    let client = world.admit_client("a", test_addr(1), now).unwrap();

    let workers: Vec<EntityId> = (5..=9)
        .map(|y| world.spawn_entity(client, EntityKind::Worker, TilePos::new(2, y)))
        .collect();
    let target = TilePos::new(10, 7);

    world.step(
        now,
        vec![move_frame(
            client,
            1,
            workers.clone(),
            target,
            FormationKind::Box,
        )],
    );
    assert_eq!(world.formations().len(), 1);

    for _ in 0..149 {
        world.step(now, Vec::new());
        assert_invariants(&world);
    }

    let tiles: Vec<TilePos> = workers
        .iter()
        .map(|id| {
            let e = world.entity(*id).unwrap();
            assert!(!e.is_moving(), "all workers must be idle within 150 ticks");
            e.tile
        })
        .collect();
    for (i, a) in tiles.iter().enumerate() {
        assert!(
            a.manhattan(target) <= 4,
            "worker at {a} ended too far from {target}"
        );
        for b in &tiles[i + 1..] {
            assert_ne!(a, b, "no two workers may share a tile");
        }
    }
    // The finished group has been retired.
    assert!(world.formations().is_empty());
}

#[test]
fn formation_on_open_ground_fills_the_requested_shape() {
    let map = fixture_map(20, 15, &[], &[(0, 17, 12, 2)]);
    let mut world = World::new(map, SimConfig::default()).unwrap();
    let now = Instant::now();
    let client = world.admit_client("a", test_addr(1), now).unwrap();

    // The worker at (6, 7) is strictly closest to the target.
    let tip = world.spawn_entity(client, EntityKind::Worker, TilePos::new(6, 7));
    let others: Vec<EntityId> = [(2, 5), (2, 7), (2, 9)]
        .iter()
        .map(|&(x, y)| world.spawn_entity(client, EntityKind::Worker, TilePos::new(x, y)))
        .collect();
    let mut all = vec![tip];
    all.extend(&others);
    let target = TilePos::new(12, 7);

    world.step(
        now,
        vec![move_frame(client, 1, all.clone(), target, FormationKind::Box)],
    );
    for _ in 0..149 {
        world.step(now, Vec::new());
    }

    let tiles: Vec<TilePos> = all
        .iter()
        .map(|id| world.entity(*id).unwrap().tile)
        .collect();
    for (i, a) in tiles.iter().enumerate() {
        for b in &tiles[i + 1..] {
            assert_ne!(a, b);
        }
    }
    assert_eq!(
        world.entity(tip).unwrap().tile,
        target,
        "the unit originally closest to the target must hold the tip slot"
    );
    // Box of four: every slot within two tiles of the tip.
    for tile in &tiles {
        assert!(tile.manhattan(target) <= 2);
    }
}

#[test]
fn build_fails_silently_when_underfunded() {
    let map = fixture_map(20, 15, &[], &[(0, 2, 2, 2)]);
    let mut world = World::new(
        map,
        SimConfig {
            starting_money: EntityKind::Generator.def().cost - 1.0,
            starting_workers: 0,
            ..SimConfig::default()
        },
    )
    .unwrap();
    let now = Instant::now();
    let client = world.admit_client("a", test_addr(1), now).unwrap();
    let money_before = world.client(client).unwrap().money;
    let entities_before = world.entities().len();

    world.step(
        now,
        vec![InputFrame {
            client,
            sequence: 1,
            tick: TickId(0),
            commands: vec![CommandPayload::Build {
                kind: EntityKind::Generator,
                tile: TilePos::new(12, 12),
            }],
        }],
    );

    assert_eq!(world.entities().len(), entities_before, "no entity appears");
    // Money is untouched by the failed build; only headquarters income
    // accrued during the tick.
    let income = EntityKind::Headquarters.def().income_per_second * world.config().dt();
    let money_after = world.client(client).unwrap().money;
    assert!((money_after - money_before - income).abs() < 1e-9);
}

#[test]
fn attack_destroys_a_generator_in_four_hits() {
    let map = fixture_map(20, 15, &[], &[(0, 2, 2, 2), (1, 17, 2, 2)]);
    let mut world = World::new(map, SimConfig::default()).unwrap();
    let now = Instant::now();
    let defender = world.admit_client("b", test_addr(1), now).unwrap();
    let attacker = world.admit_client("a", test_addr(2), now).unwrap();
    let generator = world.spawn_entity(defender, EntityKind::Generator, TilePos::new(10, 12));

    // 100 HP, 25 damage per hit: alive after three, gone after four.
    for seq in 1..=3u64 {
        world.step(
            now,
            vec![InputFrame {
                client: attacker,
                sequence: seq,
                tick: TickId(seq - 1),
                commands: vec![CommandPayload::Attack { target: generator }],
            }],
        );
        assert!(world.entity(generator).is_some());
    }
    world.step(
        now,
        vec![InputFrame {
            client: attacker,
            sequence: 4,
            tick: TickId(3),
            commands: vec![CommandPayload::Attack { target: generator }],
        }],
    );
    assert!(world.entity(generator).is_none());
    assert!(!world
        .client(defender)
        .unwrap()
        .owned_entities
        .contains(&generator));
}
