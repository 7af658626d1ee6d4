//! Integration tests for dungeon generation: room placement, overlap
//! rejection, and carved connectivity.

use barrow::{
    generation, DungeonGenerator, EntitySet, EntitySpec, GameMap, GenerationConfig, Generator,
    Navigator, Position, SpawnTable,
};
use std::collections::{HashSet, VecDeque};

fn generator() -> DungeonGenerator {
    DungeonGenerator::new(
        EntitySpec::new("Player", '@', (255, 255, 255), true),
        SpawnTable::new(
            EntitySpec::new("Orc", 'o', (63, 127, 63), true),
            EntitySpec::new("Troll", 'T', (0, 127, 0), true),
            0.2,
        ),
    )
}

/// Flood-fills walkable cells from a root.
fn reachable_floor(map: &GameMap, root: Position) -> HashSet<Position> {
    let mut seen = HashSet::new();
    let mut queue = VecDeque::new();
    if map.is_walkable(root) {
        seen.insert(root);
        queue.push_back(root);
    }
    while let Some(pos) = queue.pop_front() {
        for next in pos.cardinal_adjacent_positions() {
            if map.is_walkable(next) && seen.insert(next) {
                queue.push_back(next);
            }
        }
    }
    seen
}

#[test]
fn test_default_dungeon_rooms_are_disjoint_and_connected() {
    for seed in [0, 7, 42, 1234, 99999] {
        let config = GenerationConfig::new(seed);
        let dungeon = generator()
            .generate(&config, &mut generation::utils::create_rng(&config))
            .unwrap();

        assert!(!dungeon.rooms.is_empty(), "seed {} produced no rooms", seed);

        for (i, a) in dungeon.rooms.iter().enumerate() {
            for b in dungeon.rooms.iter().skip(i + 1) {
                assert!(!a.intersects(b), "seed {}: rooms overlap", seed);
            }
        }

        // Every accepted room is reachable from the first through carved
        // floor: the tunnels connect centers transitively.
        let reached = reachable_floor(&dungeon.map, dungeon.rooms[0].center());
        for room in &dungeon.rooms {
            assert!(
                reached.contains(&room.center()),
                "seed {}: room at ({}, {}) disconnected",
                seed,
                room.x1,
                room.y1
            );
        }
    }
}

#[test]
fn test_two_small_rooms_in_a_tight_map() {
    // 20x20 map, two placement attempts, fixed 4x4 rooms. Rejection can
    // discard the second attempt on some seeds; scan a handful and check
    // every accepted layout, requiring that the full two-room case occurs.
    let mut saw_two_rooms = false;

    for seed in 0..50 {
        let config = GenerationConfig {
            width: 20,
            height: 20,
            max_rooms: 2,
            room_min_size: 4,
            room_max_size: 4,
            max_monsters_per_room: 0,
            ..GenerationConfig::new(seed)
        };
        let dungeon = generator()
            .generate(&config, &mut generation::utils::create_rng(&config))
            .unwrap();

        assert!(!dungeon.rooms.is_empty());
        assert!(dungeon.rooms.len() <= 2);
        for room in &dungeon.rooms {
            assert_eq!(room.x2 - room.x1, 4);
            assert_eq!(room.y2 - room.y1, 4);
        }

        if dungeon.rooms.len() == 2 {
            saw_two_rooms = true;
            let (a, b) = (dungeon.rooms[0], dungeon.rooms[1]);
            assert!(!a.intersects(&b));

            // A contiguous floor path connects the two centers.
            let reached = reachable_floor(&dungeon.map, a.center());
            assert!(reached.contains(&b.center()));

            // And pathfinding agrees, without any entity noise.
            let path =
                Navigator::new().find_path(&dungeon.map, &EntitySet::new(), a.center(), b.center());
            assert_eq!(path.last(), Some(&b.center()));
        }
    }

    assert!(saw_two_rooms, "no seed in 0..50 placed both rooms");
}

#[test]
fn test_player_spawns_in_first_room() {
    let config = GenerationConfig::new(2024);
    let dungeon = generator()
        .generate(&config, &mut generation::utils::create_rng(&config))
        .unwrap();

    let player = dungeon.entities.player_id().expect("player placed");
    let pos = dungeon.entities.get(player).unwrap().position;
    assert_eq!(pos, dungeon.rooms[0].center());
}

#[test]
fn test_blocking_entities_never_stack() {
    for seed in [3, 17, 404] {
        let config = GenerationConfig {
            max_monsters_per_room: 3,
            ..GenerationConfig::new(seed)
        };
        let dungeon = generator()
            .generate(&config, &mut generation::utils::create_rng(&config))
            .unwrap();

        let mut occupied = HashSet::new();
        for entity in dungeon.entities.iter().filter(|e| e.blocks_movement) {
            assert!(
                occupied.insert(entity.position),
                "seed {}: two blockers share {:?}",
                seed,
                entity.position
            );
        }
    }
}

#[test]
fn test_generation_fails_fast_on_bad_parameters() {
    let bad_configs = [
        GenerationConfig {
            max_rooms: 0,
            ..GenerationConfig::new(1)
        },
        GenerationConfig {
            room_min_size: 0,
            ..GenerationConfig::new(1)
        },
        GenerationConfig {
            room_min_size: 9,
            room_max_size: 5,
            ..GenerationConfig::new(1)
        },
    ];

    for config in bad_configs {
        let result = generator().generate(&config, &mut generation::utils::create_rng(&config));
        assert!(result.is_err());
    }
}
