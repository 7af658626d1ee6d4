//! Property-style tests for the guarantees that must hold over arbitrary
//! command sequences: undo inversion, history bounding, and exploration
//! monotonicity.

use barrow::{Command, Engine, EntitySet, EntitySpec, GameMap, Position, Tile, Vision};
use proptest::prelude::*;

fn open_map(width: u32, height: u32) -> GameMap {
    let mut map = GameMap::new(width, height);
    for x in 1..width as i32 - 1 {
        for y in 1..height as i32 - 1 {
            map.set_tile(Position::new(x, y), Tile::floor());
        }
    }
    map
}

fn player() -> EntitySpec {
    EntitySpec::new("Player", '@', (255, 255, 255), true)
}

/// The eight legal movement deltas.
fn step_strategy() -> impl Strategy<Value = (i32, i32)> {
    prop::sample::select(vec![
        (1, 0),
        (1, 1),
        (0, 1),
        (-1, 1),
        (-1, 0),
        (-1, -1),
        (0, -1),
        (1, -1),
    ])
}

proptest! {
    /// For any sequence of at most 32 recorded moves, undoing them all
    /// restores the starting position exactly.
    #[test]
    fn undo_inverts_any_move_sequence(steps in prop::collection::vec(step_strategy(), 0..=32)) {
        let map = open_map(100, 100);
        let mut entities = EntitySet::new();
        let start = Position::new(50, 50);
        let actor = entities.spawn_player(player(), start);
        let mut engine = Engine::new();

        let mut applied = 0usize;
        for (dx, dy) in steps {
            let result = engine
                .execute(Command::Move { dx, dy }, actor, &map, &mut entities)
                .unwrap();
            if let Some(executed) = result.executed {
                engine.record(executed);
                applied += 1;
            }
        }

        for _ in 0..applied {
            engine.undo_last(&mut entities);
        }

        prop_assert_eq!(entities.get(actor).unwrap().position, start);
        prop_assert_eq!(engine.history_len(), 0);
    }

    /// After more eligible commands than the history holds, exactly the most
    /// recent ones remain, in execution order.
    #[test]
    fn history_keeps_the_newest_32(steps in prop::collection::vec(step_strategy(), 33..=48)) {
        let map = open_map(120, 120);
        let mut entities = EntitySet::new();
        let actor = entities.spawn_player(player(), Position::new(60, 60));
        let mut engine = Engine::new();

        let mut recorded = Vec::new();
        for (dx, dy) in steps {
            let command = Command::Move { dx, dy };
            let result = engine.execute(command, actor, &map, &mut entities).unwrap();
            if let Some(executed) = result.executed {
                engine.record(executed);
                recorded.push(command);
            }
        }

        let expected: Vec<Command> = recorded
            .iter()
            .rev()
            .take(32)
            .rev()
            .copied()
            .collect();
        let actual: Vec<Command> = engine.history().map(|e| e.command).collect();

        prop_assert!(actual.len() <= 32);
        prop_assert_eq!(actual, expected);
    }

    /// Exploration never shrinks, wherever the viewpoint wanders.
    #[test]
    fn explored_is_monotonic(viewpoints in prop::collection::vec((0i32..40, 0i32..20), 1..20)) {
        let mut map = open_map(40, 20);
        let vision = Vision::new();

        let mut explored = std::collections::HashSet::new();
        for (x, y) in viewpoints {
            vision.refresh(&mut map, Position::new(x, y));

            let now: std::collections::HashSet<Position> =
                map.positions().filter(|&p| map.is_explored(p)).collect();
            prop_assert!(explored.is_subset(&now));
            explored = now;
        }
    }

    /// Rejected commands leave both the world and the history untouched.
    #[test]
    fn walls_absorb_moves_silently(y in 1i32..9) {
        let map = open_map(10, 10);
        let mut entities = EntitySet::new();
        let start = Position::new(1, y);
        let actor = entities.spawn_player(player(), start);
        let mut engine = Engine::new();

        // Straight into the western wall
        let result = engine
            .execute(Command::Move { dx: -1, dy: 0 }, actor, &map, &mut entities)
            .unwrap();

        prop_assert!(result.executed.is_none());
        prop_assert_eq!(entities.get(actor).unwrap().position, start);
        prop_assert_eq!(engine.history_len(), 0);
    }
}
