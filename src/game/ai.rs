//! # Hostile AI
//!
//! Turns navigation queries into commands for AI-controlled entities.
//!
//! A monster acts only while its cell is inside the player's current field
//! of view (sight is treated as symmetric). Adjacent monsters strike;
//! everyone else asks the navigator for a route to the player and takes the
//! first step. The returned commands run through the same engine guards as
//! player input and are never recorded in the undo history.

use crate::{Command, EntityId, EntitySet, GameMap, Navigator};

/// Decides the reactive command for one AI-controlled entity, or None when
/// the entity idles this tick.
pub fn decide(
    map: &GameMap,
    entities: &EntitySet,
    navigator: &Navigator,
    monster_id: EntityId,
) -> Option<Command> {
    let monster = entities.get(monster_id)?;
    let player = entities.get(entities.player_id()?)?;
    if !monster.is_alive || !player.is_alive {
        return None;
    }

    // Out of the player's sight, the monster has no target to react to.
    if !map.is_visible(monster.position) {
        return None;
    }

    if monster.position.chebyshev_distance(player.position) <= 1 {
        let delta = player.position - monster.position;
        return Some(Command::Melee {
            dx: delta.x,
            dy: delta.y,
        });
    }

    let path = navigator.find_path(map, entities, monster.position, player.position);
    let next = path.first()?;
    let step = *next - monster.position;
    Some(Command::Move {
        dx: step.x,
        dy: step.y,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EntitySpec, Position, Tile, Vision};

    fn open_map(size: u32) -> GameMap {
        let mut map = GameMap::new(size, size);
        for x in 1..size as i32 - 1 {
            for y in 1..size as i32 - 1 {
                map.set_tile(Position::new(x, y), Tile::floor());
            }
        }
        map
    }

    fn setup(player_pos: Position, monster_pos: Position) -> (GameMap, EntitySet, EntityId) {
        let mut map = open_map(16);
        let mut entities = EntitySet::new();
        entities.spawn_player(EntitySpec::new("Player", '@', (255, 255, 255), true), player_pos);
        let monster = entities.spawn(EntitySpec::new("Orc", 'o', (63, 127, 63), true), monster_pos);
        Vision::new().refresh(&mut map, player_pos);
        (map, entities, monster)
    }

    #[test]
    fn test_adjacent_monster_strikes() {
        let (map, entities, monster) = setup(Position::new(5, 5), Position::new(6, 5));
        let command = decide(&map, &entities, &Navigator::new(), monster);
        assert_eq!(command, Some(Command::Melee { dx: -1, dy: 0 }));
    }

    #[test]
    fn test_visible_monster_steps_toward_player() {
        let (map, entities, monster) = setup(Position::new(5, 5), Position::new(9, 5));
        let command = decide(&map, &entities, &Navigator::new(), monster);
        match command {
            Some(Command::Move { dx, dy }) => {
                assert!(dx.abs() <= 1 && dy.abs() <= 1);
                assert!(dx == -1); // closing the gap along x
            }
            other => panic!("expected a move, got {:?}", other),
        }
    }

    #[test]
    fn test_unseen_monster_idles() {
        // Far outside the sight radius: the visible layer never reaches it.
        let (map, entities, monster) = setup(Position::new(2, 2), Position::new(14, 14));
        assert_eq!(decide(&map, &entities, &Navigator::new(), monster), None);
    }

    #[test]
    fn test_dead_player_is_ignored() {
        let (map, mut entities, monster) = setup(Position::new(5, 5), Position::new(6, 5));
        let player = entities.player_id().unwrap();
        entities.get_mut(player).unwrap().is_alive = false;
        assert_eq!(decide(&map, &entities, &Navigator::new(), monster), None);
    }
}
