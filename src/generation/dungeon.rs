//! # Dungeon Generation
//!
//! Room-and-corridor layout carved by rejection sampling.
//!
//! The generator makes up to `max_rooms` placement attempts. Each attempt
//! samples a room size and a top-left corner fully inside the bounds,
//! discards the candidate if its rectangle meets any accepted room, and
//! otherwise carves its interior to floor. The first accepted room seats the
//! designated player entity at its center; every later room is tunneled to
//! its predecessor's center, which keeps the whole layout connected in
//! generation order.

use crate::{
    BarrowError, BarrowResult, EntitySet, EntitySpec, GameMap, GenerationConfig, Generator,
    Position, Room, Tile,
};
use log::{debug, info};
use rand::{rngs::StdRng, Rng};
use serde::{Deserialize, Serialize};

/// Monster archetypes and their mix, supplied by the external entity table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnTable {
    /// The common archetype
    pub weak: EntitySpec,
    /// The rare archetype
    pub strong: EntitySpec,
    /// Probability a spawned monster is the strong archetype (0.0 to 1.0)
    pub strong_chance: f64,
}

impl SpawnTable {
    /// Creates a table with the given mix.
    pub fn new(weak: EntitySpec, strong: EntitySpec, strong_chance: f64) -> Self {
        Self {
            weak,
            strong,
            strong_chance,
        }
    }
}

/// A freshly generated world: the carved grid, the initial entity
/// population, and the accepted rooms in generation order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dungeon {
    pub map: GameMap,
    pub entities: EntitySet,
    pub rooms: Vec<Room>,
}

/// Room-and-corridor dungeon generator.
///
/// Holds the by-value archetypes it spawns; everything else comes from the
/// [`GenerationConfig`] and the seeded RNG.
///
/// # Examples
///
/// ```
/// use barrow::{generation, DungeonGenerator, EntitySpec, GenerationConfig, Generator, SpawnTable};
///
/// let generator = DungeonGenerator::new(
///     EntitySpec::new("Player", '@', (255, 255, 255), true),
///     SpawnTable::new(
///         EntitySpec::new("Orc", 'o', (63, 127, 63), true),
///         EntitySpec::new("Troll", 'T', (0, 127, 0), true),
///         0.2,
///     ),
/// );
///
/// let config = GenerationConfig::new(7);
/// let mut rng = generation::utils::create_rng(&config);
/// let dungeon = generator.generate(&config, &mut rng).unwrap();
/// assert!(!dungeon.rooms.is_empty());
/// assert!(dungeon.entities.player_id().is_some());
/// ```
#[derive(Debug, Clone)]
pub struct DungeonGenerator {
    /// Archetype for the designated seed entity placed in the first room
    pub player: EntitySpec,
    /// Monster archetypes spawned into accepted rooms
    pub spawns: SpawnTable,
}

impl DungeonGenerator {
    /// Creates a generator around externally defined archetypes.
    pub fn new(player: EntitySpec, spawns: SpawnTable) -> Self {
        Self { player, spawns }
    }

    /// Carves a room's interior to floor.
    fn carve_room(&self, map: &mut GameMap, room: &Room) {
        for pos in room.interior() {
            map.set_tile(pos, Tile::floor());
        }
    }

    /// Carves an L-shaped tunnel between two cells: two straight segments
    /// sharing one corner, the corner side chosen by an unbiased coin flip.
    fn carve_tunnel(&self, map: &mut GameMap, start: Position, end: Position, rng: &mut StdRng) {
        let corner = if rng.gen_bool(0.5) {
            // Horizontally first, then vertically
            Position::new(end.x, start.y)
        } else {
            // Vertically first, then horizontally
            Position::new(start.x, end.y)
        };

        for x in start.x.min(corner.x)..=start.x.max(corner.x) {
            map.set_tile(Position::new(x, corner.y), Tile::floor());
        }
        for y in start.y.min(corner.y)..=start.y.max(corner.y) {
            map.set_tile(Position::new(corner.x, y), Tile::floor());
        }
        for x in corner.x.min(end.x)..=corner.x.max(end.x) {
            map.set_tile(Position::new(x, end.y), Tile::floor());
        }
        for y in corner.y.min(end.y)..=corner.y.max(end.y) {
            map.set_tile(Position::new(end.x, y), Tile::floor());
        }
    }

    /// Populates a room with 0..=max monsters at random unoccupied interior
    /// cells. A sampled cell that is already occupied skips that monster.
    fn place_monsters(
        &self,
        room: &Room,
        entities: &mut EntitySet,
        max_monsters: u32,
        rng: &mut StdRng,
    ) {
        let count = rng.gen_range(0..=max_monsters);

        for _ in 0..count {
            let pos = Position::new(
                rng.gen_range(room.x1 + 1..room.x2),
                rng.gen_range(room.y1 + 1..room.y2),
            );
            if entities.any_entity_at(pos) {
                continue;
            }

            let spec = if rng.gen::<f64>() < self.spawns.strong_chance {
                self.spawns.strong.clone()
            } else {
                self.spawns.weak.clone()
            };
            entities.spawn(spec, pos);
        }
    }
}

impl Generator<Dungeon> for DungeonGenerator {
    /// Generates the grid and entity population in one pass.
    ///
    /// Fails fast with a configuration error before touching any state; a
    /// map that cannot fit all requested rooms simply yields fewer rooms.
    fn generate(&self, config: &GenerationConfig, rng: &mut StdRng) -> BarrowResult<Dungeon> {
        config.validate()?;

        let mut map = GameMap::new(config.width, config.height);
        let mut entities = EntitySet::new();
        let mut rooms: Vec<Room> = Vec::new();

        for _ in 0..config.max_rooms {
            let room_width = rng.gen_range(config.room_min_size..=config.room_max_size) as i32;
            let room_height = rng.gen_range(config.room_min_size..=config.room_max_size) as i32;

            let x = rng.gen_range(0..=config.width as i32 - room_width - 1);
            let y = rng.gen_range(0..=config.height as i32 - room_height - 1);

            let candidate = Room::new(x, y, room_width, room_height);

            // Skip this attempt, not the whole run
            if rooms.iter().any(|room| candidate.intersects(room)) {
                continue;
            }

            self.carve_room(&mut map, &candidate);

            if let Some(previous) = rooms.last() {
                self.carve_tunnel(&mut map, previous.center(), candidate.center(), rng);
            } else {
                // The first room seats the player
                entities.spawn_player(self.player.clone(), candidate.center());
            }

            self.place_monsters(&candidate, &mut entities, config.max_monsters_per_room, rng);

            debug!(
                "accepted room {} at ({}, {}) size {}x{}",
                rooms.len(),
                x,
                y,
                room_width,
                room_height
            );
            rooms.push(candidate);
        }

        info!(
            "generated dungeon: {} rooms, {} entities on a {}x{} map",
            rooms.len(),
            entities.len(),
            config.width,
            config.height
        );

        Ok(Dungeon {
            map,
            entities,
            rooms,
        })
    }

    fn validate(&self, dungeon: &Dungeon, _config: &GenerationConfig) -> BarrowResult<()> {
        if dungeon.rooms.is_empty() {
            return Err(BarrowError::InvalidState(
                "dungeon has no rooms".to_string(),
            ));
        }
        for (i, a) in dungeon.rooms.iter().enumerate() {
            for b in dungeon.rooms.iter().skip(i + 1) {
                if a.intersects(b) {
                    return Err(BarrowError::InvalidState(format!(
                        "rooms {:?} and {:?} overlap",
                        a, b
                    )));
                }
            }
        }
        if dungeon.entities.player_id().is_none() {
            return Err(BarrowError::InvalidState(
                "no player entity placed".to_string(),
            ));
        }
        Ok(())
    }

    fn generator_type(&self) -> &'static str {
        "DungeonGenerator"
    }
}
