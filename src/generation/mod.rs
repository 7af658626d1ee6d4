//! # Generation Module
//!
//! Procedural dungeon generation: configuration, room geometry, and the
//! generator contract.
//!
//! Generation happens once, at world creation. It produces the tile grid and
//! the initial entity population together, since monster placement depends on
//! the carved layout. All randomness flows through a caller-seeded RNG so a
//! given configuration reproduces the same dungeon.

pub mod dungeon;

pub use dungeon::*;

use crate::{BarrowError, BarrowResult, Position};
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

/// Parameters for dungeon generation.
///
/// # Examples
///
/// ```
/// use barrow::GenerationConfig;
///
/// let config = GenerationConfig::new(42);
/// assert!(config.validate().is_ok());
/// assert!(config.room_min_size <= config.room_max_size);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Random seed for reproducible generation
    pub seed: u64,
    /// Map width in tiles
    pub width: u32,
    /// Map height in tiles
    pub height: u32,
    /// Maximum number of room placement attempts; rejected attempts are
    /// skipped, not retried
    pub max_rooms: u32,
    /// Minimum room side length, walls included
    pub room_min_size: u32,
    /// Maximum room side length, walls included
    pub room_max_size: u32,
    /// Cap on monsters spawned per accepted room
    pub max_monsters_per_room: u32,
}

impl GenerationConfig {
    /// Creates a configuration with the standard dimensions and densities.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            width: crate::config::DEFAULT_MAP_WIDTH,
            height: crate::config::DEFAULT_MAP_HEIGHT,
            max_rooms: crate::config::DEFAULT_MAX_ROOMS,
            room_min_size: crate::config::DEFAULT_ROOM_MIN_SIZE,
            room_max_size: crate::config::DEFAULT_ROOM_MAX_SIZE,
            max_monsters_per_room: crate::config::DEFAULT_MAX_MONSTERS_PER_ROOM,
        }
    }

    /// Checks the parameters before any generation state is touched.
    ///
    /// Violations are configuration errors: fatal to the generation call,
    /// not to the process.
    pub fn validate(&self) -> BarrowResult<()> {
        if self.max_rooms < 1 {
            return Err(BarrowError::InvalidConfig(
                "max_rooms must be at least 1".to_string(),
            ));
        }
        if self.room_min_size < 1 {
            return Err(BarrowError::InvalidConfig(
                "room_min_size must be at least 1".to_string(),
            ));
        }
        if self.room_max_size < self.room_min_size {
            return Err(BarrowError::InvalidConfig(
                "room_max_size must be at least room_min_size".to_string(),
            ));
        }
        if self.width <= self.room_max_size || self.height <= self.room_max_size {
            return Err(BarrowError::InvalidConfig(format!(
                "a {}x{} map cannot hold a room of size {}",
                self.width, self.height, self.room_max_size
            )));
        }
        Ok(())
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::new(42)
    }
}

/// A rectangular room on the grid, tracked only during generation.
///
/// The rectangle spans `x1..=x2` by `y1..=y2`; the interior (the carved
/// floor) excludes a 1-cell wall border, leaving the `x1`/`y1` edges and the
/// `x2`/`y2` edges as wall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl Room {
    /// Creates a room from its top-left corner and outer dimensions.
    ///
    /// # Examples
    ///
    /// ```
    /// use barrow::{Position, Room};
    ///
    /// let room = Room::new(2, 3, 6, 4);
    /// assert_eq!(room.center(), Position::new(5, 5));
    /// assert_eq!(room.interior().count(), 5 * 3);
    /// ```
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x1: x,
            y1: y,
            x2: x + width,
            y2: y + height,
        }
    }

    /// The center cell of the room; tunnels connect centers.
    pub fn center(&self) -> Position {
        Position::new((self.x1 + self.x2) / 2, (self.y1 + self.y2) / 2)
    }

    /// Iterates the interior cells (the wall border excluded).
    pub fn interior(&self) -> impl Iterator<Item = Position> {
        let (x1, x2, y1, y2) = (self.x1, self.x2, self.y1, self.y2);
        (x1 + 1..x2).flat_map(move |x| (y1 + 1..y2).map(move |y| Position::new(x, y)))
    }

    /// Returns true if a position lies in the interior.
    pub fn interior_contains(&self, pos: Position) -> bool {
        pos.x > self.x1 && pos.x < self.x2 && pos.y > self.y1 && pos.y < self.y2
    }

    /// Returns true if this room's rectangle touches or overlaps another's.
    /// Touching counts: accepted rooms keep at least a shared wall apart.
    pub fn intersects(&self, other: &Room) -> bool {
        self.x1 <= other.x2 && self.x2 >= other.x1 && self.y1 <= other.y2 && self.y2 >= other.y1
    }
}

/// Trait for procedural generators.
///
/// Generation systems implement this for a consistent interface: content is
/// produced from a configuration plus a seeded RNG, and can be re-checked
/// after the fact.
pub trait Generator<T> {
    /// Generates content using the provided configuration and RNG.
    fn generate(&self, config: &GenerationConfig, rng: &mut StdRng) -> BarrowResult<T>;

    /// Validates that generated content meets the generator's own
    /// invariants.
    fn validate(&self, content: &T, config: &GenerationConfig) -> BarrowResult<()>;

    /// Gets the generator type name for logging and debugging.
    fn generator_type(&self) -> &'static str;
}

/// Utility functions shared by generation algorithms.
pub mod utils {
    use super::*;
    use rand::SeedableRng;

    /// Creates the seeded RNG all generation randomness flows through.
    pub fn create_rng(config: &GenerationConfig) -> StdRng {
        StdRng::seed_from_u64(config.seed)
    }
}
