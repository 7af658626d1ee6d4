//! # Barrow
//!
//! Simulation core for a grid-based, turn-driven dungeon crawler.
//!
//! ## Architecture Overview
//!
//! Barrow decides what happens in the world each turn, generates the world
//! itself, and determines what an observer can perceive and navigate. The
//! crate is organized around three load-bearing subsystems coupled through a
//! shared tile grid and entity set:
//!
//! - **Action Engine**: Command pattern for all game actions, with a bounded
//!   undo history and a fixed per-turn ordering (player acts, the world
//!   reacts, perception refreshes)
//! - **Generation System**: Procedural room-and-corridor dungeon layout that
//!   also seeds the initial entity population
//! - **Navigation**: Field-of-view computation over the transparency layer
//!   and cost-weighted pathfinding over the walkability layer
//!
//! Presentation, input translation, and entity stat tables are external
//! collaborators: the core consumes already-resolved [`Command`] values and
//! by-value [`EntitySpec`] archetypes, and exposes the grid layers and entity
//! set for rendering. All commands are serializable so a remote or scripted
//! driver can feed the engine the same way a keyboard handler would.

pub mod game;
pub mod generation;
pub mod nav;
pub mod vision;

pub use game::*;
pub use generation::*;
pub use nav::*;
pub use vision::*;

// Explicit re-exports for the types most callers touch.
pub use game::{
    // From actions
    ActionOutcome,
    ActionResult,
    Command,
    ExecutedAction,
    GameEvent,
    Snapshot,
    // From entities
    Entity,
    EntityId,
    EntitySet,
    EntitySpec,
    // From engine
    Engine,
    TurnReport,
    // From map
    GameMap,
    Glyph,
    Tile,
    // Shared primitives
    Position,
};

pub use generation::{Dungeon, DungeonGenerator, GenerationConfig, Generator, Room, SpawnTable};

/// Core error type for the Barrow simulation.
#[derive(thiserror::Error, Debug)]
pub enum BarrowError {
    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Game state is invalid (precondition violated by the caller)
    #[error("Invalid game state: {0}")]
    InvalidState(String),

    /// Generator parameters are unusable
    #[error("Invalid generation config: {0}")]
    InvalidConfig(String),
}

/// Result type used throughout the Barrow codebase.
pub type BarrowResult<T> = Result<T, BarrowError>;

/// Version information for the crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Tuning constants and their defaults.
///
/// The sight radius and crowd penalty are balance knobs, not protocol
/// constraints; [`crate::Vision`] and [`crate::Navigator`] expose them as
/// configurable fields seeded from here.
pub mod config {
    /// Default dungeon width in tiles
    pub const DEFAULT_MAP_WIDTH: u32 = 80;

    /// Default dungeon height in tiles
    pub const DEFAULT_MAP_HEIGHT: u32 = 45;

    /// Default maximum number of rooms per dungeon
    pub const DEFAULT_MAX_ROOMS: u32 = 30;

    /// Default minimum room side length (walls included)
    pub const DEFAULT_ROOM_MIN_SIZE: u32 = 6;

    /// Default maximum room side length (walls included)
    pub const DEFAULT_ROOM_MAX_SIZE: u32 = 10;

    /// Default cap on monsters spawned per room
    pub const DEFAULT_MAX_MONSTERS_PER_ROOM: u32 = 2;

    /// Default field-of-view radius in tiles
    pub const DEFAULT_SIGHT_RADIUS: u32 = 8;

    /// Number of executed actions retained for undo; oldest entries are
    /// evicted first
    pub const HISTORY_CAPACITY: usize = 32;

    /// Extra traversal cost added for each blocking entity on a passable cell
    pub const DEFAULT_CROWD_PENALTY: u32 = 10;

    /// Base cost multiplier for a cardinal step
    pub const CARDINAL_STEP_COST: u32 = 2;

    /// Base cost multiplier for a diagonal step; strictly greater than
    /// [`CARDINAL_STEP_COST`] so paths prefer straight runs
    pub const DIAGONAL_STEP_COST: u32 = 3;
}
