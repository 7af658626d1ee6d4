//! # Action System
//!
//! The closed command set, undo snapshots, and the events a turn emits.
//!
//! The full set of command kinds is fixed and known, so commands are a
//! tagged enum rather than a trait hierarchy. A command is an immutable
//! intent produced by an external input translator (or by the hostile AI);
//! it is executed exactly once by the engine, optionally reverted exactly
//! once, and retained only inside the bounded history until evicted.

use crate::{Entity, EntityId, Position};
use serde::{Deserialize, Serialize};

/// An abstract command handed to the action engine.
///
/// # Examples
///
/// ```
/// use barrow::Command;
///
/// let step = Command::Move { dx: 1, dy: 0 };
/// assert!(step.history_eligible());
/// assert!(!Command::Undo.history_eligible());
/// assert!(!Command::Quit.history_eligible());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Translate the actor by a delta if the destination is in bounds,
    /// walkable, and free of blocking entities.
    Move { dx: i32, dy: i32 },
    /// Strike the blocking entity one step away in the given direction.
    Melee { dx: i32, dy: i32 },
    /// Melee if the destination holds a blocking entity, otherwise move.
    Bump { dx: i32, dy: i32 },
    /// Revert the most recent history-eligible command.
    Undo,
    /// Terminate the session. Propagated to the outermost loop.
    Quit,
}

impl Command {
    /// Whether an applied instance of this command belongs in the undo
    /// history. Undo and Quit never do.
    pub fn history_eligible(self) -> bool {
        matches!(
            self,
            Command::Move { .. } | Command::Melee { .. } | Command::Bump { .. }
        )
    }

    /// The directional payload, for the directional kinds.
    pub fn delta(self) -> Option<(i32, i32)> {
        match self {
            Command::Move { dx, dy } | Command::Melee { dx, dy } | Command::Bump { dx, dy } => {
                Some((dx, dy))
            }
            Command::Undo | Command::Quit => None,
        }
    }
}

/// Capability-tagged capture of the mutable fields a command may alter.
///
/// Today every undoable command moves its actor, so only position is
/// captured; new variants carry whatever state future command kinds touch
/// without widening the existing ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Snapshot {
    /// The actor's position before execution
    Position { x: i32, y: i32 },
}

impl Snapshot {
    /// Captures the state a directional command may alter.
    pub fn of(entity: &Entity) -> Self {
        Snapshot::Position {
            x: entity.position.x,
            y: entity.position.y,
        }
    }

    /// Restores the captured state onto the entity.
    pub fn restore(self, entity: &mut Entity) {
        match self {
            Snapshot::Position { x, y } => {
                entity.position = Position::new(x, y);
            }
        }
    }
}

/// A command that has been applied, together with what it needs to be
/// reverted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutedAction {
    pub command: Command,
    pub actor: EntityId,
    pub snapshot: Snapshot,
}

/// How the engine disposed of a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionOutcome {
    /// Guards passed and the effect was applied
    Applied,
    /// A guard failed; state is untouched and nothing was recorded
    Rejected,
    /// An undo ran (or found an empty history, which is still a no-op)
    Undone,
    /// Session termination requested
    Quit,
}

/// Something observable a turn did, surfaced for message logs and renderers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// An entity changed cells
    Moved {
        entity: EntityId,
        from: Position,
        to: Position,
    },
    /// A melee strike connected with a blocking entity
    Contact { attacker: EntityId, target: EntityId },
    /// Human-readable report of what happened
    Message { text: String },
}

/// Result of executing one command: the disposition, any events, and the
/// record the caller may feed to the history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResult {
    pub outcome: ActionOutcome,
    pub events: Vec<GameEvent>,
    /// Present only when the command applied with a snapshot; hand it to
    /// `Engine::record` to make the action undoable
    pub executed: Option<ExecutedAction>,
}

impl ActionResult {
    pub(crate) fn rejected() -> Self {
        Self {
            outcome: ActionOutcome::Rejected,
            events: Vec::new(),
            executed: None,
        }
    }

    pub(crate) fn applied(events: Vec<GameEvent>, executed: ExecutedAction) -> Self {
        Self {
            outcome: ActionOutcome::Applied,
            events,
            executed: Some(executed),
        }
    }
}
