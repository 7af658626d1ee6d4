//! # Action Engine
//!
//! Command execution, the bounded undo history, and per-turn sequencing.
//!
//! A turn is strictly ordered: the player's command executes, every other
//! living entity gets one reactive turn in spawn order, then perception
//! refreshes from the player's cell. All mutation of the entity set happens
//! inside this sequence, one phase at a time; nothing here blocks on I/O and
//! a turn always runs to completion.
//!
//! Semantically void commands (moving into a wall, striking empty air) are
//! not errors: their guard fails before any mutation, they complete without
//! effect, and they are never recorded in the undo history.

use crate::game::ai;
use crate::{
    config, ActionOutcome, ActionResult, BarrowError, BarrowResult, Command, EntityId, EntitySet,
    ExecutedAction, GameEvent, GameMap, Navigator, SightAlgorithm, Snapshot, Vision,
};
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// What one full turn produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnReport {
    /// Turn number after processing
    pub turn: u64,
    /// Disposition of the player's command
    pub player_outcome: ActionOutcome,
    /// Events from the player's command and all reactive turns, in order
    pub events: Vec<GameEvent>,
}

impl TurnReport {
    /// True when the player requested session termination this turn.
    pub fn quit(&self) -> bool {
        self.player_outcome == ActionOutcome::Quit
    }
}

/// The command/undo engine driving the simulation.
///
/// # Examples
///
/// ```
/// use barrow::{Command, Engine, EntitySet, EntitySpec, GameMap, Position, Tile};
///
/// let mut map = GameMap::new(5, 5);
/// map.set_tile(Position::new(2, 2), Tile::floor());
/// map.set_tile(Position::new(3, 2), Tile::floor());
///
/// let mut entities = EntitySet::new();
/// let actor = entities.spawn_player(
///     EntitySpec::new("Player", '@', (255, 255, 255), true),
///     Position::new(2, 2),
/// );
///
/// let mut engine = Engine::new();
/// let result = engine.execute(Command::Move { dx: 1, dy: 0 }, actor, &map, &mut entities).unwrap();
/// assert_eq!(entities.get(actor).unwrap().position, Position::new(3, 2));
/// assert!(result.executed.is_some());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Engine {
    history: VecDeque<ExecutedAction>,
    capacity: usize,
    turn_number: u64,
}

impl Engine {
    /// Creates an engine with the standard undo window.
    pub fn new() -> Self {
        Self::with_capacity(config::HISTORY_CAPACITY)
    }

    /// Creates an engine with a custom undo window.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            history: VecDeque::with_capacity(capacity),
            capacity,
            turn_number: 0,
        }
    }

    /// Number of turns processed so far.
    pub fn turn_number(&self) -> u64 {
        self.turn_number
    }

    /// Current length of the undo history.
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Iterates the undo history oldest-first.
    pub fn history(&self) -> impl Iterator<Item = &ExecutedAction> {
        self.history.iter()
    }

    /// Executes one command for one actor against the shared grid and
    /// entity state.
    ///
    /// Captures the actor's snapshot before mutating. Guard failures return
    /// [`ActionOutcome::Rejected`] with the world untouched. A missing actor
    /// is a caller bug and surfaces as [`BarrowError::InvalidState`].
    ///
    /// The returned [`ActionResult::executed`] carries the record the caller
    /// may hand to [`Engine::record`]; reactive (AI) commands are executed
    /// through this same path but never recorded.
    pub fn execute(
        &mut self,
        command: Command,
        actor: EntityId,
        map: &GameMap,
        entities: &mut EntitySet,
    ) -> BarrowResult<ActionResult> {
        trace!("executing {:?} for {}", command, actor);
        match command {
            Command::Move { dx, dy } => self.perform_move(command, actor, dx, dy, map, entities),
            Command::Melee { dx, dy } => self.perform_melee(command, actor, dx, dy, entities),
            Command::Bump { dx, dy } => {
                let origin = Self::actor_position(actor, entities)?;
                if entities.blocking_entity_at(origin.offset(dx, dy)).is_some() {
                    self.perform_melee(command, actor, dx, dy, entities)
                } else {
                    self.perform_move(command, actor, dx, dy, map, entities)
                }
            }
            Command::Undo => {
                let events = self.undo_last(entities);
                Ok(ActionResult {
                    outcome: ActionOutcome::Undone,
                    events,
                    executed: None,
                })
            }
            Command::Quit => Ok(ActionResult {
                outcome: ActionOutcome::Quit,
                events: Vec::new(),
                executed: None,
            }),
        }
    }

    /// Appends an executed action to the history if its command kind is
    /// history-eligible, evicting the oldest entry once the bound is hit.
    pub fn record(&mut self, executed: ExecutedAction) {
        if !executed.command.history_eligible() {
            return;
        }
        if self.history.len() == self.capacity {
            self.history.pop_front();
        }
        self.history.push_back(executed);
        trace!("history length {}", self.history.len());
    }

    /// Reverts the most recently recorded action by restoring its snapshot.
    /// A no-op on an empty history.
    pub fn undo_last(&mut self, entities: &mut EntitySet) -> Vec<GameEvent> {
        let Some(executed) = self.history.pop_back() else {
            return Vec::new();
        };
        let Some(entity) = entities.get_mut(executed.actor) else {
            // The actor left the set since; the snapshot has nothing to
            // restore onto.
            debug!("undo target {} no longer exists", executed.actor);
            return Vec::new();
        };

        let from = entity.position;
        executed.snapshot.restore(entity);
        let to = entity.position;
        debug!("undid {:?}, history length {}", executed.command, self.history.len());

        if from != to {
            vec![GameEvent::Moved {
                entity: executed.actor,
                from,
                to,
            }]
        } else {
            Vec::new()
        }
    }

    /// Runs one full turn: player command, reactive turns for every other
    /// living entity in spawn order, perception refresh.
    ///
    /// A Quit command short-circuits the reactive and refresh phases and
    /// propagates through the report for the outermost loop to act on.
    pub fn process_turn<A: SightAlgorithm>(
        &mut self,
        command: Command,
        map: &mut GameMap,
        entities: &mut EntitySet,
        vision: &Vision<A>,
        navigator: &Navigator,
    ) -> BarrowResult<TurnReport> {
        let player = entities
            .player_id()
            .ok_or_else(|| BarrowError::InvalidState("no player entity designated".to_string()))?;

        let result = self.execute(command, player, map, entities)?;
        if let Some(executed) = result.executed {
            self.record(executed);
        }
        let player_outcome = result.outcome;
        let mut events = result.events;

        if player_outcome == ActionOutcome::Quit {
            return Ok(TurnReport {
                turn: self.turn_number,
                player_outcome,
                events,
            });
        }

        self.turn_number += 1;
        debug!("turn {}: player {:?} -> {:?}", self.turn_number, command, player_outcome);

        // The world reacts: one command per living non-player entity.
        for id in entities.reactive_ids() {
            if let Some(reaction) = ai::decide(map, entities, navigator, id) {
                let reaction_result = self.execute(reaction, id, map, entities)?;
                events.extend(reaction_result.events);
            }
        }

        // Perception refresh closes the turn.
        if let Some(entity) = entities.get(player) {
            vision.refresh(map, entity.position);
        }

        Ok(TurnReport {
            turn: self.turn_number,
            player_outcome,
            events,
        })
    }

    fn actor_position(actor: EntityId, entities: &EntitySet) -> BarrowResult<crate::Position> {
        entities
            .get(actor)
            .map(|e| e.position)
            .ok_or_else(|| BarrowError::InvalidState(format!("actor {} not found", actor)))
    }

    fn perform_move(
        &mut self,
        command: Command,
        actor: EntityId,
        dx: i32,
        dy: i32,
        map: &GameMap,
        entities: &mut EntitySet,
    ) -> BarrowResult<ActionResult> {
        let origin = Self::actor_position(actor, entities)?;
        let destination = origin.offset(dx, dy);

        if !map.in_bounds(destination) || !map.is_walkable(destination) {
            return Ok(ActionResult::rejected());
        }
        if entities.blocking_entity_at(destination).is_some() {
            return Ok(ActionResult::rejected());
        }

        let entity = entities
            .get_mut(actor)
            .ok_or_else(|| BarrowError::InvalidState(format!("actor {} not found", actor)))?;
        let snapshot = Snapshot::of(entity);
        entity.position = destination;

        Ok(ActionResult::applied(
            vec![GameEvent::Moved {
                entity: actor,
                from: origin,
                to: destination,
            }],
            ExecutedAction {
                command,
                actor,
                snapshot,
            },
        ))
    }

    fn perform_melee(
        &mut self,
        command: Command,
        actor: EntityId,
        dx: i32,
        dy: i32,
        entities: &mut EntitySet,
    ) -> BarrowResult<ActionResult> {
        let origin = Self::actor_position(actor, entities)?;
        let destination = origin.offset(dx, dy);

        let Some(target) = entities.blocking_entity_at(destination) else {
            // Nothing to strike
            return Ok(ActionResult::rejected());
        };
        let target_id = target.id;
        let text = {
            let attacker = entities
                .get(actor)
                .ok_or_else(|| BarrowError::InvalidState(format!("actor {} not found", actor)))?;
            format!(
                "The {} kicks the {}, much to its annoyance!",
                attacker.name, target.name
            )
        };

        let entity = entities
            .get_mut(actor)
            .ok_or_else(|| BarrowError::InvalidState(format!("actor {} not found", actor)))?;
        let snapshot = Snapshot::of(entity);

        Ok(ActionResult::applied(
            vec![
                GameEvent::Contact {
                    attacker: actor,
                    target: target_id,
                },
                GameEvent::Message { text },
            ],
            ExecutedAction {
                command,
                actor,
                snapshot,
            },
        ))
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}
