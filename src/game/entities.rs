//! # Entity Set
//!
//! Mutable collection of positioned objects sharing the tile grid.
//!
//! The set exclusively owns entity lifetime; entities reference no other
//! entity directly. Archetype definitions (name, glyph, color, blocking)
//! come from an external factory as [`EntitySpec`] values and are consumed
//! by value at spawn time. Iteration follows spawn order, which is the
//! consistent per-tick order the reactive turn phase relies on.

use crate::{new_entity_id, Color, EntityId, Position};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// By-value archetype for spawning an entity.
///
/// # Examples
///
/// ```
/// use barrow::EntitySpec;
///
/// let orc = EntitySpec::new("Orc", 'o', (63, 127, 63), true);
/// assert!(orc.blocks_movement);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySpec {
    pub name: String,
    pub glyph: char,
    pub color: Color,
    pub blocks_movement: bool,
}

impl EntitySpec {
    /// Creates a new archetype.
    pub fn new(name: impl Into<String>, glyph: char, color: Color, blocks_movement: bool) -> Self {
        Self {
            name: name.into(),
            glyph,
            color,
            blocks_movement,
        }
    }
}

/// A positioned object in the world.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub position: Position,
    pub glyph: char,
    pub color: Color,
    pub name: String,
    pub blocks_movement: bool,
    pub is_alive: bool,
}

impl Entity {
    fn from_spec(spec: EntitySpec, position: Position) -> Self {
        Self {
            id: new_entity_id(),
            position,
            glyph: spec.glyph,
            color: spec.color,
            name: spec.name,
            blocks_movement: spec.blocks_movement,
            is_alive: true,
        }
    }
}

/// Owning collection of all entities on the current map.
///
/// At most one blocking entity may validly occupy a cell at a time; the
/// generator and movement guards preserve this, and the set does not
/// silently resolve violations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntitySet {
    entities: HashMap<EntityId, Entity>,
    /// Spawn order; drives stable iteration
    order: Vec<EntityId>,
    player_id: Option<EntityId>,
}

impl EntitySet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawns an entity from an archetype at a position and returns its ID.
    ///
    /// # Examples
    ///
    /// ```
    /// use barrow::{EntitySet, EntitySpec, Position};
    ///
    /// let mut entities = EntitySet::new();
    /// let id = entities.spawn(EntitySpec::new("Orc", 'o', (63, 127, 63), true), Position::new(3, 4));
    /// assert_eq!(entities.get(id).unwrap().position, Position::new(3, 4));
    /// ```
    pub fn spawn(&mut self, spec: EntitySpec, position: Position) -> EntityId {
        let entity = Entity::from_spec(spec, position);
        let id = entity.id;
        self.entities.insert(id, entity);
        self.order.push(id);
        id
    }

    /// Spawns the player entity and remembers it as the designated actor.
    pub fn spawn_player(&mut self, spec: EntitySpec, position: Position) -> EntityId {
        let id = self.spawn(spec, position);
        self.player_id = Some(id);
        id
    }

    /// The designated player entity, if one has been spawned.
    pub fn player_id(&self) -> Option<EntityId> {
        self.player_id
    }

    /// Gets an entity by ID.
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    /// Gets an entity mutably by ID.
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    /// Number of entities in the set.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns true if the set holds no entities.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Iterates entities in spawn order.
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.order.iter().filter_map(|id| self.entities.get(id))
    }

    /// IDs of all living entities other than the player, in spawn order.
    /// This is the reactive-turn dispatch order.
    pub fn reactive_ids(&self) -> Vec<EntityId> {
        self.order
            .iter()
            .copied()
            .filter(|&id| {
                Some(id) != self.player_id
                    && self.entities.get(&id).map(|e| e.is_alive).unwrap_or(false)
            })
            .collect()
    }

    /// The blocking entity occupying a cell, if any.
    pub fn blocking_entity_at(&self, position: Position) -> Option<&Entity> {
        self.iter()
            .find(|e| e.is_alive && e.blocks_movement && e.position == position)
    }

    /// Returns true if any entity (blocking or not) occupies the cell.
    pub fn any_entity_at(&self, position: Position) -> bool {
        self.iter().any(|e| e.position == position)
    }
}
