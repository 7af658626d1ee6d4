//! # Navigation Module
//!
//! Traversal-cost fields and cost-weighted pathfinding.
//!
//! Route search runs over a per-cell cost field derived from the tile grid
//! and the current entity occupancy. Blocking entities never make a cell
//! impassable; they add a penalty instead, so crowded corridors stay usable
//! while open detours are preferred. The search itself is the `pathfinding`
//! crate's weighted A* over the 8-connected grid, with diagonal steps
//! costing strictly more than cardinal ones.

use crate::{config, EntitySet, GameMap, Position};

/// Per-cell traversal weights. A cost of 0 marks the cell impassable.
#[derive(Debug, Clone)]
pub struct CostField {
    width: u32,
    height: u32,
    cells: Vec<u32>,
}

impl CostField {
    fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            cells: vec![0; (width * height) as usize],
        }
    }

    fn index(&self, pos: Position) -> usize {
        pos.x as usize * self.height as usize + pos.y as usize
    }

    fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && (pos.x as u32) < self.width && pos.y >= 0 && (pos.y as u32) < self.height
    }

    /// The traversal cost of entering a cell; 0 (impassable) out of bounds.
    pub fn cost(&self, pos: Position) -> u32 {
        if self.in_bounds(pos) {
            self.cells[self.index(pos)]
        } else {
            0
        }
    }

    fn set(&mut self, pos: Position, cost: u32) {
        if self.in_bounds(pos) {
            let idx = self.index(pos);
            self.cells[idx] = cost;
        }
    }

    fn add(&mut self, pos: Position, extra: u32) {
        if self.in_bounds(pos) {
            let idx = self.index(pos);
            self.cells[idx] += extra;
        }
    }
}

/// Pathfinding subsystem with a configurable crowding penalty.
///
/// # Examples
///
/// ```
/// use barrow::{EntitySet, GameMap, Navigator, Position, Tile};
///
/// let mut map = GameMap::new(10, 3);
/// for x in 0..10 {
///     map.set_tile(Position::new(x, 1), Tile::floor());
/// }
///
/// let navigator = Navigator::new();
/// let path = navigator.find_path(&map, &EntitySet::new(), Position::new(0, 1), Position::new(4, 1));
/// assert_eq!(path.len(), 4); // start excluded, goal included
/// assert_eq!(path.last(), Some(&Position::new(4, 1)));
/// ```
#[derive(Debug, Clone)]
pub struct Navigator {
    /// Extra cost per blocking entity on a passable cell. Lower values crowd
    /// movers behind each other in hallways; higher values push them onto
    /// longer detours. A tuning value, not a protocol constraint.
    pub crowd_penalty: u32,
}

impl Navigator {
    /// Creates a navigator with the default crowding penalty.
    pub fn new() -> Self {
        Self {
            crowd_penalty: config::DEFAULT_CROWD_PENALTY,
        }
    }

    /// Creates a navigator with a custom crowding penalty.
    pub fn with_penalty(crowd_penalty: u32) -> Self {
        Self { crowd_penalty }
    }

    /// Builds the traversal-cost field for a route rooted at `start`.
    ///
    /// Walkable terrain costs 1, everything else is impassable. Every living
    /// blocking entity standing off the root cell adds [`Self::crowd_penalty`]
    /// to its (passable) cell.
    pub fn cost_field(&self, map: &GameMap, entities: &EntitySet, start: Position) -> CostField {
        let mut field = CostField::new(map.width, map.height);

        for pos in map.positions() {
            if map.is_walkable(pos) {
                field.set(pos, 1);
            }
        }

        for entity in entities.iter() {
            if !entity.is_alive || !entity.blocks_movement || entity.position == start {
                continue;
            }
            if field.cost(entity.position) > 0 {
                field.add(entity.position, self.crowd_penalty);
            }
        }

        field
    }

    /// Finds the cheapest route from `start` to `goal` over the cost field.
    ///
    /// Returns the cell sequence from (but excluding) `start` up to and
    /// including `goal`. Unreachable goals, impassable goals, and
    /// `start == goal` all yield an empty sequence, never an error.
    pub fn find_path(
        &self,
        map: &GameMap,
        entities: &EntitySet,
        start: Position,
        goal: Position,
    ) -> Vec<Position> {
        if start == goal {
            return Vec::new();
        }

        let field = self.cost_field(map, entities, start);
        if field.cost(goal) == 0 {
            return Vec::new();
        }

        let result = pathfinding::prelude::astar(
            &start,
            |&pos| {
                let field = &field;
                pos.adjacent_positions()
                    .into_iter()
                    .filter_map(move |next| {
                        let cell = field.cost(next);
                        if cell == 0 {
                            return None;
                        }
                        let diagonal = next.x != pos.x && next.y != pos.y;
                        let step = if diagonal {
                            config::DIAGONAL_STEP_COST
                        } else {
                            config::CARDINAL_STEP_COST
                        };
                        Some((next, cell * step))
                    })
                    .collect::<Vec<_>>()
            },
            |&pos| pos.chebyshev_distance(goal) * config::CARDINAL_STEP_COST,
            |&pos| pos == goal,
        );

        match result {
            Some((cells, _cost)) => cells.into_iter().skip(1).collect(),
            None => Vec::new(),
        }
    }
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}
