//! # Vision Module
//!
//! Field-of-view recomputation over the tile grid's transparency layer.
//!
//! Each perception refresh rebuilds the `visible` layer from scratch from a
//! single viewpoint, then folds it into the monotonically growing `explored`
//! layer. The line-of-sight engine is pluggable behind [`SightAlgorithm`];
//! the shipped implementation is recursive shadowcasting. A cell is visible
//! iff an unobstructed line of transparency exists from the viewpoint within
//! the configured radius, and the viewpoint itself is always visible.

use crate::{config, GameMap, Position};

/// A line-of-sight engine.
///
/// Implementations mark every cell that has line of transparency from
/// `origin` within `radius` via [`GameMap::set_visible`]. The caller owns
/// clearing the layer beforehand and marking the origin itself.
pub trait SightAlgorithm {
    fn illuminate(&self, map: &mut GameMap, origin: Position, radius: u32);
}

/// Recursive shadowcasting over eight octants.
///
/// Sweeps each octant row by row, narrowing the open slope interval as
/// opaque cells are encountered and recursing into the gaps behind them.
#[derive(Debug, Clone, Copy, Default)]
pub struct Shadowcast;

// Octant transforms: (xx, xy, yx, yy) per octant.
const OCTANTS: [[i32; 8]; 4] = [
    [1, 0, 0, -1, -1, 0, 0, 1],
    [0, 1, -1, 0, 0, -1, 1, 0],
    [0, 1, 1, 0, 0, -1, -1, 0],
    [1, 0, 0, 1, -1, 0, 0, -1],
];

impl SightAlgorithm for Shadowcast {
    fn illuminate(&self, map: &mut GameMap, origin: Position, radius: u32) {
        for octant in 0..8 {
            cast_octant(
                map,
                origin,
                radius as i32,
                1,
                1.0,
                0.0,
                OCTANTS[0][octant],
                OCTANTS[1][octant],
                OCTANTS[2][octant],
                OCTANTS[3][octant],
            );
        }
    }
}

/// Scans one octant from `row` outward, keeping the slope interval
/// `[end_slope, start_slope]` open. Opaque cells shrink the interval;
/// the scan recurses past each opaque run to light the cells behind its
/// trailing edge.
#[allow(clippy::too_many_arguments)]
fn cast_octant(
    map: &mut GameMap,
    origin: Position,
    radius: i32,
    row: i32,
    mut start_slope: f64,
    end_slope: f64,
    xx: i32,
    xy: i32,
    yx: i32,
    yy: i32,
) {
    if start_slope < end_slope {
        return;
    }

    let radius_sq = radius * radius;
    let mut next_start = start_slope;

    for distance in row..=radius {
        let mut blocked = false;
        let dy = -distance;

        for dx in -distance..=0 {
            let left_slope = (dx as f64 - 0.5) / (dy as f64 + 0.5);
            let right_slope = (dx as f64 + 0.5) / (dy as f64 - 0.5);

            if start_slope < right_slope {
                continue;
            }
            if end_slope > left_slope {
                break;
            }

            let cell = Position::new(origin.x + dx * xx + dy * xy, origin.y + dx * yx + dy * yy);

            if dx * dx + dy * dy <= radius_sq {
                map.set_visible(cell);
            }

            let opaque = !map.is_transparent(cell);
            if blocked {
                if opaque {
                    next_start = right_slope;
                } else {
                    blocked = false;
                    start_slope = next_start;
                }
            } else if opaque && distance < radius {
                // Light continues past this run only in the gap behind it.
                blocked = true;
                cast_octant(
                    map, origin, radius, distance + 1, start_slope, left_slope, xx, xy, yx, yy,
                );
                next_start = right_slope;
            }
        }

        if blocked {
            break;
        }
    }
}

/// Visibility subsystem: a sight radius plus a pluggable sight engine.
///
/// # Examples
///
/// ```
/// use barrow::{GameMap, Position, Tile, Vision};
///
/// let mut map = GameMap::new(10, 10);
/// for x in 1..9 {
///     map.set_tile(Position::new(x, 5), Tile::floor());
/// }
///
/// let vision = Vision::new();
/// vision.refresh(&mut map, Position::new(2, 5));
/// assert!(map.is_visible(Position::new(6, 5)));
/// assert!(map.is_explored(Position::new(6, 5)));
/// ```
#[derive(Debug, Clone)]
pub struct Vision<A: SightAlgorithm = Shadowcast> {
    /// Sight radius in tiles. A tuning value, not a protocol constraint.
    pub radius: u32,
    algorithm: A,
}

impl Vision<Shadowcast> {
    /// Creates the default shadowcasting vision with the standard radius.
    pub fn new() -> Self {
        Self::with_algorithm(config::DEFAULT_SIGHT_RADIUS, Shadowcast)
    }

    /// Creates a shadowcasting vision with a custom radius.
    pub fn with_radius(radius: u32) -> Self {
        Self::with_algorithm(radius, Shadowcast)
    }
}

impl Default for Vision<Shadowcast> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: SightAlgorithm> Vision<A> {
    /// Creates a vision subsystem around any sight engine meeting the
    /// [`SightAlgorithm`] contract.
    pub fn with_algorithm(radius: u32, algorithm: A) -> Self {
        Self { radius, algorithm }
    }

    /// Recomputes the map's visible layer from `viewpoint`, then accumulates
    /// it into the explored layer. The previous visible layer is discarded,
    /// not merged.
    pub fn refresh(&self, map: &mut GameMap, viewpoint: Position) {
        map.clear_visible();
        map.set_visible(viewpoint);
        self.algorithm.illuminate(map, viewpoint, self.radius);
        map.absorb_visible_into_explored();
    }
}
