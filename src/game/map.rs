//! # Tile Grid
//!
//! Static per-cell terrain plus the two dynamic perception layers.
//!
//! Tiles are values, not identities: every cell holds exactly one terrain
//! kind at a time, and a [`GameMap`] is a dense `width x height` array of
//! them indexed `[x][y]`. On top of the terrain sit two boolean layers with
//! the same dimensions: `visible` (fully recomputed every perception
//! refresh) and `explored` (accumulated, never cleared). Renderers draw a
//! cell with its `light` glyph when visible, its `dark` glyph when merely
//! explored, and [`SHROUD`] otherwise.

use crate::Position;
use serde::{Deserialize, Serialize};

/// An RGB color triple consumed by renderers.
pub type Color = (u8, u8, u8);

/// Renderable appearance of a tile: a character plus foreground and
/// background colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Glyph {
    pub ch: char,
    pub fg: Color,
    pub bg: Color,
}

impl Glyph {
    /// Creates a new glyph.
    pub fn new(ch: char, fg: Color, bg: Color) -> Self {
        Self { ch, fg, bg }
    }
}

/// Appearance of a cell that has never been seen.
pub const SHROUD: Glyph = Glyph {
    ch: ' ',
    fg: (255, 255, 255),
    bg: (0, 0, 0),
};

/// Immutable per-cell terrain record.
///
/// `walkable` gates movement, `transparent` gates sight. The two glyphs are
/// the out-of-view and in-view appearances; the core never interprets them.
///
/// # Examples
///
/// ```
/// use barrow::Tile;
///
/// let floor = Tile::floor();
/// assert!(floor.walkable);
/// assert!(floor.transparent);
///
/// let wall = Tile::wall();
/// assert!(!wall.walkable);
/// assert!(!wall.transparent);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    /// True if this tile can be walked over
    pub walkable: bool,
    /// True if this tile doesn't block sight
    pub transparent: bool,
    /// Graphics for when this tile is explored but out of view
    pub dark: Glyph,
    /// Graphics for when this tile is in view
    pub light: Glyph,
}

impl Tile {
    /// Creates a tile with the given properties.
    pub fn new(walkable: bool, transparent: bool, dark: Glyph, light: Glyph) -> Self {
        Self {
            walkable,
            transparent,
            dark,
            light,
        }
    }

    /// Standard floor terrain.
    pub fn floor() -> Self {
        Self::new(
            true,
            true,
            Glyph::new(' ', (255, 255, 255), (50, 50, 150)),
            Glyph::new(' ', (255, 255, 255), (200, 180, 50)),
        )
    }

    /// Standard wall terrain.
    pub fn wall() -> Self {
        Self::new(
            false,
            false,
            Glyph::new(' ', (255, 255, 255), (0, 0, 100)),
            Glyph::new(' ', (255, 255, 255), (130, 110, 50)),
        )
    }
}

/// The shared spatial grid: terrain tiles plus visibility and exploration.
///
/// A freshly created map is solid wall; the dungeon generator carves floor
/// into it. The `explored` layer is monotonically non-decreasing: once a
/// cell is explored it stays explored for the life of the map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameMap {
    pub width: u32,
    pub height: u32,
    tiles: Vec<Tile>,
    visible: Vec<bool>,
    explored: Vec<bool>,
}

impl GameMap {
    /// Creates a map of the given dimensions filled with wall.
    ///
    /// # Examples
    ///
    /// ```
    /// use barrow::{GameMap, Position};
    ///
    /// let map = GameMap::new(10, 10);
    /// assert!(!map.is_walkable(Position::new(5, 5)));
    /// assert!(map.in_bounds(Position::new(9, 9)));
    /// assert!(!map.in_bounds(Position::new(10, 0)));
    /// ```
    pub fn new(width: u32, height: u32) -> Self {
        let cells = (width * height) as usize;
        Self {
            width,
            height,
            tiles: vec![Tile::wall(); cells],
            visible: vec![false; cells],
            explored: vec![false; cells],
        }
    }

    /// Returns true if the position lies within the map bounds.
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && (pos.x as u32) < self.width && pos.y >= 0 && (pos.y as u32) < self.height
    }

    fn index(&self, pos: Position) -> usize {
        pos.x as usize * self.height as usize + pos.y as usize
    }

    /// Gets the tile at a position, or None when out of bounds.
    pub fn tile(&self, pos: Position) -> Option<&Tile> {
        if self.in_bounds(pos) {
            Some(&self.tiles[self.index(pos)])
        } else {
            None
        }
    }

    /// Replaces the tile at a position. Out-of-bounds writes are ignored.
    pub fn set_tile(&mut self, pos: Position, tile: Tile) {
        if self.in_bounds(pos) {
            let idx = self.index(pos);
            self.tiles[idx] = tile;
        }
    }

    /// Returns true if an entity may stand on the cell. Out of bounds is
    /// never walkable.
    pub fn is_walkable(&self, pos: Position) -> bool {
        self.tile(pos).map(|t| t.walkable).unwrap_or(false)
    }

    /// Returns true if sight passes through the cell. Out of bounds never
    /// transmits sight.
    pub fn is_transparent(&self, pos: Position) -> bool {
        self.tile(pos).map(|t| t.transparent).unwrap_or(false)
    }

    /// Returns true if the cell is currently in view.
    pub fn is_visible(&self, pos: Position) -> bool {
        self.in_bounds(pos) && self.visible[self.index(pos)]
    }

    /// Returns true if the cell has ever been in view.
    pub fn is_explored(&self, pos: Position) -> bool {
        self.in_bounds(pos) && self.explored[self.index(pos)]
    }

    /// Marks a single cell visible. Used by sight algorithms during a
    /// refresh; does not touch the explored layer.
    pub fn set_visible(&mut self, pos: Position) {
        if self.in_bounds(pos) {
            let idx = self.index(pos);
            self.visible[idx] = true;
        }
    }

    /// Clears the whole visible layer ahead of a from-scratch recomputation.
    /// The explored layer is preserved.
    pub fn clear_visible(&mut self) {
        self.visible.fill(false);
    }

    /// Folds the current visible layer into the explored layer
    /// (`explored |= visible`).
    pub fn absorb_visible_into_explored(&mut self) {
        for (explored, &visible) in self.explored.iter_mut().zip(self.visible.iter()) {
            *explored |= visible;
        }
    }

    /// Iterates all in-bounds positions in column order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.width as i32)
            .flat_map(move |x| (0..self.height as i32).map(move |y| Position::new(x, y)))
    }

    /// Picks the glyph a renderer should draw for the cell: `light` when
    /// visible, `dark` when explored, [`SHROUD`] otherwise.
    pub fn glyph_at(&self, pos: Position) -> Glyph {
        match self.tile(pos) {
            Some(tile) if self.is_visible(pos) => tile.light,
            Some(tile) if self.is_explored(pos) => tile.dark,
            _ => SHROUD,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_map_is_solid_wall() {
        let map = GameMap::new(4, 3);
        for pos in map.positions() {
            assert!(!map.is_walkable(pos));
            assert!(!map.is_transparent(pos));
        }
    }

    #[test]
    fn test_bounds_checks() {
        let map = GameMap::new(10, 5);
        assert!(map.in_bounds(Position::new(0, 0)));
        assert!(map.in_bounds(Position::new(9, 4)));
        assert!(!map.in_bounds(Position::new(10, 0)));
        assert!(!map.in_bounds(Position::new(0, 5)));
        assert!(!map.in_bounds(Position::new(-1, 0)));
        assert!(map.tile(Position::new(-1, 0)).is_none());
    }

    #[test]
    fn test_set_tile_carves_floor() {
        let mut map = GameMap::new(10, 10);
        let pos = Position::new(3, 7);
        map.set_tile(pos, Tile::floor());
        assert!(map.is_walkable(pos));
        assert!(map.is_transparent(pos));
        // Neighbors untouched
        assert!(!map.is_walkable(Position::new(4, 7)));
    }

    #[test]
    fn test_out_of_bounds_write_is_ignored() {
        let mut map = GameMap::new(4, 4);
        map.set_tile(Position::new(-1, 2), Tile::floor());
        map.set_tile(Position::new(4, 2), Tile::floor());
        assert!(map.positions().all(|p| !map.is_walkable(p)));
    }

    #[test]
    fn test_visible_explored_layers() {
        let mut map = GameMap::new(8, 8);
        let pos = Position::new(2, 2);

        map.set_visible(pos);
        assert!(map.is_visible(pos));
        assert!(!map.is_explored(pos));

        map.absorb_visible_into_explored();
        assert!(map.is_explored(pos));

        map.clear_visible();
        assert!(!map.is_visible(pos));
        // Exploration survives the visibility reset
        assert!(map.is_explored(pos));
    }

    #[test]
    fn test_glyph_selection() {
        let mut map = GameMap::new(4, 4);
        let pos = Position::new(1, 1);
        map.set_tile(pos, Tile::floor());

        assert_eq!(map.glyph_at(pos), SHROUD);

        map.set_visible(pos);
        map.absorb_visible_into_explored();
        assert_eq!(map.glyph_at(pos), Tile::floor().light);

        map.clear_visible();
        assert_eq!(map.glyph_at(pos), Tile::floor().dark);
    }
}
