use crate::collision::Aabb;
use serde::{Deserialize, Serialize};

/// Effective collision height of a regular tile, in world units.
pub const FULL_TILE_HEIGHT: f32 = 1.0;
/// Effective collision height of a quarter tile.
pub const QUARTER_TILE_HEIGHT: f32 = 0.25;

/// Kind of solid tile stored in a layer cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileId {
    /// Full unit cell
    Solid,
    /// Tile carrying the quarter-height metadata flag
    Quarter,
}

impl TileId {
    /// Height override read from the tile's metadata
    pub fn height(&self) -> f32 {
        match self {
            TileId::Solid => FULL_TILE_HEIGHT,
            TileId::Quarter => QUARTER_TILE_HEIGHT,
        }
    }

    /// Map-file character for this tile
    pub fn to_char(&self) -> char {
        match self {
            TileId::Solid => '#',
            TileId::Quarter => '_',
        }
    }

    /// Parse a map-file character. Any unknown character is an empty cell.
    pub fn from_char(c: char) -> Option<TileId> {
        match c {
            '#' => Some(TileId::Solid),
            '_' => Some(TileId::Quarter),
            _ => None,
        }
    }
}

/// One solid cell returned by a grid query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileSpec {
    pub x: i32,
    pub y: i32,
    /// Effective height: 1.0 for a full tile, 0.25 for a quarter tile
    pub height: f32,
}

impl TileSpec {
    /// Collision rectangle: the bottom `height` of the unit cell.
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.x as f32, self.y as f32, 1.0, self.height)
    }

    /// World y of the surface an entity rests on.
    pub fn top(&self) -> f32 {
        self.y as f32 + self.height
    }

    /// World y of the underside an entity bumps its head on.
    pub fn bottom(&self) -> f32 {
        self.y as f32
    }
}

/// A single tile layer of a map
///
/// Cells are stored row-major with `y = 0` as the bottom row, matching world
/// coordinates (y points up). Out-of-range cells read as empty.
#[derive(Debug, Clone, PartialEq)]
pub struct TileLayer {
    tiles: Vec<Option<TileId>>,
    pub width: usize,
    pub height: usize,
}

impl TileLayer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            tiles: vec![None; width * height],
            width,
            height,
        }
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some(y as usize * self.width + x as usize)
    }

    pub fn get_tile(&self, x: i32, y: i32) -> Option<TileId> {
        self.index(x, y).and_then(|i| self.tiles[i])
    }

    /// Returns false if the cell is outside the layer.
    pub fn set_tile(&mut self, x: i32, y: i32, tile: Option<TileId>) -> bool {
        match self.index(x, y) {
            Some(i) => {
                self.tiles[i] = tile;
                true
            }
            None => false,
        }
    }

    /// Fill an inclusive rectangle of cells.
    pub fn fill(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, tile: TileId) {
        for y in y0..=y1 {
            for x in x0..=x1 {
                self.set_tile(x, y, Some(tile));
            }
        }
    }

    /// Number of solid cells
    pub fn solid_count(&self) -> usize {
        self.tiles.iter().filter(|t| t.is_some()).count()
    }

    /// Build a layer from text rows, top row first.
    ///
    /// Returns `None` if the rows do not form a `width` x `height` rectangle.
    pub fn from_rows(width: usize, height: usize, rows: &[String]) -> Option<Self> {
        if rows.len() != height {
            return None;
        }

        let mut layer = TileLayer::new(width, height);
        for (row_index, row) in rows.iter().enumerate() {
            if row.chars().count() != width {
                return None;
            }
            let y = (height - 1 - row_index) as i32;
            for (x, c) in row.chars().enumerate() {
                layer.set_tile(x as i32, y, TileId::from_char(c));
            }
        }

        Some(layer)
    }

    /// Inverse of [`TileLayer::from_rows`].
    pub fn to_rows(&self) -> Vec<String> {
        (0..self.height as i32)
            .rev()
            .map(|y| {
                (0..self.width as i32)
                    .map(|x| self.get_tile(x, y).map(|t| t.to_char()).unwrap_or('.'))
                    .collect()
            })
            .collect()
    }
}

/// Read-only query surface over a map's collision layer
///
/// Wraps an optional layer: a map without the named collision layer produces
/// a grid that answers every query with an empty list. That is a legitimate
/// configuration (nothing to stand on), not a fault, and the grid itself never
/// logs it.
#[derive(Debug, Clone, Copy)]
pub struct TileCollisionGrid<'a> {
    layer: Option<&'a TileLayer>,
}

impl<'a> TileCollisionGrid<'a> {
    pub fn new(layer: Option<&'a TileLayer>) -> Self {
        Self { layer }
    }

    /// Grid with no collision layer at all.
    pub fn empty() -> Self {
        Self { layer: None }
    }

    pub fn has_layer(&self) -> bool {
        self.layer.is_some()
    }

    /// Solid tiles in the inclusive cell range covering the given world bounds.
    ///
    /// `min` is converted with `floor` and `max` with `ceil`, so a box whose
    /// edge lies exactly on a cell boundary also reports the neighbouring
    /// cell. Callers use a strict overlap test, so those extra cells never
    /// count as contact.
    pub fn query_tiles(&self, min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Vec<TileSpec> {
        let Some(layer) = self.layer else {
            return Vec::new();
        };
        if !(min_x.is_finite() && min_y.is_finite() && max_x.is_finite() && max_y.is_finite()) {
            return Vec::new();
        }

        let (min_x, max_x) = (min_x.min(max_x), min_x.max(max_x));
        let (min_y, max_y) = (min_y.min(max_y), min_y.max(max_y));

        // Clip to the layer so far-away queries stay cheap
        let start_x = (min_x.floor() as i32).max(0);
        let end_x = (max_x.ceil() as i32).min(layer.width as i32 - 1);
        let start_y = (min_y.floor() as i32).max(0);
        let end_y = (max_y.ceil() as i32).min(layer.height as i32 - 1);

        let mut tiles = Vec::new();
        for y in start_y..=end_y {
            for x in start_x..=end_x {
                if let Some(tile) = layer.get_tile(x, y) {
                    tiles.push(TileSpec {
                        x,
                        y,
                        height: tile.height(),
                    });
                }
            }
        }
        tiles
    }

    /// [`TileCollisionGrid::query_tiles`] over a box's extent.
    pub fn query_region(&self, region: &Aabb) -> Vec<TileSpec> {
        self.query_tiles(region.left(), region.bottom(), region.right(), region.top())
    }

    /// Tiles whose collision rectangle overlaps `region` with positive area.
    pub fn overlapping(&self, region: &Aabb) -> Vec<TileSpec> {
        self.query_region(region)
            .into_iter()
            .filter(|tile| region.overlaps(&tile.bounds()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|s| s.to_string()).collect()
    }

    fn sample_layer() -> TileLayer {
        TileLayer::from_rows(
            6,
            3,
            &rows(&[
                "......", //
                "...#__", //
                "######", //
            ]),
        )
        .expect("valid layout")
    }

    #[test]
    fn test_from_rows_bottom_row_is_y_zero() {
        let layer = sample_layer();

        assert_eq!(layer.get_tile(0, 0), Some(TileId::Solid));
        assert_eq!(layer.get_tile(3, 1), Some(TileId::Solid));
        assert_eq!(layer.get_tile(4, 1), Some(TileId::Quarter));
        assert_eq!(layer.get_tile(0, 2), None);
        assert_eq!(layer.solid_count(), 9);
    }

    #[test]
    fn test_from_rows_rejects_ragged_layout() {
        assert!(TileLayer::from_rows(3, 2, &rows(&["###", "##"])).is_none());
        assert!(TileLayer::from_rows(3, 3, &rows(&["###", "###"])).is_none());
    }

    #[test]
    fn test_rows_roundtrip() {
        let layer = sample_layer();
        let again = TileLayer::from_rows(6, 3, &layer.to_rows()).expect("valid layout");

        assert_eq!(layer, again);
    }

    #[test]
    fn test_query_reports_height_override() {
        let layer = sample_layer();
        let grid = TileCollisionGrid::new(Some(&layer));

        let tiles = grid.query_tiles(3.5, 1.1, 4.5, 1.9);

        assert_eq!(tiles.len(), 3);
        let quarter = tiles.iter().find(|t| t.x == 4 && t.y == 1).expect("quarter tile");
        assert_eq!(quarter.height, QUARTER_TILE_HEIGHT);
        assert_eq!(quarter.top(), 1.25);
        let full = tiles.iter().find(|t| t.x == 3).expect("full tile");
        assert_eq!(full.height, FULL_TILE_HEIGHT);
    }

    #[test]
    fn test_query_uses_floor_and_ceil() {
        let layer = sample_layer();
        let grid = TileCollisionGrid::new(Some(&layer));

        // [0.2, 0.8] x [0.2, 0.8] touches cells 0..=1 on both axes
        let tiles = grid.query_tiles(0.2, 0.2, 0.8, 0.8);
        let cells: Vec<(i32, i32)> = tiles.iter().map(|t| (t.x, t.y)).collect();

        assert_eq!(cells, vec![(0, 0), (1, 0)]);
    }

    #[test]
    fn test_query_outside_layer_is_empty() {
        let layer = sample_layer();
        let grid = TileCollisionGrid::new(Some(&layer));

        assert!(grid.query_tiles(-10.0, -10.0, -5.0, -5.0).is_empty());
        assert!(grid.query_tiles(100.0, 0.0, 101.0, 1.0).is_empty());
        assert!(grid.query_tiles(f32::NAN, 0.0, 1.0, 1.0).is_empty());
    }

    #[test]
    fn test_missing_layer_reports_no_obstacles() {
        let grid = TileCollisionGrid::empty();

        assert!(!grid.has_layer());
        assert!(grid.query_tiles(-100.0, -100.0, 100.0, 100.0).is_empty());
    }

    #[test]
    fn test_overlapping_ignores_resting_contact() {
        let layer = sample_layer();
        let grid = TileCollisionGrid::new(Some(&layer));

        // Standing exactly on the floor row
        let standing = Aabb::new(1.0, 1.0, 0.25, 0.37);
        assert!(grid.overlapping(&standing).is_empty());

        // Standing exactly on a quarter tile's lowered surface
        let on_quarter = Aabb::new(4.2, 1.25, 0.25, 0.37);
        assert!(grid.overlapping(&on_quarter).is_empty());

        let sunk = Aabb::new(1.0, 0.9, 0.25, 0.37);
        assert_eq!(grid.overlapping(&sunk).len(), 1);
    }
}
