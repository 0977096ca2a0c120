//! Level maps: tile layers plus named entity markers
//!
//! A map file is a small JSON document:
//!
//! ```json
//! {
//!   "width": 12,
//!   "height": 3,
//!   "layers": {
//!     "walls": [
//!       "............",
//!       "......#.....",
//!       "############"
//!     ]
//!   },
//!   "markers": { "player": [1.0, 1.0], "key": [10.0, 1.0], "end": [12.0, 0.0] }
//! }
//! ```
//!
//! Rows are listed top first, so the last row is `y = 0`. `#` is a solid
//! tile, `_` a quarter tile, anything else is empty. Markers are in world
//! units.

use crate::tile::{TileCollisionGrid, TileId, TileLayer};
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Layer the physics collides against
pub const COLLISION_LAYER: &str = "walls";

pub const PLAYER_MARKER: &str = "player";
pub const KEY_MARKER: &str = "key";
pub const END_MARKER: &str = "end";
pub const BOTTOM_MARKER: &str = "bottom";

/// Read-only access to a loaded map
pub trait MapProvider {
    /// Collision grid for `name`; an absent layer yields an empty grid.
    fn collision_layer(&self, name: &str) -> TileCollisionGrid<'_>;

    /// World position of a named marker, `None` when the map has no such marker.
    fn entity_marker(&self, name: &str) -> Option<Vec2>;

    /// Width of the map in tiles
    fn width(&self) -> usize;
}

/// On-disk shape of a map file
#[derive(Debug, Clone, Serialize, Deserialize)]
struct MapFile {
    width: usize,
    height: usize,
    #[serde(default)]
    layers: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    markers: BTreeMap<String, Vec2>,
}

#[derive(Debug)]
pub enum MapError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    InvalidLayout { layer: String },
}

impl std::fmt::Display for MapError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MapError::Io(e) => write!(f, "IO error: {}", e),
            MapError::Parse(e) => write!(f, "Map parse error: {}", e),
            MapError::InvalidLayout { layer } => {
                write!(f, "Layer '{}' does not match the map dimensions", layer)
            }
        }
    }
}

impl std::error::Error for MapError {}

impl From<std::io::Error> for MapError {
    fn from(err: std::io::Error) -> Self {
        MapError::Io(err)
    }
}

impl From<serde_json::Error> for MapError {
    fn from(err: serde_json::Error) -> Self {
        MapError::Parse(err)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TileMap {
    pub width: usize,
    pub height: usize,
    layers: BTreeMap<String, TileLayer>,
    markers: BTreeMap<String, Vec2>,
}

impl TileMap {
    /// Empty map with no layers and no markers.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            layers: BTreeMap::new(),
            markers: BTreeMap::new(),
        }
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, MapError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> Result<Self, MapError> {
        let file: MapFile = serde_json::from_str(json)?;

        let mut layers = BTreeMap::new();
        for (name, rows) in file.layers {
            let layer = TileLayer::from_rows(file.width, file.height, &rows)
                .ok_or_else(|| MapError::InvalidLayout { layer: name.clone() })?;
            layers.insert(name, layer);
        }

        Ok(Self {
            width: file.width,
            height: file.height,
            layers,
            markers: file.markers,
        })
    }

    pub fn to_json(&self) -> Result<String, MapError> {
        let file = MapFile {
            width: self.width,
            height: self.height,
            layers: self
                .layers
                .iter()
                .map(|(name, layer)| (name.clone(), layer.to_rows()))
                .collect(),
            markers: self.markers.clone(),
        };
        Ok(serde_json::to_string_pretty(&file)?)
    }

    /// Builder: add (or replace) a layer. Returns `InvalidLayout` if its size differs from the map.
    pub fn with_layer(mut self, name: &str, layer: TileLayer) -> Result<Self, MapError> {
        if layer.width != self.width || layer.height != self.height {
            return Err(MapError::InvalidLayout {
                layer: name.to_string(),
            });
        }
        self.layers.insert(name.to_string(), layer);
        Ok(self)
    }

    pub fn with_marker(mut self, name: &str, position: Vec2) -> Self {
        self.markers.insert(name.to_string(), position);
        self
    }

    pub fn layer(&self, name: &str) -> Option<&TileLayer> {
        self.layers.get(name)
    }

    pub fn layer_names(&self) -> impl Iterator<Item = &str> {
        self.layers.keys().map(String::as_str)
    }

    /// Build a map whose collision layer is given as text rows, top first.
    pub fn from_rows(rows: &[&str]) -> Result<Self, MapError> {
        let height = rows.len();
        let width = rows.first().map(|r| r.chars().count()).unwrap_or(0);
        let rows: Vec<String> = rows.iter().map(|r| r.to_string()).collect();
        let layer = TileLayer::from_rows(width, height, &rows).ok_or_else(|| {
            MapError::InvalidLayout {
                layer: COLLISION_LAYER.to_string(),
            }
        })?;
        TileMap::new(width, height).with_layer(COLLISION_LAYER, layer)
    }

    /// Number of quarter tiles in the collision layer
    pub fn quarter_tile_count(&self) -> usize {
        let Some(layer) = self.layer(COLLISION_LAYER) else {
            return 0;
        };
        (0..layer.height as i32)
            .flat_map(|y| (0..layer.width as i32).map(move |x| (x, y)))
            .filter(|&(x, y)| layer.get_tile(x, y) == Some(TileId::Quarter))
            .count()
    }
}

impl MapProvider for TileMap {
    fn collision_layer(&self, name: &str) -> TileCollisionGrid<'_> {
        TileCollisionGrid::new(self.layers.get(name))
    }

    fn entity_marker(&self, name: &str) -> Option<Vec2> {
        self.markers.get(name).copied()
    }

    fn width(&self) -> usize {
        self.width
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::Aabb;

    fn sample() -> String {
        serde_json::json!({
            "width": 6,
            "height": 3,
            "layers": {
                "walls": [
                    "......",
                    "...#_.",
                    "######"
                ]
            },
            "markers": {
                "player": [1.0, 1.0],
                "key": [5.0, 1.0],
                "end": [6.0, 0.0]
            }
        })
        .to_string()
    }

    #[test]
    fn test_parse_map_file() {
        let map = TileMap::from_json(&sample()).expect("valid map");

        assert_eq!(map.width, 6);
        assert_eq!(map.entity_marker(PLAYER_MARKER), Some(Vec2::new(1.0, 1.0)));
        assert_eq!(map.entity_marker(BOTTOM_MARKER), None);
        assert_eq!(map.quarter_tile_count(), 1);

        let grid = map.collision_layer(COLLISION_LAYER);
        assert!(grid.has_layer());
        // Cell range 3..=4 holds the solid and the quarter tile
        assert_eq!(grid.query_tiles(3.2, 1.2, 3.8, 1.8).len(), 2);
        let solid_only = grid.overlapping(&Aabb::new(3.2, 1.2, 0.6, 0.6));
        assert_eq!(solid_only.len(), 1);
        assert_eq!((solid_only[0].x, solid_only[0].y), (3, 1));
    }

    #[test]
    fn test_missing_layer_is_empty_grid() {
        let map = TileMap::from_json(&sample()).expect("valid map");
        let grid = map.collision_layer("background");

        assert!(!grid.has_layer());
        assert!(grid.query_tiles(0.0, 0.0, 6.0, 3.0).is_empty());
    }

    #[test]
    fn test_bad_layout_is_rejected() {
        let json = serde_json::json!({ "width": 4, "height": 2, "layers": { "walls": ["####"] } });

        match TileMap::from_json(&json.to_string()) {
            Err(MapError::InvalidLayout { layer }) => assert_eq!(layer, "walls"),
            other => panic!("expected InvalidLayout, got {:?}", other),
        }
    }

    #[test]
    fn test_garbage_is_parse_error() {
        assert!(matches!(TileMap::from_json("not json"), Err(MapError::Parse(_))));
    }

    #[test]
    fn test_json_roundtrip() {
        let map = TileMap::from_json(&sample()).expect("valid map");
        let again = TileMap::from_json(&map.to_json().expect("serializes")).expect("valid map");

        assert_eq!(map, again);
    }

    #[test]
    fn test_builder_checks_dimensions() {
        let result = TileMap::new(4, 2).with_layer(COLLISION_LAYER, TileLayer::new(3, 2));
        assert!(result.is_err());

        let map = TileMap::from_rows(&["....", "####"])
            .expect("valid rows")
            .with_marker(KEY_MARKER, Vec2::new(3.0, 1.0));
        assert_eq!(map.entity_marker(KEY_MARKER), Some(Vec2::new(3.0, 1.0)));
        assert_eq!(map.layer(COLLISION_LAYER).map(|l| l.solid_count()), Some(4));
    }
}
