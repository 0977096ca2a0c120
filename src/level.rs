use crate::map::{MapError, TileMap};
use std::path::Path;
use std::rc::Rc;

/// 1-based level number
pub type LevelId = u32;

/// A loaded level: its id and its immutable map
#[derive(Debug, Clone)]
pub struct Level {
    pub id: LevelId,
    pub map: Rc<TileMap>,
}

/// The ordered set of levels available to play
///
/// Level ids are contiguous from 1; asking for anything outside that range
/// returns `None`.
#[derive(Debug, Clone, Default)]
pub struct LevelCatalog {
    levels: Vec<Level>,
}

impl LevelCatalog {
    /// Catalog from maps in play order: the first map becomes level 1.
    pub fn new(maps: Vec<TileMap>) -> Self {
        let levels = maps
            .into_iter()
            .zip(1..)
            .map(|(map, id)| Level {
                id,
                map: Rc::new(map),
            })
            .collect();
        Self { levels }
    }

    /// Load `level1.json`, `level2.json`, ... from `dir`, stopping at the first missing file.
    ///
    /// A file that exists but cannot be parsed is an error.
    pub fn discover(dir: impl AsRef<Path>) -> Result<Self, MapError> {
        let dir = dir.as_ref();
        let mut maps = Vec::new();

        for id in 1.. {
            let path = dir.join(format!("level{}.json", id));
            if !path.exists() {
                break;
            }
            log::debug!("Loading level {} from {}", id, path.display());
            maps.push(TileMap::load_from_file(&path)?);
        }

        if maps.is_empty() {
            log::warn!("No levels found in {}", dir.display());
        } else {
            log::info!("Loaded {} level(s) from {}", maps.len(), dir.display());
        }
        Ok(Self::new(maps))
    }

    pub fn get(&self, id: LevelId) -> Option<&Level> {
        let index = usize::try_from(id).ok()?.checked_sub(1)?;
        self.levels.get(index)
    }

    pub fn contains(&self, id: LevelId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = LevelId> + '_ {
        self.levels.iter().map(|level| level.id)
    }
}
