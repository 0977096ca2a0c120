//! Level progress persistence
//!
//! One [`LevelProgressRecord`] per level id, stored through the
//! [`PersistenceStore`] trait:
//! - `types`: the record, the on-disk envelope and error types
//! - `store`: the store trait, a JSON-file store and an in-memory store
//!
//! # Example Usage
//!
//! ```ignore
//! let mut store = JsonFileStore::open("~/.problematic/progress")?;
//! store.save(2, &LevelProgressRecord { unlocked: true, stars_earned: 3 })?;
//! assert_eq!(store.load(2)?, Some(LevelProgressRecord { unlocked: true, stars_earned: 3 }));
//! ```
//!
//! Writes are synchronous and only happen on level transitions, never per
//! frame.

pub mod store;
pub mod types;

pub use store::{JsonFileStore, MemoryStore, PersistenceStore};
pub use types::*;
