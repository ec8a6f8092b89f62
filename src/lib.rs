//! Procedural dungeon layouts from binary space partitioning.
//!
//! A generation run splits the dungeon footprint into a BSP tree, carves one
//! room per leaf, links sibling subtrees with corridors, and finally derives
//! merged wall segments (with doors where rectangles meet) from the floor
//! rectangles. The whole pipeline is a pure batch computation: randomness is
//! injected, and nothing is shared between runs.
//!
//! ```
//! use grid_dungeon::{DungeonConfig, DungeonGenerator};
//!
//! let config = DungeonConfig::default().with_seed(42);
//! let layout = DungeonGenerator::generate(&config).unwrap();
//! assert!(!layout.rooms.is_empty());
//! ```

pub mod config;
pub mod constants;
pub mod corridors;
pub mod dungeon_gen;
pub mod error;
pub mod partition;
pub mod rect;
pub mod rooms;
pub mod wall_merge;
pub mod walls;

pub use config::DungeonConfig;
pub use dungeon_gen::{DungeonGenerator, DungeonLayout, SpawnAnchors};
pub use error::{DungeonError, Result};
pub use rect::Rect;
pub use wall_merge::WallSegment;
pub use walls::{DoorCell, Orientation, WallCell};
