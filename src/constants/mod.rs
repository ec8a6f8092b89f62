//! Dungeon constants organized by domain.
//!
//! Centralizing magic numbers makes tuning easier and documents intent.

mod dungeon;

pub use dungeon::*;
