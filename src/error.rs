//! Error types for dungeon generation

use thiserror::Error;

use crate::rect::Rect;

/// Dungeon generation error type
#[derive(Error, Debug)]
pub enum DungeonError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("Degenerate rectangle {0:?}")]
    DegenerateRect(Rect),

    #[error("Generation produced no rooms")]
    EmptyResult,
}

pub type Result<T> = std::result::Result<T, DungeonError>;
