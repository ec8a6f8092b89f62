//! Dungeon configuration.
//!
//! All parameters have defaults taken from [`crate::constants`]. A config can be
//! built in code or loaded from JSON; either way it is validated before any
//! generation work starts.

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::{DungeonError, Result};

/// Parameters for one dungeon generation run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DungeonConfig {
    /// Extent of the dungeon along X
    pub width: i32,
    /// Extent of the dungeon along Z
    pub length: i32,
    /// Number of BSP splitting rounds. Zero leaves the root unsplit.
    pub max_iterations: u32,
    /// Minimum width of a BSP leaf
    pub room_width_min: i32,
    /// Minimum length of a BSP leaf
    pub room_length_min: i32,
    /// Bottom-left room corner is placed within this fraction of the leaf
    pub bottom_corner_modifier: f32,
    /// Top-right room corner is placed beyond this fraction of the leaf
    pub top_corner_modifier: f32,
    /// Inset between a room and the edges of its leaf
    pub room_offset: i32,
    /// Corridor width in cells
    pub corridor_width: i32,
    /// Seed for reproducible layouts. `None` draws a seed from the OS.
    pub random_seed: Option<u64>,
}

impl Default for DungeonConfig {
    fn default() -> Self {
        Self {
            width: DUNGEON_DEFAULT_WIDTH,
            length: DUNGEON_DEFAULT_LENGTH,
            max_iterations: DUNGEON_DEFAULT_MAX_ITERATIONS,
            room_width_min: DUNGEON_DEFAULT_ROOM_WIDTH_MIN,
            room_length_min: DUNGEON_DEFAULT_ROOM_LENGTH_MIN,
            bottom_corner_modifier: DUNGEON_DEFAULT_BOTTOM_CORNER_MODIFIER,
            top_corner_modifier: DUNGEON_DEFAULT_TOP_CORNER_MODIFIER,
            room_offset: DUNGEON_DEFAULT_ROOM_OFFSET,
            corridor_width: DUNGEON_DEFAULT_CORRIDOR_WIDTH,
            random_seed: None,
        }
    }
}

impl DungeonConfig {
    /// Parse a config from JSON. Missing fields take their defaults.
    /// The result is validated before it is returned.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: DungeonConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Return a copy of this config with a fixed seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }

    /// Check every parameter, failing on the first problem found.
    pub fn validate(&self) -> Result<()> {
        if self.width <= 0 || self.length <= 0 {
            return invalid(format!(
                "dungeon dimensions must be positive, got {}x{}",
                self.width, self.length
            ));
        }
        if self.width > DUNGEON_MAX_EXTENT || self.length > DUNGEON_MAX_EXTENT {
            return invalid(format!(
                "dungeon dimensions {}x{} exceed the maximum extent {}",
                self.width, self.length, DUNGEON_MAX_EXTENT
            ));
        }
        if self.room_width_min <= 0 || self.room_length_min <= 0 {
            return invalid(format!(
                "room minimums must be positive, got {}x{}",
                self.room_width_min, self.room_length_min
            ));
        }
        if self.room_width_min > self.width || self.room_length_min > self.length {
            return invalid(format!(
                "room minimums {}x{} exceed dungeon bounds {}x{}",
                self.room_width_min, self.room_length_min, self.width, self.length
            ));
        }

        let (bottom_lo, bottom_hi) = BOTTOM_CORNER_MODIFIER_RANGE;
        if !(bottom_lo..=bottom_hi).contains(&self.bottom_corner_modifier) {
            return invalid(format!(
                "bottom corner modifier {} outside [{}, {}]",
                self.bottom_corner_modifier, bottom_lo, bottom_hi
            ));
        }
        let (top_lo, top_hi) = TOP_CORNER_MODIFIER_RANGE;
        if !(top_lo..=top_hi).contains(&self.top_corner_modifier) {
            return invalid(format!(
                "top corner modifier {} outside [{}, {}]",
                self.top_corner_modifier, top_lo, top_hi
            ));
        }

        let (offset_lo, offset_hi) = ROOM_OFFSET_RANGE;
        if !(offset_lo..=offset_hi).contains(&self.room_offset) {
            return invalid(format!(
                "room offset {} outside [{}, {}]",
                self.room_offset, offset_lo, offset_hi
            ));
        }
        // Every leaf is at least the minimum size, so this leaves room for a
        // non-degenerate room after insetting both sides.
        if self.room_width_min <= 2 * self.room_offset
            || self.room_length_min <= 2 * self.room_offset
        {
            return invalid(format!(
                "room minimums {}x{} leave no space inside an offset of {}",
                self.room_width_min, self.room_length_min, self.room_offset
            ));
        }

        if self.corridor_width <= 0 {
            return invalid(format!(
                "corridor width must be positive, got {}",
                self.corridor_width
            ));
        }
        // Corridors are clamped into the regions they join, and every region
        // is at least the minimum size
        if self.corridor_width > self.room_width_min || self.corridor_width > self.room_length_min {
            return invalid(format!(
                "corridor width {} does not fit room minimums {}x{}",
                self.corridor_width, self.room_width_min, self.room_length_min
            ));
        }

        Ok(())
    }
}

fn invalid(message: String) -> Result<()> {
    Err(DungeonError::InvalidConfiguration(message))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_invalid(config: DungeonConfig) {
        match config.validate() {
            Err(DungeonError::InvalidConfiguration(_)) => {}
            other => panic!("expected InvalidConfiguration, got {:?}", other),
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(DungeonConfig::default().validate().is_ok());
    }

    #[test]
    fn test_non_positive_dimensions_rejected() {
        assert_invalid(DungeonConfig {
            width: 0,
            ..Default::default()
        });
        assert_invalid(DungeonConfig {
            length: -5,
            ..Default::default()
        });
    }

    #[test]
    fn test_non_positive_minimums_rejected() {
        assert_invalid(DungeonConfig {
            room_width_min: 0,
            ..Default::default()
        });
        assert_invalid(DungeonConfig {
            room_length_min: -1,
            ..Default::default()
        });
    }

    #[test]
    fn test_minimums_larger_than_dungeon_rejected() {
        assert_invalid(DungeonConfig {
            width: 10,
            room_width_min: 11,
            ..Default::default()
        });
        assert_invalid(DungeonConfig {
            length: 10,
            room_length_min: 12,
            ..Default::default()
        });
    }

    #[test]
    fn test_modifier_ranges_enforced() {
        assert_invalid(DungeonConfig {
            bottom_corner_modifier: 0.31,
            ..Default::default()
        });
        assert_invalid(DungeonConfig {
            top_corner_modifier: 0.69,
            ..Default::default()
        });
        assert_invalid(DungeonConfig {
            top_corner_modifier: f32::NAN,
            ..Default::default()
        });
    }

    #[test]
    fn test_room_offset_range_enforced() {
        assert_invalid(DungeonConfig {
            room_offset: 3,
            ..Default::default()
        });
        assert_invalid(DungeonConfig {
            room_offset: -1,
            ..Default::default()
        });
    }

    #[test]
    fn test_offset_must_leave_room_space() {
        assert_invalid(DungeonConfig {
            room_width_min: 4,
            room_offset: 2,
            ..Default::default()
        });
    }

    #[test]
    fn test_corridor_width_must_be_positive() {
        assert_invalid(DungeonConfig {
            corridor_width: 0,
            ..Default::default()
        });
    }

    #[test]
    fn test_corridor_width_must_fit_minimums() {
        assert_invalid(DungeonConfig {
            corridor_width: 7,
            ..Default::default()
        });
        let config = DungeonConfig {
            corridor_width: 6,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_oversized_dimensions_rejected() {
        assert_invalid(DungeonConfig {
            width: i32::MAX,
            length: 10,
            room_width_min: 1_500_000_000,
            ..Default::default()
        });
        assert_invalid(DungeonConfig {
            length: DUNGEON_MAX_EXTENT + 1,
            ..Default::default()
        });
        let config = DungeonConfig {
            width: DUNGEON_MAX_EXTENT,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_iterations_is_valid() {
        let config = DungeonConfig {
            max_iterations: 0,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_json_fills_defaults() {
        let config = DungeonConfig::from_json(r#"{ "width": 60, "random_seed": 7 }"#).unwrap();
        assert_eq!(config.width, 60);
        assert_eq!(config.length, DUNGEON_DEFAULT_LENGTH);
        assert_eq!(config.random_seed, Some(7));
    }

    #[test]
    fn test_from_json_reports_parse_errors() {
        let result = DungeonConfig::from_json("{ not json");
        assert!(matches!(result, Err(DungeonError::ConfigParse(_))));
    }

    #[test]
    fn test_from_json_validates() {
        let result = DungeonConfig::from_json(r#"{ "corridor_width": -2 }"#);
        assert!(matches!(result, Err(DungeonError::InvalidConfiguration(_))));
    }
}
