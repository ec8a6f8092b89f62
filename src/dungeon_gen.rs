use glam::Vec2;
use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::config::DungeonConfig;
use crate::corridors::CorridorBuilder;
use crate::error::{DungeonError, Result};
use crate::partition::BinarySpacePartitioner;
use crate::rect::Rect;
use crate::rooms::RoomPlacer;
use crate::wall_merge::{merge_walls, WallSegment};
use crate::walls::{derive_walls, DoorCell};

/// Everything a dungeon consumer needs: floor rectangles to build surfaces
/// from, and merged wall segments to build walls and colliders from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DungeonLayout {
    pub rooms: Vec<Rect>,
    pub corridors: Vec<Rect>,
    pub wall_segments: Vec<WallSegment>,
    pub door_cells: Vec<DoorCell>,
}

/// Where to put the player and the boss: the smallest and the largest room.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnAnchors {
    pub player: Vec2,
    pub boss: Vec2,
}

impl DungeonLayout {
    /// Rooms followed by corridors.
    pub fn floor_rects(&self) -> impl Iterator<Item = &Rect> {
        self.rooms.iter().chain(self.corridors.iter())
    }

    /// The room with the largest area (first one wins ties).
    pub fn largest_room(&self) -> Option<&Rect> {
        self.rooms
            .iter()
            .reduce(|best, room| if room.area() > best.area() { room } else { best })
    }

    /// The room with the smallest area (first one wins ties).
    pub fn smallest_room(&self) -> Option<&Rect> {
        self.rooms
            .iter()
            .reduce(|best, room| if room.area() < best.area() { room } else { best })
    }

    pub fn spawn_anchors(&self) -> Option<SpawnAnchors> {
        Some(SpawnAnchors {
            player: self.smallest_room()?.center(),
            boss: self.largest_room()?.center(),
        })
    }
}

pub struct DungeonGenerator;

impl DungeonGenerator {
    /// Generate a dungeon. Uses `config.random_seed` when set, otherwise a
    /// seed drawn from the OS.
    pub fn generate(config: &DungeonConfig) -> Result<DungeonLayout> {
        let mut rng = match config.random_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::generate_with_rng(config, &mut rng)
    }

    /// Generate a dungeon drawing all randomness from `rng`.
    ///
    /// Fails with [`DungeonError::InvalidConfiguration`] before any work is
    /// done if `config` doesn't validate, and with [`DungeonError::EmptyResult`]
    /// if no room could be placed.
    pub fn generate_with_rng(config: &DungeonConfig, rng: &mut impl Rng) -> Result<DungeonLayout> {
        puffin::profile_function!();

        config.validate()?;

        // Split the footprint
        let tree = BinarySpacePartitioner::new(config.width, config.length).prepare(
            config.max_iterations,
            config.room_width_min,
            config.room_length_min,
            rng,
        );

        // One room per leaf
        let rooms = RoomPlacer::new(
            config.bottom_corner_modifier,
            config.top_corner_modifier,
            config.room_offset,
        )
        .place_rooms(&tree, rng);
        // Validation keeps every leaf big enough for a room, so this only
        // fires if that guarantee is ever broken
        if rooms.is_empty() {
            return Err(DungeonError::EmptyResult);
        }

        // Link sibling subtrees, deepest first
        let corridors = CorridorBuilder::new(config.corridor_width).build(&tree, &rooms, rng);

        let rooms: Vec<Rect> = rooms.into_iter().map(|room| room.rect).collect();
        let corridors: Vec<Rect> = corridors.into_iter().map(|corridor| corridor.rect).collect();

        // Walls and doors from the union of all floor rectangles
        let mut floor = rooms.clone();
        floor.extend_from_slice(&corridors);
        let cells = derive_walls(&floor)?;
        let wall_segments = merge_walls(&cells);
        let door_cells: Vec<DoorCell> = cells.door_cells().collect();

        info!(
            "generated {}x{} dungeon: {} rooms, {} corridors, {} wall segments, {} doors",
            config.width,
            config.length,
            rooms.len(),
            corridors.len(),
            wall_segments.len(),
            door_cells.len()
        );

        Ok(DungeonLayout {
            rooms,
            corridors,
            wall_segments,
            door_cells,
        })
    }
}
