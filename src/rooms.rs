//! Room placement inside BSP leaves.

use glam::IVec2;
use log::{debug, warn};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::partition::{NodeId, PartitionTree};
use crate::rect::Rect;

/// A room carved out of one leaf of the partition tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    /// The leaf this room was placed in
    pub leaf: NodeId,
    pub rect: Rect,
}

/// Places one room per leaf by picking a random bottom-left corner near the
/// leaf's lower edges and a random top-right corner near its upper edges.
pub struct RoomPlacer {
    bottom_corner_modifier: f32,
    top_corner_modifier: f32,
    offset: i32,
}

impl RoomPlacer {
    pub fn new(bottom_corner_modifier: f32, top_corner_modifier: f32, offset: i32) -> Self {
        Self {
            bottom_corner_modifier,
            top_corner_modifier,
            offset,
        }
    }

    /// Place a room in every leaf of `tree`, in breadth-first leaf order.
    pub fn place_rooms(&self, tree: &PartitionTree, rng: &mut impl Rng) -> Vec<Room> {
        puffin::profile_function!();

        let mut rooms = Vec::new();
        for leaf in tree.leaves() {
            match self.place_room(&leaf.region, rng) {
                Some(rect) => rooms.push(Room { leaf: leaf.id, rect }),
                None => warn!(
                    "leaf {:?} ({}x{}) is too small for a room with offset {}",
                    leaf.id,
                    leaf.region.width(),
                    leaf.region.length(),
                    self.offset
                ),
            }
        }

        debug!("placed {} rooms", rooms.len());
        rooms
    }

    /// Carve a room out of `region`. Returns `None` if the offset leaves no space.
    pub fn place_room(&self, region: &Rect, rng: &mut impl Rng) -> Option<Rect> {
        let (min_x, max_x) = self.sample_span(region.min_x(), region.max_x(), rng)?;
        let (min_z, max_z) = self.sample_span(region.min_z(), region.max_z(), rng)?;
        Some(Rect::new(IVec2::new(min_x, min_z), IVec2::new(max_x, max_z)))
    }

    /// Sample the room's extent along one axis of a leaf spanning `[min, max]`.
    fn sample_span(&self, min: i32, max: i32, rng: &mut impl Rng) -> Option<(i32, i32)> {
        let lo = min + self.offset;
        let hi = max - self.offset;
        let span = hi - lo;
        if span < 1 {
            return None;
        }

        let bottom_max = lo + (span as f32 * self.bottom_corner_modifier).floor() as i32;
        let bottom = rng.gen_range(lo..=bottom_max);

        // The modifier ranges are disjoint, but truncation on small spans can
        // still make them meet, so keep the top corner strictly above.
        let top_min = (lo + (span as f32 * self.top_corner_modifier).ceil() as i32).max(bottom + 1);
        let top = rng.gen_range(top_min..=hi);

        Some((bottom, top))
    }
}
