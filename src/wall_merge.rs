//! Run-length merging of wall cells into segments.
//!
//! Downstream consumers build one quad and one collider per segment, so
//! collapsing runs of unit cells keeps those counts down.

use glam::IVec2;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::walls::{position_of, Orientation, WallCell, WallCells};

/// A straight run of wall cells sharing orientation and facing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WallSegment {
    pub start: IVec2,
    pub orientation: Orientation,
    /// Number of unit cells in the run
    pub length: u32,
    pub facing: bool,
}

impl WallSegment {
    fn step(&self) -> IVec2 {
        match self.orientation {
            Orientation::Horizontal => IVec2::X,
            Orientation::Vertical => IVec2::Y,
        }
    }

    /// Grid point where the segment stops.
    pub fn end(&self) -> IVec2 {
        self.start + self.step() * self.length as i32
    }

    /// Expand back into unit cells.
    pub fn cells(&self) -> impl Iterator<Item = WallCell> + '_ {
        let step = self.step();
        (0..self.length as i32).map(move |i| WallCell {
            position: self.start + step * i,
            orientation: self.orientation,
            facing: self.facing,
        })
    }
}

/// Merge wall cells into the fewest segments that never span a gap, a facing
/// change, or a change of row/column.
pub fn merge_walls(cells: &WallCells) -> Vec<WallSegment> {
    puffin::profile_function!();

    let mut segments = Vec::new();
    for orientation in [Orientation::Horizontal, Orientation::Vertical] {
        merge_runs(cells, orientation, &mut segments);
    }

    debug!(
        "merged {} wall cells into {} segments",
        cells.wall_count(),
        segments.len()
    );
    segments
}

fn merge_runs(cells: &WallCells, orientation: Orientation, segments: &mut Vec<WallSegment>) {
    // (line, first along, last along, facing) of the run being built
    let mut run: Option<(i32, i32, i32, bool)> = None;

    // Keys come out ordered by line, then by position along the line
    for (&(line, along), &facing) in cells.raw_walls(orientation) {
        run = match run {
            Some((run_line, first, last, run_facing))
                if run_line == line && last + 1 == along && run_facing == facing =>
            {
                Some((run_line, first, along, run_facing))
            }
            Some(finished) => {
                push_run(segments, orientation, finished);
                Some((line, along, along, facing))
            }
            None => Some((line, along, along, facing)),
        };
    }
    if let Some(finished) = run {
        push_run(segments, orientation, finished);
    }
}

fn push_run(
    segments: &mut Vec<WallSegment>,
    orientation: Orientation,
    (line, first, last, facing): (i32, i32, i32, bool),
) {
    segments.push(WallSegment {
        start: position_of(orientation, (line, first)),
        orientation,
        length: (last - first + 1) as u32,
        facing,
    });
}
