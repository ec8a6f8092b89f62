//! Wall and door derivation from floor rectangles.
//!
//! Every rectangle's perimeter is walked one unit edge at a time. The first
//! rectangle to claim an edge makes it a wall; a second claim on the same edge
//! means two rectangles share that boundary, so the wall is knocked out and the
//! edge becomes a door. Doors are terminal.
//!
//! Cell coordinates:
//! - a horizontal cell at `(x, z)` is the edge from `(x, z)` to `(x + 1, z)`
//! - a vertical cell at `(x, z)` is the edge from `(x, z)` to `(x, z + 1)`

use std::collections::{BTreeMap, BTreeSet};

use glam::IVec2;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{DungeonError, Result};
use crate::rect::Rect;

/// Direction a wall runs in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Orientation {
    /// Runs along X
    Horizontal,
    /// Runs along Z
    Vertical,
}

/// One unit-length wall edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WallCell {
    pub position: IVec2,
    pub orientation: Orientation,
    /// Which way the visible face points: toward +Z for horizontal walls,
    /// toward +X for vertical walls. Always the side the owning rectangle is on.
    pub facing: bool,
}

/// One unit-length opening where two rectangles share a boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DoorCell {
    pub position: IVec2,
    pub orientation: Orientation,
}

/// Lifecycle of one edge: `Unseen -> Wall -> Door`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellState {
    Unseen,
    Wall { facing: bool },
    Door,
}

// Cells are keyed (line, along): the coordinate a wall line sits on, then the
// position along it. Keeps each row/column contiguous in the ordered maps.
type CellKey = (i32, i32);

fn key_of(orientation: Orientation, position: IVec2) -> CellKey {
    match orientation {
        Orientation::Horizontal => (position.y, position.x),
        Orientation::Vertical => (position.x, position.y),
    }
}

pub(crate) fn position_of(orientation: Orientation, (line, along): CellKey) -> IVec2 {
    match orientation {
        Orientation::Horizontal => IVec2::new(along, line),
        Orientation::Vertical => IVec2::new(line, along),
    }
}

/// Accumulated wall and door cells for a set of rectangles.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WallCells {
    horizontal: BTreeMap<CellKey, bool>,
    vertical: BTreeMap<CellKey, bool>,
    horizontal_doors: BTreeSet<CellKey>,
    vertical_doors: BTreeSet<CellKey>,
}

impl WallCells {
    pub fn new() -> Self {
        Self::default()
    }

    fn walls(&self, orientation: Orientation) -> &BTreeMap<CellKey, bool> {
        match orientation {
            Orientation::Horizontal => &self.horizontal,
            Orientation::Vertical => &self.vertical,
        }
    }

    fn doors(&self, orientation: Orientation) -> &BTreeSet<CellKey> {
        match orientation {
            Orientation::Horizontal => &self.horizontal_doors,
            Orientation::Vertical => &self.vertical_doors,
        }
    }

    /// Register one rectangle's claim on an edge.
    pub fn claim(&mut self, orientation: Orientation, position: IVec2, facing: bool) {
        let key = key_of(orientation, position);
        let (walls, doors) = match orientation {
            Orientation::Horizontal => (&mut self.horizontal, &mut self.horizontal_doors),
            Orientation::Vertical => (&mut self.vertical, &mut self.vertical_doors),
        };

        if doors.contains(&key) {
            return;
        }
        if walls.remove(&key).is_some() {
            doors.insert(key);
        } else {
            walls.insert(key, facing);
        }
    }

    /// Claim every perimeter edge of `rect`.
    pub fn add_rect(&mut self, rect: &Rect) -> Result<()> {
        if !rect.is_valid() {
            return Err(DungeonError::DegenerateRect(*rect));
        }

        let center = rect.center_doubled();
        for z in [rect.min_z(), rect.max_z()] {
            let facing = center.y > 2 * z;
            for x in rect.min_x()..rect.max_x() {
                self.claim(Orientation::Horizontal, IVec2::new(x, z), facing);
            }
        }
        for x in [rect.min_x(), rect.max_x()] {
            let facing = center.x > 2 * x;
            for z in rect.min_z()..rect.max_z() {
                self.claim(Orientation::Vertical, IVec2::new(x, z), facing);
            }
        }
        Ok(())
    }

    pub fn state(&self, orientation: Orientation, position: IVec2) -> CellState {
        let key = key_of(orientation, position);
        if self.doors(orientation).contains(&key) {
            CellState::Door
        } else if let Some(&facing) = self.walls(orientation).get(&key) {
            CellState::Wall { facing }
        } else {
            CellState::Unseen
        }
    }

    /// Wall cells of one orientation, ordered by line then position along it.
    pub fn wall_cells(&self, orientation: Orientation) -> impl Iterator<Item = WallCell> + '_ {
        self.walls(orientation).iter().map(move |(&key, &facing)| WallCell {
            position: position_of(orientation, key),
            orientation,
            facing,
        })
    }

    pub fn horizontal_walls(&self) -> impl Iterator<Item = WallCell> + '_ {
        self.wall_cells(Orientation::Horizontal)
    }

    pub fn vertical_walls(&self) -> impl Iterator<Item = WallCell> + '_ {
        self.wall_cells(Orientation::Vertical)
    }

    /// All door cells, horizontal first.
    pub fn door_cells(&self) -> impl Iterator<Item = DoorCell> + '_ {
        let horizontal = self.horizontal_doors.iter().map(|&key| DoorCell {
            position: position_of(Orientation::Horizontal, key),
            orientation: Orientation::Horizontal,
        });
        let vertical = self.vertical_doors.iter().map(|&key| DoorCell {
            position: position_of(Orientation::Vertical, key),
            orientation: Orientation::Vertical,
        });
        horizontal.chain(vertical)
    }

    pub fn wall_count(&self) -> usize {
        self.horizontal.len() + self.vertical.len()
    }

    pub fn door_count(&self) -> usize {
        self.horizontal_doors.len() + self.vertical_doors.len()
    }

    /// Raw wall runs for the merger: `(line, along) -> facing`.
    pub(crate) fn raw_walls(&self, orientation: Orientation) -> &BTreeMap<(i32, i32), bool> {
        self.walls(orientation)
    }
}

/// Walk every rectangle's perimeter and classify each edge as wall or door.
pub fn derive_walls(rects: &[Rect]) -> Result<WallCells> {
    puffin::profile_function!();

    let mut cells = WallCells::new();
    for rect in rects {
        cells.add_rect(rect)?;
    }

    debug!(
        "derived {} wall cells and {} door cells from {} rectangles",
        cells.wall_count(),
        cells.door_count(),
        rects.len()
    );
    Ok(cells)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// Count how many rectangles have each edge on their perimeter.
    fn boundary_claims(rects: &[Rect]) -> HashMap<(Orientation, IVec2), usize> {
        let mut claims = HashMap::new();
        for rect in rects {
            for z in [rect.min_z(), rect.max_z()] {
                for x in rect.min_x()..rect.max_x() {
                    *claims.entry((Orientation::Horizontal, IVec2::new(x, z))).or_insert(0) += 1;
                }
            }
            for x in [rect.min_x(), rect.max_x()] {
                for z in rect.min_z()..rect.max_z() {
                    *claims.entry((Orientation::Vertical, IVec2::new(x, z))).or_insert(0) += 1;
                }
            }
        }
        claims
    }

    #[test]
    fn test_single_rect_is_all_walls() {
        let cells = derive_walls(&[Rect::from_bounds(0, 0, 4, 3)]).unwrap();
        assert_eq!(cells.wall_count(), 2 * 4 + 2 * 3);
        assert_eq!(cells.door_count(), 0);
    }

    #[test]
    fn test_facing_points_into_rect() {
        let cells = derive_walls(&[Rect::from_bounds(0, 0, 4, 3)]).unwrap();
        assert_eq!(
            cells.state(Orientation::Horizontal, IVec2::new(1, 0)),
            CellState::Wall { facing: true }
        );
        assert_eq!(
            cells.state(Orientation::Horizontal, IVec2::new(1, 3)),
            CellState::Wall { facing: false }
        );
        assert_eq!(
            cells.state(Orientation::Vertical, IVec2::new(0, 2)),
            CellState::Wall { facing: true }
        );
        assert_eq!(
            cells.state(Orientation::Vertical, IVec2::new(4, 2)),
            CellState::Wall { facing: false }
        );
    }

    #[test]
    fn test_shared_edge_becomes_door() {
        let room = Rect::from_bounds(0, 0, 4, 4);
        let corridor = Rect::from_bounds(4, 1, 8, 3);
        let cells = derive_walls(&[room, corridor]).unwrap();

        for z in 1..3 {
            assert_eq!(cells.state(Orientation::Vertical, IVec2::new(4, z)), CellState::Door);
        }
        assert_eq!(
            cells.state(Orientation::Vertical, IVec2::new(4, 0)),
            CellState::Wall { facing: false }
        );
        assert_eq!(
            cells.state(Orientation::Vertical, IVec2::new(4, 3)),
            CellState::Wall { facing: false }
        );
        assert_eq!(cells.door_count(), 2);
    }

    #[test]
    fn test_door_is_terminal() {
        let mut cells = WallCells::new();
        let position = IVec2::new(2, 5);
        cells.claim(Orientation::Horizontal, position, true);
        cells.claim(Orientation::Horizontal, position, false);
        assert_eq!(cells.state(Orientation::Horizontal, position), CellState::Door);
        cells.claim(Orientation::Horizontal, position, true);
        assert_eq!(cells.state(Orientation::Horizontal, position), CellState::Door);
    }

    #[test]
    fn test_orientations_are_independent() {
        let mut cells = WallCells::new();
        let position = IVec2::new(3, 3);
        cells.claim(Orientation::Horizontal, position, true);
        cells.claim(Orientation::Vertical, position, true);
        assert_eq!(
            cells.state(Orientation::Horizontal, position),
            CellState::Wall { facing: true }
        );
        assert_eq!(
            cells.state(Orientation::Vertical, position),
            CellState::Wall { facing: true }
        );
        assert_eq!(cells.door_count(), 0);
    }

    #[test]
    fn test_degenerate_rect_rejected() {
        let result = derive_walls(&[Rect::from_bounds(0, 0, 4, 4), Rect::from_bounds(4, 1, 4, 3)]);
        assert!(matches!(result, Err(DungeonError::DegenerateRect(_))));
    }

    #[test]
    fn test_classification_matches_claim_counts() {
        let rects = [
            Rect::from_bounds(0, 0, 6, 6),
            Rect::from_bounds(6, 2, 10, 4),
            Rect::from_bounds(10, 0, 16, 7),
            Rect::from_bounds(12, 7, 14, 11),
            Rect::from_bounds(9, 11, 17, 15),
        ];
        let cells = derive_walls(&rects).unwrap();

        for ((orientation, position), count) in boundary_claims(&rects) {
            let state = cells.state(orientation, position);
            match count {
                1 => assert!(matches!(state, CellState::Wall { .. }), "{:?} {:?}", orientation, position),
                2 => assert_eq!(state, CellState::Door, "{:?} {:?}", orientation, position),
                _ => unreachable!("no edge is shared by more than two rectangles here"),
            }
        }
    }

    #[test]
    fn test_order_does_not_change_classification() {
        let rects = vec![
            Rect::from_bounds(0, 0, 6, 6),
            Rect::from_bounds(6, 2, 10, 4),
            Rect::from_bounds(10, 0, 16, 7),
        ];
        let forward = derive_walls(&rects).unwrap();
        let mut reversed_rects = rects.clone();
        reversed_rects.reverse();
        let reversed = derive_walls(&reversed_rects).unwrap();
        assert_eq!(forward, reversed);
    }

    #[test]
    fn test_door_cells_report_positions() {
        let cells = derive_walls(&[Rect::from_bounds(0, 0, 3, 3), Rect::from_bounds(0, 3, 3, 5)]).unwrap();
        let doors: Vec<DoorCell> = cells.door_cells().collect();
        assert_eq!(doors.len(), 3);
        assert!(doors.iter().all(|door| door.orientation == Orientation::Horizontal));
        assert!(doors.iter().all(|door| door.position.y == 3));
    }
}
