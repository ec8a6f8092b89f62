use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle on the integer grid.
///
/// `y` components stand for the world Z axis: the dungeon is a footprint on
/// the ground plane, so "length" is the extent along Z.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub bottom_left: IVec2,
    pub top_right: IVec2,
}

impl Rect {
    pub fn new(bottom_left: IVec2, top_right: IVec2) -> Self {
        Self {
            bottom_left,
            top_right,
        }
    }

    /// Build a rectangle from its minimum and maximum coordinates.
    pub fn from_bounds(min_x: i32, min_z: i32, max_x: i32, max_z: i32) -> Self {
        Self::new(IVec2::new(min_x, min_z), IVec2::new(max_x, max_z))
    }

    pub fn min_x(&self) -> i32 {
        self.bottom_left.x
    }

    pub fn min_z(&self) -> i32 {
        self.bottom_left.y
    }

    pub fn max_x(&self) -> i32 {
        self.top_right.x
    }

    pub fn max_z(&self) -> i32 {
        self.top_right.y
    }

    pub fn width(&self) -> i32 {
        self.top_right.x - self.bottom_left.x
    }

    pub fn length(&self) -> i32 {
        self.top_right.y - self.bottom_left.y
    }

    pub fn area(&self) -> i64 {
        self.width() as i64 * self.length() as i64
    }

    pub fn center(&self) -> Vec2 {
        (self.bottom_left + self.top_right).as_vec2() * 0.5
    }

    /// Twice the center, which is always an exact integer point.
    /// Lets callers compare against grid coordinates without rounding.
    pub fn center_doubled(&self) -> IVec2 {
        self.bottom_left + self.top_right
    }

    /// True if the rectangle has positive width and length.
    pub fn is_valid(&self) -> bool {
        self.top_right.x > self.bottom_left.x && self.top_right.y > self.bottom_left.y
    }

    /// Check if `other` lies fully inside this rectangle (shared edges allowed).
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.min_x() >= self.min_x()
            && other.min_z() >= self.min_z()
            && other.max_x() <= self.max_x()
            && other.max_z() <= self.max_z()
    }

    /// Check if the interiors of two rectangles intersect with positive area.
    /// Rectangles that only share an edge or a corner do not overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.min_x() < other.max_x()
            && other.min_x() < self.max_x()
            && self.min_z() < other.max_z()
            && other.min_z() < self.max_z()
    }

    /// Check if a walker could step from one rectangle into the other: the
    /// interiors overlap, or the two share a stretch of edge of positive length.
    /// Touching at a single corner doesn't count.
    pub fn connects_to(&self, other: &Rect) -> bool {
        let along_x = span_overlap(self.min_x(), self.max_x(), other.min_x(), other.max_x());
        let along_z = span_overlap(self.min_z(), self.max_z(), other.min_z(), other.max_z());
        let meet_x = self.max_x() == other.min_x() || other.max_x() == self.min_x();
        let meet_z = self.max_z() == other.min_z() || other.max_z() == self.min_z();

        match (along_x, along_z) {
            (Some(_), Some(_)) => true,
            (Some(_), None) => meet_z,
            (None, Some(_)) => meet_x,
            (None, None) => false,
        }
    }

    /// Swap the X and Z axes.
    pub fn transposed(&self) -> Rect {
        Rect::new(
            IVec2::new(self.bottom_left.y, self.bottom_left.x),
            IVec2::new(self.top_right.y, self.top_right.x),
        )
    }
}

/// Length of the overlap of the half-open ranges `[a0, a1)` and `[b0, b1)`,
/// together with where it starts. Returns `None` when they are disjoint.
pub(crate) fn span_overlap(a0: i32, a1: i32, b0: i32, b1: i32) -> Option<(i32, i32)> {
    let start = a0.max(b0);
    let end = a1.min(b1);
    (end > start).then_some((start, end - start))
}

/// Number of connected pieces formed by `rects` under [`Rect::connects_to`].
#[cfg(test)]
pub(crate) fn count_components(rects: &[Rect]) -> usize {
    let mut parent: Vec<usize> = (0..rects.len()).collect();
    fn find(parent: &mut [usize], mut i: usize) -> usize {
        while parent[i] != i {
            parent[i] = parent[parent[i]];
            i = parent[i];
        }
        i
    }

    for i in 0..rects.len() {
        for j in i + 1..rects.len() {
            if rects[i].connects_to(&rects[j]) {
                let (a, b) = (find(&mut parent, i), find(&mut parent, j));
                parent[a] = b;
            }
        }
    }
    (0..rects.len()).filter(|&i| find(&mut parent, i) == i).count()
}
