//! Corridor carving between sibling subtrees of the partition tree.
//!
//! Nodes are visited deepest layer first, so by the time a node is processed
//! each of its two subtrees is already internally connected. The node then only
//! has to link one floor rectangle (a room or an earlier corridor) from its low
//! child to one from its high child.
//!
//! All the placement logic is written for a vertical split (low child on the
//! left, high child on the right). Horizontal splits are handled by transposing
//! every rectangle going in and transposing the results coming out.

use std::cmp::Reverse;
use std::collections::HashMap;

use log::{debug, warn};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::CORRIDOR_SEAM_OVERLAP;
use crate::partition::{NodeId, NodeKind, PartitionTree, SplitAxis};
use crate::rect::{span_overlap, Rect};
use crate::rooms::Room;

/// A corridor rectangle, tagged with the internal node whose children it joins.
/// Elbow and centre-to-centre connections produce two corridors for the same node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Corridor {
    pub node: NodeId,
    pub rect: Rect,
}

/// Outcome of trying to link the two sides of a split.
#[derive(Debug, PartialEq)]
enum Link {
    /// Two floor rectangles already touch across the seam, so they share door cells.
    Touching,
    /// One or two rectangles bridging the gap without cutting into carved space.
    Legs(Vec<Rect>),
    /// Centre-to-centre legs that run through carved space.
    Forced(Vec<Rect>),
    /// One side has no floor to link to.
    Missing,
}

pub struct CorridorBuilder {
    corridor_width: i32,
}

impl CorridorBuilder {
    pub fn new(corridor_width: i32) -> Self {
        Self { corridor_width }
    }

    /// Build corridors for every internal node of `tree`, deepest layer first.
    ///
    /// Every internal node whose subtrees don't already touch gets at least one
    /// corridor, so the floor of every subtree ends up in one connected piece
    /// as long as each leaf has a room and `corridor_width` fits inside every
    /// leaf.
    pub fn build(&self, tree: &PartitionTree, rooms: &[Room], rng: &mut impl Rng) -> Vec<Corridor> {
        puffin::profile_function!();

        let room_of: HashMap<NodeId, Rect> = rooms.iter().map(|room| (room.leaf, room.rect)).collect();
        let mut legs_of: HashMap<NodeId, Vec<Rect>> = HashMap::new();

        let mut order: Vec<_> = tree.nodes().iter().collect();
        order.sort_by_key(|node| (Reverse(node.tree_layer_index), node.id));

        // Everything carved so far; new corridors avoid cutting through it when they can
        let mut carved: Vec<Rect> = rooms.iter().map(|room| room.rect).collect();
        let mut corridors = Vec::new();

        for node in order {
            let NodeKind::Internal { children, axis } = node.kind else {
                continue;
            };

            let frame = |rect: &Rect| match axis {
                SplitAxis::Vertical => *rect,
                SplitAxis::Horizontal => rect.transposed(),
            };
            // Rooms and corridors already carved inside a child's subtree
            let side = |child: NodeId| -> Vec<Rect> {
                tree.subtree(child)
                    .iter()
                    .flat_map(|id| {
                        room_of
                            .get(id)
                            .into_iter()
                            .chain(legs_of.get(id).into_iter().flatten())
                    })
                    .map(frame)
                    .collect()
            };
            let low = side(children[0]);
            let high = side(children[1]);
            let obstacles: Vec<Rect> = carved.iter().map(frame).collect();

            let legs = match self.link(&low, &high, &frame(&node.region), &obstacles, rng) {
                Link::Touching => {
                    debug!("node {:?}: floor already touches across the seam", node.id);
                    continue;
                }
                Link::Legs(legs) => legs,
                Link::Forced(legs) => {
                    warn!(
                        "node {:?}: corridor of width {} cuts through carved space",
                        node.id, self.corridor_width
                    );
                    legs
                }
                Link::Missing => {
                    warn!("node {:?}: a child subtree has no rooms to link", node.id);
                    continue;
                }
            };

            for leg in legs {
                let rect = frame(&leg);
                carved.push(rect);
                legs_of.entry(node.id).or_default().push(rect);
                corridors.push(Corridor { node: node.id, rect });
            }
        }

        debug!("built {} corridor rectangles", corridors.len());
        corridors
    }

    /// Link a rectangle from `low` (left of the seam) to one from `high` (right
    /// of the seam), staying inside `region`. Prefers a straight corridor over
    /// the shortest gap, then an elbow, then an L through both centres.
    fn link(
        &self,
        low: &[Rect],
        high: &[Rect],
        region: &Rect,
        obstacles: &[Rect],
        rng: &mut impl Rng,
    ) -> Link {
        let pairs: Vec<(&Rect, &Rect)> = low
            .iter()
            .flat_map(|a| high.iter().map(move |b| (a, b)))
            .collect();

        let touching = pairs.iter().any(|(a, b)| {
            a.max_x() == b.min_x() && span_overlap(a.min_z(), a.max_z(), b.min_z(), b.max_z()).is_some()
        });
        if touching {
            return Link::Touching;
        }

        let mut straight: Vec<(i32, &Rect, &Rect, i32, i32)> = pairs
            .iter()
            .filter_map(|&(a, b)| {
                let gap = b.min_x() - a.max_x();
                let (start, len) = span_overlap(a.min_z(), a.max_z(), b.min_z(), b.max_z())?;
                (gap > 0 && len >= self.corridor_width).then_some((gap, a, b, start, len))
            })
            .collect();
        straight.sort_by_key(|candidate| candidate.0);

        for (_, a, b, start, len) in straight {
            let band = start + rng.gen_range(0..=len - self.corridor_width);
            let corridor = Rect::from_bounds(
                a.max_x() - CORRIDOR_SEAM_OVERLAP,
                band,
                b.min_x() + CORRIDOR_SEAM_OVERLAP,
                band + self.corridor_width,
            );
            if is_clear(&[corridor], obstacles, a, b) {
                return Link::Legs(vec![corridor]);
            }
        }

        let mut elbows = pairs;
        elbows.sort_by_key(|(a, b)| {
            let d = a.center_doubled() - b.center_doubled();
            d.x.abs() + d.y.abs()
        });

        for &(a, b) in &elbows {
            let Some(legs) = self.elbow(a, b, rng) else {
                continue;
            };
            if is_clear(&legs, obstacles, a, b) {
                return Link::Legs(legs);
            }
        }

        // Always possible: the closest pair joined through their centres,
        // overlapping whatever lies in between if nothing clear exists
        let mut forced = None;
        for &(a, b) in &elbows {
            let legs = self.through_centres(a, b, region);
            if is_clear(&legs, obstacles, a, b) {
                return Link::Legs(legs);
            }
            if forced.is_none() {
                forced = Some(legs);
            }
        }

        match forced {
            Some(legs) => Link::Forced(legs),
            None => Link::Missing,
        }
    }

    /// Two abutting legs: one running right out of `a` along its edge nearest
    /// to `b`, one turning up or down into `b`. Returns `None` when `b` is not
    /// fully above or below `a`, or either room is narrower than the corridor.
    fn elbow(&self, a: &Rect, b: &Rect, rng: &mut impl Rng) -> Option<Vec<Rect>> {
        let w = self.corridor_width;
        if a.length() < w || b.width() < w || b.min_x() < a.max_x() {
            return None;
        }

        let column = rng.gen_range(b.min_x()..=b.max_x() - w);
        let run_to = column + w;

        if b.min_z() > a.max_z() {
            let band = a.max_z() - w;
            Some(vec![
                Rect::from_bounds(a.max_x() - CORRIDOR_SEAM_OVERLAP, band, run_to, a.max_z()),
                Rect::from_bounds(column, a.max_z(), run_to, b.min_z() + CORRIDOR_SEAM_OVERLAP),
            ])
        } else if b.max_z() < a.min_z() {
            let band = a.min_z();
            Some(vec![
                Rect::from_bounds(a.max_x() - CORRIDOR_SEAM_OVERLAP, band, run_to, band + w),
                Rect::from_bounds(column, b.max_z() - CORRIDOR_SEAM_OVERLAP, run_to, band),
            ])
        } else {
            None
        }
    }

    /// An L from the centre cell of `a` to the centre cell of `b`: a run along
    /// X at `a`'s centre row, then a turn along Z in `b`'s centre column. Both
    /// legs are pulled back inside `region` and overlap the rectangles they
    /// join, so `a` and `b` always end up connected. A single run is enough
    /// when both centres sit on the same row.
    fn through_centres(&self, a: &Rect, b: &Rect, region: &Rect) -> Vec<Rect> {
        let w = self.corridor_width;
        let (a_x, a_z) = centre_cell(a);
        let (b_x, b_z) = centre_cell(b);

        let row_a = a_z.min(region.max_z() - w);
        let row_b = b_z.min(region.max_z() - w);
        let column = b_x.min(region.max_x() - w);

        let run = Rect::from_bounds(a_x, row_a, column + w, row_a + w);
        if row_a == row_b {
            return vec![run];
        }
        let turn = Rect::from_bounds(column, row_a.min(row_b), column + w, row_a.max(row_b) + w);
        vec![run, turn]
    }
}

/// The grid cell holding the rectangle's center (rounded down).
fn centre_cell(rect: &Rect) -> (i32, i32) {
    let doubled = rect.center_doubled();
    (doubled.x.div_euclid(2), doubled.y.div_euclid(2))
}

/// True if none of `legs` cuts into an obstacle other than the two rectangles being joined.
fn is_clear(legs: &[Rect], obstacles: &[Rect], a: &Rect, b: &Rect) -> bool {
    legs.iter().all(|leg| {
        obstacles
            .iter()
            .filter(|obstacle| *obstacle != a && *obstacle != b)
            .all(|obstacle| !leg.overlaps(obstacle))
    })
}
