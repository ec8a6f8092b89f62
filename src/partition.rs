//! Binary space partitioning of the dungeon footprint.
//!
//! The tree is stored as an arena: nodes live in one `Vec` and refer to each
//! other by [`NodeId`]. Ids follow creation order, and nodes are created one
//! level at a time, so iterating the arena is a breadth-first walk.

use std::collections::VecDeque;

use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::rect::Rect;

/// Index of a node in its [`PartitionTree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub usize);

/// Which way a region was cut.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SplitAxis {
    /// Cut along a line of constant X: children sit side by side.
    Vertical,
    /// Cut along a line of constant Z: children are stacked.
    Horizontal,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Leaf,
    /// `children[0]` is always the side with the lower coordinates.
    Internal {
        children: [NodeId; 2],
        axis: SplitAxis,
    },
}

#[derive(Clone, Debug)]
pub struct PartitionNode {
    pub id: NodeId,
    pub region: Rect,
    /// Depth from the root (root = 0).
    pub tree_layer_index: u32,
    pub parent: Option<NodeId>,
    pub kind: NodeKind,
}

impl PartitionNode {
    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf)
    }

    pub fn children(&self) -> Option<[NodeId; 2]> {
        match self.kind {
            NodeKind::Leaf => None,
            NodeKind::Internal { children, .. } => Some(children),
        }
    }
}

/// All nodes produced by one partitioning run.
#[derive(Clone, Debug)]
pub struct PartitionTree {
    nodes: Vec<PartitionNode>,
}

impl PartitionTree {
    pub(crate) fn with_root(region: Rect) -> Self {
        Self {
            nodes: vec![PartitionNode {
                id: NodeId(0),
                region,
                tree_layer_index: 0,
                parent: None,
                kind: NodeKind::Leaf,
            }],
        }
    }

    pub fn root(&self) -> &PartitionNode {
        &self.nodes[0]
    }

    pub fn node(&self, id: NodeId) -> &PartitionNode {
        &self.nodes[id.0]
    }

    /// Every node, all layers, in creation order.
    pub fn nodes(&self) -> &[PartitionNode] {
        &self.nodes
    }

    /// Leaves in breadth-first order.
    pub fn leaves(&self) -> impl Iterator<Item = &PartitionNode> {
        self.nodes.iter().filter(|node| node.is_leaf())
    }

    /// Every node of the subtree rooted at `id` (itself included), in
    /// breadth-first order.
    pub fn subtree(&self, id: NodeId) -> Vec<NodeId> {
        let mut nodes = Vec::new();
        let mut queue = VecDeque::from([id]);
        while let Some(current) = queue.pop_front() {
            nodes.push(current);
            if let Some(children) = self.node(current).children() {
                queue.extend(children);
            }
        }
        nodes
    }

    /// Leaves of the subtree rooted at `id`, in breadth-first order.
    pub fn leaves_under(&self, id: NodeId) -> Vec<NodeId> {
        self.subtree(id)
            .into_iter()
            .filter(|&node| self.node(node).is_leaf())
            .collect()
    }

    /// Deepest layer index in the tree.
    pub fn depth(&self) -> u32 {
        self.nodes
            .iter()
            .map(|node| node.tree_layer_index)
            .max()
            .unwrap_or(0)
    }

    pub(crate) fn split(&mut self, id: NodeId, axis: SplitAxis, at: i32) -> [NodeId; 2] {
        let parent = &self.nodes[id.0];
        let region = parent.region;
        let layer = parent.tree_layer_index + 1;

        let (low, high) = match axis {
            SplitAxis::Vertical => (
                Rect::from_bounds(region.min_x(), region.min_z(), at, region.max_z()),
                Rect::from_bounds(at, region.min_z(), region.max_x(), region.max_z()),
            ),
            SplitAxis::Horizontal => (
                Rect::from_bounds(region.min_x(), region.min_z(), region.max_x(), at),
                Rect::from_bounds(region.min_x(), at, region.max_x(), region.max_z()),
            ),
        };

        let children = [NodeId(self.nodes.len()), NodeId(self.nodes.len() + 1)];
        for (child_id, child_region) in children.iter().zip([low, high]) {
            self.nodes.push(PartitionNode {
                id: *child_id,
                region: child_region,
                tree_layer_index: layer,
                parent: Some(id),
                kind: NodeKind::Leaf,
            });
        }
        self.nodes[id.0].kind = NodeKind::Internal { children, axis };
        children
    }
}

/// Splits the dungeon footprint into leaves no smaller than the room minimums.
pub struct BinarySpacePartitioner {
    width: i32,
    length: i32,
}

impl BinarySpacePartitioner {
    pub fn new(width: i32, length: i32) -> Self {
        Self { width, length }
    }

    /// Run up to `max_iterations` splitting rounds. Each round tries to split
    /// every node produced by the previous round; nodes that can't be split
    /// without breaking the minimums stay leaves.
    pub fn prepare(
        &self,
        max_iterations: u32,
        room_width_min: i32,
        room_length_min: i32,
        rng: &mut impl Rng,
    ) -> PartitionTree {
        puffin::profile_function!();

        let mut tree = PartitionTree::with_root(Rect::from_bounds(0, 0, self.width, self.length));
        let mut to_split = vec![tree.root().id];

        for _ in 0..max_iterations {
            if to_split.is_empty() {
                break;
            }
            let mut next_round = Vec::with_capacity(to_split.len() * 2);
            for id in to_split {
                let region = tree.node(id).region;
                let Some(axis) = choose_split_axis(&region, room_width_min, room_length_min) else {
                    continue; // Too small either way, stays a leaf
                };
                let at = choose_split_coordinate(&region, axis, room_width_min, room_length_min, rng);
                next_round.extend(tree.split(id, axis, at));
            }
            to_split = next_round;
        }

        debug!(
            "partitioned {}x{} into {} nodes ({} leaves, depth {})",
            self.width,
            self.length,
            tree.nodes().len(),
            tree.leaves().count(),
            tree.depth()
        );
        tree
    }
}

/// Pick the axis to cut `region` along.
/// Prefers cutting across the longer side (ties cut vertically), falls back to
/// the other axis when the preferred one can't fit two minimum-size children.
pub fn choose_split_axis(
    region: &Rect,
    room_width_min: i32,
    room_length_min: i32,
) -> Option<SplitAxis> {
    // Widened so huge minimums can't overflow
    let can_split_vertically = i64::from(region.width()) >= i64::from(room_width_min) * 2;
    let can_split_horizontally = i64::from(region.length()) >= i64::from(room_length_min) * 2;

    let preferred = if region.width() >= region.length() {
        SplitAxis::Vertical
    } else {
        SplitAxis::Horizontal
    };

    match (preferred, can_split_vertically, can_split_horizontally) {
        (SplitAxis::Vertical, true, _) => Some(SplitAxis::Vertical),
        (SplitAxis::Horizontal, _, true) => Some(SplitAxis::Horizontal),
        (_, true, false) => Some(SplitAxis::Vertical),
        (_, false, true) => Some(SplitAxis::Horizontal),
        _ => None,
    }
}

/// Pick a cut coordinate so both halves keep at least the minimum size.
fn choose_split_coordinate(
    region: &Rect,
    axis: SplitAxis,
    room_width_min: i32,
    room_length_min: i32,
    rng: &mut impl Rng,
) -> i32 {
    match axis {
        SplitAxis::Vertical => {
            rng.gen_range(region.min_x() + room_width_min..=region.max_x() - room_width_min)
        }
        SplitAxis::Horizontal => {
            rng.gen_range(region.min_z() + room_length_min..=region.max_z() - room_length_min)
        }
    }
}
