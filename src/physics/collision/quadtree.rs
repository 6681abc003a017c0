//! Quadtree nodes and the algorithms that build and query them.
//!
//! Nodes live in an arena owned by [`SpatialIndex`][super::SpatialIndex]
//! and refer to their children by arena index.
//! Bodies are classified by their center point only,
//! so a body whose circle crosses a node boundary is still routed into a single quadrant.

use super::AABB;
use crate::{math as m, physics::Body};

use thunderdome as td;

/// One of the four children of a split node.
///
/// Y grows downward, so the top quadrants are the ones with smaller y.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Quadrant {
    TopLeft = 0,
    TopRight = 1,
    BottomLeft = 2,
    BottomRight = 3,
}

impl Quadrant {
    /// All quadrants in child order.
    pub const ALL: [Quadrant; 4] = [
        Quadrant::TopLeft,
        Quadrant::TopRight,
        Quadrant::BottomLeft,
        Quadrant::BottomRight,
    ];

    /// Position of this quadrant's node in its parent's child array.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// One square region of the spatial index.
#[derive(Clone, Debug)]
pub struct Node {
    origin: m::Vec2,
    side_length: f64,
    depth: usize,
    // all four or nothing
    children: Option<[td::Index; 4]>,
    residents: Vec<Body>,
}

impl Node {
    pub(crate) fn new(origin: m::Vec2, side_length: f64, depth: usize) -> Self {
        Self {
            origin,
            side_length,
            depth,
            children: None,
            residents: Vec::new(),
        }
    }

    /// The square this node covers.
    #[inline]
    pub fn bounds(&self) -> AABB {
        AABB::square(self.origin, self.side_length)
    }

    /// Depth in the tree, starting from 1 at the root.
    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Bodies stored directly in this node rather than in one of its children.
    #[inline]
    pub fn residents(&self) -> &[Body] {
        &self.residents
    }

    /// Whether this node has been subdivided.
    #[inline]
    pub fn is_split(&self) -> bool {
        self.children.is_some()
    }

    /// Decide which child quadrant a point belongs to.
    ///
    /// The halves are split at `round(side_length / 2)` with the midline belonging to the
    /// top/left half: `[origin, origin + half]` and `(origin + half, origin + side_length]`.
    /// Points that fall in neither half on either axis (i.e. outside the node) are ambiguous
    /// and give `None`.
    pub fn classify(&self, point: m::Vec2) -> Option<Quadrant> {
        let half = m::half_rounded(self.side_length);
        let mid = self.origin + m::Vec2::new(half, half);
        let far = self.origin + m::Vec2::new(self.side_length, self.side_length);

        let left = point.x >= self.origin.x && point.x <= mid.x;
        let right = point.x > mid.x && point.x <= far.x;
        let top = point.y >= self.origin.y && point.y <= mid.y;
        let bottom = point.y > mid.y && point.y <= far.y;

        match (top, bottom, left, right) {
            (true, _, true, _) => Some(Quadrant::TopLeft),
            (true, _, _, true) => Some(Quadrant::TopRight),
            (_, true, true, _) => Some(Quadrant::BottomLeft),
            (_, true, _, true) => Some(Quadrant::BottomRight),
            _ => None,
        }
    }

    /// Origins of the four squares this node splits into, in quadrant order,
    /// and their shared side length.
    ///
    /// Because the half is rounded, the children may together cover slightly more
    /// or less than the parent.
    pub fn child_squares(&self) -> ([m::Vec2; 4], f64) {
        let half = m::half_rounded(self.side_length);
        let o = self.origin;
        (
            [
                o,
                o + m::Vec2::new(half, 0.0),
                o + m::Vec2::new(0.0, half),
                o + m::Vec2::new(half, half),
            ],
            half,
        )
    }
}

/// Limits that decide when a node splits.
#[derive(Clone, Copy, Debug)]
pub(crate) struct SplitPolicy {
    pub max_depth: usize,
    pub max_bodies_per_node: usize,
}

impl SplitPolicy {
    #[inline]
    fn should_split(&self, node: &Node) -> bool {
        node.residents.len() > self.max_bodies_per_node && node.depth < self.max_depth
    }
}

/// Create the four children of a node. Residents are not moved.
///
/// The node must not be split already.
pub(crate) fn split(nodes: &mut td::Arena<Node>, idx: td::Index) -> [td::Index; 4] {
    let node = &nodes[idx];
    debug_assert!(!node.is_split(), "bug: split a node twice");
    let (origins, half) = node.child_squares();
    let child_depth = node.depth + 1;
    log::trace!(
        "splitting node at {:?} (side {}, depth {})",
        node.origin,
        node.side_length,
        node.depth
    );

    let children = origins.map(|origin| nodes.insert(Node::new(origin, half, child_depth)));
    nodes[idx].children = Some(children);
    children
}

/// Follow `point` down from `idx` through split nodes
/// and return the deepest node that takes it.
fn descend(nodes: &td::Arena<Node>, mut idx: td::Index, point: m::Vec2) -> td::Index {
    loop {
        let node = &nodes[idx];
        match (node.children, node.classify(point)) {
            (Some(children), Some(quadrant)) => idx = children[quadrant.index()],
            _ => return idx,
        }
    }
}

/// Insert a body into the subtree rooted at `idx`,
/// splitting and redistributing residents if the node overflows.
///
/// Works through an explicit stack rather than the call stack,
/// so trees may be as deep as `max_depth` allows.
pub(crate) fn insert(
    nodes: &mut td::Arena<Node>,
    idx: td::Index,
    body: Body,
    policy: SplitPolicy,
) {
    // bodies waiting to be placed, with the node to start looking from
    let mut pending = vec![(idx, body)];
    while let Some((start, body)) = pending.pop() {
        let idx = descend(nodes, start, body.position);
        let node = &mut nodes[idx];
        node.residents.push(body);
        if !policy.should_split(node) {
            continue;
        }

        let existing = node.children;
        let children = match existing {
            Some(children) => children,
            None => split(nodes, idx),
        };

        // move everything that fits in a child down, keeping the order of what stays
        let residents = std::mem::take(&mut nodes[idx].residents);
        let mut ambiguous = Vec::new();
        let first_moved = pending.len();
        for resident in residents {
            match nodes[idx].classify(resident.position) {
                Some(quadrant) => pending.push((children[quadrant.index()], resident)),
                None => ambiguous.push(resident),
            }
        }
        // earlier residents are placed first, and finish cascading before the next one
        pending[first_moved..].reverse();
        nodes[idx].residents = ambiguous;
    }
}

/// Collect candidates for a point along its single root-to-leaf path.
///
/// The deepest node's residents come first, then each ancestor's in turn up to `idx`.
pub(crate) fn retrieve<'a>(
    nodes: &'a td::Arena<Node>,
    idx: td::Index,
    point: m::Vec2,
    out: &mut Vec<&'a Body>,
) {
    let mut path = vec![idx];
    let mut current = idx;
    loop {
        let node = &nodes[current];
        match (node.children, node.classify(point)) {
            (Some(children), Some(quadrant)) => {
                current = children[quadrant.index()];
                path.push(current);
            }
            _ => break,
        }
    }
    for &on_path in path.iter().rev() {
        out.extend(nodes[on_path].residents.iter());
    }
}

/// Child indices of a node, if it is split.
#[inline]
pub(crate) fn children(nodes: &td::Arena<Node>, idx: td::Index) -> Option<[td::Index; 4]> {
    nodes[idx].children
}

//
// tests
//
