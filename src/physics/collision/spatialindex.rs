//! The spatial index is responsible for finding the bodies that might be touching
//! a given body, so that only those need a distance test.

use super::{
    quadtree::{self, Node, SplitPolicy},
    AABB,
};
use crate::{math as m, physics::Body};

use thunderdome as td;

/// Depth of the root node. Children are one deeper than their parent.
pub const ROOT_DEPTH: usize = 1;

/// Parameters for the creation of a [`SpatialIndex`][self::SpatialIndex].
///
/// The defaults describe a 640 by 640 world split at most nine levels deep
/// with up to six bodies per node.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde-types",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct QuadTreeParams {
    /// Side length of the square world. The world spans `[0, world_size]` on both axes.
    ///
    /// Bodies outside the world are still accepted, but they can't be routed into
    /// any quadrant and pile up in the root node, where every query sees them.
    pub world_size: f64,
    /// Maximum depth of the tree, counting the root as depth 1.
    /// Nodes at this depth never split and accept any number of bodies.
    pub max_depth: usize,
    /// How many bodies a node may hold before it splits.
    /// Lower values make the tree deeper and candidate sets smaller.
    pub max_bodies_per_node: usize,
}

impl Default for QuadTreeParams {
    fn default() -> Self {
        Self {
            world_size: 640.0,
            max_depth: 9,
            max_bodies_per_node: 6,
        }
    }
}

/// Error when creating a spatial index from invalid parameters.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
pub enum ParamsError {
    #[error("World size must be a positive finite number, got {0}")]
    InvalidWorldSize(f64),
    #[error("Max depth must be at least 1 to fit the root node")]
    ZeroMaxDepth,
}

/// A quadtree over a square world.
///
/// The tree is meant to be rebuilt from scratch every tick:
/// [`clear`][Self::clear] it, [`insert`][Self::insert] every body,
/// then [`retrieve`][Self::retrieve] candidates for each one.
/// Bodies are copied in, so moving the originals afterwards doesn't affect the tree.
#[derive(Clone, Debug)]
pub struct SpatialIndex {
    nodes: td::Arena<Node>,
    root: td::Index,
    params: QuadTreeParams,
}

impl SpatialIndex {
    /// Create an empty index. See [`QuadTreeParams`][self::QuadTreeParams] for explanation.
    pub fn new(params: QuadTreeParams) -> Result<Self, ParamsError> {
        if !params.world_size.is_finite() || params.world_size <= 0.0 {
            return Err(ParamsError::InvalidWorldSize(params.world_size));
        }
        if params.max_depth < ROOT_DEPTH {
            return Err(ParamsError::ZeroMaxDepth);
        }

        let mut nodes = td::Arena::new();
        let root = nodes.insert(Self::root_node(&params));
        Ok(Self {
            nodes,
            root,
            params,
        })
    }

    fn root_node(params: &QuadTreeParams) -> Node {
        Node::new(m::Vec2::zero(), params.world_size, ROOT_DEPTH)
    }

    #[inline]
    fn policy(&self) -> SplitPolicy {
        SplitPolicy {
            max_depth: self.params.max_depth,
            max_bodies_per_node: self.params.max_bodies_per_node,
        }
    }

    /// The parameters this index was created with.
    #[inline]
    pub fn params(&self) -> &QuadTreeParams {
        &self.params
    }

    /// The square covered by the root node.
    #[inline]
    pub fn root_bounds(&self) -> AABB {
        self.root().bounds()
    }

    /// Access the root node.
    #[inline]
    pub fn root(&self) -> &Node {
        &self.nodes[self.root]
    }

    /// Remove every body and every node except an empty root.
    pub fn clear(&mut self) {
        // arena keeps its allocation, so rebuilding every tick doesn't reallocate
        self.nodes.clear();
        self.root = self.nodes.insert(Self::root_node(&self.params));
    }

    /// Insert a body, splitting nodes as they overflow.
    ///
    /// Bodies are placed by their center point only.
    pub fn insert(&mut self, body: Body) {
        if log::log_enabled!(log::Level::Debug)
            && self.root().classify(body.position).is_none()
        {
            log::debug!(
                "body {:?} at {:?} is outside the world, keeping it in the root",
                body.id,
                body.position
            );
        }
        let policy = self.policy();
        quadtree::insert(&mut self.nodes, self.root, body, policy);
    }

    /// Append every body that might touch `query` to `out`.
    ///
    /// Candidates are the residents of every node on the path from the root
    /// to the deepest node containing the query's center, deepest node first.
    /// The query itself is included if it was inserted.
    ///
    /// This only looks at center points, so bodies in neighboring nodes are never
    /// returned even if their circles overlap the query's.
    pub fn retrieve<'a>(&'a self, query: &Body, out: &mut Vec<&'a Body>) {
        quadtree::retrieve(&self.nodes, self.root, query.position, out);
    }

    /// Like [`retrieve`][Self::retrieve], but collect into a new Vec.
    pub fn candidates(&self, query: &Body) -> Vec<&Body> {
        let mut out = Vec::new();
        self.retrieve(query, &mut out);
        out
    }

    /// Total number of bodies stored anywhere in the tree.
    pub fn len(&self) -> usize {
        self.nodes.iter().map(|(_, n)| n.residents().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.iter().all(|(_, n)| n.residents().is_empty())
    }

    /// Number of nodes in the tree, root included.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Iterate over every node depth-first, parents before their children
    /// and children in [`Quadrant`][super::Quadrant] order.
    ///
    /// Intended for drawing the tree.
    pub fn nodes(&self) -> NodeIter<'_> {
        NodeIter {
            nodes: &self.nodes,
            stack: vec![self.root],
        }
    }
}

/// Read-only information about one node of a [`SpatialIndex`][self::SpatialIndex].
#[derive(Clone, Copy, Debug)]
pub struct NodeView<'a> {
    pub bounds: AABB,
    pub depth: usize,
    pub residents: &'a [Body],
    pub is_split: bool,
}

/// Iterator over the nodes of a spatial index, created with
/// [`SpatialIndex::nodes`][self::SpatialIndex::nodes].
pub struct NodeIter<'a> {
    nodes: &'a td::Arena<Node>,
    stack: Vec<td::Index>,
}

impl<'a> Iterator for NodeIter<'a> {
    type Item = NodeView<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.stack.pop()?;
        if let Some(children) = quadtree::children(self.nodes, idx) {
            // reversed so the first quadrant comes out first
            self.stack.extend(children.iter().rev());
        }
        let node = &self.nodes[idx];
        Some(NodeView {
            bounds: node.bounds(),
            depth: node.depth(),
            residents: node.residents(),
            is_split: node.is_split(),
        })
    }
}

//
// tests
//
