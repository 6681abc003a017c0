pub mod body;
pub use body::{Body, BodyId};

pub mod collision;
pub use collision::{BroadPhase, QuadTreeBroadPhase, SpatialIndex};
