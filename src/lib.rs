//! Broad-phase collision culling for circles in a square world,
//! using a quadtree that is rebuilt from scratch every tick.
//!
//! # Example
//! ```
//! use quadcull::{math as m, BroadPhase, Body, QuadTreeBroadPhase, QuadTreeParams};
//!
//! let mut broad_phase = QuadTreeBroadPhase::new(QuadTreeParams::default()).unwrap();
//! let mut bodies = vec![
//!     Body::new(0, m::Vec2::new(100.0, 100.0), 4.0),
//!     Body::new(1, m::Vec2::new(106.0, 100.0), 4.0),
//!     Body::new(2, m::Vec2::new(500.0, 500.0), 4.0),
//! ];
//! broad_phase.tick(&mut bodies);
//! assert!(bodies[0].colliding && bodies[1].colliding);
//! assert!(!bodies[2].colliding);
//! ```

// profiling spans that compile to nothing unless the `tracy` feature is on
#[cfg(feature = "tracy")]
macro_rules! tracy_span {
    ($name:expr) => {
        tracy_client::Client::running()
            .map(|client| client.span(tracy_client::span_location!($name), 0))
    };
}
#[cfg(not(feature = "tracy"))]
macro_rules! tracy_span {
    ($name:expr) => {
        ()
    };
}

pub mod math;
pub use math::{uv, Vec2};

pub mod physics;
pub use physics::{
    body::{Body, BodyId},
    collision::{
        self, BroadPhase, BruteForce, Node, NodeView, ParamsError, Quadrant, QuadTreeBroadPhase,
        QuadTreeParams, SpatialIndex, TickStats, AABB,
    },
};
