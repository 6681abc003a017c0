use crate::math as m;

pub mod quadtree;
pub use quadtree::{Node, Quadrant};

pub mod spatialindex;
pub use spatialindex::{NodeIter, NodeView, ParamsError, QuadTreeParams, SpatialIndex};

pub mod broadphase;
pub use broadphase::{BroadPhase, BruteForce, QuadTreeBroadPhase, TickStats};

pub mod query;

/// Axis-aligned bounding box.
///
/// Y grows downward, so `min` is the top left corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AABB {
    pub min: m::Vec2,
    pub max: m::Vec2,
}

impl AABB {
    /// A square with its top left corner at `origin`.
    pub fn square(origin: m::Vec2, side_length: f64) -> Self {
        Self {
            min: origin,
            max: origin + m::Vec2::new(side_length, side_length),
        }
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// Check whether a point is inside the box, boundary included.
    pub fn contains_point(&self, point: m::Vec2) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_bounds() {
        let sq = AABB::square(m::Vec2::new(10.0, 20.0), 5.0);
        assert_eq!(sq.max, m::Vec2::new(15.0, 25.0));
        assert_eq!(sq.width(), 5.0);
        assert_eq!(sq.height(), 5.0);
        assert!(sq.contains_point(m::Vec2::new(15.0, 20.0)));
        assert!(!sq.contains_point(m::Vec2::new(15.1, 20.0)));
    }
}
