//! Broad phase collision detection algorithms
//! are responsible for finding which bodies touch other bodies,
//! using a spatial structure to skip most of the pairs that can't.

use super::{
    query::circles_touch,
    spatialindex::{ParamsError, QuadTreeParams, SpatialIndex},
};
use crate::physics::Body;

/// Numbers describing what a broad phase tick did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickStats {
    /// Number of bodies processed.
    pub bodies: usize,
    /// Number of body pairs that were distance-tested, not counting bodies matched with themselves.
    /// Each unordered pair may be counted twice, once from each side.
    pub candidate_tests: usize,
    /// Number of bodies flagged as colliding.
    pub colliding: usize,
}

/// A broad phase algorithm.
pub trait BroadPhase {
    /// Recompute the `colliding` flag of every body from current positions.
    ///
    /// A body is colliding if any other body (by id) touches it.
    fn tick(&mut self, bodies: &mut [Body]) -> TickStats;
}

/// Broad phase that rebuilds a quadtree [`SpatialIndex`][super::SpatialIndex] every tick
/// and tests each body only against the bodies on its path through the tree.
///
/// This is an approximation: two bodies whose circles overlap across a node boundary
/// are not detected unless one of them is stuck higher up on the other's path.
#[derive(Clone, Debug)]
pub struct QuadTreeBroadPhase {
    index: SpatialIndex,
}

impl QuadTreeBroadPhase {
    /// Create a broad phase with an empty index.
    pub fn new(params: QuadTreeParams) -> Result<Self, ParamsError> {
        Ok(Self {
            index: SpatialIndex::new(params)?,
        })
    }

    /// The index as built by the last tick, for inspection and drawing.
    #[inline]
    pub fn index(&self) -> &SpatialIndex {
        &self.index
    }

    /// Mutable access to the index, e.g. to insert a freshly spawned body
    /// before the next tick. Everything is rebuilt on the next tick anyway.
    #[inline]
    pub fn index_mut(&mut self) -> &mut SpatialIndex {
        &mut self.index
    }
}

impl BroadPhase for QuadTreeBroadPhase {
    fn tick(&mut self, bodies: &mut [Body]) -> TickStats {
        let mut stats = TickStats {
            bodies: bodies.len(),
            ..Default::default()
        };

        {
            let _span = tracy_span!("rebuild quadtree");
            self.index.clear();
            for body in bodies.iter() {
                self.index.insert(*body);
            }
        }

        let _span = tracy_span!("query quadtree");
        let mut candidates = Vec::new();
        for body in bodies.iter_mut() {
            candidates.clear();
            self.index.retrieve(body, &mut candidates);

            let id = body.id;
            body.colliding = false;
            for other in candidates.iter().filter(|c| c.id != id) {
                stats.candidate_tests += 1;
                if circles_touch(body, other) {
                    body.colliding = true;
                }
            }
            if body.colliding {
                stats.colliding += 1;
            }
        }

        log::trace!(
            "quadtree broad phase: {} bodies, {} nodes, {} tests, {} colliding",
            stats.bodies,
            self.index.node_count(),
            stats.candidate_tests,
            stats.colliding
        );
        stats
    }
}

/// The simplest possible broad phase algorithm,
/// which tests every body against every other body.
/// Very inefficient, but exact, which makes it a useful reference.
#[derive(Clone, Copy, Debug, Default)]
pub struct BruteForce;

impl BroadPhase for BruteForce {
    fn tick(&mut self, bodies: &mut [Body]) -> TickStats {
        let _span = tracy_span!("brute force");
        let mut stats = TickStats {
            bodies: bodies.len(),
            ..Default::default()
        };

        for i in 0..bodies.len() {
            let (body, id) = (bodies[i], bodies[i].id);
            let mut colliding = false;
            for other in bodies.iter().filter(|o| o.id != id) {
                stats.candidate_tests += 1;
                colliding |= circles_touch(&body, other);
            }
            bodies[i].colliding = colliding;
            if colliding {
                stats.colliding += 1;
            }
        }

        stats
    }
}

//
// tests
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math as m;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn body(id: u64, x: f64, y: f64, r: f64) -> Body {
        Body::new(id, m::Vec2::new(x, y), r)
    }

    fn default_broad_phase() -> QuadTreeBroadPhase {
        QuadTreeBroadPhase::new(QuadTreeParams::default()).unwrap()
    }

    fn flags(bodies: &[Body]) -> Vec<bool> {
        bodies.iter().map(|b| b.colliding).collect()
    }

    #[test]
    fn single_body_never_collides_with_itself() {
        let mut bp = default_broad_phase();
        let mut bodies = vec![body(0, 100.0, 100.0, 50.0)];
        let stats = bp.tick(&mut bodies);
        assert!(!bodies[0].colliding);
        assert_eq!(stats.candidate_tests, 0);
        assert_eq!(stats.colliding, 0);

        BruteForce.tick(&mut bodies);
        assert!(!bodies[0].colliding);
    }

    #[test]
    fn contact_threshold_is_inclusive() {
        let mut bp = default_broad_phase();

        let mut touching = vec![body(0, 100.0, 100.0, 5.0), body(1, 110.0, 100.0, 5.0)];
        bp.tick(&mut touching);
        assert_eq!(flags(&touching), vec![true, true]);

        let mut apart = vec![body(0, 100.0, 100.0, 5.0), body(1, 110.0 + 1e-9, 100.0, 5.0)];
        let stats = bp.tick(&mut apart);
        assert_eq!(flags(&apart), vec![false, false]);
        assert_eq!(stats.candidate_tests, 2);
    }

    #[test]
    fn flags_reset_every_tick() {
        let mut bp = default_broad_phase();
        let mut bodies = vec![body(0, 100.0, 100.0, 5.0), body(1, 105.0, 100.0, 5.0)];
        bp.tick(&mut bodies);
        assert_eq!(flags(&bodies), vec![true, true]);

        bodies[1].position = m::Vec2::new(300.0, 100.0);
        let stats = bp.tick(&mut bodies);
        assert_eq!(flags(&bodies), vec![false, false]);
        assert_eq!(stats.colliding, 0);
        assert_eq!(bp.index().len(), 2);
    }

    #[test]
    fn shared_ids_hide_contacts() {
        let mut bodies = vec![body(7, 100.0, 100.0, 5.0), body(7, 101.0, 100.0, 5.0)];
        default_broad_phase().tick(&mut bodies);
        assert_eq!(flags(&bodies), vec![false, false]);
        BruteForce.tick(&mut bodies);
        assert_eq!(flags(&bodies), vec![false, false]);
    }

    #[test]
    fn cascaded_pile_collides() {
        let mut bp = default_broad_phase();
        let mut bodies: Vec<Body> = (0..7).map(|id| body(id, 10.0, 10.0, 1.0)).collect();
        let stats = bp.tick(&mut bodies);
        assert!(bodies.iter().all(|b| b.colliding));
        assert_eq!(stats.colliding, 7);
        assert_eq!(stats.candidate_tests, 7 * 6);
        assert_eq!(bp.index().len(), 7);
    }

    #[test]
    fn opposite_corners_dont_collide() {
        let params = QuadTreeParams {
            max_bodies_per_node: 1,
            ..Default::default()
        };
        let mut bp = QuadTreeBroadPhase::new(params).unwrap();
        let mut bodies = vec![body(0, 10.0, 10.0, 5.0), body(1, 630.0, 630.0, 5.0)];
        let stats = bp.tick(&mut bodies);
        assert_eq!(flags(&bodies), vec![false, false]);
        // each body only saw itself
        assert_eq!(stats.candidate_tests, 0);
    }

    #[test]
    fn overlap_across_boundary_is_missed() {
        let params = QuadTreeParams {
            max_bodies_per_node: 1,
            ..Default::default()
        };
        let mut bodies = vec![body(0, 318.0, 100.0, 5.0), body(1, 322.0, 100.0, 5.0)];

        QuadTreeBroadPhase::new(params).unwrap().tick(&mut bodies);
        assert_eq!(flags(&bodies), vec![false, false]);

        BruteForce.tick(&mut bodies);
        assert_eq!(flags(&bodies), vec![true, true]);
    }

    #[test]
    fn outsider_is_seen_by_everyone() {
        let params = QuadTreeParams {
            max_bodies_per_node: 1,
            ..Default::default()
        };
        let mut bp = QuadTreeBroadPhase::new(params).unwrap();
        // a huge body centered past the right edge of the world
        let mut bodies = vec![
            body(0, 10.0, 10.0, 5.0),
            body(1, 630.0, 630.0, 5.0),
            body(2, 700.0, 320.0, 800.0),
        ];
        bp.tick(&mut bodies);
        assert_eq!(flags(&bodies), vec![true, true, false]);
    }

    #[test]
    fn quadtree_agrees_with_brute_force_where_it_detects() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut bp = default_broad_phase();

        for _round in 0..5 {
            let mut bodies: Vec<Body> = (0..400)
                .map(|id| {
                    body(
                        id,
                        rng.gen_range(0.0..=640.0),
                        rng.gen_range(0.0..=640.0),
                        rng.gen_range(1.0..8.0),
                    )
                })
                .collect();
            let mut reference = bodies.clone();

            let stats = bp.tick(&mut bodies);
            let ref_stats = BruteForce.tick(&mut reference);

            // anything the quadtree flags is a real contact
            for (b, r) in bodies.iter().zip(&reference) {
                if b.colliding {
                    assert!(r.colliding, "false positive for body {:?}", b.id);
                }
            }
            assert!(stats.colliding <= ref_stats.colliding);
            assert!(stats.candidate_tests < ref_stats.candidate_tests);
            assert_eq!(ref_stats.candidate_tests, 400 * 399);
            assert_eq!(bp.index().len(), 400);
        }
    }

    #[test]
    fn spawned_body_is_queryable_before_next_tick() {
        let mut bp = default_broad_phase();
        let mut bodies = vec![body(0, 50.0, 50.0, 4.0)];
        bp.tick(&mut bodies);

        let spawned = body(1, 52.0, 50.0, 4.0);
        bp.index_mut().insert(spawned);
        let candidates = bp.index().candidates(&spawned);
        assert_eq!(candidates.len(), 2);

        bodies.push(spawned);
        bp.tick(&mut bodies);
        assert_eq!(flags(&bodies), vec![true, true]);
        assert_eq!(bp.index().len(), 2);
    }

    #[test]
    fn broad_phases_are_interchangeable() {
        let mut phases: Vec<Box<dyn BroadPhase>> =
            vec![Box::new(default_broad_phase()), Box::new(BruteForce)];
        for bp in phases.iter_mut() {
            let mut bodies = vec![
                body(0, 100.0, 100.0, 5.0),
                body(1, 108.0, 100.0, 5.0),
                body(2, 400.0, 400.0, 5.0),
            ];
            let stats = bp.tick(&mut bodies);
            assert_eq!(flags(&bodies), vec![true, true, false]);
            assert_eq!(stats.bodies, 3);
            assert_eq!(stats.colliding, 2);
        }
    }
}
