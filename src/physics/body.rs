use crate::math as m;

/// Identity of a body.
///
/// Self-exclusion during collision testing compares ids by value,
/// so ids must be unique among the bodies of a tick.
/// Two bodies sharing an id never register contact with each other.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde-types", derive(serde::Serialize, serde::Deserialize))]
pub struct BodyId(pub u64);

/// A circular body tracked by the broad phase.
///
/// Positions are owned and moved by whoever drives the simulation.
/// The spatial index only reads them when it is rebuilt,
/// and the broad phase only writes the `colliding` flag.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde-types", derive(serde::Serialize, serde::Deserialize))]
pub struct Body {
    pub id: BodyId,
    /// Center of the circle in world space. Y grows downward.
    pub position: m::Vec2,
    pub radius: f64,
    /// Set by the last broad phase tick if any other body was found touching this one.
    pub colliding: bool,
}

impl Body {
    /// Create a body that is not colliding with anything.
    pub fn new(id: u64, position: m::Vec2, radius: f64) -> Self {
        Self {
            id: BodyId(id),
            position,
            radius,
            colliding: false,
        }
    }

    /// Set the position in a builder-like chain.
    #[inline]
    pub fn with_position(mut self, position: m::Vec2) -> Self {
        self.position = position;
        self
    }
}
