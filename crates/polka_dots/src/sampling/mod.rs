//! Point generation over geographic extents.
//!
//! Paths (lines, arcs, arrows) are resampled at a fixed along-track spacing by
//! [`PathResampler`]; areas are covered by a geodesic lattice clipped to their
//! ring by [`LatticeSampler`]. [`ShapeSampler`] picks the right one for a
//! [`crate::geo::Location`].
use crate::geo::GeoPoint;

pub mod dispatch;
pub mod lattice;
pub mod path;
pub mod polygon;

pub use dispatch::{points_for_location, ShapeSampler};
pub use lattice::LatticeSampler;
pub use path::PathResampler;
pub use polygon::point_in_polygon;

/// Upper bound on points produced by a single generation pass.
pub const DEFAULT_MAX_POINTS: usize = 100_000;

/// Points produced by a sampler.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Generated {
    /// Generated points in generation order.
    pub points: Vec<GeoPoint>,
    /// Set when generation stopped at a point or iteration cap.
    pub truncated: bool,
}

impl Generated {
    pub fn new(points: Vec<GeoPoint>) -> Self {
        Self {
            points,
            truncated: false,
        }
    }

    pub fn truncated(points: Vec<GeoPoint>) -> Self {
        Self {
            points,
            truncated: true,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }
}

/// Whether `step` is usable as a spacing in metres.
#[inline]
pub fn is_valid_step(step: f64) -> bool {
    step.is_finite() && step > 0.0
}
