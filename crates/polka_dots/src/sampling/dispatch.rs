//! Routes a geographic extent to the matching sampler.
use tracing::debug;

use crate::geo::{Location, Shape};
use crate::sampling::{Generated, LatticeSampler, PathResampler, DEFAULT_MAX_POINTS};

/// Generates points for any [`Location`] with one spacing.
#[derive(Debug, Clone)]
pub struct ShapeSampler {
    /// Spacing in metres, used along paths and between lattice rows and columns.
    pub step: f64,
    /// Maximum number of points per location.
    pub max_points: usize,
}

impl ShapeSampler {
    pub fn new(step: f64) -> Self {
        Self {
            step,
            max_points: DEFAULT_MAX_POINTS,
        }
    }

    pub fn with_max_points(mut self, max_points: usize) -> Self {
        self.max_points = max_points.max(1);
        self
    }

    /// Areas are rasterized, lines/arcs/arrows resampled, anything else yields nothing.
    pub fn generate(&self, location: &Location) -> Generated {
        match location.shape() {
            Shape::Area { ring, bounds } => LatticeSampler::new(self.step)
                .with_max_points(self.max_points)
                .generate(&ring, &bounds),
            Shape::Path(points) => PathResampler::new(self.step)
                .with_max_points(self.max_points)
                .resample(&points),
            Shape::Unsupported => {
                debug!("No point generation for {} locations.", location.kind_name());
                Generated::default()
            }
        }
    }
}

/// Shorthand for [`ShapeSampler::generate`] with the default point cap.
pub fn points_for_location(location: &Location, step: f64) -> Generated {
    ShapeSampler::new(step).generate(location)
}
