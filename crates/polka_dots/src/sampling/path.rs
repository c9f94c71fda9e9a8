//! Even along-track resampling of polylines.
use tracing::warn;

use crate::geo::{distance_to, proportional_point, GeoPoint};
use crate::sampling::{is_valid_step, Generated, DEFAULT_MAX_POINTS};

/// Resamples an ordered point sequence at a fixed spacing along its length.
///
/// The output starts at the first input point; every following point lies
/// `segment_distance` metres further along the path than its predecessor.
/// A trailing remainder shorter than one step is dropped.
#[derive(Debug, Clone)]
pub struct PathResampler {
    /// Spacing between consecutive output points in metres.
    pub segment_distance: f64,
    /// Maximum number of points to emit.
    pub max_points: usize,
}

impl PathResampler {
    pub fn new(segment_distance: f64) -> Self {
        Self {
            segment_distance,
            max_points: DEFAULT_MAX_POINTS,
        }
    }

    pub fn with_max_points(mut self, max_points: usize) -> Self {
        self.max_points = max_points.max(1);
        self
    }

    pub fn resample(&self, path: &[GeoPoint]) -> Generated {
        let Some(first) = path.first() else {
            return Generated::default();
        };
        let mut out = vec![*first];

        if !is_valid_step(self.segment_distance) {
            warn!(
                "Segment distance {} is not a positive finite number; returning start point only.",
                self.segment_distance
            );
            return Generated::new(out);
        }

        // Distance travelled since the last emitted point, carried across segments.
        let mut completed_in_segment = 0.0;

        for pair in path.windows(2) {
            let end = pair[1];
            let mut start = pair[0];
            let mut distance_to_end = distance_to(start, end);

            while distance_to_end >= self.segment_distance - completed_in_segment {
                if out.len() >= self.max_points {
                    warn!(
                        "Path resampling stopped at {} points (step {} m).",
                        out.len(),
                        self.segment_distance
                    );
                    return Generated::truncated(out);
                }

                let needed = self.segment_distance - completed_in_segment;
                let point = proportional_point(start, end, needed / distance_to_end);
                out.push(point);

                start = point;
                distance_to_end = distance_to(point, end);
                completed_in_segment = 0.0;
            }

            completed_in_segment += distance_to_end;
        }

        Generated::new(out)
    }
}
