//! Geodesic lattice sampling clipped to a polygon.
use tracing::{debug, warn};

use crate::geo::{calculate_point, GeoBox, GeoPoint};
use crate::sampling::polygon::point_in_polygon;
use crate::sampling::{is_valid_step, Generated, DEFAULT_MAX_POINTS};

/// Hard cap on rows and on columns per row.
pub const MAX_LATTICE_ITERATIONS: usize = 1_000_000;

/// Default cap on lattice cells tested against the ring, inside or not.
pub const MAX_LATTICE_CELLS: usize = 4_000_000;

const BEARING_NORTH: f64 = 0.0;
const BEARING_EAST: f64 = 90.0;

/// Lattice sampler producing points spaced `step` metres apart inside a polygon.
///
/// Rows start at the bounding box's bottom-left corner and move north; each
/// row marches east. Both offsets are geodesic, so spacing is uniform in
/// metres rather than in degrees.
#[derive(Debug, Clone)]
pub struct LatticeSampler {
    /// Row and column spacing in metres.
    pub step: f64,
    /// Maximum number of points to emit.
    pub max_points: usize,
    /// Maximum number of cells visited; bounds work for thin rings with tiny steps.
    pub max_cells: usize,
}

impl LatticeSampler {
    pub fn new(step: f64) -> Self {
        Self {
            step,
            max_points: DEFAULT_MAX_POINTS,
            max_cells: MAX_LATTICE_CELLS,
        }
    }

    pub fn with_max_points(mut self, max_points: usize) -> Self {
        self.max_points = max_points.max(1);
        self
    }

    pub fn with_max_cells(mut self, max_cells: usize) -> Self {
        self.max_cells = max_cells.max(1);
        self
    }

    pub fn generate(&self, ring: &[GeoPoint], bounds: &GeoBox) -> Generated {
        if ring.len() < 3 {
            return Generated::default();
        }
        if !is_valid_step(self.step) {
            warn!(
                "Lattice step {} is not a positive finite number; skipping.",
                self.step
            );
            return Generated::default();
        }

        let top_right = bounds.top_right;
        let mut points = Vec::new();
        let mut row_start = bounds.bottom_left;
        let mut rows = 0usize;
        let mut cells = 0usize;

        while row_start.lat <= top_right.lat {
            if rows >= MAX_LATTICE_ITERATIONS {
                warn!("Lattice row cap reached after {rows} rows.");
                return Generated::truncated(points);
            }

            let mut cursor = row_start;
            let mut columns = 0usize;
            while cursor.lon <= top_right.lon {
                if columns >= MAX_LATTICE_ITERATIONS {
                    warn!("Lattice column cap reached in row {rows}.");
                    return Generated::truncated(points);
                }
                if cells >= self.max_cells {
                    warn!(
                        "Lattice scan stopped after {cells} cells with {} points (step {} m).",
                        points.len(),
                        self.step
                    );
                    return Generated::truncated(points);
                }
                cells += 1;

                if point_in_polygon(&cursor, ring) {
                    if points.len() >= self.max_points {
                        warn!(
                            "Lattice sampling stopped at {} points (step {} m).",
                            points.len(),
                            self.step
                        );
                        return Generated::truncated(points);
                    }
                    points.push(cursor);
                }

                let next = calculate_point(cursor, BEARING_EAST, self.step);
                // Wrapped across the antimeridian or too small to register.
                if next.lon <= cursor.lon {
                    debug!("Row {rows} stopped advancing east at lon {}.", cursor.lon);
                    break;
                }
                cursor = next;
                columns += 1;
            }

            let next_row = calculate_point(row_start, BEARING_NORTH, self.step);
            // Passed over the pole or too small to register.
            if next_row.lat <= row_start.lat {
                debug!("Lattice stopped advancing north at lat {}.", row_start.lat);
                break;
            }
            row_start = next_row;
            rows += 1;
        }

        Generated::new(points)
    }
}
