#![allow(dead_code)]

use std::time::Duration;

use criterion::{Criterion, Throughput};
use polka_dots::geo::GeoPoint;

pub const SAMPLE_SIZE: usize = 20;
pub const WARM_UP: Duration = Duration::from_secs(1);
pub const MEASUREMENT_TIME: Duration = Duration::from_secs(2);

pub fn default_criterion() -> Criterion {
    Criterion::default()
        .configure_from_args()
        .sample_size(SAMPLE_SIZE)
        .warm_up_time(WARM_UP)
        .measurement_time(MEASUREMENT_TIME)
}

pub fn elements_throughput(elements: usize) -> Throughput {
    Throughput::Elements(elements.max(1) as u64)
}

/// Axis-aligned square ring of `side_deg` degrees anchored near Frankfurt.
pub fn square_ring(side_deg: f64) -> Vec<GeoPoint> {
    let (lat, lon) = (50.0, 8.5);
    vec![
        GeoPoint::new(lat, lon),
        GeoPoint::new(lat + side_deg, lon),
        GeoPoint::new(lat + side_deg, lon + side_deg),
        GeoPoint::new(lat, lon + side_deg),
    ]
}

/// Zig-zag path with `vertices` corners, each leg about 1.1 km long.
pub fn zigzag_path(vertices: usize) -> Vec<GeoPoint> {
    (0..vertices)
        .map(|i| {
            let lat = 50.0 + if i % 2 == 0 { 0.0 } else { 0.01 };
            GeoPoint::new(lat, 8.5 + i as f64 * 0.005)
        })
        .collect()
}
