//! Geographic primitives on a spherical Earth.
//!
//! Coordinates are degrees (latitude north, longitude east), distances are
//! metres and bearings are degrees true (0 = north, 90 = east).
use std::f64::consts::PI;

use glam::DVec2;
use mint::Vector2;

pub mod location;

pub use location::{
    Approximable, AreaLocation, ArcLocation, ArrowLocation, LineLocation, Location, Shape,
};

/// Mean Earth radius in metres.
pub const EARTH_RADIUS_M: f64 = 6_371_008.8;

const DEG_TO_RAD: f64 = PI / 180.0;
const RAD_TO_DEG: f64 = 180.0 / PI;

/// Angular separations below this many radians are treated as coincident.
const COINCIDENT_EPSILON: f64 = 1e-15;

/// A geographic position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Great-circle distance to `other` in metres.
    #[inline]
    pub fn distance_to(&self, other: &GeoPoint) -> f64 {
        distance_to(*self, *other)
    }

    /// Planar view of the point with `x = lon` and `y = lat`.
    #[inline]
    pub fn to_dvec2(self) -> DVec2 {
        DVec2::new(self.lon, self.lat)
    }
}

impl From<GeoPoint> for Vector2<f64> {
    fn from(p: GeoPoint) -> Self {
        Vector2 { x: p.lon, y: p.lat }
    }
}

impl From<Vector2<f64>> for GeoPoint {
    fn from(v: Vector2<f64>) -> Self {
        GeoPoint::new(v.y, v.x)
    }
}

impl From<DVec2> for GeoPoint {
    fn from(v: DVec2) -> Self {
        GeoPoint::new(v.y, v.x)
    }
}

/// Axis-aligned box in latitude/longitude space.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoBox {
    pub bottom_left: GeoPoint,
    pub top_right: GeoPoint,
}

impl GeoBox {
    /// Create a box from two opposite corners; swapped corners are normalized.
    pub fn new(a: GeoPoint, b: GeoPoint) -> Self {
        Self {
            bottom_left: GeoPoint::new(a.lat.min(b.lat), a.lon.min(b.lon)),
            top_right: GeoPoint::new(a.lat.max(b.lat), a.lon.max(b.lon)),
        }
    }

    /// Smallest box containing all `points`, or `None` when there are none.
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a GeoPoint>,
    {
        let mut iter = points.into_iter();
        let first = *iter.next()?;
        let (min, max) = iter.fold((first, first), |(min, max), p| {
            (
                GeoPoint::new(min.lat.min(p.lat), min.lon.min(p.lon)),
                GeoPoint::new(max.lat.max(p.lat), max.lon.max(p.lon)),
            )
        });
        Some(Self {
            bottom_left: min,
            top_right: max,
        })
    }
}

/// Great-circle distance between `a` and `b` in metres (haversine).
pub fn distance_to(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat1 = a.lat * DEG_TO_RAD;
    let lat2 = b.lat * DEG_TO_RAD;
    let dlat = (b.lat - a.lat) * DEG_TO_RAD;
    let dlon = (b.lon - a.lon) * DEG_TO_RAD;

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().min(1.0).asin();
    EARTH_RADIUS_M * c
}

/// Destination reached from `origin` after `distance_m` metres on `bearing_deg`.
///
/// The resulting longitude is normalized to `[-180, 180]`.
pub fn calculate_point(origin: GeoPoint, bearing_deg: f64, distance_m: f64) -> GeoPoint {
    let lat1 = origin.lat * DEG_TO_RAD;
    let lon1 = origin.lon * DEG_TO_RAD;
    let bearing = bearing_deg * DEG_TO_RAD;
    let angular = distance_m / EARTH_RADIUS_M;

    let (sin_lat1, cos_lat1) = lat1.sin_cos();
    let (sin_d, cos_d) = angular.sin_cos();

    let lat2 = (sin_lat1 * cos_d + cos_lat1 * sin_d * bearing.cos())
        .clamp(-1.0, 1.0)
        .asin();
    let lon2 = lon1 + (bearing.sin() * sin_d * cos_lat1).atan2(cos_d - sin_lat1 * lat2.sin());

    GeoPoint::new(lat2 * RAD_TO_DEG, normalize_lon(lon2 * RAD_TO_DEG))
}

/// Point at `fraction` of the way from `a` to `b` along the great circle.
///
/// Fractions at or below 0 return `a` and at or above 1 return `b` exactly.
pub fn proportional_point(a: GeoPoint, b: GeoPoint, fraction: f64) -> GeoPoint {
    if fraction <= 0.0 {
        return a;
    }
    if fraction >= 1.0 {
        return b;
    }

    let delta = distance_to(a, b) / EARTH_RADIUS_M;
    if delta < COINCIDENT_EPSILON {
        return a;
    }

    let lat1 = a.lat * DEG_TO_RAD;
    let lon1 = a.lon * DEG_TO_RAD;
    let lat2 = b.lat * DEG_TO_RAD;
    let lon2 = b.lon * DEG_TO_RAD;

    let sin_delta = delta.sin();
    let wa = ((1.0 - fraction) * delta).sin() / sin_delta;
    let wb = (fraction * delta).sin() / sin_delta;

    let x = wa * lat1.cos() * lon1.cos() + wb * lat2.cos() * lon2.cos();
    let y = wa * lat1.cos() * lon1.sin() + wb * lat2.cos() * lon2.sin();
    let z = wa * lat1.sin() + wb * lat2.sin();

    let lat = z.atan2((x * x + y * y).sqrt());
    let lon = y.atan2(x);
    GeoPoint::new(lat * RAD_TO_DEG, lon * RAD_TO_DEG)
}

#[inline]
fn normalize_lon(lon: f64) -> f64 {
    if lon > 180.0 {
        lon - 360.0
    } else if lon < -180.0 {
        lon + 360.0
    } else {
        lon
    }
}
