//! Geographic extents of map entities and their point approximations.
use crate::geo::{calculate_point, GeoBox, GeoPoint};

/// Angular spacing between consecutive vertices when tessellating arcs.
pub const ARC_STEP_DEGREES: f64 = 5.0;

/// Number of ring vertices used to approximate a circular area.
pub const CIRCLE_VERTICES: usize = 72;

/// Shapes that can expose an ordered sequence of points approximating their geometry.
pub trait Approximable {
    fn approximate_points(&self) -> Vec<GeoPoint>;
}

/// An open polyline.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LineLocation {
    pub points: Vec<GeoPoint>,
}

impl LineLocation {
    pub fn new(points: Vec<GeoPoint>) -> Self {
        Self { points }
    }
}

impl Approximable for LineLocation {
    fn approximate_points(&self) -> Vec<GeoPoint> {
        self.points.clone()
    }
}

/// An arrow drawn from its tail through intermediate points to its head.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArrowLocation {
    pub points: Vec<GeoPoint>,
}

impl ArrowLocation {
    pub fn new(points: Vec<GeoPoint>) -> Self {
        Self { points }
    }
}

impl Approximable for ArrowLocation {
    fn approximate_points(&self) -> Vec<GeoPoint> {
        self.points.clone()
    }
}

/// A circular arc around `center`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArcLocation {
    pub center: GeoPoint,
    /// Radius in metres.
    pub radius_m: f64,
    /// Bearing of the first arc point as seen from `center`.
    pub start_bearing_deg: f64,
    /// Angular extent; positive sweeps clockwise, negative counter-clockwise.
    pub sweep_deg: f64,
}

impl ArcLocation {
    pub fn new(center: GeoPoint, radius_m: f64, start_bearing_deg: f64, sweep_deg: f64) -> Self {
        Self {
            center,
            radius_m,
            start_bearing_deg,
            sweep_deg,
        }
    }
}

impl Approximable for ArcLocation {
    fn approximate_points(&self) -> Vec<GeoPoint> {
        // Anything beyond a full turn retraces the same circle.
        let sweep = if self.sweep_deg.is_nan() {
            0.0
        } else {
            self.sweep_deg.clamp(-360.0, 360.0)
        };
        let steps = ((sweep.abs() / ARC_STEP_DEGREES).ceil() as usize).max(1);
        (0..=steps)
            .map(|i| {
                let bearing = self.start_bearing_deg + sweep * i as f64 / steps as f64;
                calculate_point(self.center, bearing, self.radius_m)
            })
            .collect()
    }
}

/// A filled area.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AreaLocation {
    /// Polygon given by its ring; the last vertex connects back to the first.
    Polygon { ring: Vec<GeoPoint> },
    /// Disc of `radius_m` metres around `center`.
    Circle { center: GeoPoint, radius_m: f64 },
}

impl AreaLocation {
    pub fn polygon(ring: Vec<GeoPoint>) -> Self {
        AreaLocation::Polygon { ring }
    }

    pub fn circle(center: GeoPoint, radius_m: f64) -> Self {
        AreaLocation::Circle { center, radius_m }
    }

    /// Bounding box of the approximated ring.
    pub fn bounding_box(&self) -> Option<GeoBox> {
        match self {
            AreaLocation::Polygon { ring } => GeoBox::from_points(ring),
            AreaLocation::Circle { .. } => GeoBox::from_points(&self.approximate_ring()),
        }
    }

    /// Polygon ring approximating the area.
    pub fn approximate_ring(&self) -> Vec<GeoPoint> {
        match self {
            AreaLocation::Polygon { ring } => ring.clone(),
            AreaLocation::Circle { center, radius_m } => (0..CIRCLE_VERTICES)
                .map(|i| {
                    let bearing = 360.0 * i as f64 / CIRCLE_VERTICES as f64;
                    calculate_point(*center, bearing, *radius_m)
                })
                .collect(),
        }
    }
}

impl Approximable for AreaLocation {
    fn approximate_points(&self) -> Vec<GeoPoint> {
        self.approximate_ring()
    }
}

/// The geographic extent of a map entity.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Location {
    Point(GeoPoint),
    Line(LineLocation),
    Arc(ArcLocation),
    Arrow(ArrowLocation),
    Area(AreaLocation),
}

/// What point generation can do with a [`Location`].
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Ordered points of a line, arc or arrow.
    Path(Vec<GeoPoint>),
    /// Polygon ring together with its bounding box.
    Area { ring: Vec<GeoPoint>, bounds: GeoBox },
    /// Nothing to generate from.
    Unsupported,
}

impl Location {
    /// Resolve the generation capability of this extent.
    pub fn shape(&self) -> Shape {
        match self {
            Location::Line(line) => Shape::Path(line.approximate_points()),
            Location::Arc(arc) => Shape::Path(arc.approximate_points()),
            Location::Arrow(arrow) => Shape::Path(arrow.approximate_points()),
            Location::Area(area) => match area.bounding_box() {
                Some(bounds) => Shape::Area {
                    ring: area.approximate_ring(),
                    bounds,
                },
                None => Shape::Unsupported,
            },
            Location::Point(_) => Shape::Unsupported,
        }
    }

    /// Short label used in logs and events.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Location::Point(_) => "point",
            Location::Line(_) => "line",
            Location::Arc(_) => "arc",
            Location::Arrow(_) => "arrow",
            Location::Area(_) => "area",
        }
    }
}
