//! Point-in-polygon membership in latitude/longitude space.
use crate::geo::GeoPoint;

/// Even-odd ray casting against a horizontal ray pointing east.
///
/// The ring is implicitly closed. Horizontal edges are ignored and each edge
/// is half-open in latitude, so a ray through a shared vertex is counted once.
/// Rings with fewer than three vertices contain nothing.
pub fn point_in_polygon(point: &GeoPoint, ring: &[GeoPoint]) -> bool {
    if ring.len() < 3 {
        return false;
    }

    let p = point.to_dvec2();
    let mut crossings = 0usize;

    for (i, vertex) in ring.iter().enumerate() {
        let a = vertex.to_dvec2();
        let b = ring[(i + 1) % ring.len()].to_dvec2();

        if a.y == b.y {
            continue;
        }
        if (a.y > p.y) == (b.y > p.y) {
            continue;
        }

        let x = a.x + (b.x - a.x) * (p.y - a.y) / (b.y - a.y);
        if x > p.x {
            crossings += 1;
        }
    }

    crossings % 2 == 1
}
