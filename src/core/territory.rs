use geo::{Contains, Coord, LineString, Point, Polygon};

use crate::models::GeoVertex;

/// Whether a drawn territory contains a point.
///
/// The ring is the vertex list as drawn on the dashboard map, in (lng, lat)
/// order, not necessarily closed. Degenerate rings (fewer than 3 vertices)
/// contain nothing.
pub fn territory_contains(ring: &[GeoVertex], lng: f64, lat: f64) -> bool {
    if ring.len() < 3 {
        return false;
    }

    let exterior: LineString<f64> = ring
        .iter()
        .map(|v| Coord { x: v.lng, y: v.lat })
        .collect();

    // Polygon::new closes an open ring.
    let polygon = Polygon::new(exterior, vec![]);
    polygon.contains(&Point::new(lng, lat))
}
