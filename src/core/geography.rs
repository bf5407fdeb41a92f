use crate::core::territory::territory_contains;
use crate::models::{Bid, GeoTier, Pro, ScoringPoints};

/// Tiered geographic match between a pro's coverage arrays and a bid's target
/// arrays. Tiers are tried in descending precision and the first hit wins:
/// zip, drawn territory, neighborhood, city+state, city, state.
///
/// Both sides hold tokens normalized at ingest (5-digit zips, uppercase state
/// codes, lowercase cities/neighborhoods), so comparison is plain equality.
pub fn geographic_match(pro: &Pro, bid: &Bid, points: &ScoringPoints) -> (i32, GeoTier) {
    if slices_overlap(&pro.zips, &bid.zips) {
        return (points.zip, GeoTier::Zip);
    }

    if let (Some(ring), Some((lng, lat))) = (bid.territory_ring(), pro.coordinates()) {
        if territory_contains(ring, lng, lat) {
            return (points.territory, GeoTier::Territory);
        }
    }

    if slices_overlap(&pro.neighborhoods, &bid.neighborhoods) {
        return (points.neighborhood, GeoTier::Neighborhood);
    }

    if slices_overlap(&pro.cities, &bid.cities) && slices_overlap(&pro.states, &bid.states) {
        return (points.city_state, GeoTier::CityState);
    }

    if slices_overlap(&pro.cities, &bid.cities) {
        return (points.city, GeoTier::City);
    }

    if slices_overlap(&pro.states, &bid.states) {
        return (points.state, GeoTier::State);
    }

    (0, GeoTier::None)
}

/// Whether any token appears in both lists. Empty lists never overlap.
#[inline]
fn slices_overlap(a: &[String], b: &[String]) -> bool {
    a.iter().any(|item| b.contains(item))
}
