//! Best-effort geo resolution.
//!
//! Every station that survives normalization gets a map position, derived
//! from the best available hint: explicit coordinates, then the country
//! centroid table, then a seeded scatter around the default map center.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Default map center (roughly central Europe).
pub const DEFAULT_CENTER: GeoPoint = GeoPoint::new(54.0, 10.0);

/// Maximum offset applied to stations with no usable location data.
const SCATTER_DEGREES: f64 = 2.5;

/// Representative coordinates per country, for stations that report a
/// country but no coordinates. Approximate by design — these only have to
/// land markers inside the right country.
const COUNTRY_CENTROIDS: &[(&str, GeoPoint)] = &[
    ("turkey", GeoPoint::new(39.0, 35.0)),
    ("united states", GeoPoint::new(37.0, -95.0)),
    ("united kingdom", GeoPoint::new(54.0, -2.0)),
    ("germany", GeoPoint::new(51.0, 10.0)),
    ("france", GeoPoint::new(46.0, 2.0)),
    ("italy", GeoPoint::new(42.0, 12.0)),
    ("spain", GeoPoint::new(40.0, -4.0)),
    ("russia", GeoPoint::new(60.0, 100.0)),
    ("china", GeoPoint::new(35.0, 105.0)),
    ("japan", GeoPoint::new(36.0, 138.0)),
    ("india", GeoPoint::new(20.0, 77.0)),
    ("brazil", GeoPoint::new(-10.0, -55.0)),
    ("canada", GeoPoint::new(60.0, -95.0)),
    ("australia", GeoPoint::new(-25.0, 135.0)),
    ("netherlands", GeoPoint::new(52.1326, 5.2913)),
    ("sweden", GeoPoint::new(62.0, 15.0)),
    ("norway", GeoPoint::new(62.0, 10.0)),
    ("finland", GeoPoint::new(64.0, 26.0)),
    ("poland", GeoPoint::new(52.0, 20.0)),
    ("mexico", GeoPoint::new(23.0, -102.0)),
    ("argentina", GeoPoint::new(-34.0, -64.0)),
    ("austria", GeoPoint::new(47.5162, 14.5501)),
    ("belgium", GeoPoint::new(50.8333, 4.0)),
    ("greece", GeoPoint::new(39.0, 22.0)),
    ("switzerland", GeoPoint::new(47.0, 8.0)),
    ("portugal", GeoPoint::new(39.5, -8.0)),
    ("denmark", GeoPoint::new(56.0, 10.0)),
    ("ireland", GeoPoint::new(53.0, -8.0)),
    ("new zealand", GeoPoint::new(-40.9006, 174.886)),
];

/// Centroid lookup by country name, case-insensitive exact match.
pub fn country_centroid(country: &str) -> Option<GeoPoint> {
    let needle = country.to_lowercase();
    COUNTRY_CENTROIDS
        .iter()
        .find(|(name, _)| *name == needle)
        .map(|(_, point)| *point)
}

/// Resolve a map position from whatever hints a record carries.
///
/// Total — never fails. Resolution order, first match wins:
/// 1. both coordinates present and finite → used verbatim;
/// 2. country found in the centroid table → that centroid;
/// 3. otherwise a deterministic scatter near [`DEFAULT_CENTER`].
pub fn resolve_position(
    seed_key: &str,
    country: &str,
    lat: Option<f64>,
    lon: Option<f64>,
) -> GeoPoint {
    if let (Some(lat), Some(lon)) = (lat, lon) {
        if lat.is_finite() && lon.is_finite() {
            return GeoPoint::new(lat, lon);
        }
    }
    if let Some(centroid) = country_centroid(country) {
        return centroid;
    }
    scatter_near_default(seed_key)
}

/// Stand-in position for stations with no location data: one offset in
/// ±[`SCATTER_DEGREES`], applied to both axes of the default center so the
/// markers spread out instead of stacking on a single point. Seeded on the
/// station id — the same station lands on the same spot across fetches.
/// Makes no claim of accuracy.
fn scatter_near_default(seed_key: &str) -> GeoPoint {
    let mut hasher = DefaultHasher::new();
    seed_key.hash(&mut hasher);
    let mut rng = StdRng::seed_from_u64(hasher.finish());
    let offset = rng.gen_range(-SCATTER_DEGREES..=SCATTER_DEGREES);
    GeoPoint::new(DEFAULT_CENTER.lat + offset, DEFAULT_CENTER.lon + offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_coordinates_win_over_country() {
        let p = resolve_position("id-1", "Germany", Some(48.1), Some(11.6));
        assert_eq!(p, GeoPoint::new(48.1, 11.6));
    }

    #[test]
    fn country_lookup_is_case_insensitive() {
        let p = resolve_position("id-2", "GERMANY", None, None);
        assert_eq!(p, GeoPoint::new(51.0, 10.0));
        let q = resolve_position("id-2", "germany", None, None);
        assert_eq!(p, q);
    }

    #[test]
    fn single_coordinate_falls_through_to_country() {
        let p = resolve_position("id-3", "France", Some(48.8), None);
        assert_eq!(p, GeoPoint::new(46.0, 2.0));
    }

    #[test]
    fn non_finite_coordinates_fall_through() {
        let p = resolve_position("id-4", "Japan", Some(f64::NAN), Some(139.7));
        assert_eq!(p, GeoPoint::new(36.0, 138.0));
    }

    #[test]
    fn unknown_country_scatters_near_default_center() {
        let p = resolve_position("id-5", "Atlantis", None, None);
        assert!((p.lat - DEFAULT_CENTER.lat).abs() <= SCATTER_DEGREES);
        assert!((p.lon - DEFAULT_CENTER.lon).abs() <= SCATTER_DEGREES);
        // same offset on both axes
        assert!(((p.lat - DEFAULT_CENTER.lat) - (p.lon - DEFAULT_CENTER.lon)).abs() < 1e-9);
    }

    #[test]
    fn no_hints_at_all_still_resolves() {
        let p = resolve_position("id-6", "", None, None);
        assert!((p.lat - DEFAULT_CENTER.lat).abs() <= SCATTER_DEGREES);
    }

    #[test]
    fn scatter_is_stable_per_key_and_spreads_distinct_keys() {
        let a1 = resolve_position("station-a", "", None, None);
        let a2 = resolve_position("station-a", "", None, None);
        assert_eq!(a1, a2);
        let b = resolve_position("station-b", "", None, None);
        assert_ne!(a1, b);
    }
}
