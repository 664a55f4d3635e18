//! End-to-end pipeline over a captured directory payload: decode raw
//! records → normalize → filter → project.

use radiomap_core::geo::{GeoPoint, DEFAULT_CENTER};
use radiomap_core::normalize::normalize_stations;
use radiomap_core::search::{filter_stations, first_match};
use radiomap_core::station::RawStation;
use radiomap_core::viewport::{
    project, project_markers, PopularityTier, Viewport, SEARCH_ZOOM,
};

/// Trimmed sample of a `/stations/search` response: the usual mix of full
/// records, geo-less records, half-empty junk, and one record with a field
/// of the wrong type entirely.
const DIRECTORY_PAYLOAD: &str = r#"[
  {
    "stationuuid": "9617a958-0601-11e8-ae97-52543be04c81",
    "name": "Radyo Bosphorus",
    "url": "http://old.bosphorus.example/listen",
    "url_resolved": "http://stream.bosphorus.example/listen.mp3",
    "country": "Turkey",
    "state": "Istanbul",
    "favicon": "",
    "tags": "pop,turkish pop",
    "language": "turkish",
    "votes": 210,
    "clickcount": 1500,
    "geo_lat": "41.01",
    "geo_long": 28.95
  },
  {
    "stationuuid": "b2f1c3d4-0601-11e8-ae97-52543be04c81",
    "name": "Funkhaus Nord",
    "url": "http://stream.funkhaus.example/live",
    "country": "Germany",
    "favicon": "http://funkhaus.example/logo.png",
    "tags": ["house", "techno"],
    "language": "german",
    "clickcount": 600,
    "geo_lat": null,
    "geo_long": null
  },
  {
    "stationuuid": "c3a9e5f6-0601-11e8-ae97-52543be04c81",
    "name": "Mystery Signal",
    "url": "http://mystery.example/stream",
    "clickcount": 50
  },
  {
    "stationuuid": "d4b0f607-0601-11e8-ae97-52543be04c81",
    "name": "",
    "url": "http://nameless.example/stream"
  },
  {
    "stationuuid": "e5c10718-0601-11e8-ae97-52543be04c81",
    "name": "Dead Air FM",
    "url": ""
  },
  {
    "name": "Broken Row",
    "url": "http://broken.example/stream",
    "votes": { "unexpected": true }
  }
]"#;

fn load_stations() -> Vec<radiomap_core::station::Station> {
    let values: Vec<serde_json::Value> = serde_json::from_str(DIRECTORY_PAYLOAD).unwrap();
    let raw: Vec<RawStation> = values
        .into_iter()
        .filter_map(|value| serde_json::from_value(value).ok())
        .collect();
    normalize_stations(raw)
}

#[test]
fn payload_survivors_are_exactly_the_displayable_records() {
    let stations = load_stations();
    let names: Vec<_> = stations.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Radyo Bosphorus", "Funkhaus Nord", "Mystery Signal"]);
}

#[test]
fn geo_resolution_covers_all_three_hint_levels() {
    let stations = load_stations();

    // explicit coordinates (one of them a numeric string)
    assert_eq!(stations[0].position, GeoPoint::new(41.01, 28.95));
    assert_eq!(stations[0].raw_latitude, Some(41.01));
    assert_eq!(stations[0].url, "http://stream.bosphorus.example/listen.mp3");

    // country centroid
    assert_eq!(stations[1].position, GeoPoint::new(51.0, 10.0));
    assert_eq!(stations[1].raw_latitude, None);

    // scatter near the default center
    let mystery = &stations[2];
    assert!((mystery.position.lat - DEFAULT_CENTER.lat).abs() <= 2.5);
    assert!((mystery.position.lon - DEFAULT_CENTER.lon).abs() <= 2.5);
}

#[test]
fn normalization_fills_favicon_and_tags() {
    let stations = load_stations();
    assert!(stations[0].favicon.contains("ui-avatars.com"));
    assert!(stations[0].favicon.contains("Radyo%20Bosphorus"));
    assert_eq!(stations[0].tags, vec!["pop", "turkish pop"]);
    assert_eq!(stations[1].favicon, "http://funkhaus.example/logo.png");
    assert_eq!(stations[1].tags, vec!["house", "techno"]);
}

#[test]
fn filtering_and_recentering_work_on_the_normalized_set() {
    let stations = load_stations();

    let hits = filter_stations(&stations, "turkey pop");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name, "Radyo Bosphorus");

    let hit = first_match(&stations, "istanbul").unwrap();
    let viewport = Viewport::recentered(hit.position, SEARCH_ZOOM);
    let origin = project(hit.position, &viewport);
    assert_eq!((origin.x, origin.y), (0.0, 0.0));
}

#[test]
fn markers_carry_projection_and_popularity() {
    let stations = load_stations();
    let filtered = filter_stations(&stations, "");
    let viewport = Viewport::default();
    let markers = project_markers(
        &filtered,
        &viewport,
        Some(stations[1].id.as_str()),
        None,
    );

    assert_eq!(markers.len(), 3);
    assert_eq!(markers[0].tier, PopularityTier::Hot);
    assert_eq!(markers[1].tier, PopularityTier::High);
    assert_eq!(markers[2].tier, PopularityTier::Low);
    assert!(markers[1].active);
    assert!(!markers[0].active);

    // Funkhaus sits on Germany's centroid; check the offset against the
    // overlay formula by hand: scale = 100 * 2^(4-1) = 800 px/deg.
    let funkhaus = &markers[1];
    assert!((funkhaus.offset.x - (10.0 - 10.0) * 800.0).abs() < 1e-9);
    assert!((funkhaus.offset.y - -(51.0 - 54.0) * 800.0).abs() < 1e-9);
}
