//! Map viewport state and the overlay projection.
//!
//! The projection is a deliberate approximation: one linear pixels-per-degree
//! factor for both axes, with no latitude correction. The map front-end pans
//! its overlay with exactly this math, so "correcting" it here would desync
//! markers from the tile layer. Keep it bug-compatible.

use serde::{Deserialize, Serialize};

use crate::geo::{GeoPoint, DEFAULT_CENTER};
use crate::station::Station;

/// Default zoom — continent level, the initial map view.
pub const DEFAULT_ZOOM: f64 = 4.0;
/// Zoom applied when a station is selected for playback.
pub const STATION_ZOOM: f64 = 5.0;
/// Zoom applied when a search query matches a station.
pub const SEARCH_ZOOM: f64 = 6.0;
/// Zoom applied when jumping to a country shortcut.
pub const COUNTRY_ZOOM: f64 = 4.0;

/// Upper bound on markers projected per pass. Keeps per-frame overlay cost
/// bounded on large catalogs; a resource policy, not a correctness rule.
pub const MARKER_CAP: usize = 500;

/// The map's current center and zoom. Mutated by user pan/zoom and by
/// programmatic recenters (playback selection, search hits, country
/// shortcuts, reset); user input always overwrites unconditionally.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub center: GeoPoint,
    pub zoom: f64,
}

impl Viewport {
    pub fn recentered(center: GeoPoint, zoom: f64) -> Self {
        Self { center, zoom }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
        }
    }
}

/// Screen offset in pixels relative to the viewport's center anchor.
/// x grows rightward, y grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenOffset {
    pub x: f64,
    pub y: f64,
}

/// Pixels per degree at a zoom level: `100 * 2^(zoom - 1)`.
pub fn pixels_per_degree(zoom: f64) -> f64 {
    100.0 * (zoom - 1.0).exp2()
}

/// Project a position into the viewport's screen space.
pub fn project(position: GeoPoint, viewport: &Viewport) -> ScreenOffset {
    let scale = pixels_per_degree(viewport.zoom);
    ScreenOffset {
        x: (position.lon - viewport.center.lon) * scale,
        y: -(position.lat - viewport.center.lat) * scale,
    }
}

/// Marker emphasis bucket derived from the directory's click counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PopularityTier {
    Hot,
    High,
    Mid,
    Low,
}

impl PopularityTier {
    pub fn from_clicks(clicks: u64) -> Self {
        if clicks > 1000 {
            PopularityTier::Hot
        } else if clicks > 500 {
            PopularityTier::High
        } else if clicks > 100 {
            PopularityTier::Mid
        } else {
            PopularityTier::Low
        }
    }
}

/// One projected overlay marker, ready for the front-end to absolutely
/// position relative to the map's center anchor.
#[derive(Debug, Clone, Serialize)]
pub struct Marker {
    pub id: String,
    pub name: String,
    pub offset: ScreenOffset,
    pub tier: PopularityTier,
    /// Currently playing station.
    pub active: bool,
    /// Marker opened for inspection (independent of playback).
    pub selected: bool,
}

/// Project the renderable subset: input order, truncated at [`MARKER_CAP`].
pub fn project_markers(
    stations: &[&Station],
    viewport: &Viewport,
    current_id: Option<&str>,
    selected_id: Option<&str>,
) -> Vec<Marker> {
    stations
        .iter()
        .take(MARKER_CAP)
        .map(|station| Marker {
            id: station.id.clone(),
            name: station.name.clone(),
            offset: project(station.position, viewport),
            tier: PopularityTier::from_clicks(station.click_count),
            active: current_id == Some(station.id.as_str()),
            selected: selected_id == Some(station.id.as_str()),
        })
        .collect()
}
