//! Commands accepted by the daemon and the playback status it reports.

use serde::{Deserialize, Serialize};

/// Messages from any client surface (HTTP API, tests) into the app core.
/// Carried as JSON; the `cmd` tag names the variant.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "cmd")]
pub enum Command {
    /// Play the station at this index in the current collection; selecting
    /// the already-current station toggles pause instead.
    Play { idx: usize },
    TogglePause,
    Stop,
    /// Set the free-text query. Non-empty queries recenter the map on the
    /// first city/country hit; an empty query restores the default view.
    Search { query: String },
    ClearSearch,
    /// Open a marker popup; selecting the open one again closes it.
    SelectMarker { idx: usize },
    /// Popular-country shortcut: sets the query and jumps to the centroid.
    Country { name: String },
    /// Direct user pan/zoom from the map provider. Always wins.
    SetViewport { lat: f64, lon: f64, zoom: f64 },
    /// Header action: clear search, stop playback, restore default view.
    Reset,
    /// Manual catalog re-fetch — the only retry path after a fetch failure.
    Refresh,
    Shutdown,
}

/// Observable playback state. There is no distinct buffering state — the
/// transport reports readiness implicitly by not erroring.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum PlaybackStatus {
    /// Nothing requested, or the stream ran out.
    #[default]
    Idle,
    Playing,
    Paused,
    /// The transport failed; the selection is kept so the user can retry.
    Error,
}

impl PlaybackStatus {
    pub fn is_playing(self) -> bool {
        self == PlaybackStatus::Playing
    }
}
