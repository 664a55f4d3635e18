//! Shared application state.
//!
//! One [`AppState`] snapshot, owned by a [`StateManager`] behind an
//! `RwLock`. The daemon's event loop is the only writer; the HTTP layer
//! takes read snapshots. `rev` increments on every mutation so clients can
//! detect staleness.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::protocol::PlaybackStatus;
use crate::station::Station;
use crate::viewport::Viewport;

/// Lifecycle of the station catalog. A failed fetch is the single global
/// error state; everything else degrades locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub enum CatalogStatus {
    #[default]
    Loading,
    Ready,
    Failed(String),
}

/// Full state of the application.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Monotonic revision counter — incremented on every state change.
    pub rev: u64,
    pub catalog: CatalogStatus,
    pub stations: Vec<Station>,
    /// Country names for the UI shortcut row, most stations first.
    pub popular_countries: Vec<String>,
    pub search_query: String,
    pub viewport: Viewport,
    /// Index of the station whose stream is loaded, if any.
    pub current_station: Option<usize>,
    /// Index of the marker open for inspection (independent of playback).
    pub selected_marker: Option<usize>,
    pub playback: PlaybackStatus,
    pub is_playing: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            rev: 1,
            catalog: CatalogStatus::Loading,
            stations: Vec::new(),
            popular_countries: Vec::new(),
            search_query: String::new(),
            viewport: Viewport::default(),
            current_station: None,
            selected_marker: None,
            playback: PlaybackStatus::Idle,
            is_playing: false,
        }
    }
}

/// Owner of the shared state. Cheap to clone; all clones point at the same
/// snapshot.
#[derive(Clone, Default)]
pub struct StateManager {
    state: Arc<RwLock<AppState>>,
}

impl StateManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get_state(&self) -> AppState {
        self.state.read().await.clone()
    }

    /// Replace the catalog wholesale. Index-based selection does not
    /// survive a replacement, so selection and playback flags reset too.
    pub async fn set_catalog(&self, stations: Vec<Station>) {
        let mut state = self.state.write().await;
        state.stations = stations;
        state.catalog = CatalogStatus::Ready;
        state.current_station = None;
        state.selected_marker = None;
        state.playback = PlaybackStatus::Idle;
        state.is_playing = false;
        state.rev += 1;
    }

    pub async fn set_catalog_failed(&self, message: String) {
        let mut state = self.state.write().await;
        state.catalog = CatalogStatus::Failed(message);
        state.rev += 1;
    }

    pub async fn set_catalog_loading(&self) {
        let mut state = self.state.write().await;
        state.catalog = CatalogStatus::Loading;
        state.rev += 1;
    }

    pub async fn set_popular_countries(&self, names: Vec<String>) {
        let mut state = self.state.write().await;
        state.popular_countries = names;
        state.rev += 1;
    }

    pub async fn set_search_query(&self, query: String) {
        let mut state = self.state.write().await;
        state.search_query = query;
        state.rev += 1;
    }

    pub async fn set_viewport(&self, viewport: Viewport) {
        let mut state = self.state.write().await;
        state.viewport = viewport;
        state.rev += 1;
    }

    pub async fn set_playing(&self, idx: usize) {
        let mut state = self.state.write().await;
        state.current_station = Some(idx);
        state.playback = PlaybackStatus::Playing;
        state.is_playing = true;
        state.rev += 1;
    }

    /// A selection whose playback request was refused: the station becomes
    /// current so the UI can offer retry, but nothing is playing.
    pub async fn set_playback_failed(&self, idx: usize) {
        let mut state = self.state.write().await;
        state.current_station = Some(idx);
        state.playback = PlaybackStatus::Error;
        state.is_playing = false;
        state.rev += 1;
    }

    /// Status change for the current selection; the selection itself stays.
    pub async fn set_playback_status(&self, status: PlaybackStatus) {
        let mut state = self.state.write().await;
        state.playback = status;
        state.is_playing = status.is_playing();
        state.rev += 1;
    }

    pub async fn set_selected_marker(&self, marker: Option<usize>) {
        let mut state = self.state.write().await;
        state.selected_marker = marker;
        state.rev += 1;
    }

    pub async fn clear_playback(&self) {
        let mut state = self.state.write().await;
        state.current_station = None;
        state.playback = PlaybackStatus::Idle;
        state.is_playing = false;
        state.rev += 1;
    }
}
