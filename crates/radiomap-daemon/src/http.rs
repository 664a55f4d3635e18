//! HTTP API for the external map front-end.
//!
//! Read endpoints snapshot the shared state; the single write endpoint
//! forwards a [`Command`] into the event loop. This layer never mutates
//! state itself.

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Serialize;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use radiomap_core::protocol::{Command, PlaybackStatus};
use radiomap_core::search::filter_stations;
use radiomap_core::state::{AppState, CatalogStatus, StateManager};
use radiomap_core::station::Station;
use radiomap_core::viewport::{project_markers, Marker, Viewport};

use crate::core::AppEvent;

/// Search dropdown length.
const SUGGESTION_CAP: usize = 5;

#[derive(Clone)]
struct HttpState {
    state_manager: StateManager,
    event_tx: mpsc::Sender<AppEvent>,
}

#[derive(Serialize)]
struct ApiState {
    rev: u64,
    catalog: &'static str,
    error: Option<String>,
    station_count: usize,
    viewport: Viewport,
    search_query: String,
    popular_countries: Vec<String>,
    current_station: Option<ApiStation>,
    selected_marker: Option<ApiStation>,
    playback: PlaybackStatus,
    is_playing: bool,
}

#[derive(Serialize)]
struct ApiStation {
    id: String,
    name: String,
    country: String,
    city: String,
    favicon: String,
    url: String,
}

impl ApiStation {
    fn from_station(station: &Station) -> Self {
        Self {
            id: station.id.clone(),
            name: station.name.clone(),
            country: station.country.clone(),
            city: station.city.clone(),
            favicon: station.favicon.clone(),
            url: station.url.clone(),
        }
    }
}

pub fn start_server(
    bind_address: String,
    port: u16,
    state_manager: StateManager,
    event_tx: mpsc::Sender<AppEvent>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let http_state = HttpState {
            state_manager,
            event_tx,
        };

        let app = Router::new()
            .route("/api/state", get(get_state))
            .route("/api/markers", get(get_markers))
            .route("/api/suggest", get(get_suggestions))
            .route("/api/command", post(post_command))
            .layer(CorsLayer::permissive())
            .with_state(http_state);

        let addr = format!("{}:{}", bind_address, port);
        let listener = match TcpListener::bind(&addr).await {
            Ok(l) => l,
            Err(e) => {
                error!("Failed to bind HTTP server to {}: {}", addr, e);
                return;
            }
        };

        info!("HTTP API server listening on http://{}", addr);

        if let Err(e) = axum::serve(listener, app).await {
            error!("HTTP server error: {}", e);
        }
    })
}

fn station_at(state: &AppState, idx: Option<usize>) -> Option<ApiStation> {
    idx.and_then(|i| state.stations.get(i))
        .map(ApiStation::from_station)
}

async fn get_state(State(http): State<HttpState>) -> Json<ApiState> {
    let state = http.state_manager.get_state().await;

    let (catalog, error) = match &state.catalog {
        CatalogStatus::Loading => ("loading", None),
        CatalogStatus::Ready => ("ready", None),
        CatalogStatus::Failed(message) => ("failed", Some(message.clone())),
    };

    Json(ApiState {
        rev: state.rev,
        catalog,
        error,
        station_count: state.stations.len(),
        viewport: state.viewport,
        search_query: state.search_query.clone(),
        popular_countries: state.popular_countries.clone(),
        current_station: station_at(&state, state.current_station),
        selected_marker: station_at(&state, state.selected_marker),
        playback: state.playback,
        is_playing: state.is_playing,
    })
}

/// The renderable subset for the current viewport: filtered by the active
/// query, projected to screen offsets, truncated at the marker cap.
async fn get_markers(State(http): State<HttpState>) -> Json<Vec<Marker>> {
    let state = http.state_manager.get_state().await;
    let filtered = filter_stations(&state.stations, &state.search_query);
    let current_id = state
        .current_station
        .and_then(|i| state.stations.get(i))
        .map(|s| s.id.clone());
    let selected_id = state
        .selected_marker
        .and_then(|i| state.stations.get(i))
        .map(|s| s.id.clone());

    Json(project_markers(
        &filtered,
        &state.viewport,
        current_id.as_deref(),
        selected_id.as_deref(),
    ))
}

/// Dropdown suggestions for the active query. Empty query, empty list.
async fn get_suggestions(State(http): State<HttpState>) -> Json<Vec<ApiStation>> {
    let state = http.state_manager.get_state().await;
    if state.search_query.trim().is_empty() {
        return Json(Vec::new());
    }
    let suggestions = filter_stations(&state.stations, &state.search_query)
        .into_iter()
        .take(SUGGESTION_CAP)
        .map(ApiStation::from_station)
        .collect();
    Json(suggestions)
}

async fn post_command(
    State(http): State<HttpState>,
    Json(cmd): Json<Command>,
) -> StatusCode {
    info!("HTTP API: command {:?}", cmd);
    if http.event_tx.send(AppEvent::Command(cmd)).await.is_err() {
        error!("Failed to forward command to the event loop");
        return StatusCode::INTERNAL_SERVER_ERROR;
    }
    StatusCode::ACCEPTED
}
