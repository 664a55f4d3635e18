//! AppCore — single-owner event loop for all mutable state.
//!
//! Every external input (HTTP commands, transport events, fetch results)
//! funnels into this loop as an [`AppEvent`]. AppCore owns the
//! [`StateManager`] writes and the transport exclusively; no other task
//! mutates either. Fetches run on spawned tasks and report back through the
//! same channel, so ordering is the channel's ordering.

use tokio::sync::mpsc;
use tracing::{error, info, warn};

use radiomap_core::config::Config;
use radiomap_core::geo;
use radiomap_core::protocol::{Command, PlaybackStatus};
use radiomap_core::search;
use radiomap_core::state::StateManager;
use radiomap_core::station::Station;
use radiomap_core::viewport::{Viewport, COUNTRY_ZOOM, SEARCH_ZOOM, STATION_ZOOM};

use crate::directory::{DirectoryClient, DirectoryError};
use crate::player::{Transport, TransportEvent};

/// All inputs into the AppCore loop.
#[derive(Debug)]
pub enum AppEvent {
    /// A command from the HTTP API.
    Command(Command),
    /// Unsolicited transport notification.
    Transport(TransportEvent),
    /// Result of a station catalog fetch.
    CatalogFetched(Result<Vec<Station>, DirectoryError>),
    /// Result of the popular-countries fetch.
    CountriesFetched(Result<Vec<String>, DirectoryError>),
}

pub struct AppCore<T: Transport> {
    state: StateManager,
    directory: DirectoryClient,
    transport: T,
    /// Cloned into fetch tasks so results come back through the loop.
    event_tx: mpsc::Sender<AppEvent>,
    /// The view restored by Reset / a cleared search.
    home_viewport: Viewport,
}

impl<T: Transport> AppCore<T> {
    pub fn new(
        config: &Config,
        state: StateManager,
        directory: DirectoryClient,
        transport: T,
        event_tx: mpsc::Sender<AppEvent>,
    ) -> Self {
        Self {
            state,
            directory,
            transport,
            event_tx,
            home_viewport: Viewport::recentered(
                config.map.default_center,
                config.map.default_zoom,
            ),
        }
    }

    pub fn state_manager(&self) -> StateManager {
        self.state.clone()
    }

    /// Run the event loop. Returns on `Shutdown` or when every sender is
    /// gone.
    pub async fn run(mut self, mut event_rx: mpsc::Receiver<AppEvent>) -> anyhow::Result<()> {
        info!("AppCore: starting event loop");
        self.state.set_viewport(self.home_viewport).await;
        self.spawn_catalog_fetch();
        self.spawn_countries_fetch();

        loop {
            match event_rx.recv().await {
                None => {
                    info!("AppCore: event channel closed, shutting down");
                    break;
                }
                Some(AppEvent::Command(Command::Shutdown)) => {
                    info!("AppCore: shutdown requested");
                    break;
                }
                Some(AppEvent::Command(cmd)) => {
                    info!("AppCore: command {:?}", cmd);
                    if let Err(e) = self.handle_command(cmd).await {
                        error!("AppCore: command error: {e}");
                    }
                }
                Some(AppEvent::Transport(event)) => {
                    self.handle_transport_event(event).await;
                }
                Some(AppEvent::CatalogFetched(result)) => {
                    self.handle_catalog_fetched(result).await;
                }
                Some(AppEvent::CountriesFetched(result)) => {
                    self.handle_countries_fetched(result).await;
                }
            }
        }

        if let Err(e) = self.transport.stop().await {
            warn!("AppCore: cleanup stop failed: {e}");
        }
        Ok(())
    }

    // ── fetches ───────────────────────────────────────────────────────────────

    fn spawn_catalog_fetch(&self) {
        let tx = self.event_tx.clone();
        let client = self.directory.clone();
        tokio::spawn(async move {
            let result = client.fetch_stations().await;
            let _ = tx.send(AppEvent::CatalogFetched(result)).await;
        });
    }

    fn spawn_countries_fetch(&self) {
        let tx = self.event_tx.clone();
        let client = self.directory.clone();
        tokio::spawn(async move {
            let result = client.fetch_popular_countries().await;
            let _ = tx.send(AppEvent::CountriesFetched(result)).await;
        });
    }

    async fn handle_catalog_fetched(&mut self, result: Result<Vec<Station>, DirectoryError>) {
        match result {
            Ok(stations) => {
                info!("catalog ready: {} stations", stations.len());
                // The collection is replaced wholesale and selection is
                // index-based, so whatever was playing stops with it.
                if self.state.get_state().await.current_station.is_some() {
                    if let Err(e) = self.transport.stop().await {
                        warn!("failed to stop stream before catalog swap: {e}");
                    }
                }
                self.state.set_catalog(stations).await;
            }
            Err(e) => {
                warn!("station fetch failed: {e}");
                self.state.set_catalog_failed(e.to_string()).await;
            }
        }
    }

    async fn handle_countries_fetched(&self, result: Result<Vec<String>, DirectoryError>) {
        match result {
            Ok(names) => self.state.set_popular_countries(names).await,
            // Secondary fetch: never gates the catalog or the error state.
            Err(e) => warn!("country fetch failed (ignored): {e}"),
        }
    }

    // ── command handlers ──────────────────────────────────────────────────────

    async fn handle_command(&mut self, cmd: Command) -> anyhow::Result<()> {
        match cmd {
            Command::Play { idx } => self.play(idx).await?,
            Command::TogglePause => self.toggle_pause().await?,
            Command::Stop => self.stop().await?,
            Command::Search { query } => self.search(query).await,
            Command::ClearSearch => self.search(String::new()).await,
            Command::SelectMarker { idx } => self.select_marker(idx).await,
            Command::Country { name } => self.country(name).await,
            Command::SetViewport { lat, lon, zoom } => {
                // Direct user pan/zoom — always wins, no questions asked.
                self.state
                    .set_viewport(Viewport::recentered(geo::GeoPoint::new(lat, lon), zoom))
                    .await;
            }
            Command::Reset => self.reset().await?,
            Command::Refresh => {
                self.state.set_catalog_loading().await;
                self.spawn_catalog_fetch();
            }
            Command::Shutdown => {} // handled by the loop
        }
        Ok(())
    }

    async fn play(&mut self, idx: usize) -> anyhow::Result<()> {
        let state = self.state.get_state().await;
        if state.current_station == Some(idx) {
            return self.toggle_pause().await;
        }
        let Some(station) = state.stations.get(idx).cloned() else {
            warn!("play: no station at index {idx}");
            return Ok(());
        };

        info!("playing station: {}", station.name);
        if state.current_station.is_some() {
            if let Err(e) = self.transport.stop().await {
                warn!("failed to stop current stream: {e}");
            }
        }
        self.directory.report_click(&station.id);

        match self.transport.play_url(&station.url).await {
            Ok(()) => {
                self.state.set_playing(idx).await;
                self.state
                    .set_viewport(Viewport::recentered(station.position, STATION_ZOOM))
                    .await;
            }
            Err(e) => {
                warn!("playback request failed for '{}': {e}", station.name);
                self.state.set_playback_failed(idx).await;
            }
        }
        Ok(())
    }

    async fn toggle_pause(&mut self) -> anyhow::Result<()> {
        let state = self.state.get_state().await;
        let Some(idx) = state.current_station else {
            return Ok(());
        };
        match state.playback {
            PlaybackStatus::Playing => {
                self.transport.set_paused(true).await?;
                self.state.set_playback_status(PlaybackStatus::Paused).await;
            }
            PlaybackStatus::Paused => {
                self.transport.set_paused(false).await?;
                self.state.set_playback_status(PlaybackStatus::Playing).await;
            }
            // Ended or errored stream: a live source has nothing to resume,
            // so re-issue the load.
            PlaybackStatus::Idle | PlaybackStatus::Error => {
                let Some(station) = state.stations.get(idx).cloned() else {
                    return Ok(());
                };
                match self.transport.play_url(&station.url).await {
                    Ok(()) => self.state.set_playing(idx).await,
                    Err(e) => {
                        warn!("retry failed for '{}': {e}", station.name);
                        self.state.set_playback_failed(idx).await;
                    }
                }
            }
        }
        Ok(())
    }

    async fn stop(&mut self) -> anyhow::Result<()> {
        if self.state.get_state().await.current_station.is_none() {
            return Ok(());
        }
        self.transport.stop().await?;
        self.state.clear_playback().await;
        Ok(())
    }

    async fn search(&mut self, query: String) {
        self.state.set_search_query(query.clone()).await;
        if query.trim().is_empty() {
            self.state.set_viewport(self.home_viewport).await;
            return;
        }
        let state = self.state.get_state().await;
        if let Some(hit) = search::first_match(&state.stations, &query) {
            self.state
                .set_viewport(Viewport::recentered(hit.position, SEARCH_ZOOM))
                .await;
        }
    }

    async fn select_marker(&mut self, idx: usize) {
        let state = self.state.get_state().await;
        if idx >= state.stations.len() {
            return;
        }
        let next = if state.selected_marker == Some(idx) {
            None
        } else {
            Some(idx)
        };
        self.state.set_selected_marker(next).await;
    }

    async fn country(&mut self, name: String) {
        self.state.set_search_query(name.clone()).await;
        if let Some(centroid) = geo::country_centroid(&name) {
            self.state
                .set_viewport(Viewport::recentered(centroid, COUNTRY_ZOOM))
                .await;
        }
    }

    async fn reset(&mut self) -> anyhow::Result<()> {
        self.state.set_search_query(String::new()).await;
        if self.state.get_state().await.current_station.is_some() {
            if let Err(e) = self.transport.stop().await {
                warn!("reset: failed to stop stream: {e}");
            }
            self.state.clear_playback().await;
        }
        self.state.set_viewport(self.home_viewport).await;
        Ok(())
    }

    // ── transport events ──────────────────────────────────────────────────────

    async fn handle_transport_event(&mut self, event: TransportEvent) {
        if self.state.get_state().await.current_station.is_none() {
            return;
        }
        match event {
            TransportEvent::Ended => {
                info!("stream ended");
                self.state.set_playback_status(PlaybackStatus::Idle).await;
            }
            TransportEvent::Error(message) => {
                warn!("transport error: {message}");
                self.state.set_playback_status(PlaybackStatus::Error).await;
            }
        }
    }
}
