mod core;
mod directory;
mod http;
mod player;

use radiomap_core::config::Config;
use radiomap_core::state::StateManager;
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // File logging under the data dir; level via RUST_LOG.
    let data_dir = radiomap_core::platform::data_dir();
    std::fs::create_dir_all(&data_dir)?;
    let log_path = data_dir.join("radiomapd.log");

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(log_file)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,radiomapd=debug")),
        )
        .init();

    info!("Log file: {:?}", log_path);

    let config = Config::load()?;
    info!("Config loaded from: {:?}", Config::config_path());

    // Event channel — all external inputs funnel into AppCore.
    let (event_tx, event_rx) = mpsc::channel::<core::AppEvent>(256);

    // Transport events come back through the same loop.
    let (transport_tx, mut transport_rx) = mpsc::channel::<player::TransportEvent>(64);
    {
        let core_tx = event_tx.clone();
        tokio::spawn(async move {
            while let Some(event) = transport_rx.recv().await {
                if core_tx.send(core::AppEvent::Transport(event)).await.is_err() {
                    break;
                }
            }
        });
    }

    let directory = directory::DirectoryClient::new(&config.directory);
    let transport = player::MpvTransport::new(config.player.default_volume, transport_tx);
    let app_core = core::AppCore::new(
        &config,
        StateManager::new(),
        directory,
        transport,
        event_tx.clone(),
    );

    if config.http.enabled {
        let _http_handle = http::start_server(
            config.http.bind_address.clone(),
            config.http.port,
            app_core.state_manager(),
            event_tx,
        );
    }

    info!("Daemon initialised, running event loop");
    app_core.run(event_rx).await?;

    Ok(())
}
