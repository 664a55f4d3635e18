//! Playback transport.
//!
//! The app core drives playback through the [`Transport`] trait and hears
//! back through [`TransportEvent`]s on a channel. [`MpvTransport`] is the
//! production implementation: a headless mpv child process driven over its
//! JSON-lines IPC socket. Commands are fire-and-write (no request/reply
//! correlation — the events we care about are unsolicited anyway).

use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::unix::OwnedWriteHalf;
use tokio::net::UnixStream;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use radiomap_core::platform;

/// Unsolicited transport notifications.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportEvent {
    /// The source played to completion (stream exhausted).
    Ended,
    /// The transport failed mid-stream.
    Error(String),
}

/// Black-box audio device: accepts a source URL, plays/pauses/stops, and
/// reports `Ended`/`Error` out of band.
pub trait Transport: Send {
    /// Replace the current source and start playback.
    async fn play_url(&mut self, url: &str) -> anyhow::Result<()>;
    async fn set_paused(&mut self, paused: bool) -> anyhow::Result<()>;
    async fn stop(&mut self) -> anyhow::Result<()>;
}

/// mpv-backed transport. The process is spawned lazily on first play and
/// kept alive across source changes (`--idle=yes`).
pub struct MpvTransport {
    volume: f32,
    event_tx: mpsc::Sender<TransportEvent>,
    process: Option<tokio::process::Child>,
    writer: Option<OwnedWriteHalf>,
}

impl MpvTransport {
    pub fn new(volume: f32, event_tx: mpsc::Sender<TransportEvent>) -> Self {
        Self {
            volume,
            event_tx,
            process: None,
            writer: None,
        }
    }

    fn process_alive(&mut self) -> bool {
        match self.process {
            Some(ref mut child) => child.try_wait().ok().flatten().is_none(),
            None => false,
        }
    }

    async fn ensure_connected(&mut self) -> anyhow::Result<()> {
        if self.writer.is_some() && self.process_alive() {
            return Ok(());
        }
        self.writer = None;
        if let Some(mut stale) = self.process.take() {
            let _ = stale.kill().await;
        }

        let socket_path = platform::mpv_socket_path();
        let _ = tokio::fs::remove_file(&socket_path).await;

        info!("mpv: spawning new process");
        let mpv_binary = platform::find_mpv_binary()
            .ok_or_else(|| anyhow::anyhow!("mpv binary not found"))?;
        let vol_arg = format!(
            "--volume={}",
            (self.volume * 100.0).clamp(0.0, 100.0).round() as i64
        );

        let child = tokio::process::Command::new(mpv_binary)
            .arg("--no-video")
            .arg("--idle=yes")
            .arg("--quiet")
            .arg(vol_arg)
            .arg(platform::mpv_socket_arg())
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .spawn()?;
        self.process = Some(child);

        // Wait for the IPC socket to appear.
        for _ in 0..50 {
            tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
            if socket_path.exists() {
                break;
            }
        }
        if !socket_path.exists() {
            anyhow::bail!("mpv IPC socket did not appear");
        }

        let stream = UnixStream::connect(&socket_path).await?;
        info!("mpv: connected to IPC socket");
        let (read_half, write_half) = stream.into_split();
        self.writer = Some(write_half);

        let event_tx = self.event_tx.clone();
        tokio::spawn(reader_task(BufReader::new(read_half), event_tx));
        Ok(())
    }

    async fn send(&mut self, command: Value) -> anyhow::Result<()> {
        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| anyhow::anyhow!("mpv not connected"))?;
        let mut line = serde_json::to_string(&json!({ "command": command }))?;
        line.push('\n');
        writer.write_all(line.as_bytes()).await?;
        Ok(())
    }
}

impl Transport for MpvTransport {
    async fn play_url(&mut self, url: &str) -> anyhow::Result<()> {
        self.ensure_connected().await?;
        self.send(json!(["loadfile", url, "replace"])).await?;
        self.send(json!(["set_property", "pause", false])).await?;
        Ok(())
    }

    async fn set_paused(&mut self, paused: bool) -> anyhow::Result<()> {
        self.send(json!(["set_property", "pause", paused])).await
    }

    async fn stop(&mut self) -> anyhow::Result<()> {
        if self.writer.is_none() {
            return Ok(());
        }
        self.send(json!(["stop"])).await
    }
}

/// Read mpv's unsolicited event lines and translate the ones the app cares
/// about. `end-file` carries a reason: `eof` means the stream ran out,
/// `error`/`network` mean it broke.
async fn reader_task(
    mut reader: BufReader<tokio::net::unix::OwnedReadHalf>,
    event_tx: mpsc::Sender<TransportEvent>,
) {
    let mut line = String::new();
    loop {
        line.clear();
        match reader.read_line(&mut line).await {
            Ok(0) => {
                debug!("mpv: IPC socket closed");
                let _ = event_tx
                    .send(TransportEvent::Error("mpv connection closed".to_string()))
                    .await;
                break;
            }
            Ok(_) => {
                let Ok(value) = serde_json::from_str::<Value>(&line) else {
                    continue;
                };
                if value.get("event").and_then(Value::as_str) == Some("end-file") {
                    let reason = value
                        .get("reason")
                        .and_then(Value::as_str)
                        .unwrap_or("unknown");
                    debug!("mpv: end-file reason={reason}");
                    let event = match reason {
                        "eof" => TransportEvent::Ended,
                        "stop" | "redirect" => continue,
                        other => TransportEvent::Error(format!("stream ended: {other}")),
                    };
                    if event_tx.send(event).await.is_err() {
                        break;
                    }
                }
            }
            Err(e) => {
                warn!("mpv: IPC read error: {e}");
                let _ = event_tx.send(TransportEvent::Error(e.to_string())).await;
                break;
            }
        }
    }
}
