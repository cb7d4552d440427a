//! webdisplay-client: viewer for the web display protocol.
//!
//! Connects to a display host at `ws://HOST:PORT/APP`, paints every dirty
//! rectangle it receives into an in-memory framebuffer, and forwards local
//! input read from stdin back to the host as text commands.
//!
//! # Usage
//!
//! ```text
//! webdisplay-client [OPTIONS]
//!
//! Options:
//!   --host <HOST>             Display host [default: 127.0.0.1]
//!   --port <PORT>             Display host port [default: 7788]
//!   --app <APP>               Remote application name [default: mguxdemo]
//!   --canvas-id <ID>          Canvas identifier [default: webdisplay]
//!   --width / --height        Logical canvas size [default: 800x600]
//!   --display-left/-top       Displayed canvas position [default: 0,0]
//!   --display-width/-height   Displayed canvas size [default: logical size]
//!   --no-input                Do not read input events from stdin
//!   --save-png <PATH>         Write the final framebuffer to PATH
//!   --json                    Print the final session snapshot as JSON
//! ```
//!
//! # Input
//!
//! One event per line on stdin, in viewport coordinates:
//! `down X Y`, `move X Y`, `up X Y`, `keydown CODE`, `keyup CODE`.
//!
//! # Environment variable overrides
//!
//! | Variable        | Default      | Description                |
//! |-----------------|--------------|----------------------------|
//! | `WD_HOST`       | `127.0.0.1`  | Display host               |
//! | `WD_PORT`       | `7788`       | Display host port          |
//! | `WD_APP`        | `mguxdemo`   | Remote application name    |
//! | `WD_CANVAS_ID`  | `webdisplay` | Canvas identifier          |
//!
//! Log verbosity is controlled by `RUST_LOG` (default `info`).

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::sync::{mpsc, watch};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use webdisplay_client::application::DisplaySession;
use webdisplay_client::domain::{config::DEFAULT_PORT, SessionConfig};
use webdisplay_client::infrastructure::canvas::{FramebufferCanvas, FramebufferHost};
use webdisplay_client::infrastructure::input_script::forward_lines;
use webdisplay_client::infrastructure::{run_session, PngFrameDecoder};
use webdisplay_core::BoundingBox;

/// Capacity of the local input channel.
const INPUT_QUEUE_DEPTH: usize = 64;

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Web display viewer.
///
/// Paints remote framebuffer updates into a local canvas and forwards local
/// pointer and key input to the display host.
#[derive(Debug, Parser)]
#[command(
    name = "webdisplay-client",
    about = "Viewer for the web display remote framebuffer protocol",
    version
)]
struct Cli {
    /// Hostname or IP address of the display host.
    #[arg(long, default_value = "127.0.0.1", env = "WD_HOST")]
    host: String,

    /// TCP port of the display host.
    #[arg(long, default_value_t = DEFAULT_PORT, env = "WD_PORT")]
    port: u16,

    /// Name of the remote application; becomes the URL path.
    #[arg(long, default_value = "mguxdemo", env = "WD_APP")]
    app: String,

    /// Identifier of the canvas to paint into.
    #[arg(long, default_value = "webdisplay", env = "WD_CANVAS_ID")]
    canvas_id: String,

    /// Logical canvas width in pixels.
    #[arg(long, default_value_t = 800)]
    width: u32,

    /// Logical canvas height in pixels.
    #[arg(long, default_value_t = 600)]
    height: u32,

    /// Viewport x of the displayed canvas's left edge.
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    display_left: f64,

    /// Viewport y of the displayed canvas's top edge.
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    display_top: f64,

    /// Displayed width; defaults to the logical width (no scaling).
    #[arg(long)]
    display_width: Option<f64>,

    /// Displayed height; defaults to the logical height (no scaling).
    #[arg(long)]
    display_height: Option<f64>,

    /// Do not read input events from stdin.
    #[arg(long)]
    no_input: bool,

    /// Write the final framebuffer to this PNG file on exit.
    #[arg(long, value_name = "PATH")]
    save_png: Option<PathBuf>,

    /// Print the final session snapshot as JSON on stdout.
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn session_config(&self) -> SessionConfig {
        SessionConfig {
            host: self.host.clone(),
            port: self.port,
            app_name: self.app.clone(),
            canvas_id: self.canvas_id.clone(),
        }
    }

    fn bounding_box(&self) -> BoundingBox {
        BoundingBox {
            left: self.display_left,
            top: self.display_top,
            width: self.display_width.unwrap_or(f64::from(self.width)),
            height: self.display_height.unwrap_or(f64::from(self.height)),
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

/// Program entry point.
///
/// 1. Initialise `tracing_subscriber` from `RUST_LOG` (default `info`).
/// 2. Parse the CLI into a [`SessionConfig`] and a canvas geometry.
/// 3. Attach a [`DisplaySession`] to an in-memory framebuffer canvas.
/// 4. Start the stdin reader thread and the Ctrl+C watcher.
/// 5. Run the session until the host closes the socket or Ctrl+C.
/// 6. Optionally save the framebuffer and print the snapshot.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── Logging setup ─────────────────────────────────────────────────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.session_config();

    // ── Canvas and session ────────────────────────────────────────────────────
    let canvas =
        Arc::new(FramebufferCanvas::new(cli.width, cli.height).with_bounding_box(cli.bounding_box()));
    let host = FramebufferHost::new().with_canvas(config.canvas_id.clone(), Arc::clone(&canvas));

    let mut session = DisplaySession::new(config);
    session
        .attach(&host)
        .context("failed to initialise display session")?;

    info!(
        "webdisplay-client starting: session {} → {}",
        session.id(),
        session.config().ws_url()
    );

    // ── Local input ───────────────────────────────────────────────────────────
    let (input_tx, input_rx) = mpsc::channel(INPUT_QUEUE_DEPTH);
    if cli.no_input {
        drop(input_tx);
    } else {
        std::thread::Builder::new()
            .name("stdin-input".to_string())
            .spawn(move || {
                if let Err(e) = forward_lines(std::io::stdin().lock(), input_tx) {
                    warn!("stdin input stopped: {e:#}");
                }
            })
            .context("failed to spawn stdin reader thread")?;
    }

    // ── Graceful shutdown ─────────────────────────────────────────────────────
    let (stop_tx, stop_rx) = watch::channel(false);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("received Ctrl+C; closing session");
                let _ = stop_tx.send(true);
            }
            Err(e) => tracing::error!("failed to listen for Ctrl+C signal: {e}"),
        }
    });

    // ── Run ───────────────────────────────────────────────────────────────────
    let snapshot = run_session(session, Arc::new(PngFrameDecoder::new()), input_rx, stop_rx).await?;

    if let Some(path) = &cli.save_png {
        canvas.save_png(path)?;
        info!("framebuffer saved to {}", path.display());
    }

    if cli.json {
        let json = serde_json::to_string_pretty(&snapshot).context("failed to encode snapshot")?;
        println!("{json}");
    }

    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
