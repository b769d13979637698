use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use qrtrack_config::ScanMode;
use tokio::signal;
use tracing_subscriber::EnvFilter;

pub mod controller;
pub mod events;
pub mod gate;
pub mod profile;
pub mod prompt;
pub mod replay;
pub mod state;
pub mod surface;

#[cfg(test)]
mod tests;

use self::controller::{AppController, RunOptions};
use self::state::AppState;

/// Replay a barcode scan log through the overlay renderer
#[derive(Parser, Debug)]
#[command(name = "qrtrack", version)]
struct Args {
    /// Scan manifest (JSON) describing the analyzed frames
    #[arg(long)]
    manifest: PathBuf,

    /// Config file, defaults to ./config.json when present
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output directory for overlay images
    #[arg(long)]
    out: Option<PathBuf>,

    /// continuous | single-shot
    #[arg(long)]
    mode: Option<ScanMode>,

    /// Paint the dimmed camera frame behind the boxes
    #[arg(long)]
    backdrop: bool,

    /// Minimum milliseconds between overlay renders
    #[arg(long)]
    throttle_ms: Option<u64>,

    /// Accept every single-shot confirmation without prompting
    #[arg(long)]
    auto_confirm: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let mut config = profile::load_config(args.config.as_deref())?;
    if let Some(mode) = args.mode {
        config.scan.mode = mode;
    }
    if let Some(ms) = args.throttle_ms {
        config.scan.throttle_interval_ms = ms;
    }
    if args.backdrop {
        config.overlay.show_backdrop = true;
    }
    if let Some(out) = &args.out {
        config.output_dir = out.display().to_string();
    }

    let manifest = replay::load_manifest(&args.manifest)?;
    let options = RunOptions {
        base_dir: args
            .manifest
            .parent()
            .map(PathBuf::from)
            .unwrap_or_default(),
        auto_confirm: args.auto_confirm,
    };

    let state = Arc::new(AppState::new(config));
    let app = AppController::new(state);

    tokio::select! {
        _ = signal::ctrl_c() => {
            tracing::info!("Shutdown requested");
            app.shutdown();
        }
        result = app.run(manifest, options) => {
            let summary = result?;
            tracing::info!(
                "Scan finished: {} frame(s), {} detection(s), {} failure(s), {} viewport change(s)",
                summary.frames,
                summary.detections,
                summary.failures,
                summary.viewport_changes
            );
        }
    }

    Ok(())
}
