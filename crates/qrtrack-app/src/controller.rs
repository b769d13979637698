use std::path::PathBuf;
use std::sync::Arc;

use qrtrack_config::ScanMode;
use qrtrack_core::{OverlayOptions, ScanLoopController, ScanSettings};
use qrtrack_types::ScanEvent;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::events::{ScanSummary, event_loop};
use crate::gate::GateHandle;
use crate::prompt::spawn_prompt;
use crate::replay::{Manifest, ReplaySession, analyzer_loop};
use crate::state::AppState;
use crate::surface::PngSurface;

/// Options that only exist on the command line
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Directory the manifest's relative image paths resolve against
    pub base_dir: PathBuf,
    pub auto_confirm: bool,
}

/// Task spawning and lifecycle for one scan session
pub struct AppController {
    state: Arc<AppState>,
    cancel_token: CancellationToken,
}

impl AppController {
    pub fn new(state: Arc<AppState>) -> Self {
        Self {
            state,
            cancel_token: CancellationToken::new(),
        }
    }

    pub async fn run(&self, manifest: Manifest, options: RunOptions) -> anyhow::Result<ScanSummary> {
        let config = self.state.config.read().await.clone();
        // single in-flight frame, plus room for viewport changes and answers
        let (event_tx, event_rx) = kanal::bounded_async::<ScanEvent>(64);

        let interactive = config.scan.mode == ScanMode::SingleShot && !options.auto_confirm;

        let mut controller = ScanLoopController::new(
            GateHandle::new(self.state.gate.clone()),
            ReplaySession::default(),
            PngSurface::new(&config.output_dir).with_prompt_hint(interactive),
            ScanSettings::from(&config),
            OverlayOptions::from(&config),
        );
        controller.attach_viewport(manifest.viewport);

        let mut tasks = JoinSet::new();
        tasks.spawn(analyzer_loop(
            self.state.clone(),
            Arc::new(manifest),
            options.base_dir,
            event_tx.clone(),
            self.cancel_token.child_token(),
        ));

        if interactive {
            spawn_prompt(&event_tx);
        }
        drop(event_tx);

        let summary = event_loop(
            &mut controller,
            event_rx,
            self.cancel_token.child_token(),
            options.auto_confirm,
        )
        .await;

        self.shutdown();
        while let Some(result) = tasks.join_next().await {
            match result {
                Ok(Ok(())) => {}
                Ok(Err(e)) => tracing::warn!("analyzer task exited with error: {:#}", e),
                Err(e) => tracing::error!("analyzer task panicked: {}", e),
            }
        }

        let surface = controller.surface();
        tracing::info!(
            "Wrote {} overlay(s) and {} snapshot(s) to {}",
            surface.overlays_written(),
            surface.confirmations_written(),
            surface.dir().display()
        );

        summary
    }

    pub fn shutdown(&self) {
        self.cancel_token.cancel();
    }
}
