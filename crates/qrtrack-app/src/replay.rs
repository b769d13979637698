//! Scan-log replay: stands in for the camera and barcode analyzer.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use image::DynamicImage;
use kanal::AsyncSender;
use qrtrack_core::SessionController;
use qrtrack_types::{Detection, FrameResult, ScanEvent, ViewportSize};
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

use crate::state::AppState;

fn default_repeat() -> u32 {
    1
}

#[derive(Debug, Deserialize)]
pub struct Manifest {
    pub viewport: ViewportSize,
    pub frames: Vec<ManifestFrame>,
    /// Play the frame list this many times
    #[serde(default = "default_repeat")]
    pub repeat: u32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ManifestFrame {
    /// Analyzed image, relative to the manifest
    pub image: Option<PathBuf>,
    /// Blank raster size used when no image is given
    pub size: Option<ViewportSize>,
    pub detections: Vec<Detection>,
    /// The analyzer produced nothing for this cycle
    pub failed: bool,
    /// Surface geometry change (rotation) before this frame
    pub viewport: Option<ViewportSize>,
}

pub fn load_manifest(path: &Path) -> anyhow::Result<Manifest> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("Failed to read manifest {}", path.display()))?;
    let manifest: Manifest = serde_json::from_str(&data)
        .with_context(|| format!("Failed to parse manifest {}", path.display()))?;
    tracing::info!(
        "Loaded manifest with {} frame(s), repeat={}",
        manifest.frames.len(),
        manifest.repeat
    );
    Ok(manifest)
}

impl ManifestFrame {
    fn source_frame(&self, base_dir: &Path) -> anyhow::Result<Option<DynamicImage>> {
        if let Some(image) = &self.image {
            let path = base_dir.join(image);
            let frame = image::open(&path)
                .with_context(|| format!("Failed to load frame {}", path.display()))?;
            return Ok(Some(frame));
        }

        Ok(self
            .size
            .filter(ViewportSize::is_measured)
            .map(|size| DynamicImage::new_rgba8(size.width, size.height)))
    }

    fn to_event(&self, base_dir: &Path) -> anyhow::Result<ScanEvent> {
        if self.failed {
            return Ok(ScanEvent::AnalysisFailed);
        }
        let source = self.source_frame(base_dir)?;
        Ok(ScanEvent::Frame(FrameResult::new(
            source,
            self.detections.clone(),
        )))
    }
}

/// Deliver manifest frames one at a time, each only after the gate reopens
pub async fn analyzer_loop(
    state: Arc<AppState>,
    manifest: Arc<Manifest>,
    base_dir: PathBuf,
    event_tx: AsyncSender<ScanEvent>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let delta_time = {
        let config = state.config.read().await;
        Duration::from_millis(config.delta_time)
    };

    let frames = manifest
        .frames
        .iter()
        .enumerate()
        .cycle()
        .take(manifest.frames.len() * manifest.repeat as usize);

    for (index, frame) in frames {
        tokio::select! {
            _ = state.gate.acquire() => {}
            _ = cancel.cancelled() => {
                tracing::info!("Analyzer stopping");
                return Ok(());
            }
        }

        tokio::time::sleep(delta_time).await;

        if let Some(viewport) = frame.viewport {
            event_tx.send(ScanEvent::ViewportChanged(viewport)).await?;
        }

        let event = {
            let frame_dir = base_dir.clone();
            let entry = manifest.clone();
            tokio::task::spawn_blocking(move || entry.frames[index].to_event(&frame_dir))
                .await?
        };

        match event {
            Ok(event) => event_tx.send(event).await?,
            Err(e) => {
                tracing::warn!("Frame {} unusable, reporting as failed: {:#}", index, e);
                event_tx.send(ScanEvent::AnalysisFailed).await?;
            }
        }
    }

    tracing::info!("Manifest exhausted");
    event_tx.send(ScanEvent::SourceExhausted).await?;
    Ok(())
}

/// Session side of the replay; there is no hardware to tear down
#[derive(Debug, Default)]
pub struct ReplaySession {
    pub releases: u32,
    pub viewfinder_visible: bool,
    pub feedback: bool,
}

impl SessionController for ReplaySession {
    fn release(&mut self) {
        self.releases += 1;
        tracing::info!("Releasing replay session (#{})", self.releases);
    }

    fn set_viewfinder_visible(&mut self, visible: bool) {
        self.viewfinder_visible = visible;
        tracing::debug!("Viewfinder guide visible: {}", visible);
    }

    fn set_feedback(&mut self, enabled: bool) {
        self.feedback = enabled;
        tracing::debug!("Scan feedback (beep/vibrate): {}", enabled);
    }
}
