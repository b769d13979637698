use std::fs;
use std::path::{Path, PathBuf};

use image::{ExtendedColorType, ImageEncoder, RgbaImage};
use qrtrack_core::{DisplaySurface, SurfaceError};

/// Display surface that writes each presented overlay to a numbered PNG
pub struct PngSurface {
    dir: PathBuf,
    dir_ready: bool,
    overlays: u64,
    confirmations: u64,
    confirmation_open: bool,
    /// Someone is reading stdin for the answer
    prompt_hint: bool,
}

impl PngSurface {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            dir_ready: false,
            overlays: 0,
            confirmations: 0,
            confirmation_open: false,
            prompt_hint: true,
        }
    }

    pub fn with_prompt_hint(mut self, prompt_hint: bool) -> Self {
        self.prompt_hint = prompt_hint;
        self
    }

    pub fn overlays_written(&self) -> u64 {
        self.overlays
    }

    pub fn confirmations_written(&self) -> u64 {
        self.confirmations
    }

    pub fn is_confirmation_open(&self) -> bool {
        self.confirmation_open
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn ensure_dir(&mut self) -> Result<(), SurfaceError> {
        if !self.dir_ready {
            fs::create_dir_all(&self.dir)?;
            self.dir_ready = true;
        }
        Ok(())
    }
}

impl DisplaySurface for PngSurface {
    fn present(&mut self, image: &RgbaImage, text: &str) -> Result<(), SurfaceError> {
        self.ensure_dir()?;
        self.overlays += 1;

        let path = self.dir.join(format!("overlay-{:05}.png", self.overlays));
        fs::write(&path, encode_png(image)?)?;

        tracing::debug!("Wrote {}", path.display());
        for line in text.lines() {
            tracing::info!("{}", line);
        }
        Ok(())
    }

    fn present_confirmation(
        &mut self,
        image: Option<&RgbaImage>,
        text: &str,
    ) -> Result<(), SurfaceError> {
        self.ensure_dir()?;
        self.confirmations += 1;

        if let Some(image) = image {
            let path = self.dir.join(format!("confirm-{:05}.png", self.confirmations));
            fs::write(&path, encode_png(image)?)?;
            tracing::info!("Snapshot written to {}", path.display());
        }

        self.confirmation_open = true;
        print!("{}", confirmation_message(text, self.prompt_hint));
        Ok(())
    }

    fn dismiss_confirmation(&mut self) {
        self.confirmation_open = false;
    }

    fn invalidate(&mut self) {
        self.dir_ready = false;
    }
}

/// Listing printed for a confirmation, plus the key hint when a prompt is running
pub fn confirmation_message(text: &str, prompt_hint: bool) -> String {
    let mut message = format!("{}\n", text.trim_end_matches('\n'));
    if prompt_hint {
        message.push_str("[Enter] continue scanning, [q] quit\n");
    }
    message
}

fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, SurfaceError> {
    let mut buffer = Vec::new();
    image::codecs::png::PngEncoder::new(&mut buffer).write_image(
        image.as_raw(),
        image.width(),
        image.height(),
        ExtendedColorType::Rgba8,
    )?;
    Ok(buffer)
}
