mod geometry_tests;

use image::{DynamicImage, Rgba, RgbaImage};
use qrtrack_types::{CodeFormat, Detection, FrameResult, PixelRect};

use crate::collab::{Analyzer, DisplaySurface, SessionController};
use crate::error::SurfaceError;

#[derive(Default)]
pub struct RecordingAnalyzer {
    pub calls: Vec<bool>,
}

impl Analyzer for RecordingAnalyzer {
    fn set_analyze_image(&mut self, enabled: bool) {
        self.calls.push(enabled);
    }
}

#[derive(Default)]
pub struct RecordingSession {
    pub releases: usize,
    pub viewfinder_visible: Option<bool>,
    pub feedback: Option<bool>,
}

impl SessionController for RecordingSession {
    fn release(&mut self) {
        self.releases += 1;
    }

    fn set_viewfinder_visible(&mut self, visible: bool) {
        self.viewfinder_visible = Some(visible);
    }

    fn set_feedback(&mut self, enabled: bool) {
        self.feedback = Some(enabled);
    }
}

#[derive(Default)]
pub struct RecordingSurface {
    pub presented: Vec<(RgbaImage, String)>,
    pub confirmations: Vec<(Option<RgbaImage>, String)>,
    pub dismissals: usize,
    pub invalidations: usize,
    pub fail: bool,
}

impl DisplaySurface for RecordingSurface {
    fn present(&mut self, image: &RgbaImage, text: &str) -> Result<(), SurfaceError> {
        if self.fail {
            return Err(SurfaceError::Detached);
        }
        self.presented.push((image.clone(), text.to_string()));
        Ok(())
    }

    fn present_confirmation(
        &mut self,
        image: Option<&RgbaImage>,
        text: &str,
    ) -> Result<(), SurfaceError> {
        if self.fail {
            return Err(SurfaceError::Detached);
        }
        self.confirmations.push((image.cloned(), text.to_string()));
        Ok(())
    }

    fn dismiss_confirmation(&mut self) {
        self.dismissals += 1;
    }

    fn invalidate(&mut self) {
        self.invalidations += 1;
    }
}

pub fn solid_frame(width: u32, height: u32, color: [u8; 4]) -> DynamicImage {
    DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba(color)))
}

pub fn qr(left: i32, top: i32, right: i32, bottom: i32, text: &str) -> Detection {
    Detection::new(
        CodeFormat::QrCode,
        Some(PixelRect::new(left, top, right, bottom)),
        Some(text),
    )
}

pub fn frame_with(detections: Vec<Detection>) -> FrameResult {
    FrameResult::new(Some(solid_frame(200, 200, [0, 0, 0, 255])), detections)
}
