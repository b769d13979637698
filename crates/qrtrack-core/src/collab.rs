//! Seams to the collaborators around the scan loop.
//!
//! The controller calls into these synchronously from its single notification path.

use image::RgbaImage;

use crate::error::SurfaceError;

/// Frame source that can be told to deliver (or hold back) the next result
pub trait Analyzer: Send {
    /// The only backpressure control: no new result arrives while disabled
    fn set_analyze_image(&mut self, enabled: bool);
}

/// Camera session owning the acquisition resources
pub trait SessionController: Send {
    /// Tear down acquisition resources before re-acquisition
    fn release(&mut self);

    /// Show or hide the manual viewfinder guide
    fn set_viewfinder_visible(&mut self, visible: bool);

    /// Beep/vibrate on detection
    fn set_feedback(&mut self, enabled: bool);
}

/// Where composed overlays end up. Every call replaces the whole image.
pub trait DisplaySurface: Send {
    fn present(&mut self, image: &RgbaImage, text: &str) -> Result<(), SurfaceError>;

    /// Modal still image plus listing, shown in single-shot mode
    fn present_confirmation(
        &mut self,
        image: Option<&RgbaImage>,
        text: &str,
    ) -> Result<(), SurfaceError>;

    fn dismiss_confirmation(&mut self);

    /// Drop cached handles after the surface geometry changed
    fn invalidate(&mut self) {}
}
