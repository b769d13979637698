//! Source-frame to viewport mapping.
//!
//! The analyzer reports boxes in the pixel space of the analyzed frame, while the
//! overlay is drawn in the pixel space of the on-screen surface. The camera preview
//! fills the surface with "cover" semantics, so the overlay has to use the same fit:
//! the frame is scaled until both axes cover the viewport, centered, and whatever
//! hangs over an edge is clipped.

use qrtrack_types::PixelRect;

/// Uniform scale followed by a translation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        scale: 1.0,
        offset_x: 0.0,
        offset_y: 0.0,
    };

    pub fn map_point(&self, x: f64, y: f64) -> (f64, f64) {
        (self.offset_x + x * self.scale, self.offset_y + y * self.scale)
    }

    /// Viewport point back into source coordinates
    pub fn unmap_point(&self, x: f64, y: f64) -> (f64, f64) {
        ((x - self.offset_x) / self.scale, (y - self.offset_y) / self.scale)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Screen-space rectangle, kept in floating point until the final pixel write
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectF {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl RectF {
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// `other` lies entirely inside `self`, edges included
    pub fn contains(&self, other: &RectF) -> bool {
        self.left <= other.left
            && self.top <= other.top
            && self.right >= other.right
            && self.bottom >= other.bottom
    }
}

impl From<PixelRect> for RectF {
    fn from(rect: PixelRect) -> Self {
        Self::new(
            rect.left as f64,
            rect.top as f64,
            rect.right as f64,
            rect.bottom as f64,
        )
    }
}

/// Cover-fit transform from a `source_w`x`source_h` frame into the viewport.
///
/// A zero-area source has no meaningful scale; the identity transform is
/// returned instead of dividing by zero.
pub fn compute_transform(source_w: u32, source_h: u32, viewport_w: u32, viewport_h: u32) -> Transform {
    if source_w == 0 || source_h == 0 {
        tracing::debug!(
            "zero-area source frame ({}x{}), using identity transform",
            source_w,
            source_h
        );
        return Transform::IDENTITY;
    }

    let (sw, sh) = (source_w as f64, source_h as f64);
    let (vw, vh) = (viewport_w as f64, viewport_h as f64);

    let scale = (vw / sw).max(vh / sh);

    Transform {
        scale,
        offset_x: (vw - sw * scale) / 2.0,
        offset_y: (vh - sh * scale) / 2.0,
    }
}

pub fn map_rect(rect: impl Into<RectF>, transform: &Transform) -> RectF {
    let rect = rect.into();
    let (left, top) = transform.map_point(rect.left, rect.top);
    let (right, bottom) = transform.map_point(rect.right, rect.bottom);
    RectF::new(left, top, right, bottom)
}

/// Where the whole source frame lands in viewport space
pub fn mapped_source_bounds(source_w: u32, source_h: u32, transform: &Transform) -> RectF {
    map_rect(RectF::new(0.0, 0.0, source_w as f64, source_h as f64), transform)
}
