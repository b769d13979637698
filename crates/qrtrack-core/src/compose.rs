//! Overlay composition.
//!
//! Layers, bottom to top:
//! 1. optional dimmed copy of the analyzed frame (the backdrop),
//! 2. a border around the whole viewport, always present,
//! 3. one stroked box per detection that carries a bounding box.
//!
//! Every call allocates a fresh image so nothing from the previous frame survives.

use image::{DynamicImage, GenericImageView, Rgba, RgbaImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;
use qrtrack_config::Config;
use qrtrack_types::{CodeFormat, Detection, FrameResult, ViewportSize};

use crate::geometry::{RectF, Transform, map_rect};

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

const MIN_STROKE_WIDTH: f32 = 1.0;

/// Binary color policy: one format is highlighted, everything else shares a color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategoryColors {
    pub highlight_format: CodeFormat,
    pub highlight: Rgba<u8>,
    pub other: Rgba<u8>,
}

impl CategoryColors {
    pub fn color_for(&self, format: CodeFormat) -> Rgba<u8> {
        if format == self.highlight_format {
            self.highlight
        } else {
            self.other
        }
    }
}

impl Default for CategoryColors {
    fn default() -> Self {
        Self {
            highlight_format: CodeFormat::QrCode,
            highlight: Rgba([255, 0, 0, 255]),
            other: Rgba([0, 255, 0, 255]),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OverlayOptions {
    pub show_backdrop: bool,
    /// Fraction in `[0, 1]` applied to the backdrop alpha
    pub backdrop_opacity: f32,
    pub border_width: f32,
    pub box_stroke_width: f32,
    pub border_color: Rgba<u8>,
    pub colors: CategoryColors,
    pub text_index_base: usize,
}

impl Default for OverlayOptions {
    fn default() -> Self {
        Self {
            show_backdrop: false,
            backdrop_opacity: 0.2,
            border_width: 12.0,
            box_stroke_width: 6.0,
            border_color: Rgba([0, 0, 0, 255]),
            colors: CategoryColors::default(),
            text_index_base: 1,
        }
    }
}

impl From<&Config> for OverlayOptions {
    fn from(config: &Config) -> Self {
        let overlay = &config.overlay;
        Self {
            show_backdrop: overlay.show_backdrop,
            backdrop_opacity: overlay.backdrop_opacity,
            border_width: overlay.border_width,
            box_stroke_width: overlay.box_stroke_width,
            border_color: Rgba(overlay.border_color),
            colors: CategoryColors {
                highlight_format: overlay.highlight_format,
                highlight: Rgba(overlay.highlight_color),
                other: Rgba(overlay.default_color),
            },
            text_index_base: config.scan.text_index_base,
        }
    }
}

impl OverlayOptions {
    /// Clamp out-of-range numbers to the nearest valid value
    pub fn sanitized(&self) -> Self {
        let defaults = Self::default();
        let opacity = if self.backdrop_opacity.is_nan() {
            defaults.backdrop_opacity
        } else {
            self.backdrop_opacity.clamp(0.0, 1.0)
        };

        Self {
            backdrop_opacity: opacity,
            border_width: clamp_stroke(self.border_width, defaults.border_width),
            box_stroke_width: clamp_stroke(self.box_stroke_width, defaults.box_stroke_width),
            ..self.clone()
        }
    }
}

fn clamp_stroke(width: f32, fallback: f32) -> f32 {
    if width.is_nan() {
        fallback
    } else {
        width.max(MIN_STROKE_WIDTH)
    }
}

/// A composed overlay ready for the display surface
#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    pub image: RgbaImage,
    pub text_lines: Vec<String>,
}

impl Overlay {
    /// Text shown next to the overlay, optionally with a `=== (N) ===` header
    pub fn text_block(&self, header: bool) -> String {
        let mut buffer = String::new();
        if header {
            buffer.push_str(&format!("=== ({}) ===\n", self.text_lines.len()));
        }
        for line in &self.text_lines {
            buffer.push_str(line);
            buffer.push('\n');
        }
        buffer
    }
}

pub fn compose(
    frame: &FrameResult,
    transform: &Transform,
    viewport: ViewportSize,
    options: &OverlayOptions,
) -> Overlay {
    let options = options.sanitized();

    let mut image = match frame.source_frame.as_deref() {
        Some(source) if options.show_backdrop => {
            paint_backdrop(source, transform, viewport, options.backdrop_opacity)
        }
        _ => RgbaImage::from_pixel(viewport.width, viewport.height, TRANSPARENT),
    };

    draw_border(&mut image, &options);

    for detection in &frame.detections {
        if let Some(bounding_box) = detection.bounding_box {
            let mapped = map_rect(bounding_box, transform);
            let color = options.colors.color_for(detection.format);
            stroke_rect(&mut image, mapped, options.box_stroke_width, color);
        }
    }

    Overlay {
        image,
        text_lines: text_lines(&frame.detections, options.text_index_base),
    }
}

/// Transparent overlay with only the viewport border
pub fn border_only(viewport: ViewportSize, options: &OverlayOptions) -> RgbaImage {
    let options = options.sanitized();
    let mut image = RgbaImage::from_pixel(viewport.width, viewport.height, TRANSPARENT);
    draw_border(&mut image, &options);
    image
}

pub fn text_lines(detections: &[Detection], index_base: usize) -> Vec<String> {
    detections
        .iter()
        .enumerate()
        .map(|(index, detection)| {
            format!(
                "[{}] {}: {}",
                index + index_base,
                detection.format.label(),
                detection.text.as_deref().unwrap_or("")
            )
        })
        .collect()
}

/// Copy of the analyzed frame with boxes drawn in source coordinates.
///
/// Used for the still image of a single-shot confirmation. `None` when the
/// analyzer did not attach a frame.
pub fn compose_snapshot(frame: &FrameResult, options: &OverlayOptions) -> Option<RgbaImage> {
    let options = options.sanitized();
    let source = frame.source_frame.as_deref()?;

    let mut image = source.to_rgba8();
    for detection in &frame.detections {
        if let Some(bounding_box) = detection.bounding_box {
            let color = options.colors.color_for(detection.format);
            stroke_rect(&mut image, bounding_box.into(), options.box_stroke_width, color);
        }
    }
    Some(image)
}

fn paint_backdrop(
    source: &DynamicImage,
    transform: &Transform,
    viewport: ViewportSize,
    opacity: f32,
) -> RgbaImage {
    let (source_w, source_h) = source.dimensions();

    RgbaImage::from_fn(viewport.width, viewport.height, |x, y| {
        // Sample at the pixel center, nearest neighbour
        let (sx, sy) = transform.unmap_point(x as f64 + 0.5, y as f64 + 0.5);
        if !(sx >= 0.0 && sy >= 0.0) {
            return TRANSPARENT;
        }
        let (sx, sy) = (sx.floor() as u32, sy.floor() as u32);
        if sx >= source_w || sy >= source_h {
            return TRANSPARENT;
        }

        let Rgba([r, g, b, a]) = source.get_pixel(sx, sy);
        Rgba([r, g, b, (a as f32 * opacity).round() as u8])
    })
}

fn draw_border(image: &mut RgbaImage, options: &OverlayOptions) {
    let (width, height) = image.dimensions();
    let bounds = RectF::new(0.0, 0.0, width as f64, height as f64);
    stroke_rect(image, bounds, options.border_width, options.border_color);
}

/// Stroke centered on the rectangle edges
fn stroke_rect(image: &mut RgbaImage, rect: RectF, width: f32, color: Rgba<u8>) {
    let half = width as f64 / 2.0;
    let (left, right) = (rect.left.min(rect.right), rect.left.max(rect.right));
    let (top, bottom) = (rect.top.min(rect.bottom), rect.top.max(rect.bottom));

    let outer = RectF::new(left - half, top - half, right + half, bottom + half);

    // top, bottom, left, right
    fill_span(image, RectF::new(outer.left, top - half, outer.right, top + half), color);
    fill_span(image, RectF::new(outer.left, bottom - half, outer.right, bottom + half), color);
    fill_span(image, RectF::new(left - half, outer.top, left + half, outer.bottom), color);
    fill_span(image, RectF::new(right - half, outer.top, right + half, outer.bottom), color);
}

fn fill_span(image: &mut RgbaImage, span: RectF, color: Rgba<u8>) {
    if [span.left, span.top, span.right, span.bottom]
        .iter()
        .any(|v| v.is_nan())
    {
        return;
    }

    let (width, height) = image.dimensions();

    let x0 = span.left.round().max(0.0);
    let y0 = span.top.round().max(0.0);
    let x1 = span.right.round().min(width as f64);
    let y1 = span.bottom.round().min(height as f64);

    if x1 <= x0 || y1 <= y0 {
        return;
    }

    let rect = Rect::at(x0 as i32, y0 as i32).of_size((x1 - x0) as u32, (y1 - y0) as u32);
    draw_filled_rect_mut(image, rect, color);
}
