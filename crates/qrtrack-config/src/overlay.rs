use qrtrack_types::CodeFormat;
use serde::{Deserialize, Serialize};

/// RGBA color, 8 bits per channel
pub type Rgba8 = [u8; 4];

fn default_backdrop_opacity() -> f32 {
    0.2
}

fn default_border_width() -> f32 {
    12.0
}

fn default_box_stroke_width() -> f32 {
    6.0
}

fn default_border_color() -> Rgba8 {
    [0, 0, 0, 255]
}

fn default_highlight_color() -> Rgba8 {
    [255, 0, 0, 255]
}

fn default_color() -> Rgba8 {
    [0, 255, 0, 255]
}

fn default_highlight_format() -> CodeFormat {
    CodeFormat::QrCode
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct OverlayConfig {
    /// Paint the analyzed frame behind the boxes
    pub show_backdrop: bool,
    #[serde(default = "default_backdrop_opacity")]
    pub backdrop_opacity: f32,
    #[serde(default = "default_border_width")]
    pub border_width: f32,
    #[serde(default = "default_box_stroke_width")]
    pub box_stroke_width: f32,
    #[serde(default = "default_border_color")]
    pub border_color: Rgba8,
    /// Box color for `highlight_format`
    #[serde(default = "default_highlight_color")]
    pub highlight_color: Rgba8,
    /// Box color for every other format
    #[serde(default = "default_color")]
    pub default_color: Rgba8,
    #[serde(default = "default_highlight_format")]
    pub highlight_format: CodeFormat,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            show_backdrop: false,
            backdrop_opacity: default_backdrop_opacity(),
            border_width: default_border_width(),
            box_stroke_width: default_box_stroke_width(),
            border_color: default_border_color(),
            highlight_color: default_highlight_color(),
            default_color: default_color(),
            highlight_format: default_highlight_format(),
        }
    }
}
