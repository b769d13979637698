use std::sync::Arc;

use image::DynamicImage;
use serde::{Deserialize, Deserializer, Serialize};

/// Messages flowing from the analyzer/prompt tasks into the scan event loop
#[derive(Debug, Clone)]
pub enum ScanEvent {
    /// One analysis cycle finished, possibly with zero detections
    Frame(FrameResult),
    /// The analyzer produced nothing for this cycle
    AnalysisFailed,
    ViewportChanged(ViewportSize),
    Decision(Decision),
    SourceExhausted,
}

/// User answer to a single-shot confirmation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Confirm,
    Cancel,
}

/// Barcode symbology reported by the analyzer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CodeFormat {
    QrCode,
    Aztec,
    Codabar,
    Code39,
    Code93,
    Code128,
    DataMatrix,
    Ean8,
    Ean13,
    Itf,
    Pdf417,
    UpcA,
    UpcE,
    #[serde(other)]
    Unknown,
}

impl CodeFormat {
    /// Map the bit-flag format constants used by mobile barcode SDKs
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            1 => Self::Code128,
            2 => Self::Code39,
            4 => Self::Code93,
            8 => Self::Codabar,
            16 => Self::DataMatrix,
            32 => Self::Ean13,
            64 => Self::Ean8,
            128 => Self::Itf,
            256 => Self::QrCode,
            512 => Self::UpcA,
            1024 => Self::UpcE,
            2048 => Self::Pdf417,
            4096 => Self::Aztec,
            _ => Self::Unknown,
        }
    }

    /// Display name shown in the result listing
    pub fn label(self) -> &'static str {
        match self {
            Self::QrCode => "QR Code",
            Self::Aztec => "AZTEC",
            Self::Codabar => "CODABAR",
            Self::Code39 => "CODE 39",
            Self::Code93 => "CODE 93",
            Self::Code128 => "CODE 128",
            Self::DataMatrix => "DATA MATRIX",
            Self::Ean8 => "EAN 8",
            Self::Ean13 => "EAN 13",
            Self::Itf => "ITF",
            Self::Pdf417 => "PDF417",
            Self::UpcA => "UPC A",
            Self::UpcE => "UPC E",
            Self::Unknown => "Unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WifiEncryption {
    Open,
    Wpa,
    Wep,
    #[serde(other)]
    Unknown,
}

/// Structured payload parsed by the analyzer, when it recognised one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CodeValue {
    Url {
        url: String,
    },
    Wifi {
        #[serde(default)]
        ssid: String,
        #[serde(default)]
        password: String,
        encryption: WifiEncryption,
    },
    Contact {
        #[serde(default)]
        name: String,
        #[serde(default)]
        phones: Vec<String>,
        #[serde(default)]
        emails: Vec<String>,
    },
}

/// Axis-aligned rectangle in source-frame pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelRect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl PixelRect {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }
}

/// One recognised code within a single analyzed frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    #[serde(default)]
    pub bounding_box: Option<PixelRect>,
    /// Either a format name or the SDK's numeric constant
    #[serde(deserialize_with = "deserialize_format")]
    pub format: CodeFormat,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub value: Option<CodeValue>,
}

impl Detection {
    pub fn new(format: CodeFormat, bounding_box: Option<PixelRect>, text: Option<&str>) -> Self {
        Self {
            bounding_box,
            format,
            text: text.map(str::to_string),
            value: None,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FormatTag {
    Raw(i32),
    Name(CodeFormat),
}

fn deserialize_format<'de, D>(deserializer: D) -> Result<CodeFormat, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match FormatTag::deserialize(deserializer)? {
        FormatTag::Raw(raw) => CodeFormat::from_raw(raw),
        FormatTag::Name(format) => format,
    })
}

/// Output of one analysis cycle
#[derive(Debug, Clone, Default)]
pub struct FrameResult {
    pub source_frame: Option<Arc<DynamicImage>>,
    pub detections: Vec<Detection>,
}

impl FrameResult {
    pub fn new(source_frame: Option<DynamicImage>, detections: Vec<Detection>) -> Self {
        Self {
            source_frame: source_frame.map(Arc::new),
            detections,
        }
    }

    pub fn has_detections(&self) -> bool {
        !self.detections.is_empty()
    }

    /// Source raster size, `(0, 0)` when no frame is attached
    pub fn source_size(&self) -> (u32, u32) {
        self.source_frame
            .as_ref()
            .map(|frame| (frame.width(), frame.height()))
            .unwrap_or((0, 0))
    }
}

/// Size of the destination drawing surface
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewportSize {
    pub width: u32,
    pub height: u32,
}

impl ViewportSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// False until the surface has been laid out with a non-zero area
    pub fn is_measured(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}
