use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How detections drive the UI
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScanMode {
    /// Keep analyzing, redraw the overlay at most once per throttle interval
    #[default]
    Continuous,
    /// Pause on the first detection and wait for the user
    SingleShot,
}

#[derive(Debug, thiserror::Error)]
#[error("unknown scan mode: {0} (expected `continuous` or `single-shot`)")]
pub struct ParseModeError(String);

impl FromStr for ScanMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "continuous" | "realtime" => Ok(Self::Continuous),
            "single-shot" | "single_shot" | "singleshot" => Ok(Self::SingleShot),
            other => Err(ParseModeError(other.to_string())),
        }
    }
}

impl fmt::Display for ScanMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Continuous => f.write_str("continuous"),
            Self::SingleShot => f.write_str("single-shot"),
        }
    }
}

fn default_throttle_interval_ms() -> u64 {
    10
}

fn default_text_index_base() -> usize {
    1
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct ScanConfig {
    pub mode: ScanMode,
    /// Minimum spacing between two overlay renders
    #[serde(default = "default_throttle_interval_ms")]
    pub throttle_interval_ms: u64,
    /// First index printed in the result listing
    #[serde(default = "default_text_index_base")]
    pub text_index_base: usize,
    /// Prefix the listing with a `=== (N) ===` summary line
    pub text_header: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            mode: ScanMode::default(),
            throttle_interval_ms: default_throttle_interval_ms(),
            text_index_base: default_text_index_base(),
            text_header: false,
        }
    }
}
