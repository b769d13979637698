use std::env;

use serde::{Deserialize, Serialize};

use self::overlay::OverlayConfig;
use self::scan::ScanConfig;

pub mod overlay;
pub mod scan;

pub use overlay::Rgba8;
pub use scan::{ParseModeError, ScanMode};

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct Config {
    pub scan: ScanConfig,
    pub overlay: OverlayConfig,

    /// Replay pacing between two analyzed frames
    pub delta_time: u64,
    /// Where the display surface writes overlay images
    pub output_dir: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scan: ScanConfig::default(),
            overlay: OverlayConfig::default(),
            delta_time: 33, // ~30 fps
            output_dir: "overlay-out".to_string(),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default().with_env_overrides(|key| env::var(key).ok())
    }

    /// Apply overrides from a key lookup (normally the process environment)
    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(mode) = lookup("QRTRACK_MODE").and_then(|v| v.parse().ok()) {
            self.scan.mode = mode;
        }

        if let Some(ms) = lookup("QRTRACK_THROTTLE_MS").and_then(|v| v.parse().ok()) {
            self.scan.throttle_interval_ms = ms;
        }

        if let Some(flag) = lookup("QRTRACK_BACKDROP").and_then(|v| parse_flag(&v)) {
            self.overlay.show_backdrop = flag;
        }

        if let Some(ms) = lookup("DELTA_TIME_MS").and_then(|v| v.parse().ok()) {
            self.delta_time = ms;
        }

        if let Some(dir) = lookup("QRTRACK_OUTPUT_DIR") {
            self.output_dir = dir;
        }

        self
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use qrtrack_types::CodeFormat;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_the_scanner_ui() {
        let config = Config::default();
        assert_eq!(config.scan.mode, ScanMode::Continuous);
        assert_eq!(config.scan.throttle_interval_ms, 10);
        assert_eq!(config.scan.text_index_base, 1);
        assert!(!config.overlay.show_backdrop);
        assert_eq!(config.overlay.border_width, 12.0);
        assert_eq!(config.overlay.box_stroke_width, 6.0);
        assert_eq!(config.overlay.highlight_format, CodeFormat::QrCode);
        assert_eq!(config.overlay.highlight_color, [255, 0, 0, 255]);
        assert_eq!(config.overlay.default_color, [0, 255, 0, 255]);
    }

    #[test]
    fn env_overrides_apply() {
        let config = Config::default().with_env_overrides(lookup(&[
            ("QRTRACK_MODE", "single-shot"),
            ("QRTRACK_THROTTLE_MS", "250"),
            ("QRTRACK_BACKDROP", "yes"),
            ("DELTA_TIME_MS", "5"),
        ]));
        assert_eq!(config.scan.mode, ScanMode::SingleShot);
        assert_eq!(config.scan.throttle_interval_ms, 250);
        assert!(config.overlay.show_backdrop);
        assert_eq!(config.delta_time, 5);
    }

    #[test]
    fn malformed_env_values_are_ignored() {
        let config = Config::default().with_env_overrides(lookup(&[
            ("QRTRACK_MODE", "sometimes"),
            ("QRTRACK_THROTTLE_MS", "fast"),
            ("QRTRACK_BACKDROP", "maybe"),
        ]));
        assert_eq!(config.scan.mode, ScanMode::Continuous);
        assert_eq!(config.scan.throttle_interval_ms, 10);
        assert!(!config.overlay.show_backdrop);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: Config = serde_json::from_str(
            r#"{"scan": {"mode": "single-shot"}, "overlay": {"backdrop_opacity": 0.5}}"#,
        )
        .unwrap();
        assert_eq!(config.scan.mode, ScanMode::SingleShot);
        assert_eq!(config.scan.throttle_interval_ms, 10);
        assert_eq!(config.overlay.backdrop_opacity, 0.5);
        assert_eq!(config.overlay.border_width, 12.0);
        assert_eq!(config.delta_time, 33);
    }

    #[test]
    fn mode_parses_aliases() {
        assert_eq!("realtime".parse::<ScanMode>().unwrap(), ScanMode::Continuous);
        assert_eq!("Single_Shot".parse::<ScanMode>().unwrap(), ScanMode::SingleShot);
        assert!("burst".parse::<ScanMode>().is_err());
        assert_eq!(ScanMode::SingleShot.to_string(), "single-shot");
    }
}
