pub mod types;

pub use types::{
    CodeFormat, CodeValue, Decision, Detection, FrameResult, PixelRect, ScanEvent, ViewportSize,
    WifiEncryption,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_formats_map_to_symbologies() {
        assert_eq!(CodeFormat::from_raw(256), CodeFormat::QrCode);
        assert_eq!(CodeFormat::from_raw(16), CodeFormat::DataMatrix);
        assert_eq!(CodeFormat::from_raw(4096), CodeFormat::Aztec);
        assert_eq!(CodeFormat::from_raw(0), CodeFormat::Unknown);
        assert_eq!(CodeFormat::from_raw(-1), CodeFormat::Unknown);
    }

    #[test]
    fn labels_fall_back_to_unknown() {
        assert_eq!(CodeFormat::QrCode.label(), "QR Code");
        assert_eq!(CodeFormat::Ean13.label(), "EAN 13");
        assert_eq!(CodeFormat::Unknown.label(), "Unknown");
    }

    #[test]
    fn unrecognised_format_tags_deserialize_as_unknown() {
        let detection: Detection =
            serde_json::from_str(r#"{"format": "maxicode", "text": "abc"}"#).unwrap();
        assert_eq!(detection.format, CodeFormat::Unknown);
        assert!(detection.bounding_box.is_none());
        assert_eq!(detection.text.as_deref(), Some("abc"));
    }

    #[test]
    fn numeric_format_tags_use_sdk_constants() {
        let detections: Vec<Detection> = serde_json::from_str(
            r#"[{"format": 256}, {"format": 32, "text": "4006381333931"}, {"format": 3}]"#,
        )
        .unwrap();
        let formats: Vec<_> = detections.iter().map(|d| d.format).collect();
        assert_eq!(
            formats,
            vec![CodeFormat::QrCode, CodeFormat::Ean13, CodeFormat::Unknown]
        );
    }

    #[test]
    fn code_values_are_tagged() {
        let value: CodeValue = serde_json::from_str(
            r#"{"type": "wifi", "ssid": "home", "password": "pw", "encryption": "wpa"}"#,
        )
        .unwrap();
        assert_eq!(
            value,
            CodeValue::Wifi {
                ssid: "home".into(),
                password: "pw".into(),
                encryption: WifiEncryption::Wpa,
            }
        );
    }

    #[test]
    fn frame_without_raster_reports_zero_size() {
        let result = FrameResult::default();
        assert_eq!(result.source_size(), (0, 0));
        assert!(!result.has_detections());
        assert!(!ViewportSize::new(0, 100).is_measured());
        assert!(ViewportSize::new(1, 1).is_measured());
    }
}
