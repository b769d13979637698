use image::{Rgba, RgbaImage};
use qrtrack_core::DisplaySurface;

use crate::surface::{PngSurface, confirmation_message};

#[test]
fn key_hint_only_with_a_prompt() {
    let text = "[0] QR Code: hello\n";
    assert_eq!(
        confirmation_message(text, true),
        "[0] QR Code: hello\n[Enter] continue scanning, [q] quit\n"
    );
    assert_eq!(confirmation_message(text, false), "[0] QR Code: hello\n");
}

#[test]
fn confirmation_writes_snapshot() {
    let out = tempfile::tempdir().unwrap();
    let mut surface = PngSurface::new(out.path().join("nested")).with_prompt_hint(false);
    let snapshot = RgbaImage::from_pixel(8, 6, Rgba([1, 2, 3, 255]));

    surface
        .present_confirmation(Some(&snapshot), "[0] QR Code: x\n")
        .unwrap();
    assert!(surface.is_confirmation_open());
    assert_eq!(surface.confirmations_written(), 1);

    let written = image::open(out.path().join("nested/confirm-00001.png")).unwrap();
    assert_eq!(written.to_rgba8(), snapshot);

    surface.dismiss_confirmation();
    assert!(!surface.is_confirmation_open());
}

#[test]
fn overlays_are_numbered() {
    let out = tempfile::tempdir().unwrap();
    let mut surface = PngSurface::new(out.path());
    let image = RgbaImage::new(4, 4);

    surface.present(&image, "").unwrap();
    surface.invalidate();
    surface.present(&image, "[1] ITF: 1").unwrap();

    assert_eq!(surface.overlays_written(), 2);
    assert!(out.path().join("overlay-00001.png").exists());
    assert!(out.path().join("overlay-00002.png").exists());
}
