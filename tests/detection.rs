//! Change detection properties over whole frames.

use image::{GrayImage, Luma};

use change_sentry::camera::Frame;
use change_sentry::detect::{detect, CHANGE_THRESHOLD, PIXEL_THRESHOLD};

/// Frame whose first `changed` pixels are brightened by `delta` over a
/// uniform gray base.
fn frame_with_changes(width: u32, height: u32, base: u8, delta: u8, changed: u32) -> Frame {
    let mut frame = Frame::solid(width, height, [base; 3]);
    for i in 0..changed {
        let v = base.saturating_add(delta);
        frame.put_pixel(i % width, i / width, [v; 3]);
    }
    frame
}

#[test]
fn test_count_is_monotonic_in_difference() {
    let reference = GrayImage::from_pixel(80, 60, Luma([40]));
    let mut previous = 0;
    for delta in (0..=215).step_by(5) {
        let frame = frame_with_changes(80, 60, 40, delta as u8, 2000);
        let count = detect(&frame, &reference).changed_pixels;
        assert!(
            count >= previous,
            "delta {} gave {} < {}",
            delta,
            count,
            previous
        );
        previous = count;
    }
    assert_eq!(previous, 2000);
}

#[test]
fn test_pixel_threshold_boundary() {
    let reference = GrayImage::from_pixel(80, 60, Luma([0]));

    let below = frame_with_changes(80, 60, 0, PIXEL_THRESHOLD - 1, 4800);
    assert_eq!(detect(&below, &reference).changed_pixels, 0);

    let at = frame_with_changes(80, 60, 0, PIXEL_THRESHOLD, 4800);
    assert_eq!(detect(&at, &reference).changed_pixels, 4800);
}

#[test]
fn test_change_threshold_is_strict() {
    let reference = GrayImage::from_pixel(80, 60, Luma([0]));

    let exactly = frame_with_changes(80, 60, 0, 255, CHANGE_THRESHOLD as u32);
    let detection = detect(&exactly, &reference);
    assert_eq!(detection.changed_pixels, CHANGE_THRESHOLD);
    assert!(!detection.is_change());

    let one_more = frame_with_changes(80, 60, 0, 255, CHANGE_THRESHOLD as u32 + 1);
    assert!(detect(&one_more, &reference).is_change());
}

#[test]
fn test_reference_of_other_size_is_resized() {
    let reference = GrayImage::from_pixel(1280, 960, Luma([0]));
    let frame = Frame::solid(64, 48, [255, 255, 255]);
    let detection = detect(&frame, &reference);
    assert_eq!(detection.changed_pixels, 64 * 48);
    assert!(detection.is_change());
}

#[test]
fn test_color_frame_compared_by_luma() {
    // Pure green has luma 149; a 149 gray reference sees no change
    let reference = GrayImage::from_pixel(64, 48, Luma([149]));
    let frame = Frame::solid(64, 48, [0, 255, 0]);
    assert_eq!(detect(&frame, &reference).changed_pixels, 0);
}

mod colored_reference {
    use super::*;
    use change_sentry::detect::luma;
    use change_sentry::reference::load_reference;
    use image::{Rgb, RgbImage};
    use tempfile::TempDir;

    fn save_rgb(dir: &TempDir, rgb: [u8; 3]) -> std::path::PathBuf {
        let path = dir.path().join("green.png");
        RgbImage::from_pixel(64, 48, Rgb(rgb)).save(&path).unwrap();
        path
    }

    #[test]
    fn test_loaded_reference_uses_frame_weights() {
        let dir = TempDir::new().unwrap();
        let reference = load_reference(&save_rgb(&dir, [0, 200, 0])).unwrap();
        assert_eq!(reference.get_pixel(0, 0).0[0], luma(0, 200, 0));
    }

    #[test]
    fn test_same_colored_scene_is_unchanged() {
        let dir = TempDir::new().unwrap();
        let reference = load_reference(&save_rgb(&dir, [0, 200, 0])).unwrap();

        let same = Frame::solid(64, 48, [0, 200, 0]);
        assert_eq!(detect(&same, &reference).changed_pixels, 0);

        // 24 luma levels darker, under the pixel threshold
        let darker = Frame::solid(64, 48, [0, 160, 0]);
        let detection = detect(&darker, &reference);
        assert_eq!(detection.changed_pixels, 0);
        assert!(!detection.is_change());
    }

    #[test]
    fn test_colored_change_still_detected() {
        let dir = TempDir::new().unwrap();
        let reference = load_reference(&save_rgb(&dir, [0, 200, 0])).unwrap();
        let dark = Frame::solid(64, 48, [0, 40, 0]);
        assert_eq!(detect(&dark, &reference).changed_pixels, 64 * 48);
    }
}
