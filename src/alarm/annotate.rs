//! Visual markers drawn on frames that triggered an alarm.

use crate::camera::Frame;

pub const GREEN: [u8; 3] = [0, 255, 0];
pub const RED: [u8; 3] = [255, 0, 0];

/// Text placed over the displayed frame at a pixel position.
///
/// Labels are not rasterized into the frame; the preview places them at the
/// cell that covers (`x`, `y`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub x: u32,
    pub y: u32,
    pub text: String,
    pub color: [u8; 3],
}

/// Axis-aligned rectangle outline in pixel coordinates (corners inclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rectangle {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

/// Where the change marker goes: (50,50) to (200,200).
pub const CHANGE_MARKER: Rectangle = Rectangle {
    left: 50,
    top: 50,
    right: 200,
    bottom: 200,
};

pub const CHANGE_LABEL: &str = "CHANGE DETECTED!";

/// Draw a rectangle outline `thickness` pixels wide, growing inward from
/// the corners. Anything outside the frame is clipped.
pub fn draw_rectangle(frame: &mut Frame, rect: Rectangle, color: [u8; 3], thickness: u32) {
    if rect.right < rect.left || rect.bottom < rect.top || thickness == 0 {
        return;
    }
    for y in rect.top..=rect.bottom {
        for x in rect.left..=rect.right {
            let on_edge = x < rect.left + thickness
                || x + thickness > rect.right
                || y < rect.top + thickness
                || y + thickness > rect.bottom;
            if on_edge {
                frame.put_pixel(x, y, color);
            }
        }
    }
}

/// The label shown while a change is detected.
pub fn change_label() -> Label {
    Label {
        x: CHANGE_MARKER.left,
        y: CHANGE_MARKER.top,
        text: CHANGE_LABEL.to_string(),
        color: RED,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rectangle_outline_only() {
        let mut frame = Frame::solid(10, 10, [0, 0, 0]);
        let rect = Rectangle { left: 2, top: 2, right: 7, bottom: 7 };
        draw_rectangle(&mut frame, rect, GREEN, 2);

        assert_eq!(frame.pixel(2, 2), Some(GREEN));
        assert_eq!(frame.pixel(3, 5), Some(GREEN));
        assert_eq!(frame.pixel(7, 7), Some(GREEN));
        assert_eq!(frame.pixel(6, 4), Some(GREEN));
        // Interior and exterior untouched
        assert_eq!(frame.pixel(4, 4), Some([0, 0, 0]));
        assert_eq!(frame.pixel(5, 5), Some([0, 0, 0]));
        assert_eq!(frame.pixel(1, 1), Some([0, 0, 0]));
        assert_eq!(frame.pixel(8, 8), Some([0, 0, 0]));
    }

    #[test]
    fn test_marker_is_clipped_on_small_frames() {
        let mut frame = Frame::solid(100, 80, [0, 0, 0]);
        draw_rectangle(&mut frame, CHANGE_MARKER, GREEN, 2);
        assert_eq!(frame.pixel(50, 50), Some(GREEN));
        assert_eq!(frame.pixel(99, 50), Some(GREEN));
        assert_eq!(frame.pixel(99, 60), Some([0, 0, 0]));
        assert_eq!(frame.pixel(50, 79), Some(GREEN));
        assert_eq!(frame.data().len(), 100 * 80 * 3);
    }

    #[test]
    fn test_change_label_position() {
        let label = change_label();
        assert_eq!((label.x, label.y), (50, 50));
        assert_eq!(label.text, "CHANGE DETECTED!");
        assert_eq!(label.color, RED);
    }
}
