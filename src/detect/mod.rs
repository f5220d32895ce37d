//! Frame-versus-reference change detection.
//!
//! Pipeline: luma conversion, reference alignment, absolute difference,
//! binarization at [`PIXEL_THRESHOLD`], nonzero count. A frame counts as
//! changed when more than [`CHANGE_THRESHOLD`] pixels survive.

mod diff;
mod grayscale;

use image::GrayImage;

use crate::camera::Frame;

pub use diff::{abs_diff, align_reference, count_nonzero, threshold_binary};
pub use grayscale::{luma, rgb_to_luma, to_luma};

/// Per-pixel intensity difference at which a pixel counts as changed.
pub const PIXEL_THRESHOLD: u8 = 50;

/// A change is declared when strictly more pixels than this differ.
pub const CHANGE_THRESHOLD: usize = 1000;

/// Result of comparing one frame with the reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Detection {
    pub changed_pixels: usize,
}

impl Detection {
    pub fn is_change(&self) -> bool {
        self.changed_pixels > CHANGE_THRESHOLD
    }
}

/// Compare `frame` with a luma `reference` of any size.
pub fn detect(frame: &Frame, reference: &GrayImage) -> Detection {
    let gray_frame = to_luma(frame);
    let gray_reference = align_reference(reference, frame.width(), frame.height());
    let diff = abs_diff(&gray_frame, &gray_reference);
    let thresh = threshold_binary(&diff, PIXEL_THRESHOLD);
    Detection {
        changed_pixels: count_nonzero(&thresh),
    }
}
