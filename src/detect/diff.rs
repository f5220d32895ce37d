//! Difference map primitives: align, subtract, binarize, count.

use std::borrow::Cow;

use image::imageops::{self, FilterType};
use image::{GrayImage, Luma};

/// Return the reference at `width` x `height`.
///
/// A resized copy is produced when the sizes differ; the stored reference
/// is never touched.
pub fn align_reference(reference: &GrayImage, width: u32, height: u32) -> Cow<'_, GrayImage> {
    if reference.dimensions() == (width, height) {
        Cow::Borrowed(reference)
    } else {
        Cow::Owned(imageops::resize(reference, width, height, FilterType::Triangle))
    }
}

/// Absolute per-pixel difference of two same-sized images.
///
/// Panics if the dimensions differ; callers align first.
pub fn abs_diff(a: &GrayImage, b: &GrayImage) -> GrayImage {
    assert_eq!(
        a.dimensions(),
        b.dimensions(),
        "abs_diff needs equally sized images"
    );
    let (width, height) = a.dimensions();
    let data = a
        .as_raw()
        .iter()
        .zip(b.as_raw())
        .map(|(&x, &y)| x.abs_diff(y))
        .collect();
    GrayImage::from_raw(width, height, data).unwrap_or_else(|| GrayImage::new(width, height))
}

/// Binarize: values at or above `threshold` become 255, the rest 0.
pub fn threshold_binary(diff: &GrayImage, threshold: u8) -> GrayImage {
    let mut out = diff.clone();
    for Luma([v]) in out.pixels_mut() {
        *v = if *v >= threshold { 255 } else { 0 };
    }
    out
}

pub fn count_nonzero(image: &GrayImage) -> usize {
    image.as_raw().iter().filter(|&&v| v != 0).count()
}
