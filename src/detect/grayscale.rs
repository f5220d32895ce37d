//! RGB to luma conversion using the ITU-R BT.601 weights.

use image::{GrayImage, Luma, Rgb, RgbImage};

use crate::camera::Frame;

/// Convert an RGB frame to an 8-bit luma image.
///
/// Y = 0.299*R + 0.587*G + 0.114*B, computed with integer weights scaled
/// by 1000 to stay out of floating point in the per-frame path.
pub fn to_luma(frame: &Frame) -> GrayImage {
    let width = frame.width();
    let data = frame.data();
    GrayImage::from_fn(width, frame.height(), |x, y| {
        let i = (y as usize * width as usize + x as usize) * Frame::BYTES_PER_PIXEL;
        Luma([luma(data[i], data[i + 1], data[i + 2])])
    })
}

/// Convert a decoded RGB image with the same weights as [`to_luma`].
///
/// References must share the frame scale; `DynamicImage::to_luma8` uses
/// Rec.709 weights instead.
pub fn rgb_to_luma(image: &RgbImage) -> GrayImage {
    GrayImage::from_fn(image.width(), image.height(), |x, y| {
        let Rgb([r, g, b]) = *image.get_pixel(x, y);
        Luma([luma(r, g, b)])
    })
}

#[inline]
pub fn luma(r: u8, g: u8, b: u8) -> u8 {
    ((299 * r as u32 + 587 * g as u32 + 114 * b as u32) / 1000) as u8
}
