//! Frame conversion and transformation utilities.

use nokhwa::pixel_format::RgbFormat;

use super::types::Frame;

/// Convert a nokhwa buffer to an RGB [`Frame`].
///
/// nokhwa's `decode_image` handles MJPEG, YUYV, NV12 and friends.
/// Returns `None` if the buffer cannot be decoded.
pub fn convert_to_rgb(buffer: &nokhwa::Buffer) -> Option<Frame> {
    let decoded = buffer.decode_image::<RgbFormat>().ok()?;
    let resolution = buffer.resolution();
    Frame::from_rgb(decoded.into_raw(), resolution.width(), resolution.height())
}

/// Mirror a frame horizontally (flip left-right).
pub fn mirror_horizontal(frame: &mut Frame) {
    let width = frame.width() as usize;
    let bpp = Frame::BYTES_PER_PIXEL;

    for row in frame.data_mut().chunks_exact_mut(width * bpp) {
        for x in 0..width / 2 {
            let left = x * bpp;
            let right = (width - 1 - x) * bpp;
            for i in 0..bpp {
                row.swap(left + i, right + i);
            }
        }
    }
}
