//! Seams between the session loop and whatever produces frames.

use super::types::{CameraError, Frame};

/// An open capture device. Dropping it releases the device.
pub trait FrameSource {
    /// Block until the next frame is available.
    fn read_frame(&mut self) -> Result<Frame, CameraError>;
}

/// Opens capture devices by index.
pub trait CameraBackend {
    type Device: FrameSource;

    fn open(&mut self, index: u32) -> Result<Self::Device, CameraError>;
}
