//! nokhwa-backed capture devices.

use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{
    CameraFormat, CameraIndex, FrameFormat as NokhwaFrameFormat, RequestedFormat,
    RequestedFormatType,
};
use nokhwa::Camera;

use super::frame_utils::{convert_to_rgb, mirror_horizontal};
use super::source::{CameraBackend, FrameSource};
use super::types::{CameraError, CameraSettings, Frame, Resolution};

/// Opens system cameras through nokhwa.
#[derive(Debug, Clone, Default)]
pub struct NokhwaBackend {
    settings: CameraSettings,
}

impl NokhwaBackend {
    pub fn new(settings: CameraSettings) -> Self {
        Self { settings }
    }
}

impl CameraBackend for NokhwaBackend {
    type Device = NokhwaCamera;

    fn open(&mut self, index: u32) -> Result<NokhwaCamera, CameraError> {
        NokhwaCamera::open(index, &self.settings)
    }
}

/// An open camera with a running stream.
///
/// The stream is stopped when the value is dropped.
pub struct NokhwaCamera {
    camera: Camera,
    index: u32,
    mirror: bool,
    resolution: Resolution,
}

impl std::fmt::Debug for NokhwaCamera {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NokhwaCamera")
            .field("index", &self.index)
            .field("resolution", &self.resolution)
            .finish_non_exhaustive()
    }
}

impl NokhwaCamera {
    /// Open the device at `index` and start its stream.
    pub fn open(index: u32, settings: &CameraSettings) -> Result<Self, CameraError> {
        let mut camera = open_camera_with_fallback(index, settings)?;
        camera
            .open_stream()
            .map_err(|e| CameraError::StreamFailed(e.to_string()))?;

        let res = camera.resolution();
        let resolution = Resolution {
            width: res.width(),
            height: res.height(),
        };
        log::debug!("camera {} streaming at {}", index, resolution);

        Ok(Self {
            camera,
            index,
            mirror: settings.mirror,
            resolution,
        })
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    /// Resolution negotiated with the device.
    pub fn resolution(&self) -> Resolution {
        self.resolution
    }
}

impl FrameSource for NokhwaCamera {
    fn read_frame(&mut self) -> Result<Frame, CameraError> {
        let raw = self
            .camera
            .frame()
            .map_err(|e| CameraError::ReadFailed(e.to_string()))?;
        let mut frame = convert_to_rgb(&raw)
            .ok_or_else(|| CameraError::ReadFailed("undecodable frame".to_string()))?;
        if self.mirror {
            mirror_horizontal(&mut frame);
        }
        Ok(frame)
    }
}

impl Drop for NokhwaCamera {
    fn drop(&mut self) {
        let _ = self.camera.stop_stream();
        log::debug!("camera {} released", self.index);
    }
}

/// Try to open a camera with several format strategies.
///
/// Order: closest MJPEG match, closest NV12 match, then whatever the
/// device offers at its highest resolution.
fn open_camera_with_fallback(index: u32, settings: &CameraSettings) -> Result<Camera, CameraError> {
    let requested_res =
        nokhwa::utils::Resolution::new(settings.resolution.width, settings.resolution.height);
    let format_attempts = [
        RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(CameraFormat::new(
            requested_res,
            NokhwaFrameFormat::MJPEG,
            settings.fps,
        ))),
        RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(CameraFormat::new(
            requested_res,
            NokhwaFrameFormat::NV12,
            settings.fps,
        ))),
        RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestResolution),
    ];

    let mut last_error = String::from("no format attempted");
    for requested in format_attempts {
        match Camera::new(CameraIndex::Index(index), requested) {
            Ok(cam) => return Ok(cam),
            Err(e) => last_error = e.to_string(),
        }
    }

    let msg = last_error.to_lowercase();
    if msg.contains("permission") || msg.contains("denied") || msg.contains("authorization") {
        Err(CameraError::PermissionDenied)
    } else {
        Err(CameraError::OpenFailed {
            index,
            message: last_error,
        })
    }
}
