//! Camera access: device enumeration, probing and frame capture.
//!
//! The session loop only sees the [`CameraBackend`] and [`FrameSource`]
//! traits; [`NokhwaBackend`] is the implementation used against real
//! hardware.

mod capture;
mod device;
mod frame_utils;
mod source;
mod types;

pub use capture::{NokhwaBackend, NokhwaCamera};
pub use device::{list_devices, probe_cameras, ProbeResult};
pub use frame_utils::mirror_horizontal;
pub use source::{CameraBackend, FrameSource};
pub use types::{CameraError, CameraInfo, CameraSettings, Frame, Resolution};
