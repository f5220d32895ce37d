//! Camera device enumeration and the startup availability probe.

use std::ops::Range;

use nokhwa::query;
use nokhwa::utils::ApiBackend;

use super::source::CameraBackend;
use super::types::{CameraError, CameraInfo};

/// List all camera devices nokhwa can see.
///
/// No cameras is an empty vector, not an error.
pub fn list_devices() -> Result<Vec<CameraInfo>, CameraError> {
    let devices = query(ApiBackend::Auto).map_err(|e| CameraError::QueryFailed(e.to_string()))?;

    Ok(devices
        .into_iter()
        .map(|d| CameraInfo {
            index: d.index().as_index().unwrap_or(0),
            name: d.human_name(),
            description: d.description().to_string(),
        })
        .collect())
}

/// Outcome of probing one device index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeResult {
    pub index: u32,
    pub available: bool,
}

/// Try to open each index in `indices`, log whether it worked, and release
/// whatever was opened. Purely diagnostic.
pub fn probe_cameras<B: CameraBackend>(backend: &mut B, indices: Range<u32>) -> Vec<ProbeResult> {
    indices
        .map(|index| {
            let available = match backend.open(index) {
                Ok(device) => {
                    drop(device);
                    true
                }
                Err(e) => {
                    log::debug!("probe of camera {} failed: {}", index, e);
                    false
                }
            };
            if available {
                log::info!("Camera {} is available.", index);
            } else {
                log::info!("Camera {} is not available.", index);
            }
            ProbeResult { index, available }
        })
        .collect()
}
