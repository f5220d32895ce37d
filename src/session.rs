//! The change-detection loop and the state it owns.
//!
//! A [`Session`] holds the camera handle, the reference set and the output
//! sinks. Each iteration reads a frame (when the camera is on), compares it
//! with the current reference, raises the alarm on change, shows the
//! annotated frame, rotates the reference when due, then polls the keyboard.

use std::io;
use std::time::{Duration, Instant};

use crate::alarm::{change_label, draw_rectangle, AlarmError, AlarmSink, Label, CHANGE_MARKER, GREEN};
use crate::camera::{CameraBackend, CameraError, FrameSource};
use crate::detect::{detect, Detection};
use crate::input::{KeyCommand, KeySource};
use crate::reference::{ReferenceError, ReferenceSet};
use crate::terminal::{Preview, PreviewFrame, StatusLine};

/// How long each iteration waits for a key press.
pub const KEY_POLL: Duration = Duration::from_millis(1);

/// Thickness of the change marker outline in pixels.
const MARKER_THICKNESS: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraState {
    Disabled,
    Enabled,
}

/// What the loop should do after an iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Quit,
}

/// Errors that end a session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Camera(#[from] CameraError),

    #[error(transparent)]
    Reference(#[from] ReferenceError),

    #[error(transparent)]
    Alarm(#[from] AlarmError),

    #[error("Display error: {0}")]
    Display(#[source] io::Error),

    #[error("Keyboard error: {0}")]
    Input(#[source] io::Error),
}

pub struct Session<B: CameraBackend, A: AlarmSink, P: Preview> {
    backend: B,
    device_index: u32,
    camera: Option<B::Device>,
    references: ReferenceSet,
    alarm: A,
    preview: P,
    last_detection: Option<Detection>,
    alarms_raised: u64,
}

impl<B: CameraBackend, A: AlarmSink, P: Preview> Session<B, A, P> {
    /// A session with the camera off.
    pub fn new(backend: B, device_index: u32, references: ReferenceSet, alarm: A, preview: P) -> Self {
        Self {
            backend,
            device_index,
            camera: None,
            references,
            alarm,
            preview,
            last_detection: None,
            alarms_raised: 0,
        }
    }

    pub fn camera_state(&self) -> CameraState {
        if self.camera.is_some() {
            CameraState::Enabled
        } else {
            CameraState::Disabled
        }
    }

    pub fn references(&self) -> &ReferenceSet {
        &self.references
    }

    pub fn alarm(&self) -> &A {
        &self.alarm
    }

    pub fn preview(&self) -> &P {
        &self.preview
    }

    /// Detection from the most recent frame, if any frame was processed.
    pub fn last_detection(&self) -> Option<Detection> {
        self.last_detection
    }

    pub fn alarms_raised(&self) -> u64 {
        self.alarms_raised
    }

    /// Turn the camera off if it is on, on if it is off.
    ///
    /// A failed open is logged and leaves the camera off.
    pub fn toggle_camera(&mut self) -> CameraState {
        if let Some(camera) = self.camera.take() {
            drop(camera);
            if let Err(e) = self.preview.close() {
                log::warn!("Failed to close preview: {}", e);
            }
            log::info!("Camera turned off.");
        } else {
            match self.backend.open(self.device_index) {
                Ok(camera) => {
                    self.camera = Some(camera);
                    log::info!("Camera turned on.");
                }
                Err(e) => log::error!("Error opening the camera! {}", e),
            }
        }
        self.camera_state()
    }

    /// Run the camera half of an iteration: capture, detect, alarm, show,
    /// rotate. Does nothing while the camera is off.
    pub fn process_frame(&mut self, now: Instant) -> Result<(), SessionError> {
        let Some(camera) = self.camera.as_mut() else {
            return Ok(());
        };

        let mut frame = match camera.read_frame() {
            Ok(frame) => frame,
            Err(e) => {
                log::error!("Failed to capture image from the camera! {}", e);
                return Err(e.into());
            }
        };

        let detection = detect(&frame, self.references.image());
        self.last_detection = Some(detection);
        log::debug!("changed pixels: {}", detection.changed_pixels);

        let mut labels: Vec<Label> = Vec::new();
        if detection.is_change() {
            draw_rectangle(&mut frame, CHANGE_MARKER, GREEN, MARKER_THICKNESS);
            self.signal_change(&mut labels)?;
        }

        let status = StatusLine {
            changed_pixels: detection.changed_pixels,
            alarm: detection.is_change(),
            reference: self.references.current_path().display().to_string(),
            reference_index: self.references.index(),
            reference_count: self.references.len(),
        };
        self.preview
            .show(&PreviewFrame {
                frame: &frame,
                labels: &labels,
                status: &status,
            })
            .map_err(SessionError::Display)?;

        self.references.rotate_if_due(now)?;
        Ok(())
    }

    fn signal_change(&mut self, labels: &mut Vec<Label>) -> Result<(), AlarmError> {
        log::warn!("Change detected! Alarm activated.");
        self.alarm.sound()?;
        labels.push(change_label());
        self.alarms_raised += 1;
        Ok(())
    }

    /// Apply a key command.
    pub fn handle_command(&mut self, command: Option<KeyCommand>) -> LoopControl {
        match command {
            Some(KeyCommand::Quit) => LoopControl::Quit,
            Some(KeyCommand::ToggleCamera) => {
                self.toggle_camera();
                LoopControl::Continue
            }
            None => LoopControl::Continue,
        }
    }

    /// One full loop iteration at time `now`.
    pub fn step<K: KeySource>(&mut self, keys: &mut K, now: Instant) -> Result<LoopControl, SessionError> {
        self.process_frame(now)?;
        let command = keys.poll_command(KEY_POLL).map_err(SessionError::Input)?;
        Ok(self.handle_command(command))
    }

    /// Loop until quit or a fatal error, then release everything.
    pub fn run<K: KeySource>(&mut self, keys: &mut K) -> Result<(), SessionError> {
        let result = loop {
            match self.step(keys, Instant::now()) {
                Ok(LoopControl::Continue) => continue,
                Ok(LoopControl::Quit) => break Ok(()),
                Err(e) => break Err(e),
            }
        };
        self.shutdown();
        result
    }

    /// Release the camera and close the preview.
    pub fn shutdown(&mut self) {
        if self.camera.take().is_some() {
            log::debug!("camera released on shutdown");
        }
        if let Err(e) = self.preview.close() {
            log::warn!("Failed to close preview: {}", e);
        }
    }
}
