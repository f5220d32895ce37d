//! Alarm output: the audible signal and the on-frame markers.

mod annotate;
mod sound;

use std::path::PathBuf;

pub use annotate::{
    change_label, draw_rectangle, Label, Rectangle, CHANGE_LABEL, CHANGE_MARKER, GREEN, RED,
};
pub use sound::{load_sound, SoundAlarm, DEFAULT_PLAYER};

/// Something that makes noise when a change is detected.
pub trait AlarmSink {
    fn sound(&mut self) -> Result<(), AlarmError>;
}

impl<T: AlarmSink + ?Sized> AlarmSink for Box<T> {
    fn sound(&mut self) -> Result<(), AlarmError> {
        (**self).sound()
    }
}

/// Errors from the audible alarm.
#[derive(Debug, thiserror::Error)]
pub enum AlarmError {
    #[error("Sound file not found: {}", .0.display())]
    SoundNotFound(PathBuf),

    #[error("Sound file '{}' is not a WAV file", .0.display())]
    InvalidSound(PathBuf),

    #[error("No sound player command configured")]
    NoPlayer,

    #[error("Failed to start sound player '{program}': {source}")]
    PlayerSpawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error playing '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Alarm that stays silent. Used when no sound output is wanted.
#[derive(Debug, Default)]
pub struct SilentAlarm;

impl AlarmSink for SilentAlarm {
    fn sound(&mut self) -> Result<(), AlarmError> {
        Ok(())
    }
}
