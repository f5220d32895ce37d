//! Audible alarm: feeds a WAV file to an external player process.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};

use super::{AlarmError, AlarmSink};

/// Default player: ffplay reading the WAV from stdin, no window, exits when done.
pub const DEFAULT_PLAYER: &[&str] = &["ffplay", "-nodisp", "-autoexit", "-loglevel", "quiet", "-"];

/// Plays a sound file through an external player on every trigger.
///
/// The file is read from disk on every call; nothing is cached. At most one
/// player runs: a new trigger stops the previous one and starts over, and
/// dropping the alarm stops whatever is still playing.
#[derive(Debug)]
pub struct SoundAlarm {
    path: PathBuf,
    player: Vec<String>,
    current: Option<Child>,
}

impl SoundAlarm {
    pub fn new(path: impl Into<PathBuf>, player: Vec<String>) -> Self {
        Self {
            path: path.into(),
            player,
            current: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a player process is still running.
    pub fn is_playing(&mut self) -> bool {
        match self.current.as_mut().map(Child::try_wait) {
            Some(Ok(None)) => true,
            Some(_) => {
                self.current = None;
                false
            }
            None => false,
        }
    }

    /// Process id of the most recent player, if any was started.
    pub fn player_id(&self) -> Option<u32> {
        self.current.as_ref().map(Child::id)
    }

    /// Kill the running player, if any, and reap it.
    pub fn stop(&mut self) {
        if let Some(mut child) = self.current.take() {
            if matches!(child.try_wait(), Ok(None)) {
                let _ = child.kill();
            }
            let _ = child.wait();
        }
    }
}

impl AlarmSink for SoundAlarm {
    fn sound(&mut self) -> Result<(), AlarmError> {
        let bytes = load_sound(&self.path)?;
        let (program, args) = self.player.split_first().ok_or(AlarmError::NoPlayer)?;
        let (program, args) = (program.clone(), args.to_vec());

        self.stop();

        let mut child = Command::new(&program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| AlarmError::PlayerSpawn {
                program: program.clone(),
                source,
            })?;

        // Closing stdin (end of scope) tells the player the stream is complete.
        if let Some(mut stdin) = child.stdin.take() {
            if let Err(source) = stdin.write_all(&bytes) {
                let _ = child.kill();
                let _ = child.wait();
                return Err(AlarmError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        }

        self.current = Some(child);
        Ok(())
    }
}

impl Drop for SoundAlarm {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Read a sound file and check that it is a RIFF/WAVE file.
pub fn load_sound(path: &Path) -> Result<Vec<u8>, AlarmError> {
    let bytes = std::fs::read(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            AlarmError::SoundNotFound(path.to_path_buf())
        } else {
            AlarmError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    if !is_wav(&bytes) {
        return Err(AlarmError::InvalidSound(path.to_path_buf()));
    }
    Ok(bytes)
}

fn is_wav(bytes: &[u8]) -> bool {
    bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WAVE"
}
