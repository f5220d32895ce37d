//! Configuration file handling.
//!
//! Loaded from `<config dir>/change-sentry/config.toml` or a path given
//! with `--config`. Every key is optional; missing keys take the defaults
//! below.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::alarm::DEFAULT_PLAYER;
use crate::ascii::CharSet;
use crate::camera::Resolution;

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub camera: CameraConfig,
    pub reference: ReferenceConfig,
    pub alarm: AlarmConfig,
    pub preview: PreviewConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Device opened when the camera is toggled on
    pub device: u32,
    /// Indices 0..probe_count are probed at startup
    pub probe_count: u32,
    pub mirror: bool,
    /// Open the camera immediately instead of waiting for `c`
    pub start_enabled: bool,
    pub resolution: String,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            device: 0,
            probe_count: 2,
            mirror: false,
            start_enabled: false,
            resolution: Resolution::default().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ReferenceConfig {
    pub images: Vec<PathBuf>,
}

impl Default for ReferenceConfig {
    fn default() -> Self {
        Self {
            images: vec![PathBuf::from("graphic1.jpg")],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AlarmConfig {
    pub sound: PathBuf,
    /// Player command; the WAV bytes arrive on its stdin
    pub player: Vec<String>,
    pub mute: bool,
}

impl Default for AlarmConfig {
    fn default() -> Self {
        Self {
            sound: PathBuf::from("beep.wav"),
            player: DEFAULT_PLAYER.iter().map(|s| s.to_string()).collect(),
            mute: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PreviewConfig {
    pub enabled: bool,
    pub charset: String,
    pub invert: bool,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            charset: CharSet::default().name().to_string(),
            invert: false,
        }
    }
}

/// Written by `config init`.
pub const DEFAULT_CONFIG: &str = r#"# change-sentry configuration

[camera]
# Camera opened when toggled on with 'c'
device = 0
# Indices probed at startup (0..probe_count)
probe_count = 2
# Mirror horizontally
mirror = false
# Open the camera at startup
start_enabled = false
# Requested capture resolution
resolution = "640x480"

[reference]
# Images compared against, rotated every 0.5 s
images = ["graphic1.jpg"]

[alarm]
# WAV file played on every detected change
sound = "beep.wav"
# Player command; receives the WAV on stdin
player = ["ffplay", "-nodisp", "-autoexit", "-loglevel", "quiet", "-"]
# Skip the sound, keep the on-screen marker
mute = false

[preview]
# Show the ASCII preview in the terminal
enabled = true
# Character set: standard, blocks, minimal
charset = "standard"
# Invert brightness (for light themes)
invert = false
"#;

impl Config {
    /// Load configuration.
    ///
    /// With `Some(path)` the file must exist. With `None` the default path
    /// is used and a missing file yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (default_path(), false),
        };

        if !path.exists() {
            if explicit {
                return Err(ConfigError::NotFound(path));
            }
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        let config = Self::parse(&content).map_err(|e| match e {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.clone(),
                source,
            },
            other => other,
        })?;
        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse and validate TOML text.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: PathBuf::new(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.resolution()?;
        self.charset()?;
        if self.reference.images.is_empty() {
            return Err(ConfigError::Invalid {
                field: "reference.images",
                message: "at least one image is required".to_string(),
            });
        }
        Ok(())
    }

    pub fn resolution(&self) -> Result<Resolution, ConfigError> {
        self.camera
            .resolution
            .parse()
            .map_err(|message| ConfigError::Invalid {
                field: "camera.resolution",
                message,
            })
    }

    pub fn charset(&self) -> Result<CharSet, ConfigError> {
        self.preview
            .charset
            .parse()
            .map_err(|message| ConfigError::Invalid {
                field: "preview.charset",
                message,
            })
    }

    /// The effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }
}

/// Write [`DEFAULT_CONFIG`] to `path`, creating parent directories.
/// Refuses to overwrite an existing file.
pub fn init_config(path: &Path) -> Result<(), ConfigError> {
    if path.exists() {
        return Err(ConfigError::AlreadyExists(path.to_path_buf()));
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    std::fs::write(path, DEFAULT_CONFIG).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Config file already exists: {}", .0.display())]
    AlreadyExists(PathBuf),

    #[error("Failed to read config file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid value for {field}: {message}")]
    Invalid { field: &'static str, message: String },

    #[error("Failed to serialize config: {0}")]
    Serialize(#[source] toml::ser::Error),
}

/// Default config file location.
pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("change-sentry").join("config.toml"))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config/change-sentry/config.toml")
        })
}

/// Where log lines go while the terminal preview owns the screen.
pub fn default_log_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("change-sentry")
        .join("change-sentry.log")
}
