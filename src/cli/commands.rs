//! Subcommand handlers and CLI-over-config merging.

use std::path::Path;

use super::args::{Args, ConfigAction};
use crate::camera::{self, CameraError, CameraSettings, NokhwaBackend};
use crate::config::{self, Config, ConfigError};

/// Apply command-line flags on top of the loaded configuration.
pub fn apply_overrides(config: &mut Config, args: &Args) {
    if let Some(device) = args.camera {
        config.camera.device = device;
    }
    if !args.references.is_empty() {
        config.reference.images = args.references.clone();
    }
    if let Some(sound) = &args.sound {
        config.alarm.sound = sound.clone();
    }
    if let Some(charset) = args.charset {
        config.preview.charset = crate::ascii::CharSet::from(charset).name().to_string();
    }
    config.camera.start_enabled |= args.camera_on;
    config.camera.mirror |= args.mirror;
    config.alarm.mute |= args.mute;
    config.preview.invert |= args.invert;
    if args.headless {
        config.preview.enabled = false;
    }
}

/// List the cameras the platform reports, then probe the configured range.
pub fn list_cameras(config: &Config) -> Result<(), CameraError> {
    let devices = camera::list_devices()?;
    if devices.is_empty() {
        println!("No cameras found.");
        println!();
        println!("Make sure your camera is connected and permissions are granted.");
    } else {
        println!("Available cameras:");
        for device in devices {
            println!("  {}", device);
        }
    }

    println!();
    let mut backend = NokhwaBackend::new(CameraSettings::default());
    let probed = camera::probe_cameras(&mut backend, 0..config.camera.probe_count);
    for result in &probed {
        let status = if result.available { "available" } else { "not available" };
        println!("  camera {}: {}", result.index, status);
    }
    println!();
    println!("Use --camera <index> to select a camera.");
    Ok(())
}

/// Handle config subcommand actions.
pub fn handle_config_action(
    action: ConfigAction,
    config_path: Option<&Path>,
) -> Result<(), ConfigError> {
    let path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(config::default_path);

    match action {
        ConfigAction::Show => {
            let config = Config::load(config_path)?;
            if path.exists() {
                println!("# Config file: {} (exists)", path.display());
            } else {
                println!("# Config file: {} (not found, using defaults)", path.display());
            }
            println!();
            print!("{}", config.to_toml()?);
        }
        ConfigAction::Init => {
            config::init_config(&path)?;
            println!("Created config file: {}", path.display());
        }
    }
    Ok(())
}
