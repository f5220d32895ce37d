use std::error::Error;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::time::Instant;

use clap::Parser;

use change_sentry::alarm::{AlarmSink, SilentAlarm, SoundAlarm};
use change_sentry::camera::{self, CameraSettings, NokhwaBackend};
use change_sentry::cli::{self, Args, Command};
use change_sentry::config::{default_log_path, Config};
use change_sentry::input::{HeadlessKeys, KeySource, TerminalKeys};
use change_sentry::reference::ReferenceSet;
use change_sentry::session::Session;
use change_sentry::shutdown;
use change_sentry::terminal::{restore_terminal, NullPreview, Preview, TerminalPreview};

/// Set up `env_logger`. With `log_file` set, lines go there instead of
/// stderr so they do not scribble over the preview.
fn init_logging(log_file: Option<&Path>) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    // \r\n keeps stderr lines aligned while the terminal is in raw mode
    builder.format(|buf, record| {
        write!(
            buf,
            "[{} {}] {}\r\n",
            record.level(),
            record.target(),
            record.args()
        )
    });

    if let Some(path) = log_file {
        match open_log_file(path) {
            Ok(file) => {
                eprintln!("Logging to {}", path.display());
                builder.target(env_logger::Target::Pipe(Box::new(file)));
            }
            Err(e) => eprintln!("Warning: cannot open log file {}: {}", path.display(), e),
        }
    }
    builder.init();
}

fn open_log_file(path: &Path) -> std::io::Result<File> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

fn run(config: Config) -> Result<(), Box<dyn Error>> {
    let settings = CameraSettings {
        resolution: config.resolution()?,
        mirror: config.camera.mirror,
        ..CameraSettings::default()
    };
    let charset = config.charset()?;

    let mut backend = NokhwaBackend::new(settings);
    camera::probe_cameras(&mut backend, 0..config.camera.probe_count);

    let references = ReferenceSet::load(config.reference.images.clone(), Instant::now())?;

    let alarm: Box<dyn AlarmSink> = if config.alarm.mute {
        log::info!("Alarm sound muted");
        Box::new(SilentAlarm)
    } else {
        Box::new(SoundAlarm::new(
            config.alarm.sound.clone(),
            config.alarm.player.clone(),
        ))
    };

    if let Err(e) = shutdown::install_ctrlc_handler() {
        log::warn!("Failed to set Ctrl+C handler: {}", e);
    }

    let (preview, mut keys): (Box<dyn Preview>, Box<dyn KeySource>) = if config.preview.enabled {
        (
            Box::new(TerminalPreview::stdout(charset, config.preview.invert)) as Box<dyn Preview>,
            Box::new(TerminalKeys::new()?) as Box<dyn KeySource>,
        )
    } else {
        log::info!("Running headless; press Ctrl+C to stop");
        (
            Box::new(NullPreview) as Box<dyn Preview>,
            Box::new(HeadlessKeys) as Box<dyn KeySource>,
        )
    };

    let mut session = Session::new(backend, config.camera.device, references, alarm, preview);
    if config.camera.start_enabled {
        session.toggle_camera();
    } else {
        log::info!("Press 'c' to turn the camera on, 'q' to quit.");
    }

    session.run(&mut keys)?;
    log::info!("Stopped after {} alarm(s)", session.alarms_raised());
    Ok(())
}

fn main() {
    // dotenv::dotenv() returns Err if .env doesn't exist, which is fine
    let _ = dotenv::dotenv();

    let args = Args::parse();

    match &args.command {
        Some(Command::ListCameras) => {
            init_logging(None);
            let result = Config::load(args.config.as_deref())
                .map_err(Box::<dyn Error>::from)
                .and_then(|config| cli::list_cameras(&config).map_err(Box::<dyn Error>::from));
            if let Err(e) = result {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
        Some(Command::Config { action }) => {
            init_logging(None);
            if let Err(e) = cli::handle_config_action(action.clone(), args.config.as_deref()) {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
        None => {
            let mut config = match Config::load(args.config.as_deref()) {
                Ok(c) => c,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            };
            cli::apply_overrides(&mut config, &args);

            let log_file = config.preview.enabled.then(default_log_path);
            init_logging(log_file.as_deref());

            if let Err(e) = run(config) {
                restore_terminal();
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
    }
}
