//! CLI argument parsing with clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::enums::CharacterSet;

/// Watches a webcam and sounds an alarm when the picture departs from a
/// set of reference images
#[derive(Parser, Debug)]
#[command(name = "change-sentry")]
#[command(version, about = "Webcam change detector with audible alarm", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Camera device index opened on 'c' (from list-cameras)
    #[arg(long)]
    pub camera: Option<u32>,

    /// Reference image; repeat to rotate through several
    #[arg(long = "reference", short, value_name = "PATH")]
    pub references: Vec<PathBuf>,

    /// WAV file played on change
    #[arg(long)]
    pub sound: Option<PathBuf>,

    /// Open the camera at startup
    #[arg(long)]
    pub camera_on: bool,

    /// No terminal preview or key input; stop with Ctrl+C
    #[arg(long)]
    pub headless: bool,

    /// Do not play the alarm sound
    #[arg(long)]
    pub mute: bool,

    /// Mirror camera horizontally
    #[arg(long)]
    pub mirror: bool,

    /// ASCII character set for the preview
    #[arg(long)]
    pub charset: Option<CharacterSet>,

    /// Invert brightness (for light terminals)
    #[arg(long)]
    pub invert: bool,

    /// Config file path
    #[arg(long, short)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List and probe available cameras
    ListCameras,
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Show the effective configuration
    Show,
    /// Create default config file
    Init,
}
