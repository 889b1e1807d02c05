//! Webcam face, eye and smile detection with screenshots and recording.

use anyhow::{Context, Result};
use cascade_capture::{
    app::App,
    config::{KeyBindings, Settings},
};
use clap::Parser;
use log::{info, warn};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Camera index to use
    #[arg(long)]
    cam: Option<i32>,

    /// INI file with a [KEYS] section (exit, screenshot, pause, record)
    #[arg(short, long)]
    keys: Option<PathBuf>,

    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    config: Option<PathBuf>,

    /// Directory containing the Haar cascade XML files
    #[arg(long)]
    cascades: Option<PathBuf>,

    /// Directory for screenshots
    #[arg(long)]
    screenshots: Option<PathBuf>,

    /// Directory for recordings
    #[arg(long)]
    recordings: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    info!("Cascade Capture");

    let mut settings = if let Some(config_path) = &args.config {
        info!("Loading configuration from: {}", config_path.display());
        match Settings::from_file(config_path) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("Failed to load config file: {}. Using defaults.", e);
                Settings::default()
            }
        }
    } else {
        Settings::default()
    };

    if let Some(cam) = args.cam {
        settings.camera.index = cam;
    }
    if let Some(keys) = args.keys {
        settings.display.keys_file = keys;
    }
    if let Some(dir) = args.cascades {
        settings.detection.cascade_dir = dir;
    }
    if let Some(dir) = args.screenshots {
        settings.output.screenshot_dir = dir;
    }
    if let Some(dir) = args.recordings {
        settings.output.recording_dir = dir;
    }
    settings.validate().context("Invalid configuration")?;

    let bindings = KeyBindings::load_or_default(&settings.display.keys_file);

    let mut app = App::from_settings(&settings, bindings).context("Failed to start")?;
    app.run()?;

    Ok(())
}
