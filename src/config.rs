//! Configuration management: key bindings (INI) and application settings (YAML)

use crate::constants::{
    DEFAULT_CASCADE_DIR, DEFAULT_EXIT_KEY, DEFAULT_KEYS_FILE, DEFAULT_PAUSE_KEY, DEFAULT_RECORDING_DIR,
    DEFAULT_RECORD_KEY, DEFAULT_SCREENSHOT_DIR, DEFAULT_SCREENSHOT_KEY, EYE_MIN_NEIGHBORS, EYE_SCALE_FACTOR,
    FACE_MIN_NEIGHBORS, FACE_SCALE_FACTOR, KEYS_SECTION, RECORDING_FPS, REQUESTED_CAPTURE_FPS,
    SMILE_MIN_NEIGHBORS, SMILE_SCALE_FACTOR, WINDOW_TITLE,
};
use crate::{Error, Result};
use config::{Config as IniSource, File, FileFormat, Map, Value};
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Keys bound to the four interactive commands.
///
/// Resolved once at startup and never changed afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBindings {
    /// Quit the application
    pub exit: char,
    /// Save the last frame as a JPEG
    pub screenshot: char,
    /// Freeze or resume capture
    pub pause: char,
    /// Start or stop a recording session
    pub record: char,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            exit: DEFAULT_EXIT_KEY,
            screenshot: DEFAULT_SCREENSHOT_KEY,
            pause: DEFAULT_PAUSE_KEY,
            record: DEFAULT_RECORD_KEY,
        }
    }
}

impl KeyBindings {
    /// Load bindings from the `[KEYS]` section of an INI file
    ///
    /// Section and entry names are matched without regard to case.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the section is missing,
    /// or any of the four entries is absent or not a single printable character.
    pub fn from_ini_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_ini_str(&content)
    }

    /// Parse bindings from INI text
    ///
    /// # Errors
    ///
    /// Same conditions as [`KeyBindings::from_ini_file`], minus the file read.
    pub fn from_ini_str(content: &str) -> Result<Self> {
        let source = IniSource::builder()
            .add_source(File::from_str(content, FileFormat::Ini))
            .build()?;

        let section = source
            .collect()?
            .into_iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(KEYS_SECTION))
            .map(|(_, value)| value)
            .ok_or_else(|| Error::ConfigError(format!("Missing [{KEYS_SECTION}] section")))?
            .into_table()?;

        Ok(Self {
            exit: binding(&section, "exit")?,
            screenshot: binding(&section, "screenshot")?,
            pause: binding(&section, "pause")?,
            record: binding(&section, "record")?,
        })
    }

    /// Load bindings, falling back to the defaults on any problem.
    ///
    /// The fallback is silent for the user; the reason is only logged at debug level.
    #[must_use]
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::from_ini_file(&path) {
            Ok(bindings) => bindings,
            Err(e) => {
                debug!(
                    "Using default key bindings ({}): {}",
                    path.as_ref().display(),
                    e
                );
                Self::default()
            }
        }
    }
}

/// Look up a single-character entry, ignoring key case
fn binding(section: &Map<String, Value>, name: &str) -> Result<char> {
    let value = section
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.clone())
        .ok_or_else(|| Error::ConfigError(format!("Missing key binding '{name}'")))?;

    let text = value.into_string()?;
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_graphic() => Ok(c),
        _ => Err(Error::ConfigError(format!(
            "Key binding '{name}' must be a single printable character, got '{text}'"
        ))),
    }
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Settings {
    /// Camera configuration
    pub camera: CameraSettings,

    /// Cascade detector configuration
    pub detection: DetectionSettings,

    /// Output locations and recording rate
    pub output: OutputSettings,

    /// Window and key binding configuration
    pub display: DisplaySettings,
}

/// Camera parameters
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraSettings {
    /// Camera device index
    pub index: i32,

    /// Capture rate requested from the device
    pub requested_fps: f64,
}

/// Tuning for one cascade detector
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CascadeParams {
    /// Image pyramid step between scans
    pub scale_factor: f64,

    /// Neighbouring candidates required to keep a region
    pub min_neighbors: i32,
}

/// Cascade detector parameters
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DetectionSettings {
    /// Directory containing the Haar cascade XML files
    pub cascade_dir: PathBuf,

    /// Face detector tuning
    pub face: CascadeParams,

    /// Eye detector tuning
    pub eyes: CascadeParams,

    /// Smile detector tuning
    pub smile: CascadeParams,
}

/// Output file configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputSettings {
    /// Directory for numbered screenshots
    pub screenshot_dir: PathBuf,

    /// Directory for numbered recordings
    pub recording_dir: PathBuf,

    /// Container frame rate of recordings
    pub recording_fps: f64,
}

/// Display configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DisplaySettings {
    /// Window title
    pub window_title: String,

    /// INI file holding the `[KEYS]` section
    pub keys_file: PathBuf,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            index: 0,
            requested_fps: REQUESTED_CAPTURE_FPS,
        }
    }
}

impl Default for DetectionSettings {
    fn default() -> Self {
        Self {
            cascade_dir: PathBuf::from(DEFAULT_CASCADE_DIR),
            face: CascadeParams {
                scale_factor: FACE_SCALE_FACTOR,
                min_neighbors: FACE_MIN_NEIGHBORS,
            },
            eyes: CascadeParams {
                scale_factor: EYE_SCALE_FACTOR,
                min_neighbors: EYE_MIN_NEIGHBORS,
            },
            smile: CascadeParams {
                scale_factor: SMILE_SCALE_FACTOR,
                min_neighbors: SMILE_MIN_NEIGHBORS,
            },
        }
    }
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            screenshot_dir: PathBuf::from(DEFAULT_SCREENSHOT_DIR),
            recording_dir: PathBuf::from(DEFAULT_RECORDING_DIR),
            recording_fps: RECORDING_FPS,
        }
    }
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            window_title: WINDOW_TITLE.to_string(),
            keys_file: PathBuf::from(DEFAULT_KEYS_FILE),
        }
    }
}

impl Settings {
    /// Load settings from a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;

        serde_yaml::from_str(&content).map_err(|e| Error::ConfigError(format!("Failed to parse config: {e}")))
    }

    /// Save settings to a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .map_err(|e| Error::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content)?;

        Ok(())
    }

    /// Validate settings
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` naming the first invalid field.
    pub fn validate(&self) -> Result<()> {
        for (name, params) in [
            ("face", self.detection.face),
            ("eyes", self.detection.eyes),
            ("smile", self.detection.smile),
        ] {
            if !(params.scale_factor > 1.0) {
                return Err(Error::ConfigError(format!(
                    "{name} scale factor must be greater than 1.0"
                )));
            }
            if params.min_neighbors < 0 {
                return Err(Error::ConfigError(format!(
                    "{name} min neighbors must not be negative"
                )));
            }
        }

        if !(self.output.recording_fps > 0.0) {
            return Err(Error::ConfigError("Recording FPS must be greater than 0".to_string()));
        }
        if !(self.camera.requested_fps > 0.0) {
            return Err(Error::ConfigError("Requested camera FPS must be greater than 0".to_string()));
        }
        if self.display.window_title.trim().is_empty() {
            return Err(Error::ConfigError("Window title must not be empty".to_string()));
        }

        Ok(())
    }
}

/// Example settings file content
pub const EXAMPLE_CONFIG: &str = r#"# Cascade capture configuration

camera:
  index: 0
  requested_fps: 144.0

detection:
  cascade_dir: "/usr/share/opencv4/haarcascades"
  face:
    scale_factor: 1.1
    min_neighbors: 5
  eyes:
    scale_factor: 1.1
    min_neighbors: 10
  smile:
    scale_factor: 1.5
    min_neighbors: 20

output:
  screenshot_dir: "screenshots"
  recording_dir: "recordings"
  recording_fps: 20.0

display:
  window_title: "Webcam Feed"
  keys_file: "config.ini"
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_bindings_from_ini() {
        let bindings = KeyBindings::from_ini_str("[KEYS]\nexit = x\nscreenshot = c\npause = z\nrecord = v\n").unwrap();
        assert_eq!(
            bindings,
            KeyBindings {
                exit: 'x',
                screenshot: 'c',
                pause: 'z',
                record: 'v'
            }
        );
    }

    #[test]
    fn test_missing_section_is_error() {
        let result = KeyBindings::from_ini_str("[OTHER]\nexit = x\n");
        assert!(matches!(result, Err(Error::ConfigError(_))));
    }

    #[test]
    fn test_multi_character_binding_is_error() {
        let result = KeyBindings::from_ini_str("[KEYS]\nexit = esc\nscreenshot = s\npause = p\nrecord = r\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_partial_section_is_error() {
        let result = KeyBindings::from_ini_str("[KEYS]\nexit = x\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_example_config_matches_defaults() {
        let settings: Settings = serde_yaml::from_str(EXAMPLE_CONFIG).unwrap();
        assert_eq!(settings, Settings::default());
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let settings: Settings = serde_yaml::from_str("camera:\n  index: 2\n").unwrap();
        assert_eq!(settings.camera.index, 2);
        assert_eq!(settings.detection, DetectionSettings::default());
        assert_eq!(settings.output.recording_fps, RECORDING_FPS);
    }

    #[test]
    fn test_validate_rejects_bad_scale_factor() {
        let mut settings = Settings::default();
        settings.detection.smile.scale_factor = 1.0;
        assert!(matches!(settings.validate(), Err(Error::ConfigError(msg)) if msg.contains("smile")));
    }

    #[test]
    fn test_validate_rejects_zero_recording_fps() {
        let mut settings = Settings::default();
        settings.output.recording_fps = 0.0;
        assert!(settings.validate().is_err());
    }
}
