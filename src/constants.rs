//! Constants used throughout the application

/// Face cascade scale factor
pub const FACE_SCALE_FACTOR: f64 = 1.1;
/// Face cascade minimum neighbours
pub const FACE_MIN_NEIGHBORS: i32 = 5;

/// Eye cascade scale factor
pub const EYE_SCALE_FACTOR: f64 = 1.1;
/// Eye cascade minimum neighbours
pub const EYE_MIN_NEIGHBORS: i32 = 10;

/// Smile cascade scale factor
pub const SMILE_SCALE_FACTOR: f64 = 1.5;
/// Smile cascade minimum neighbours
pub const SMILE_MIN_NEIGHBORS: i32 = 20;

/// Haar cascade file names, looked up inside the cascade directory
pub const FACE_CASCADE_FILE: &str = "haarcascade_frontalface_default.xml";
pub const EYE_CASCADE_FILE: &str = "haarcascade_eye.xml";
pub const SMILE_CASCADE_FILE: &str = "haarcascade_smile.xml";

/// Default directory holding the Haar cascade XML files
pub const DEFAULT_CASCADE_DIR: &str = "/usr/share/opencv4/haarcascades";

/// Container rate of recorded videos, independent of the live capture rate
pub const RECORDING_FPS: f64 = 20.0;

/// Capture rate requested from the camera on open
pub const REQUESTED_CAPTURE_FPS: f64 = 144.0;

/// Key poll wait in milliseconds
pub const KEY_POLL_WAIT_MS: i32 = 1;

/// Default output locations
pub const DEFAULT_SCREENSHOT_DIR: &str = "screenshots";
pub const DEFAULT_RECORDING_DIR: &str = "recordings";
pub const SCREENSHOT_STEM: &str = "screenshot";
pub const SCREENSHOT_EXTENSION: &str = "jpg";
pub const RECORDING_STEM: &str = "recording";
pub const RECORDING_EXTENSION: &str = "mp4";

/// Default key binding file and its section
pub const DEFAULT_KEYS_FILE: &str = "config.ini";
pub const KEYS_SECTION: &str = "KEYS";

/// Default key bindings
pub const DEFAULT_EXIT_KEY: char = 'q';
pub const DEFAULT_SCREENSHOT_KEY: char = 's';
pub const DEFAULT_PAUSE_KEY: char = 'p';
pub const DEFAULT_RECORD_KEY: char = 'r';

/// Main window title
pub const WINDOW_TITLE: &str = "Webcam Feed";

/// Interval over which the live frame rate is averaged, in seconds
pub const FPS_WINDOW_SECS: f64 = 1.0;
