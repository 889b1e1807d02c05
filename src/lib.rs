//! Real-time webcam processing with Haar cascade detection.
//!
//! Frames are captured from a camera, searched for faces, eyes and smiles,
//! annotated, and shown in a window. The keyboard drives a small state
//! machine: pause and resume capture, save numbered screenshots, start and
//! stop numbered recordings, and exit.
//!
//! The pipeline consists of:
//! 1. [`capture`]: frames from a camera device
//! 2. [`detection`]: cascades over an equalized grayscale copy
//! 3. [`annotation`]: boxes, labels, FPS and the REC indicator
//! 4. [`recording`]: one video writer per recording session
//! 5. [`app`]: the tick loop tying it together
//!
//! # Examples
//!
//! ## Detection on a single image
//!
//! ```no_run
//! use cascade_capture::{annotation::{annotate, OverlayStatus}, config::DetectionSettings,
//!                       detection::DetectionEngine};
//! use opencv::imgcodecs;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut engine = DetectionEngine::from_settings(&DetectionSettings::default())?;
//! let mut image = imgcodecs::imread("people.jpg", imgcodecs::IMREAD_COLOR)?;
//!
//! let regions = engine.detect(&image)?;
//! for region in &regions {
//!     println!("{:?} at {:?}", region.kind, region.rect);
//! }
//!
//! annotate(&mut image, &regions, &OverlayStatus::default())?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Full application
//!
//! ```no_run
//! use cascade_capture::{app::App, config::{KeyBindings, Settings}};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = Settings::default();
//! let bindings = KeyBindings::load_or_default(&settings.display.keys_file);
//! let mut app = App::from_settings(&settings, bindings)?;
//! let state = app.run()?;
//! println!("{} screenshots taken", state.screenshot_counter);
//! # Ok(())
//! # }
//! ```

/// Camera frame source
pub mod capture;

/// Face, eye and smile detection
pub mod detection;

/// Overlay drawing
pub mod annotation;

/// Recording sessions and video writers
pub mod recording;

/// Keyboard command mapping
pub mod input;

/// Output window
pub mod display;

/// Numbered screenshots
pub mod screenshot;

/// Frame rate measurement
pub mod fps;

/// Rectangle helpers and numbered output paths
pub mod utils;

/// Error types and result handling
pub mod error;

/// Main application module
pub mod app;

/// Constants used throughout the application
pub mod constants;

/// Configuration management
pub mod config;

pub use error::{Error, Result};
