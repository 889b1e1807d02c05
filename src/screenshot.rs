//! Numbered JPEG screenshots.

use crate::constants::{SCREENSHOT_EXTENSION, SCREENSHOT_STEM};
use crate::utils::output_paths::NumberedOutput;
use crate::{Error, Result};
use log::info;
use opencv::{
    core::{Mat, Vector},
    imgcodecs,
    prelude::*,
};
use std::path::PathBuf;

/// Writes `screenshot_{n}.jpg` files, `n` growing by one per saved frame
pub struct ScreenshotStore {
    outputs: NumberedOutput,
}

impl ScreenshotStore {
    /// Store screenshots in `dir`, created on the first save
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            outputs: NumberedOutput::new(dir, SCREENSHOT_STEM, SCREENSHOT_EXTENSION),
        }
    }

    /// Encode `frame` to the next free file name
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be prepared or encoding fails.
    /// The file index is only consumed on success.
    pub fn save(&mut self, frame: &Mat) -> Result<PathBuf> {
        if frame.empty() {
            return Err(Error::Screenshot("Cannot save an empty frame".to_string()));
        }

        let (_, path) = self.outputs.next_path()?;
        let name = path
            .to_str()
            .ok_or_else(|| Error::Screenshot(format!("Non UTF-8 output path: {}", path.display())))?;

        if !imgcodecs::imwrite(name, frame, &Vector::new())? {
            return Err(Error::Screenshot(format!("Failed to encode {name}")));
        }
        self.outputs.advance();

        info!("Screenshot saved to {}", path.display());
        Ok(path)
    }
}
