//! Output window and keyboard polling.

use crate::{Error, Result};
use log::{info, warn};
use opencv::{
    core::Mat,
    highgui::{self, WINDOW_AUTOSIZE},
};

/// Sink that shows frames and yields key presses
pub trait DisplaySink {
    /// Show a frame
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot render the frame.
    fn show(&mut self, frame: &Mat) -> Result<()>;

    /// Wait up to `wait_ms` milliseconds for one key press; -1 when none
    ///
    /// # Errors
    ///
    /// Returns an error if the backend event loop fails.
    fn poll_key(&mut self, wait_ms: i32) -> Result<i32>;

    /// Tear the window down. Calling it again is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails to destroy the window.
    fn close(&mut self) -> Result<()>;
}

/// `OpenCV` highgui window
pub struct HighGuiWindow {
    title: String,
    is_open: bool,
}

impl HighGuiWindow {
    /// Create the named window
    ///
    /// # Errors
    ///
    /// Returns [`Error::Display`] if no GUI backend is available.
    pub fn open(title: &str) -> Result<Self> {
        highgui::named_window(title, WINDOW_AUTOSIZE)
            .map_err(|e| Error::Display(format!("Failed to create window '{title}': {e}")))?;
        info!("Window '{}' created", title);

        Ok(Self {
            title: title.to_string(),
            is_open: true,
        })
    }
}

impl DisplaySink for HighGuiWindow {
    fn show(&mut self, frame: &Mat) -> Result<()> {
        highgui::imshow(&self.title, frame)?;
        Ok(())
    }

    fn poll_key(&mut self, wait_ms: i32) -> Result<i32> {
        Ok(highgui::wait_key(wait_ms)?)
    }

    fn close(&mut self) -> Result<()> {
        if self.is_open {
            self.is_open = false;
            highgui::destroy_window(&self.title)?;
        }
        Ok(())
    }
}

impl Drop for HighGuiWindow {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            warn!("Failed to close window '{}': {}", self.title, e);
        }
    }
}
