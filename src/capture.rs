//! Frame acquisition from a camera device.

use crate::{Error, Result};
use log::{info, warn};
use opencv::{
    core::{Mat, Size},
    prelude::*,
    videoio::{self, VideoCapture, CAP_PROP_BUFFERSIZE, CAP_PROP_FPS, CAP_PROP_FRAME_HEIGHT, CAP_PROP_FRAME_WIDTH},
};

/// Source of frames for the main loop.
///
/// A failed read is reported as [`Error::Capture`] and never retried.
pub trait FrameSource {
    /// Read the next frame
    ///
    /// # Errors
    ///
    /// Returns [`Error::Capture`] when no frame could be obtained.
    fn read(&mut self) -> Result<Mat>;

    /// Dimensions shared by every frame of this source
    fn frame_size(&self) -> Size;

    /// Capture rate as reported by the device, 0 when unknown
    fn reported_fps(&self) -> f64 {
        0.0
    }

    /// Release the device. Calling it again is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails to release the device.
    fn close(&mut self) -> Result<()>;
}

/// Webcam opened through `OpenCV`'s video I/O
pub struct CameraSource {
    capture: VideoCapture,
    index: i32,
    frame_size: Size,
    is_open: bool,
}

impl CameraSource {
    /// Open a camera by index
    ///
    /// # Errors
    ///
    /// Returns [`Error::Capture`] if the device cannot be opened or does not
    /// deliver a first frame.
    pub fn open(index: i32, requested_fps: f64) -> Result<Self> {
        info!("Opening camera {}", index);
        let mut capture = VideoCapture::new(index, videoio::CAP_ANY)
            .map_err(|e| Error::Capture(format!("Failed to open camera {index}: {e}")))?;
        if !capture.is_opened().map_err(|e| Error::Capture(e.to_string()))? {
            return Err(Error::Capture(format!("Failed to open camera {index}")));
        }

        // Not every backend honours these; they are hints only
        if !capture.set(CAP_PROP_FPS, requested_fps)? {
            warn!("Camera {} ignored requested rate of {} fps", index, requested_fps);
        }
        capture.set(CAP_PROP_BUFFERSIZE, 1.0)?;

        let mut frame_size = Size::new(
            capture.get(CAP_PROP_FRAME_WIDTH)? as i32,
            capture.get(CAP_PROP_FRAME_HEIGHT)? as i32,
        );
        if frame_size.width <= 0 || frame_size.height <= 0 {
            // Some backends only know the size after the first frame
            let mut probe = Mat::default();
            if !capture.read(&mut probe)? || probe.empty() {
                return Err(Error::Capture(format!("Camera {index} delivered no frame")));
            }
            frame_size = probe.size()?;
        }

        info!(
            "Camera {} opened at {}x{}",
            index, frame_size.width, frame_size.height
        );

        Ok(Self {
            capture,
            index,
            frame_size,
            is_open: true,
        })
    }
}

impl FrameSource for CameraSource {
    fn read(&mut self) -> Result<Mat> {
        if !self.is_open {
            return Err(Error::Capture(format!("Camera {} is closed", self.index)));
        }

        let mut frame = Mat::default();
        let grabbed = self
            .capture
            .read(&mut frame)
            .map_err(|e| Error::Capture(e.to_string()))?;
        if !grabbed || frame.empty() {
            return Err(Error::Capture(format!("Camera {} returned no frame", self.index)));
        }

        let size = frame.size()?;
        if size != self.frame_size {
            return Err(Error::Capture(format!(
                "Camera {} changed frame size from {}x{} to {}x{}",
                self.index, self.frame_size.width, self.frame_size.height, size.width, size.height
            )));
        }

        Ok(frame)
    }

    fn frame_size(&self) -> Size {
        self.frame_size
    }

    fn reported_fps(&self) -> f64 {
        self.capture.get(CAP_PROP_FPS).unwrap_or(0.0)
    }

    fn close(&mut self) -> Result<()> {
        if self.is_open {
            self.is_open = false;
            self.capture.release()?;
            info!("Camera {} released", self.index);
        }
        Ok(())
    }
}

impl Drop for CameraSource {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            warn!("Failed to release camera {}: {}", self.index, e);
        }
    }
}
