//! Recording sessions and the video writers behind them.
//!
//! [`RecordingController`] is a two-state machine, `Idle` or `Recording`. A
//! writer exists only inside an active [`RecordingSession`], so it is opened
//! once per session and released when the session ends, whether through
//! [`RecordingController::stop`], a failed write, or the controller being dropped.

use crate::constants::{RECORDING_EXTENSION, RECORDING_STEM};
use crate::utils::output_paths::NumberedOutput;
use crate::{Error, Result};
use log::{error, info, warn};
use opencv::{
    core::{Mat, Size},
    prelude::*,
    videoio::VideoWriter,
};
use std::path::{Path, PathBuf};

/// Encoder handle for one output file
pub trait FrameWriter {
    /// Append one frame
    ///
    /// # Errors
    ///
    /// Returns an error if the encoder rejects the frame.
    fn write(&mut self, frame: &Mat) -> Result<()>;

    /// Flush and close the file
    ///
    /// # Errors
    ///
    /// Returns an error if finalizing the container fails.
    fn release(&mut self) -> Result<()>;
}

/// Factory for [`FrameWriter`]s
pub trait VideoBackend {
    /// Open a writer for `path` with a fixed frame size and container rate
    ///
    /// # Errors
    ///
    /// Returns [`Error::RecordingOpen`] if the encoder cannot be allocated.
    fn open(&mut self, path: &Path, frame_size: Size, fps: f64) -> Result<Box<dyn FrameWriter>>;
}

/// `OpenCV` video writer backend
#[derive(Debug, Clone, Copy)]
pub struct OpenCvVideoBackend {
    fourcc: [char; 4],
}

impl Default for OpenCvVideoBackend {
    fn default() -> Self {
        Self {
            fourcc: ['m', 'p', '4', 'v'],
        }
    }
}

impl VideoBackend for OpenCvVideoBackend {
    fn open(&mut self, path: &Path, frame_size: Size, fps: f64) -> Result<Box<dyn FrameWriter>> {
        let name = path
            .to_str()
            .ok_or_else(|| Error::RecordingOpen(format!("Non UTF-8 output path: {}", path.display())))?;
        let [c1, c2, c3, c4] = self.fourcc;
        let fourcc = VideoWriter::fourcc(c1, c2, c3, c4)?;

        let writer = VideoWriter::new(name, fourcc, fps, frame_size, true)?;
        if !writer.is_opened()? {
            return Err(Error::RecordingOpen(format!("Failed to open video writer for {name}")));
        }

        Ok(Box::new(OpenCvFrameWriter { writer }))
    }
}

struct OpenCvFrameWriter {
    writer: VideoWriter,
}

impl FrameWriter for OpenCvFrameWriter {
    fn write(&mut self, frame: &Mat) -> Result<()> {
        self.writer.write(frame)?;
        Ok(())
    }

    fn release(&mut self) -> Result<()> {
        self.writer.release()?;
        Ok(())
    }
}

/// An open recording
pub struct RecordingSession {
    writer: Box<dyn FrameWriter>,
    sequence_number: u32,
    target_path: PathBuf,
    frame_size: Size,
    frames_written: u64,
}

impl RecordingSession {
    /// Index `n` of `recording_{n}`
    #[must_use]
    pub fn sequence_number(&self) -> u32 {
        self.sequence_number
    }

    /// Output file
    #[must_use]
    pub fn target_path(&self) -> &Path {
        &self.target_path
    }

    /// Size every frame must have
    #[must_use]
    pub fn frame_size(&self) -> Size {
        self.frame_size
    }

    /// Frames appended so far
    #[must_use]
    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }

    fn finish(mut self) -> Result<FinishedRecording> {
        let released = self.writer.release();
        let summary = FinishedRecording {
            sequence_number: self.sequence_number,
            path: self.target_path,
            frames_written: self.frames_written,
        };
        released.map(|()| summary)
    }
}

/// Summary of a closed session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinishedRecording {
    /// Index `n` of `recording_{n}`
    pub sequence_number: u32,
    /// Output file
    pub path: PathBuf,
    /// Frames encoded into the file
    pub frames_written: u64,
}

/// Outcome of [`RecordingController::toggle`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordingToggle {
    /// A session was opened at this path
    Started(PathBuf),
    /// The active session was closed
    Stopped(FinishedRecording),
}

enum RecordingState {
    Idle,
    Recording(RecordingSession),
}

/// Owns at most one open recording session
pub struct RecordingController {
    state: RecordingState,
    outputs: NumberedOutput,
    backend: Box<dyn VideoBackend>,
    fps: f64,
}

impl RecordingController {
    /// Create an idle controller writing `recording_{n}.mp4` files into `output_dir`
    pub fn new(backend: Box<dyn VideoBackend>, output_dir: impl Into<PathBuf>, fps: f64) -> Self {
        Self {
            state: RecordingState::Idle,
            outputs: NumberedOutput::new(output_dir, RECORDING_STEM, RECORDING_EXTENSION),
            backend,
            fps,
        }
    }

    /// Whether a session is active
    #[must_use]
    pub fn is_recording(&self) -> bool {
        matches!(self.state, RecordingState::Recording(_))
    }

    /// The active session, if any
    #[must_use]
    pub fn session(&self) -> Option<&RecordingSession> {
        match &self.state {
            RecordingState::Recording(session) => Some(session),
            RecordingState::Idle => None,
        }
    }

    /// Open a new session sized for `frame_size`.
    ///
    /// The sequence number advances only when the writer opens; on failure the
    /// controller stays idle.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RecordingOpen`] if the output cannot be allocated, or
    /// [`Error::InvalidInput`] if a session is already active.
    pub fn start(&mut self, frame_size: Size) -> Result<PathBuf> {
        if let RecordingState::Recording(session) = &self.state {
            return Err(Error::InvalidInput(format!(
                "Already recording to {}",
                session.target_path.display()
            )));
        }

        let (sequence_number, path) = self.outputs.next_path().map_err(as_open_error)?;
        let writer = self
            .backend
            .open(&path, frame_size, self.fps)
            .map_err(as_open_error)?;
        self.outputs.advance();

        info!(
            "Recording {} started: {} ({}x{} @ {} fps)",
            sequence_number,
            path.display(),
            frame_size.width,
            frame_size.height,
            self.fps
        );

        self.state = RecordingState::Recording(RecordingSession {
            writer,
            sequence_number,
            target_path: path.clone(),
            frame_size,
            frames_written: 0,
        });

        Ok(path)
    }

    /// Close the active session, releasing its writer unconditionally.
    ///
    /// Returns `Ok(None)` when idle.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RecordingWrite`] if the writer fails while finalizing;
    /// the controller is idle either way.
    pub fn stop(&mut self) -> Result<Option<FinishedRecording>> {
        match std::mem::replace(&mut self.state, RecordingState::Idle) {
            RecordingState::Idle => Ok(None),
            RecordingState::Recording(session) => {
                let path = session.target_path.clone();
                let finished = session
                    .finish()
                    .map_err(|e| Error::RecordingWrite(format!("Failed to finalize {}: {e}", path.display())))?;
                info!(
                    "Recording {} stopped: {} frames in {}",
                    finished.sequence_number,
                    finished.frames_written,
                    finished.path.display()
                );
                Ok(Some(finished))
            }
        }
    }

    /// Start when idle, stop when recording
    ///
    /// # Errors
    ///
    /// Propagates the error of [`RecordingController::start`] or [`RecordingController::stop`].
    pub fn toggle(&mut self, frame_size: Size) -> Result<RecordingToggle> {
        if self.is_recording() {
            let finished = self
                .stop()?
                .ok_or_else(|| Error::InvalidInput("No active recording".to_string()))?;
            Ok(RecordingToggle::Stopped(finished))
        } else {
            self.start(frame_size).map(RecordingToggle::Started)
        }
    }

    /// Append a frame to the active session; does nothing while idle.
    ///
    /// A failed write ends the session.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RecordingWrite`] if the frame has the wrong size or the
    /// encoder rejects it.
    pub fn write(&mut self, frame: &Mat) -> Result<()> {
        let RecordingState::Recording(session) = &mut self.state else {
            return Ok(());
        };

        let size = frame.size()?;
        let written = if size == session.frame_size {
            session.writer.write(frame)
        } else {
            Err(Error::RecordingWrite(format!(
                "Frame is {}x{}, session expects {}x{}",
                size.width, size.height, session.frame_size.width, session.frame_size.height
            )))
        };

        match written {
            Ok(()) => {
                session.frames_written += 1;
                Ok(())
            }
            Err(e) => {
                error!("Recording aborted: {}", e);
                if let Err(release_err) = self.stop() {
                    warn!("{}", release_err);
                }
                Err(match e {
                    Error::RecordingWrite(_) => e,
                    other => Error::RecordingWrite(other.to_string()),
                })
            }
        }
    }
}

impl Drop for RecordingController {
    fn drop(&mut self) {
        if self.is_recording() {
            if let Err(e) = self.stop() {
                warn!("{}", e);
            }
        }
    }
}

fn as_open_error(err: Error) -> Error {
    match err {
        Error::RecordingOpen(_) => err,
        other => Error::RecordingOpen(other.to_string()),
    }
}
