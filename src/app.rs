//! Main application loop.
//!
//! Each tick polls one key, applies the resulting command, captures and
//! annotates a new frame unless paused, feeds an active recording, and shows
//! the most recent frame. All loop bookkeeping lives in [`LoopState`], which is
//! handed to [`App::tick`] and returned from it.

use crate::{
    annotation::{annotate, OverlayStatus},
    capture::{CameraSource, FrameSource},
    config::{KeyBindings, Settings},
    constants::KEY_POLL_WAIT_MS,
    detection::DetectionEngine,
    display::{DisplaySink, HighGuiWindow},
    error::Result,
    fps::FpsMeter,
    input::{resolve, Command},
    recording::{OpenCvVideoBackend, RecordingController, RecordingToggle},
    screenshot::ScreenshotStore,
};
use log::{debug, error, info, warn};
use opencv::core::Mat;

/// Loop mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopMode {
    /// Capturing and processing frames
    Running,
    /// Showing the last frame without capturing
    Paused,
    /// Terminal; the loop stops after the current tick
    Exiting,
}

/// State carried from one tick to the next
#[derive(Debug)]
pub struct LoopState {
    /// Current mode
    pub mode: LoopMode,
    /// Most recent annotated frame, kept while paused
    pub last_frame: Option<Mat>,
    /// Screenshots saved during this run
    pub screenshot_counter: u32,
    /// Recording sessions opened during this run
    pub recording_counter: u32,
    /// Frames captured during this run
    pub frames_captured: u64,
}

impl Default for LoopState {
    fn default() -> Self {
        Self {
            mode: LoopMode::Running,
            last_frame: None,
            screenshot_counter: 0,
            recording_counter: 0,
            frames_captured: 0,
        }
    }
}

impl LoopState {
    /// Whether capture is suspended
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.mode == LoopMode::Paused
    }

    /// Whether the loop has finished
    #[must_use]
    pub fn is_exiting(&self) -> bool {
        self.mode == LoopMode::Exiting
    }
}

/// Main application struct
pub struct App {
    bindings: KeyBindings,
    source: Box<dyn FrameSource>,
    display: Box<dyn DisplaySink>,
    engine: DetectionEngine,
    recorder: RecordingController,
    screenshots: ScreenshotStore,
    fps: FpsMeter,
}

impl App {
    /// Assemble an application from its components
    pub fn new(
        bindings: KeyBindings,
        source: Box<dyn FrameSource>,
        display: Box<dyn DisplaySink>,
        engine: DetectionEngine,
        recorder: RecordingController,
        screenshots: ScreenshotStore,
    ) -> Self {
        let fps = FpsMeter::new(source.reported_fps());
        Self {
            bindings,
            source,
            display,
            engine,
            recorder,
            screenshots,
            fps,
        }
    }

    /// Build the camera, cascade, window and output components from settings
    ///
    /// # Errors
    ///
    /// Returns an error if the cascades cannot be loaded, the camera cannot be
    /// opened, or no window can be created.
    pub fn from_settings(settings: &Settings, bindings: KeyBindings) -> Result<Self> {
        info!("Initializing cascade capture");

        let engine = DetectionEngine::from_settings(&settings.detection)?;
        let source = CameraSource::open(settings.camera.index, settings.camera.requested_fps)?;
        let display = HighGuiWindow::open(&settings.display.window_title)?;
        let recorder = RecordingController::new(
            Box::new(OpenCvVideoBackend::default()),
            &settings.output.recording_dir,
            settings.output.recording_fps,
        );
        let screenshots = ScreenshotStore::new(&settings.output.screenshot_dir);

        Ok(Self::new(
            bindings,
            Box::new(source),
            Box::new(display),
            engine,
            recorder,
            screenshots,
        ))
    }

    /// Active key bindings
    #[must_use]
    pub fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }

    /// Recording controller, for inspecting the session state
    #[must_use]
    pub fn recorder(&self) -> &RecordingController {
        &self.recorder
    }

    /// Run until an exit command or a capture failure, then release all resources.
    ///
    /// Cleanup also runs when a tick fails.
    ///
    /// # Errors
    ///
    /// Returns the first unrecoverable error raised by a tick.
    pub fn run(&mut self) -> Result<LoopState> {
        info!(
            "Entering main loop (exit '{}', screenshot '{}', pause '{}', record '{}')",
            self.bindings.exit, self.bindings.screenshot, self.bindings.pause, self.bindings.record
        );

        let mut state = LoopState::default();
        while !state.is_exiting() {
            state = match self.tick(state) {
                Ok(next) => next,
                Err(e) => {
                    error!("Main loop aborted: {}", e);
                    self.shutdown();
                    return Err(e);
                }
            };
        }

        self.shutdown();
        info!(
            "Exited after {} frames, {} screenshots, {} recordings",
            state.frames_captured, state.screenshot_counter, state.recording_counter
        );
        Ok(state)
    }

    /// Execute one iteration of the loop
    ///
    /// # Errors
    ///
    /// Returns an error if key polling, detection, drawing or display fails.
    /// Capture failures are not errors; they move the loop to `Exiting`.
    pub fn tick(&mut self, mut state: LoopState) -> Result<LoopState> {
        let key = self.display.poll_key(KEY_POLL_WAIT_MS)?;
        let command = resolve(key, &self.bindings);
        if command != Command::None {
            debug!("Key {} -> {:?}", key, command);
        }
        self.apply(command, &mut state);

        if state.mode == LoopMode::Running {
            self.advance_frame(&mut state)?;
        }

        if let Some(frame) = &state.last_frame {
            self.display.show(frame)?;
        }

        Ok(state)
    }

    /// Release the recording, the camera and the window. Safe to call repeatedly.
    pub fn shutdown(&mut self) {
        match self.recorder.stop() {
            Ok(Some(finished)) => info!(
                "Closed recording {} on shutdown",
                finished.path.display()
            ),
            Ok(None) => {}
            Err(e) => error!("{}", e),
        }
        if let Err(e) = self.source.close() {
            warn!("Failed to release frame source: {}", e);
        }
        if let Err(e) = self.display.close() {
            warn!("Failed to close display: {}", e);
        }
    }

    fn apply(&mut self, command: Command, state: &mut LoopState) {
        match command {
            Command::Exit => {
                info!("Exiting...");
                state.mode = LoopMode::Exiting;
            }
            Command::TogglePause => match state.mode {
                LoopMode::Running => {
                    info!("Paused");
                    state.mode = LoopMode::Paused;
                }
                LoopMode::Paused => {
                    info!("Resumed");
                    self.fps.restart();
                    state.mode = LoopMode::Running;
                }
                LoopMode::Exiting => {}
            },
            Command::ToggleRecord => match state.mode {
                LoopMode::Running => self.toggle_recording(state),
                LoopMode::Paused => info!("Record key ignored while paused"),
                LoopMode::Exiting => {}
            },
            Command::Screenshot => self.take_screenshot(state),
            Command::None => {}
        }
    }

    fn toggle_recording(&mut self, state: &mut LoopState) {
        match self.recorder.toggle(self.source.frame_size()) {
            Ok(RecordingToggle::Started(_)) => state.recording_counter += 1,
            Ok(RecordingToggle::Stopped(_)) => {}
            Err(e) => error!("{}", e),
        }
    }

    fn take_screenshot(&mut self, state: &mut LoopState) {
        let Some(frame) = &state.last_frame else {
            warn!("No frame captured yet, screenshot skipped");
            return;
        };

        match self.screenshots.save(frame) {
            Ok(_) => state.screenshot_counter += 1,
            Err(e) => error!("{}", e),
        }
    }

    fn advance_frame(&mut self, state: &mut LoopState) -> Result<()> {
        let mut frame = match self.source.read() {
            Ok(frame) => frame,
            Err(e) => {
                error!("Error capturing frame: {}", e);
                state.mode = LoopMode::Exiting;
                return Ok(());
            }
        };
        state.frames_captured += 1;

        let detections = self.engine.detect(&frame)?;
        let status = OverlayStatus {
            fps: self.fps.record_frame(),
            recording: self.recorder.is_recording(),
        };
        annotate(&mut frame, &detections, &status)?;

        if let Err(e) = self.recorder.write(&frame) {
            warn!("{}", e);
        }

        state.last_frame = Some(frame);
        Ok(())
    }
}
