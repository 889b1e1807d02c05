//! Tests for the recording state machine


use cascade_capture::{
    recording::{RecordingController, RecordingToggle},
    Error,
};
use test_helpers::{create_test_frame, MemoryVideoBackend, TEST_FRAME_SIZE};

fn controller(dir: &std::path::Path, backend: MemoryVideoBackend) -> RecordingController {
    RecordingController::new(Box::new(backend), dir, 20.0)
}

#[test]
fn test_toggle_twice_returns_to_idle_and_releases_once() {
    let tmp = tempfile::tempdir().unwrap();
    let (backend, log) = MemoryVideoBackend::new();
    let mut recorder = controller(tmp.path(), backend);

    let started = recorder.toggle(TEST_FRAME_SIZE).unwrap();
    assert_eq!(started, RecordingToggle::Started(tmp.path().join("recording_1.mp4")));
    assert!(recorder.is_recording());

    let stopped = recorder.toggle(TEST_FRAME_SIZE).unwrap();
    assert!(matches!(stopped, RecordingToggle::Stopped(ref f) if f.frames_written == 0));
    assert!(!recorder.is_recording());
    assert!(recorder.session().is_none());

    drop(recorder);
    assert_eq!(log.borrow().videos.len(), 1);
    assert_eq!(log.borrow().videos[0].releases, 1);
}

#[test]
fn test_sessions_are_numbered_per_open() {
    let tmp = tempfile::tempdir().unwrap();
    let (backend, log) = MemoryVideoBackend::new();
    let mut recorder = controller(tmp.path(), backend);
    let frame = create_test_frame(TEST_FRAME_SIZE, 0.0).unwrap();

    for _ in 0..2 {
        recorder.start(TEST_FRAME_SIZE).unwrap();
        for _ in 0..5 {
            recorder.write(&frame).unwrap();
        }
        let finished = recorder.stop().unwrap().unwrap();
        assert_eq!(finished.frames_written, 5);
    }

    let log = log.borrow();
    let names: Vec<_> = log.videos.iter().map(|v| v.path.file_name().unwrap().to_owned()).collect();
    assert_eq!(names, vec!["recording_1.mp4", "recording_2.mp4"]);
    assert!(log.videos.iter().all(|v| v.frame_size == TEST_FRAME_SIZE && v.fps == 20.0));
}

#[test]
fn test_open_failure_stays_idle() {
    let tmp = tempfile::tempdir().unwrap();
    let (backend, log) = MemoryVideoBackend::failing_first(1);
    let mut recorder = controller(tmp.path(), backend);

    let result = recorder.start(TEST_FRAME_SIZE);

    assert!(matches!(result, Err(Error::RecordingOpen(_))));
    assert!(!recorder.is_recording());
    assert_eq!(log.borrow().failed_opens, 1);
    assert_eq!(recorder.start(TEST_FRAME_SIZE).unwrap(), tmp.path().join("recording_1.mp4"));
}

#[test]
fn test_stop_while_idle_is_noop() {
    let tmp = tempfile::tempdir().unwrap();
    let (backend, log) = MemoryVideoBackend::new();
    let mut recorder = controller(tmp.path(), backend);

    assert!(recorder.stop().unwrap().is_none());
    assert!(log.borrow().videos.is_empty());
}

#[test]
fn test_drop_releases_active_session() {
    let tmp = tempfile::tempdir().unwrap();
    let (backend, log) = MemoryVideoBackend::new();
    let mut recorder = controller(tmp.path(), backend);
    recorder.start(TEST_FRAME_SIZE).unwrap();

    drop(recorder);

    assert_eq!(log.borrow().videos[0].releases, 1);
}

#[test]
fn test_numbering_continues_after_previous_run() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(tmp.path().join("recording_4.mp4"), b"old").unwrap();
    let (backend, _log) = MemoryVideoBackend::new();
    let mut recorder = controller(tmp.path(), backend);

    let path = recorder.start(TEST_FRAME_SIZE).unwrap();

    assert_eq!(path, tmp.path().join("recording_5.mp4"));
    assert_eq!(std::fs::read(tmp.path().join("recording_4.mp4")).unwrap(), b"old");
}

#[test]
fn test_exhausted_numbering_fails_open_and_stays_idle() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(tmp.path().join("recording_4294967295.mp4"), b"last").unwrap();
    let (backend, log) = MemoryVideoBackend::new();
    let mut recorder = controller(tmp.path(), backend);

    let result = recorder.toggle(TEST_FRAME_SIZE);

    assert!(matches!(result, Err(Error::RecordingOpen(_))));
    assert!(!recorder.is_recording());
    assert!(log.borrow().videos.is_empty());
}
