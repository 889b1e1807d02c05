//! Tests for numbered screenshots


use cascade_capture::{screenshot::ScreenshotStore, Error};
use opencv::{core::Mat, imgcodecs, prelude::*};
use test_helpers::{create_test_frame, TEST_FRAME_SIZE};

#[test]
fn test_screenshots_never_overwrite() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path().join("screenshots");
    std::fs::create_dir(&dir).unwrap();
    std::fs::write(dir.join("screenshot_1.jpg"), b"earlier run").unwrap();
    let mut store = ScreenshotStore::new(&dir);
    let frame = create_test_frame(TEST_FRAME_SIZE, 128.0).unwrap();

    let first = store.save(&frame).unwrap();
    let second = store.save(&frame).unwrap();

    assert_eq!(first, dir.join("screenshot_2.jpg"));
    assert_eq!(second, dir.join("screenshot_3.jpg"));
    assert_eq!(std::fs::read(dir.join("screenshot_1.jpg")).unwrap(), b"earlier run");
}

#[test]
fn test_saved_screenshot_decodes_to_frame_size() {
    let tmp = tempfile::tempdir().unwrap();
    let mut store = ScreenshotStore::new(tmp.path());
    let frame = create_test_frame(TEST_FRAME_SIZE, 64.0).unwrap();

    let path = store.save(&frame).unwrap();

    let decoded = imgcodecs::imread(path.to_str().unwrap(), imgcodecs::IMREAD_COLOR).unwrap();
    assert_eq!(decoded.size().unwrap(), TEST_FRAME_SIZE);
}

#[test]
fn test_empty_frame_is_rejected() {
    let tmp = tempfile::tempdir().unwrap();
    let mut store = ScreenshotStore::new(tmp.path().join("screenshots"));

    let result = store.save(&Mat::default());

    assert!(matches!(result, Err(Error::Screenshot(_))));
    assert!(!tmp.path().join("screenshots").exists());
}

#[test]
fn test_exhausted_numbering_is_an_error_not_an_overwrite() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(tmp.path().join("screenshot_1.jpg"), b"first").unwrap();
    std::fs::write(tmp.path().join("screenshot_4294967295.jpg"), b"last").unwrap();
    let mut store = ScreenshotStore::new(tmp.path());
    let frame = create_test_frame(TEST_FRAME_SIZE, 32.0).unwrap();

    assert!(store.save(&frame).is_err());
    assert!(store.save(&frame).is_err());
    assert_eq!(std::fs::read(tmp.path().join("screenshot_1.jpg")).unwrap(), b"first");
    assert!(!tmp.path().join("screenshot_0.jpg").exists());
}
