//! Benchmarks for the per-frame pipeline: detection, annotation and key dispatch

use cascade_capture::{
    annotation::{annotate, OverlayStatus},
    config::KeyBindings,
    detection::{DetectionEngine, ObjectDetector},
    input::resolve,
    Result,
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use opencv::{
    core::{Mat, Rect, Scalar, CV_8UC3},
    prelude::*,
};
use std::time::Duration;

/// Detector returning the same regions for every image
struct FixedDetector(Vec<Rect>);

impl ObjectDetector for FixedDetector {
    fn detect(&mut self, _image: &Mat) -> Result<Vec<Rect>> {
        Ok(self.0.clone())
    }
}

fn create_frame(width: i32, height: i32) -> Mat {
    Mat::new_rows_cols_with_default(height, width, CV_8UC3, Scalar::all(96.0)).unwrap()
}

/// Engine reporting `faces` faces, each with two eyes and one smile
fn create_engine(faces: i32) -> DetectionEngine {
    let face_rects = (0..faces).map(|i| Rect::new(20 + i * 110, 60, 100, 100)).collect();
    DetectionEngine::new(
        Box::new(FixedDetector(face_rects)),
        Box::new(FixedDetector(vec![Rect::new(15, 25, 20, 12), Rect::new(60, 25, 20, 12)])),
        Box::new(FixedDetector(vec![Rect::new(25, 10, 50, 20)])),
    )
}

/// Preprocessing and region search at common camera resolutions
fn bench_detection(c: &mut Criterion) {
    let mut group = c.benchmark_group("detection");
    group.measurement_time(Duration::from_secs(5));

    for (width, height) in [(320, 240), (640, 480), (1280, 720)] {
        let frame = create_frame(width, height);
        group.bench_with_input(
            BenchmarkId::new("detect", format!("{width}x{height}")),
            &frame,
            |b, frame| {
                let mut engine = create_engine(3);
                b.iter(|| black_box(engine.detect(frame).unwrap()));
            },
        );
    }

    group.finish();
}

/// Overlay drawing cost as the number of faces grows
fn bench_annotation(c: &mut Criterion) {
    let mut group = c.benchmark_group("annotation");
    let frame = create_frame(640, 480);

    for faces in [0, 1, 5] {
        let detections = create_engine(faces).detect(&frame).unwrap();
        group.bench_with_input(BenchmarkId::new("annotate", faces), &detections, |b, detections| {
            let status = OverlayStatus { fps: 30.0, recording: true };
            b.iter(|| {
                let mut canvas = frame.clone();
                annotate(&mut canvas, black_box(detections), &status).unwrap();
                canvas
            });
        });
    }

    group.finish();
}

fn bench_key_dispatch(c: &mut Criterion) {
    let bindings = KeyBindings::default();
    c.bench_function("resolve_key", |b| {
        b.iter(|| {
            for key in -1..256 {
                black_box(resolve(black_box(key), &bindings));
            }
        });
    });
}

criterion_group!(benches, bench_detection, bench_annotation, bench_key_dispatch);
criterion_main!(benches);
