//! Drawing of detection overlays and status text.

use crate::detection::{DetectionRegion, RegionKind};
use crate::Result;
use opencv::{
    core::{Mat, Point, Scalar},
    imgproc::{self, FONT_HERSHEY_SIMPLEX, LINE_8},
    prelude::*,
};

/// Loop status shown on top of the frame
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OverlayStatus {
    /// Frame rate readout
    pub fps: f64,
    /// Whether a recording session is active
    pub recording: bool,
}

/// BGR color for a region kind: face green, eye red, smile blue
#[must_use]
pub fn region_color(kind: RegionKind) -> Scalar {
    match kind {
        RegionKind::Face => Scalar::new(0.0, 255.0, 0.0, 0.0),
        RegionKind::Eye => Scalar::new(0.0, 0.0, 255.0, 0.0),
        RegionKind::Smile => Scalar::new(255.0, 0.0, 0.0, 0.0),
    }
}

fn label_style(kind: RegionKind) -> (f64, i32) {
    match kind {
        RegionKind::Face => (0.6, 2),
        RegionKind::Eye | RegionKind::Smile => (0.5, 1),
    }
}

/// Draw regions, the FPS readout and, while recording, the REC indicator.
///
/// Only the pixels of `frame` are modified.
///
/// # Errors
///
/// Returns an error if an `OpenCV` drawing call fails.
pub fn annotate(frame: &mut Mat, detections: &[DetectionRegion], status: &OverlayStatus) -> Result<()> {
    for region in detections {
        let color = region_color(region.kind);
        let (font_scale, text_thickness) = label_style(region.kind);

        imgproc::rectangle(frame, region.rect, color, 2, LINE_8, 0)?;
        imgproc::put_text(
            frame,
            region.kind.label(),
            Point::new(region.rect.x, region.rect.y - 10),
            FONT_HERSHEY_SIMPLEX,
            font_scale,
            color,
            text_thickness,
            LINE_8,
            false,
        )?;
    }

    let fps_text = format!("FPS: {:.0}", status.fps);
    imgproc::put_text(
        frame,
        &fps_text,
        Point::new(20, 40),
        FONT_HERSHEY_SIMPLEX,
        0.7,
        Scalar::new(50.0, 255.0, 50.0, 0.0),
        2,
        LINE_8,
        false,
    )?;

    if status.recording {
        draw_recording_indicator(frame)?;
    }

    Ok(())
}

/// Filled red dot with "REC" next to it in the top-right corner
fn draw_recording_indicator(frame: &mut Mat) -> Result<()> {
    let red = Scalar::new(0.0, 0.0, 255.0, 0.0);
    let right = frame.cols();

    imgproc::circle(frame, Point::new(right - 30, 30), 10, red, -1, LINE_8, 0)?;
    imgproc::put_text(
        frame,
        "REC",
        Point::new(right - 95, 38),
        FONT_HERSHEY_SIMPLEX,
        0.7,
        red,
        2,
        LINE_8,
        false,
    )?;

    Ok(())
}
