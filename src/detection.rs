//! Face, eye and smile detection built on Haar cascades.
//!
//! The engine converts each frame to an equalized grayscale image once, finds
//! faces on it, then searches every face for eyes (whole face) and smiles
//! (lower half only). Eye and smile hits come back in face-local coordinates
//! and are translated to frame coordinates before they leave this module.

use crate::config::{CascadeParams, DetectionSettings};
use crate::constants::{EYE_CASCADE_FILE, FACE_CASCADE_FILE, SMILE_CASCADE_FILE};
use crate::utils::{clip_rect, lower_half, translate};
use crate::{Error, Result};
use log::{debug, info};
use opencv::{
    core::{Mat, Rect, Size, Vector},
    imgproc,
    objdetect::CascadeClassifier,
    prelude::*,
};
use std::path::Path;

/// What a detected region contains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegionKind {
    /// Whole face
    Face,
    /// Single eye
    Eye,
    /// Smiling mouth
    Smile,
}

impl RegionKind {
    /// Text drawn next to the region
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            RegionKind::Face => "Face",
            RegionKind::Eye => "Eye",
            RegionKind::Smile => "Smile",
        }
    }
}

/// A detected region in absolute frame coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectionRegion {
    /// Region content
    pub kind: RegionKind,
    /// Bounding box in frame pixels
    pub rect: Rect,
}

/// Regions found in one frame: each face followed by its eyes, then its smiles
pub type DetectionResult = Vec<DetectionRegion>;

/// Opaque detector capability.
///
/// Implementations return candidate regions in the coordinates of `image`.
pub trait ObjectDetector {
    /// Scan a grayscale image
    ///
    /// # Errors
    ///
    /// Returns an error only if the underlying backend fails.
    fn detect(&mut self, image: &Mat) -> Result<Vec<Rect>>;
}

/// `OpenCV` Haar cascade with fixed tuning
pub struct CascadeDetector {
    classifier: CascadeClassifier,
    params: CascadeParams,
}

impl CascadeDetector {
    /// Load a cascade XML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or holds no usable cascade.
    pub fn from_file<P: AsRef<Path>>(path: P, params: CascadeParams) -> Result<Self> {
        let path = path.as_ref();
        let name = path
            .to_str()
            .ok_or_else(|| Error::InvalidInput(format!("Non UTF-8 cascade path: {}", path.display())))?;

        let classifier = CascadeClassifier::new(name)?;
        if classifier.empty()? {
            return Err(Error::InvalidInput(format!("Failed to load cascade: {}", path.display())));
        }

        Ok(Self { classifier, params })
    }
}

impl ObjectDetector for CascadeDetector {
    fn detect(&mut self, image: &Mat) -> Result<Vec<Rect>> {
        let mut found = Vector::<Rect>::new();
        self.classifier.detect_multi_scale(
            image,
            &mut found,
            self.params.scale_factor,
            self.params.min_neighbors,
            0,
            Size::new(0, 0),
            Size::new(0, 0),
        )?;
        Ok(found.to_vec())
    }
}

/// Runs the three detectors over a frame
pub struct DetectionEngine {
    faces: Box<dyn ObjectDetector>,
    eyes: Box<dyn ObjectDetector>,
    smiles: Box<dyn ObjectDetector>,
}

impl DetectionEngine {
    /// Build an engine from injected detectors
    pub fn new(
        faces: Box<dyn ObjectDetector>,
        eyes: Box<dyn ObjectDetector>,
        smiles: Box<dyn ObjectDetector>,
    ) -> Self {
        Self { faces, eyes, smiles }
    }

    /// Load the standard Haar cascades from the configured directory
    ///
    /// # Errors
    ///
    /// Returns an error if any of the three cascades fails to load.
    pub fn from_settings(settings: &DetectionSettings) -> Result<Self> {
        let dir = &settings.cascade_dir;
        info!("Loading cascades from {}", dir.display());

        Ok(Self::new(
            Box::new(CascadeDetector::from_file(dir.join(FACE_CASCADE_FILE), settings.face)?),
            Box::new(CascadeDetector::from_file(dir.join(EYE_CASCADE_FILE), settings.eyes)?),
            Box::new(CascadeDetector::from_file(dir.join(SMILE_CASCADE_FILE), settings.smile)?),
        ))
    }

    /// Detect faces, eyes and smiles in a BGR frame
    ///
    /// # Errors
    ///
    /// Returns an error if color conversion or a detector fails.
    pub fn detect(&mut self, frame: &Mat) -> Result<DetectionResult> {
        let gray = Self::preprocess(frame)?;
        self.detect_gray(&gray)
    }

    /// Grayscale conversion followed by histogram equalization
    fn preprocess(frame: &Mat) -> Result<Mat> {
        let gray = if frame.channels() == 1 {
            frame.try_clone()?
        } else {
            let mut gray = Mat::default();
            imgproc::cvt_color_def(frame, &mut gray, imgproc::COLOR_BGR2GRAY)?;
            gray
        };

        let mut equalized = Mat::default();
        imgproc::equalize_hist(&gray, &mut equalized)?;
        Ok(equalized)
    }

    /// Run the detectors on an already equalized grayscale image
    fn detect_gray(&mut self, gray: &Mat) -> Result<DetectionResult> {
        let frame_bounds = Rect::new(0, 0, gray.cols(), gray.rows());
        let mut result = DetectionResult::new();

        for candidate in self.faces.detect(gray)? {
            let Some(face) = clip_rect(candidate, frame_bounds) else {
                continue;
            };
            result.push(DetectionRegion {
                kind: RegionKind::Face,
                rect: face,
            });

            let face_roi = Mat::roi(gray, face)?.try_clone()?;
            let face_bounds = Rect::new(0, 0, face.width, face.height);

            for eye in self.eyes.detect(&face_roi)? {
                if let Some(eye) = clip_rect(eye, face_bounds) {
                    result.push(DetectionRegion {
                        kind: RegionKind::Eye,
                        rect: translate(eye, face.x, face.y),
                    });
                }
            }

            let lower = lower_half(face.width, face.height);
            let lower_roi = Mat::roi(&face_roi, lower)?.try_clone()?;
            let lower_bounds = Rect::new(0, 0, lower.width, lower.height);

            for smile in self.smiles.detect(&lower_roi)? {
                if let Some(smile) = clip_rect(smile, lower_bounds) {
                    result.push(DetectionRegion {
                        kind: RegionKind::Smile,
                        rect: translate(smile, face.x, face.y + lower.y),
                    });
                }
            }
        }

        debug!("Detected {} regions", result.len());
        Ok(result)
    }
}
