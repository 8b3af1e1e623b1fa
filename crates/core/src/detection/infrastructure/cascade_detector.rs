use std::path::Path;

use rustface::ImageData;

use crate::detection::domain::face_detector::{DetectorParams, FaceDetector};
use crate::shared::frame::Frame;
use crate::shared::region::Region;

/// Frontal-face cascade detector (SeetaFace funnel-structured cascade
/// via `rustface`).
///
/// Runs a staged sliding-window classifier over an intensity-image
/// pyramid: windows are rejected early by the cheap stages, survivors
/// are scored by the full cascade. Pure CPU, no runtime adaptation.
pub struct CascadeDetector {
    detector: Box<dyn rustface::Detector>,
    params: DetectorParams,
}

// Safety: CascadeDetector is only used from a single thread at a time.
// The Rc-based scratch state inside rustface is never shared across threads.
unsafe impl Send for CascadeDetector {}

impl CascadeDetector {
    /// Loads the cascade model from disk and applies `params`.
    pub fn new(model_path: &Path, params: DetectorParams) -> Result<Self, Box<dyn std::error::Error>> {
        let path = model_path
            .to_str()
            .ok_or("cascade model path is not valid UTF-8")?;
        let mut detector = rustface::create_detector(path)?;

        let params = sanitized(params);
        detector.set_min_face_size(params.min_face_size);
        detector.set_score_thresh(params.score_thresh);
        detector.set_pyramid_scale_factor(params.scale_step);
        detector.set_slide_window_step(params.window_step, params.window_step);

        Ok(Self { detector, params })
    }

    pub fn params(&self) -> DetectorParams {
        self.params
    }
}

impl FaceDetector for CascadeDetector {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<Region>, Box<dyn std::error::Error>> {
        let gray = frame.to_luma();
        let mut image = ImageData::new(&gray, frame.width(), frame.height());

        let faces = self.detector.detect(&mut image);

        let regions = faces
            .iter()
            .map(|face| {
                let bbox = face.bbox();
                Region::new(
                    bbox.x(),
                    bbox.y(),
                    bbox.width() as i32,
                    bbox.height() as i32,
                    face.score(),
                )
            })
            .collect();
        Ok(regions)
    }
}

/// Clamps parameters to the ranges the cascade accepts; out-of-range
/// values would otherwise panic inside rustface.
fn sanitized(params: DetectorParams) -> DetectorParams {
    DetectorParams {
        min_face_size: params.min_face_size.max(20),
        scale_step: params.scale_step.clamp(0.01, 0.99),
        window_step: params.window_step.max(1),
        score_thresh: if params.score_thresh > 0.0 {
            params.score_thresh
        } else {
            DetectorParams::default().score_thresh
        },
    }
}
