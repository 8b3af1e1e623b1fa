use crate::shared::frame::Frame;
use crate::shared::region::Region;

/// Domain interface for face detection.
///
/// Implementations may keep internal scratch buffers, hence `&mut self`.
/// Detection must be deterministic: identical frames and parameters
/// always produce identical regions.
pub trait FaceDetector: Send {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<Region>, Box<dyn std::error::Error>>;
}

/// Tunables for the sliding-window cascade.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DetectorParams {
    /// Smallest face the pyramid scans for, in pixels.
    pub min_face_size: u32,
    /// Per-octave shrink factor of the image pyramid.
    pub scale_step: f32,
    /// Horizontal and vertical stride of the sliding window.
    pub window_step: u32,
    /// Windows scoring below this are rejected.
    pub score_thresh: f64,
}

impl Default for DetectorParams {
    fn default() -> Self {
        Self {
            min_face_size: 40,
            scale_step: 0.8,
            window_step: 4,
            score_thresh: 2.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params() {
        let params = DetectorParams::default();
        assert_eq!(params.min_face_size, 40);
        assert_eq!(params.window_step, 4);
        assert!(params.scale_step > 0.0 && params.scale_step < 1.0);
        assert!(params.score_thresh > 0.0);
    }
}
