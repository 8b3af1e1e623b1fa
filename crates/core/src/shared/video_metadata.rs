use std::path::PathBuf;

#[derive(Clone, Debug, PartialEq)]
pub struct VideoMetadata {
    pub width: u32,
    pub height: u32,
    pub fps: f64,
    /// 0 for live sources (cameras) where the length is unknown.
    pub total_frames: usize,
    pub codec: String,
    pub source_path: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_construction() {
        let meta = VideoMetadata {
            width: 1920,
            height: 1080,
            fps: 30.0,
            total_frames: 900,
            codec: "h264".to_string(),
            source_path: Some(PathBuf::from("/tmp/clip.mp4")),
        };
        assert_eq!(meta.width, 1920);
        assert_eq!(meta.height, 1080);
        assert_eq!(meta.total_frames, 900);
        assert_eq!(meta.codec, "h264");
    }

    #[test]
    fn test_live_source_metadata() {
        // Cameras report no length and no backing path.
        let meta = VideoMetadata {
            width: 640,
            height: 480,
            fps: 30.0,
            total_frames: 0,
            codec: "rawvideo".to_string(),
            source_path: None,
        };
        assert_eq!(meta.total_frames, 0);
        assert!(meta.source_path.is_none());
    }
}
