use crate::capture::domain::frame_source::{FrameSource, VideoSource};
use crate::capture::infrastructure::ffmpeg_camera_source::FfmpegCameraSource;
use crate::capture::infrastructure::ffmpeg_file_source::FfmpegFileSource;

/// Builds the capture implementation for a source selector.
///
/// The returned source is not yet opened; the session opens it on
/// start so a failed open leaves no dangling handle.
pub fn create_source(source: &VideoSource) -> Box<dyn FrameSource> {
    match source {
        VideoSource::Camera(index) => Box::new(FfmpegCameraSource::new(*index)),
        VideoSource::File(path) => Box::new(FfmpegFileSource::new(path.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_file_source_is_unopened() {
        let mut source = create_source(&VideoSource::File(PathBuf::from("clip.mp4")));
        assert!(source.read_frame().is_err());
    }

    #[test]
    fn test_camera_source_is_unopened() {
        let mut source = create_source(&VideoSource::Camera(0));
        assert!(source.read_frame().is_err());
    }
}
