use crate::capture::domain::frame_source::FrameSource;
use crate::capture::infrastructure::decode::PullDecoder;
use crate::shared::frame::Frame;
use crate::shared::video_metadata::VideoMetadata;

/// Captures from a camera device through libavdevice.
///
/// Uses the platform grab format (v4l2 on Linux, avfoundation on
/// macOS; other platforms are unsupported and fail at `open`) and then
/// shares the pull-decode path with file sources, so the rest of the
/// system never sees the difference.
pub struct FfmpegCameraSource {
    index: u32,
    decoder: Option<PullDecoder>,
}

// Safety: FfmpegCameraSource is only used from a single thread at a time.
// The raw pointers inside ffmpeg types are not shared across threads.
unsafe impl Send for FfmpegCameraSource {}

impl FfmpegCameraSource {
    pub fn new(index: u32) -> Self {
        Self {
            index,
            decoder: None,
        }
    }

    #[cfg(target_os = "linux")]
    fn device_path(&self) -> String {
        format!("/dev/video{}", self.index)
    }

    #[cfg(target_os = "macos")]
    fn device_path(&self) -> String {
        // avfoundation addresses devices by index.
        self.index.to_string()
    }

    #[cfg(not(any(target_os = "linux", target_os = "macos")))]
    fn device_path(&self) -> String {
        self.index.to_string()
    }

    fn grab_format_matches(name: &str) -> bool {
        #[cfg(target_os = "linux")]
        {
            // The demuxer registers as "video4linux2,v4l2".
            name.split(',').any(|n| n == "v4l2" || n == "video4linux2")
        }
        #[cfg(target_os = "macos")]
        {
            name == "avfoundation"
        }
        #[cfg(not(any(target_os = "linux", target_os = "macos")))]
        {
            let _ = name;
            false
        }
    }
}

impl FrameSource for FfmpegCameraSource {
    fn open(&mut self) -> Result<VideoMetadata, Box<dyn std::error::Error>> {
        ffmpeg_next::init()?;
        ffmpeg_next::device::register_all();

        let format = ffmpeg_next::device::input::video()
            .find(|f| Self::grab_format_matches(f.name()))
            .ok_or("no camera grab format on this platform (v4l2 and avfoundation are supported)")?;

        let path = self.device_path();
        let ictx = match ffmpeg_next::format::open(&path, &format)? {
            ffmpeg_next::format::Context::Input(input) => input,
            _ => return Err("camera device did not open as an input".into()),
        };

        let (decoder, metadata) = PullDecoder::from_input(ictx, None, true)?;
        log::info!(
            "opened camera {}: {}x{} @ {:.1} fps",
            self.index,
            metadata.width,
            metadata.height,
            metadata.fps
        );
        self.decoder = Some(decoder);
        Ok(metadata)
    }

    fn read_frame(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error>> {
        let decoder = self
            .decoder
            .as_mut()
            .ok_or("FfmpegCameraSource: not opened")?;
        decoder.read_frame()
    }

    fn close(&mut self) {
        self.decoder = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_frame_before_open_fails() {
        let mut source = FfmpegCameraSource::new(0);
        assert!(source.read_frame().is_err());
    }

    #[test]
    fn test_grab_format_matching_is_platform_scoped() {
        #[cfg(target_os = "linux")]
        {
            assert!(FfmpegCameraSource::grab_format_matches("video4linux2,v4l2"));
            assert!(FfmpegCameraSource::grab_format_matches("v4l2"));
        }
        #[cfg(target_os = "macos")]
        assert!(FfmpegCameraSource::grab_format_matches("avfoundation"));
        // dshow is never selected; Windows capture is unsupported.
        assert!(!FfmpegCameraSource::grab_format_matches("dshow"));
    }

    #[test]
    fn test_close_without_open_is_harmless() {
        let mut source = FfmpegCameraSource::new(0);
        source.close();
        source.close();
    }
}
