use std::path::PathBuf;

use crate::capture::domain::frame_source::FrameSource;
use crate::capture::infrastructure::decode::PullDecoder;
use crate::shared::frame::Frame;
use crate::shared::video_metadata::VideoMetadata;

/// Decodes a video file via ffmpeg-next (libavformat + libavcodec).
///
/// Each `read_frame` call pulls exactly one frame, converted to RGB24.
pub struct FfmpegFileSource {
    path: PathBuf,
    decoder: Option<PullDecoder>,
}

// Safety: FfmpegFileSource is only used from a single thread at a time.
// The raw pointers inside ffmpeg types are not shared across threads.
unsafe impl Send for FfmpegFileSource {}

impl FfmpegFileSource {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            decoder: None,
        }
    }
}

impl FrameSource for FfmpegFileSource {
    fn open(&mut self) -> Result<VideoMetadata, Box<dyn std::error::Error>> {
        ffmpeg_next::init()?;

        let ictx = ffmpeg_next::format::input(&self.path)?;
        let (decoder, metadata) =
            PullDecoder::from_input(ictx, Some(self.path.clone()), false)?;
        self.decoder = Some(decoder);
        Ok(metadata)
    }

    fn read_frame(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error>> {
        let decoder = self
            .decoder
            .as_mut()
            .ok_or("FfmpegFileSource: not opened")?;
        decoder.read_frame()
    }

    fn close(&mut self) {
        self.decoder = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    const TEST_FPS: i32 = 30;

    /// Encodes `num_frames` flat gray frames to a 30 fps MPEG4 file.
    /// Frames are built directly in YUV420P so no scaler is needed.
    fn create_test_video(path: &Path, num_frames: usize, width: u32, height: u32) {
        ffmpeg_next::init().unwrap();

        let mut octx = ffmpeg_next::format::output(path).unwrap();
        let codec = ffmpeg_next::encoder::find(ffmpeg_next::codec::Id::MPEG4).unwrap();
        let mut ost = octx.add_stream(Some(codec)).unwrap();

        let mut encoder_ctx = ffmpeg_next::codec::context::Context::new_with_codec(codec)
            .encoder()
            .video()
            .unwrap();
        encoder_ctx.set_width(width);
        encoder_ctx.set_height(height);
        encoder_ctx.set_format(ffmpeg_next::format::Pixel::YUV420P);
        encoder_ctx.set_time_base(ffmpeg_next::Rational(1, TEST_FPS));
        encoder_ctx.set_frame_rate(Some(ffmpeg_next::Rational(TEST_FPS, 1)));

        let mut encoder = encoder_ctx
            .open_with(ffmpeg_next::Dictionary::new())
            .unwrap();
        ost.set_parameters(&encoder);
        octx.write_header().unwrap();
        let ost_time_base = octx.stream(0).unwrap().time_base();

        let mut drain = |encoder: &mut ffmpeg_next::encoder::Video,
                         octx: &mut ffmpeg_next::format::context::Output| {
            let mut encoded = ffmpeg_next::Packet::empty();
            while encoder.receive_packet(&mut encoded).is_ok() {
                encoded.set_stream(0);
                encoded.rescale_ts(ffmpeg_next::Rational(1, TEST_FPS), ost_time_base);
                encoded.write_interleaved(octx).unwrap();
            }
        };

        for i in 0..num_frames {
            let mut frame = ffmpeg_next::util::frame::video::Video::new(
                ffmpeg_next::format::Pixel::YUV420P,
                width,
                height,
            );
            let luma = ((i * 40) % 256) as u8;
            frame.data_mut(0).fill(luma);
            frame.data_mut(1).fill(128);
            frame.data_mut(2).fill(128);
            frame.set_pts(Some(i as i64));
            encoder.send_frame(&frame).unwrap();
            drain(&mut encoder, &mut octx);
        }

        encoder.send_eof().unwrap();
        drain(&mut encoder, &mut octx);
        octx.write_trailer().unwrap();
    }

    #[test]
    fn test_open_returns_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.mp4");
        create_test_video(&path, 5, 160, 120);

        let mut source = FfmpegFileSource::new(path.clone());
        let meta = source.open().unwrap();
        assert_eq!(meta.width, 160);
        assert_eq!(meta.height, 120);
        assert!(meta.fps > 0.0);
        assert_eq!(meta.source_path, Some(path));
    }

    #[test]
    fn test_open_nonexistent_fails() {
        let mut source = FfmpegFileSource::new(PathBuf::from("/nonexistent/test.mp4"));
        assert!(source.open().is_err());
    }

    #[test]
    fn test_read_frame_before_open_fails() {
        let mut source = FfmpegFileSource::new(PathBuf::from("whatever.mp4"));
        assert!(source.read_frame().is_err());
    }

    #[test]
    fn test_reads_all_frames_then_end_of_stream() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.mp4");
        create_test_video(&path, 5, 160, 120);

        let mut source = FfmpegFileSource::new(path);
        source.open().unwrap();

        let mut count = 0;
        while let Some(frame) = source.read_frame().unwrap() {
            assert_eq!(frame.width(), 160);
            assert_eq!(frame.height(), 120);
            assert_eq!(frame.index(), count);
            count += 1;
        }
        assert_eq!(count, 5);

        // Exhausted sources keep reporting end of stream.
        assert!(source.read_frame().unwrap().is_none());
    }

    #[test]
    fn test_close_releases_and_requires_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.mp4");
        create_test_video(&path, 2, 160, 120);

        let mut source = FfmpegFileSource::new(path);
        source.open().unwrap();
        assert!(source.read_frame().unwrap().is_some());

        source.close();
        assert!(source.read_frame().is_err());

        // Reopening starts over from the first frame.
        source.open().unwrap();
        let frame = source.read_frame().unwrap().unwrap();
        assert_eq!(frame.index(), 0);
    }
}
