use std::path::PathBuf;

use crate::shared::frame::Frame;
use crate::shared::video_metadata::VideoMetadata;

/// Where the watch loop pulls its frames from.
///
/// Switching the selector back to a camera discards any previously
/// chosen file; the two variants never coexist.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VideoSource {
    /// Capture device by zero-based index (`/dev/video0` and friends).
    Camera(u32),
    File(PathBuf),
}

impl std::fmt::Display for VideoSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VideoSource::Camera(index) => write!(f, "camera {index}"),
            VideoSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Pulls frames from a camera device or a video file, one at a time.
///
/// The presenter loop reads exactly one frame per tick, so the
/// interface is on-demand rather than iterator-based. Implementations
/// handle I/O details (demuxing, codecs, device formats) while the
/// loop works with the abstract `Frame` and `VideoMetadata` types.
pub trait FrameSource: Send {
    /// Acquires the device or file and returns its metadata.
    fn open(&mut self) -> Result<VideoMetadata, Box<dyn std::error::Error>>;

    /// Decodes the next frame. `Ok(None)` signals end of stream.
    fn read_frame(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error>>;

    /// Releases the capture handle. Safe to call when not open.
    fn close(&mut self);
}
