use std::time::{Duration, Instant};

use crate::capture::domain::frame_source::FrameSource;
use crate::detection::domain::face_detector::FaceDetector;
use crate::notify::domain::notification_gate::NotificationGate;
use crate::notify::domain::notifier::Notifier;
use crate::presentation::{annotate, letterbox};
use crate::shared::frame::Frame;
use crate::shared::video_metadata::VideoMetadata;

/// Result of one presenter-loop iteration.
#[derive(Debug)]
pub enum TickOutcome {
    /// The session is not running; nothing happened.
    Idle,
    /// No frame was available this tick. The caller keeps rescheduling;
    /// the capture handle stays open until an explicit stop.
    EndOfStream,
    Rendered(RenderedTick),
}

#[derive(Debug)]
pub struct RenderedTick {
    /// Annotated frame, letterboxed into the display box.
    pub display: Frame,
    /// Number of faces found in this frame.
    pub faces: usize,
    /// Whether the notification fired on this tick.
    pub notified: bool,
}

/// Session state for the capture → detect → draw → display loop.
///
/// Single-threaded and cooperative: the UI timer calls `tick` one
/// iteration at a time, with no overlap. The session exclusively owns
/// the capture handle between `start` and `stop`, and holds at most
/// one at a time.
pub struct WatchSession {
    detector: Box<dyn FaceDetector>,
    notifier: Box<dyn Notifier>,
    gate: NotificationGate,
    source: Option<Box<dyn FrameSource>>,
    running: bool,
    display_width: u32,
    display_height: u32,
}

impl WatchSession {
    pub fn new(
        detector: Box<dyn FaceDetector>,
        notifier: Box<dyn Notifier>,
        cooldown: Duration,
        display_width: u32,
        display_height: u32,
    ) -> Self {
        Self {
            detector,
            notifier,
            gate: NotificationGate::new(cooldown),
            source: None,
            running: false,
            display_width,
            display_height,
        }
    }

    /// Opens `source` and starts the loop.
    ///
    /// Any previously held capture handle is released first, so a
    /// session never owns two. On failure the session stays stopped
    /// and holds no handle.
    pub fn start(
        &mut self,
        mut source: Box<dyn FrameSource>,
    ) -> Result<VideoMetadata, Box<dyn std::error::Error>> {
        self.stop();

        let metadata = source.open()?;
        log::info!(
            "watching {}x{} ({} frames known)",
            metadata.width,
            metadata.height,
            metadata.total_frames
        );
        self.source = Some(source);
        self.running = true;
        Ok(metadata)
    }

    /// Stops the loop and releases the capture handle.
    pub fn stop(&mut self) {
        self.running = false;
        if let Some(mut source) = self.source.take() {
            source.close();
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// True while the session owns an open capture handle.
    pub fn has_capture_handle(&self) -> bool {
        self.source.is_some()
    }

    /// One loop iteration: read a frame, detect, maybe notify, draw,
    /// letterbox. `now` is the tick's wall-clock instant, used only by
    /// the notification gate.
    pub fn tick(&mut self, now: Instant) -> TickOutcome {
        if !self.running {
            return TickOutcome::Idle;
        }
        let Some(source) = self.source.as_mut() else {
            return TickOutcome::Idle;
        };

        let mut frame = match source.read_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => return TickOutcome::EndOfStream,
            Err(e) => {
                // Unreadable frames end the stream quietly, like EOF.
                log::debug!("frame read failed: {e}");
                return TickOutcome::EndOfStream;
            }
        };

        let started = Instant::now();
        let regions = match self.detector.detect(&frame) {
            Ok(regions) => regions,
            Err(e) => {
                log::warn!("detection failed on frame {}: {e}", frame.index());
                Vec::new()
            }
        };

        let mut notified = false;
        if !regions.is_empty() && self.gate.should_fire(now) {
            if let Err(e) = self.notifier.notify() {
                log::warn!("notification failed (not retried): {e}");
            }
            // The window restarts whether or not the send succeeded.
            self.gate.mark_fired(now);
            notified = true;
        }

        annotate::draw_regions(&mut frame, &regions);
        let display = letterbox::render(&frame, self.display_width, self.display_height);

        log::debug!(
            "frame {}: {} face(s) in {:.1} ms",
            frame.index(),
            regions.len(),
            started.elapsed().as_secs_f64() * 1000.0
        );

        TickOutcome::Rendered(RenderedTick {
            display,
            faces: regions.len(),
            notified,
        })
    }
}
