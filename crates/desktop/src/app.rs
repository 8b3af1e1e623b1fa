use std::path::PathBuf;
use std::time::{Duration, Instant};

use iced::widget::{button, column, container, pick_list, row, slider, text, text_input};
use iced::{Alignment, Element, Subscription, Task};

use crossbeam_channel::Receiver;

use facewatch_core::capture::domain::frame_source::VideoSource;
use facewatch_core::capture::infrastructure::source_factory::create_source;
use facewatch_core::detection::domain::face_detector::DetectorParams;
use facewatch_core::detection::infrastructure::cascade_detector::CascadeDetector;
use facewatch_core::notify::domain::notifier::{Notifier, NullNotifier};
use facewatch_core::notify::infrastructure::push_notifier::PushNotifier;
use facewatch_core::pipeline::watch_session::{TickOutcome, WatchSession};
use facewatch_core::shared::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH, VIDEO_EXTENSIONS};
use facewatch_core::shared::frame::Frame;

use crate::settings::Settings;
use crate::workers::model_worker::{self, ModelMessage};

/// ~30 fps presenter cadence.
const TICK_INTERVAL: Duration = Duration::from_millis(33);
const MODEL_POLL_INTERVAL: Duration = Duration::from_millis(200);

// ---------------------------------------------------------------------------
// Source selector
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Webcam,
    VideoFile,
}

impl SourceKind {
    pub const ALL: &[SourceKind] = &[SourceKind::Webcam, SourceKind::VideoFile];
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceKind::Webcam => write!(f, "Webcam"),
            SourceKind::VideoFile => write!(f, "Video File"),
        }
    }
}

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub enum Message {
    SourceKindChanged(SourceKind),
    ChooseFile,
    FileSelected(Option<PathBuf>),
    ToggleDetection,
    ApiKeyChanged(String),
    CooldownChanged(u32),
    MinFaceSizeChanged(u32),
    Tick,
    PollModel,
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

enum ModelState {
    Resolving {
        rx: Receiver<ModelMessage>,
        progress: (u64, u64),
    },
    Ready(PathBuf),
    Failed(String),
}

pub struct App {
    settings: Settings,
    source_kind: SourceKind,
    file_path: Option<PathBuf>,
    session: Option<WatchSession>,
    model: ModelState,
    display: Option<iced::widget::image::Handle>,
    status: String,
}

impl App {
    pub fn new() -> (Self, Task<Message>) {
        (
            Self {
                settings: Settings::load(),
                source_kind: SourceKind::Webcam,
                file_path: None,
                session: None,
                model: ModelState::Resolving {
                    rx: model_worker::spawn(),
                    progress: (0, 0),
                },
                display: None,
                status: "Preparing face detector...".to_string(),
            },
            Task::none(),
        )
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::SourceKindChanged(kind) => {
                self.source_kind = kind;
                if kind == SourceKind::Webcam {
                    // Back to the camera: any chosen file is forgotten.
                    self.file_path = None;
                }
            }
            Message::ChooseFile => {
                return Task::perform(
                    async {
                        rfd::AsyncFileDialog::new()
                            .set_title("Select video file")
                            .add_filter("Video files", VIDEO_EXTENSIONS)
                            .pick_file()
                            .await
                            .map(|h| h.path().to_path_buf())
                    },
                    Message::FileSelected,
                );
            }
            Message::FileSelected(Some(path)) => {
                self.file_path = Some(path);
            }
            Message::FileSelected(None) => {}
            Message::ToggleDetection => self.toggle_detection(),
            Message::ApiKeyChanged(key) => {
                self.settings.api_key = key;
                self.settings.save();
            }
            Message::CooldownChanged(secs) => {
                self.settings.cooldown_secs = secs as u64;
                self.settings.save();
            }
            Message::MinFaceSizeChanged(size) => {
                self.settings.min_face_size = size;
                self.settings.save();
            }
            Message::Tick => self.run_tick(),
            Message::PollModel => self.poll_model(),
        }
        Task::none()
    }

    pub fn view(&self) -> Element<'_, Message> {
        let file_label = self
            .file_path
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "No file chosen".to_string());

        let controls = row![
            text("Video Source:"),
            pick_list(
                SourceKind::ALL,
                Some(self.source_kind),
                Message::SourceKindChanged
            ),
            button(text("Choose File")).on_press_maybe(
                (self.source_kind == SourceKind::VideoFile).then_some(Message::ChooseFile)
            ),
            text(file_label).size(13),
            button(text(if self.is_running() { "Stop" } else { "Start" }))
                .on_press_maybe(self.can_toggle().then_some(Message::ToggleDetection)),
        ]
        .spacing(10)
        .align_y(Alignment::Center);

        // Saved on every change; a running session picks them up on the
        // next Start.
        let settings_row = row![
            text("API Key:"),
            text_input("push service API key", &self.settings.api_key)
                .on_input(Message::ApiKeyChanged)
                .secure(true)
                .width(220),
            text(format!("Cooldown: {}s", self.settings.cooldown_secs)),
            slider(
                1..=60u32,
                self.settings.cooldown_secs as u32,
                Message::CooldownChanged
            )
            .width(100),
            text(format!("Min face: {}px", self.settings.min_face_size)),
            slider(
                20..=200u32,
                self.settings.min_face_size,
                Message::MinFaceSizeChanged
            )
            .step(10u32)
            .width(100),
        ]
        .spacing(10)
        .align_y(Alignment::Center);

        let surface: Element<'_, Message> = match &self.display {
            Some(handle) => iced::widget::image(handle.clone())
                .width(DISPLAY_WIDTH as u32)
                .height(DISPLAY_HEIGHT as u32)
                .into(),
            None => container(text("No video"))
                .center_x(DISPLAY_WIDTH as u32)
                .center_y(DISPLAY_HEIGHT as u32)
                .into(),
        };

        column![controls, settings_row, surface, text(&self.status).size(13)]
            .spacing(12)
            .padding(16)
            .into()
    }

    pub fn subscription(&self) -> Subscription<Message> {
        let mut subs = Vec::new();
        if self.is_running() {
            subs.push(iced::time::every(TICK_INTERVAL).map(|_| Message::Tick));
        }
        if matches!(self.model, ModelState::Resolving { .. }) {
            subs.push(iced::time::every(MODEL_POLL_INTERVAL).map(|_| Message::PollModel));
        }
        Subscription::batch(subs)
    }

    fn is_running(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.is_running())
    }

    fn can_toggle(&self) -> bool {
        if self.is_running() {
            return true;
        }
        let source_chosen =
            self.source_kind == SourceKind::Webcam || self.file_path.is_some();
        matches!(self.model, ModelState::Ready(_)) && source_chosen
    }

    fn selected_source(&self) -> Option<VideoSource> {
        match self.source_kind {
            SourceKind::Webcam => Some(VideoSource::Camera(0)),
            SourceKind::VideoFile => self.file_path.clone().map(VideoSource::File),
        }
    }

    fn toggle_detection(&mut self) {
        if self.is_running() {
            if let Some(session) = &mut self.session {
                session.stop();
            }
            self.status = "Stopped".to_string();
            return;
        }

        let ModelState::Ready(model_path) = &self.model else {
            return;
        };
        let Some(source) = self.selected_source() else {
            self.status = "Choose a video file first".to_string();
            return;
        };

        let params = DetectorParams {
            min_face_size: self.settings.min_face_size,
            score_thresh: self.settings.score_thresh,
            ..DetectorParams::default()
        };
        let detector = match CascadeDetector::new(model_path, params) {
            Ok(detector) => Box::new(detector),
            Err(e) => {
                self.status = format!("Could not load face detector: {e}");
                return;
            }
        };

        let notifier: Box<dyn Notifier> = if self.settings.api_key.is_empty() {
            log::warn!("no API key configured; notifications disabled");
            Box::new(NullNotifier)
        } else {
            match PushNotifier::new(self.settings.api_key.clone()) {
                Ok(notifier) => Box::new(notifier),
                Err(e) => {
                    log::warn!("push notifier unavailable: {e}");
                    Box::new(NullNotifier)
                }
            }
        };

        let mut session = WatchSession::new(
            detector,
            notifier,
            Duration::from_secs(self.settings.cooldown_secs),
            DISPLAY_WIDTH,
            DISPLAY_HEIGHT,
        );
        match session.start(create_source(&source)) {
            Ok(metadata) => {
                self.status = format!("Watching {source} ({}x{})", metadata.width, metadata.height);
                self.session = Some(session);
            }
            Err(e) => {
                self.status = format!("Could not open {source}: {e}");
            }
        }
    }

    fn run_tick(&mut self) {
        let Some(session) = &mut self.session else {
            return;
        };
        match session.tick(Instant::now()) {
            TickOutcome::Rendered(tick) => {
                self.display = Some(to_handle(&tick.display));
                if tick.notified {
                    self.status = "Face detected, notification sent".to_string();
                } else if tick.faces > 0 {
                    self.status = format!("{} face(s) in view", tick.faces);
                }
            }
            TickOutcome::EndOfStream => {
                // Keep the last frame on screen; the timer keeps ticking
                // until the user presses Stop.
                self.status = "No more frames".to_string();
            }
            TickOutcome::Idle => {}
        }
    }

    fn poll_model(&mut self) {
        let ModelState::Resolving { rx, progress } = &mut self.model else {
            return;
        };
        let mut update = None;
        while let Ok(message) = rx.try_recv() {
            match message {
                ModelMessage::Progress(downloaded, total) => *progress = (downloaded, total),
                ModelMessage::Ready(path) => update = Some(ModelState::Ready(path)),
                ModelMessage::Failed(e) => update = Some(ModelState::Failed(e)),
            }
        }

        match update {
            Some(ModelState::Ready(path)) => {
                self.status = "Ready".to_string();
                self.model = ModelState::Ready(path);
            }
            Some(ModelState::Failed(e)) => {
                self.status = format!("Face detector unavailable: {e}");
                self.model = ModelState::Failed(e);
            }
            _ => {
                let (downloaded, total) = *progress;
                if total > 0 {
                    let pct = downloaded as f64 / total as f64 * 100.0;
                    self.status = format!("Downloading face detector... {pct:.0}%");
                }
            }
        }
    }
}

/// RGB frame to an RGBA handle for the image widget.
fn to_handle(frame: &Frame) -> iced::widget::image::Handle {
    let mut rgba = Vec::with_capacity(frame.data().len() / 3 * 4);
    for px in frame.data().chunks_exact(3) {
        rgba.extend_from_slice(px);
        rgba.push(255);
    }
    iced::widget::image::Handle::from_rgba(frame.width(), frame.height(), rgba)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_webcam_selection_resets_file() {
        let (mut app, _) = App::new();
        app.source_kind = SourceKind::VideoFile;
        app.file_path = Some(PathBuf::from("/tmp/clip.mp4"));

        let _ = app.update(Message::SourceKindChanged(SourceKind::Webcam));
        assert_eq!(app.source_kind, SourceKind::Webcam);
        assert!(app.file_path.is_none());
    }

    #[test]
    fn test_switching_to_file_keeps_nothing_selected() {
        let (mut app, _) = App::new();
        let _ = app.update(Message::SourceKindChanged(SourceKind::VideoFile));
        assert!(app.selected_source().is_none());
        assert!(!app.can_toggle());
    }

    #[test]
    fn test_selected_source_for_webcam_is_camera_zero() {
        let (app, _) = App::new();
        assert_eq!(app.selected_source(), Some(VideoSource::Camera(0)));
    }

    #[test]
    fn test_cannot_start_before_model_is_ready() {
        let (app, _) = App::new();
        // Freshly created app is still resolving the model.
        assert!(!app.can_toggle());
    }

    #[test]
    fn test_api_key_change_is_stored() {
        let (mut app, _) = App::new();
        let _ = app.update(Message::ApiKeyChanged("key-123".to_string()));
        assert_eq!(app.settings.api_key, "key-123");
    }

    #[test]
    fn test_cooldown_change_is_stored() {
        let (mut app, _) = App::new();
        let _ = app.update(Message::CooldownChanged(25));
        assert_eq!(app.settings.cooldown_secs, 25);
    }

    #[test]
    fn test_min_face_size_change_is_stored() {
        let (mut app, _) = App::new();
        let _ = app.update(Message::MinFaceSizeChanged(80));
        assert_eq!(app.settings.min_face_size, 80);
    }

    #[test]
    fn test_to_handle_converts_rgb_to_rgba() {
        let frame = Frame::new(vec![10, 20, 30, 40, 50, 60], 2, 1, 0);
        // No panic and correct sizing is all we can check on an opaque handle.
        let _ = to_handle(&frame);
    }
}
