use std::path::{Path, PathBuf};
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;

use facewatch_core::capture::domain::frame_source::VideoSource;
use facewatch_core::capture::infrastructure::source_factory::create_source;
use facewatch_core::detection::domain::face_detector::{DetectorParams, FaceDetector};
use facewatch_core::detection::infrastructure::cascade_detector::CascadeDetector;
use facewatch_core::detection::infrastructure::model_resolver;
use facewatch_core::notify::domain::notifier::{Notifier, NullNotifier};
use facewatch_core::notify::infrastructure::push_notifier::PushNotifier;
use facewatch_core::pipeline::watch_session::{TickOutcome, WatchSession};
use facewatch_core::shared::constants::{
    CASCADE_MODEL_NAME, CASCADE_MODEL_URL, DISPLAY_HEIGHT, DISPLAY_WIDTH, NOTIFY_COOLDOWN_SECS,
    VIDEO_EXTENSIONS,
};

/// Watch a camera or video file for faces; notify on detection.
#[derive(Parser)]
#[command(name = "facewatch")]
struct Cli {
    /// Camera index (e.g. "0") or path to a video file.
    source: String,

    /// Smallest face to look for, in pixels.
    #[arg(long, default_value = "40")]
    min_face_size: u32,

    /// Image pyramid scale step (0.01-0.99).
    #[arg(long, default_value = "0.8")]
    scale_step: f32,

    /// Sliding-window stride in pixels.
    #[arg(long, default_value = "4")]
    window_step: u32,

    /// Cascade score threshold; higher rejects more windows.
    #[arg(long, default_value = "2.0")]
    score_thresh: f64,

    /// Seconds between notifications.
    #[arg(long, default_value_t = NOTIFY_COOLDOWN_SECS)]
    cooldown: u64,

    /// Push service API key (required unless --no-notify).
    #[arg(long)]
    api_key: Option<String>,

    /// Detect and log only; never call the push service.
    #[arg(long)]
    no_notify: bool,

    /// Stop after this many processed frames.
    #[arg(long)]
    max_frames: Option<usize>,

    /// Delay between loop iterations in milliseconds.
    #[arg(long, default_value = "33")]
    interval_ms: u64,

    /// Directory holding a pre-downloaded cascade model.
    #[arg(long)]
    model_dir: Option<PathBuf>,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let source = parse_source(&cli.source);
    validate(&cli, &source)?;

    let detector = build_detector(&cli)?;
    // validate() guarantees the key is present unless --no-notify was given.
    let notifier: Box<dyn Notifier> = match cli.api_key.clone() {
        Some(key) if !cli.no_notify => Box::new(PushNotifier::new(key)?),
        _ => Box::new(NullNotifier),
    };

    let mut session = WatchSession::new(
        detector,
        notifier,
        Duration::from_secs(cli.cooldown),
        DISPLAY_WIDTH,
        DISPLAY_HEIGHT,
    );
    session.start(create_source(&source))?;

    let interval = Duration::from_millis(cli.interval_ms);
    let mut processed = 0usize;
    let mut faces_seen = 0usize;

    loop {
        match session.tick(Instant::now()) {
            TickOutcome::Rendered(tick) => {
                processed += 1;
                faces_seen += tick.faces;
                if tick.notified {
                    log::info!("notification sent ({} face(s) in frame)", tick.faces);
                }
            }
            TickOutcome::EndOfStream => break,
            TickOutcome::Idle => break,
        }

        if cli.max_frames.is_some_and(|max| processed >= max) {
            break;
        }
        thread::sleep(interval);
    }

    session.stop();
    log::info!("processed {processed} frame(s), {faces_seen} face detection(s)");
    Ok(())
}

/// A numeric argument selects a camera; anything else is a file path.
fn parse_source(arg: &str) -> VideoSource {
    match arg.parse::<u32>() {
        Ok(index) => VideoSource::Camera(index),
        Err(_) => VideoSource::File(PathBuf::from(arg)),
    }
}

fn validate(cli: &Cli, source: &VideoSource) -> Result<(), Box<dyn std::error::Error>> {
    if let VideoSource::File(path) = source {
        if !path.exists() {
            return Err(format!("Input file not found: {}", path.display()).into());
        }
        if !has_video_extension(path) {
            return Err(format!(
                "Unsupported file type '{}'; expected one of: {}",
                path.display(),
                VIDEO_EXTENSIONS.join(", ")
            )
            .into());
        }
    }
    if !cli.no_notify && cli.api_key.is_none() {
        return Err("--api-key is required unless --no-notify is set".into());
    }
    if !(0.01..=0.99).contains(&cli.scale_step) {
        return Err(format!(
            "Scale step must be between 0.01 and 0.99, got {}",
            cli.scale_step
        )
        .into());
    }
    if cli.window_step == 0 {
        return Err("Window step must be at least 1".into());
    }
    if cli.score_thresh <= 0.0 {
        return Err(format!(
            "Score threshold must be positive, got {}",
            cli.score_thresh
        )
        .into());
    }
    Ok(())
}

fn build_detector(cli: &Cli) -> Result<Box<dyn FaceDetector>, Box<dyn std::error::Error>> {
    let downloading = Arc::new(AtomicBool::new(false));
    let progress_seen = Arc::clone(&downloading);
    let model_path = model_resolver::resolve(
        CASCADE_MODEL_NAME,
        CASCADE_MODEL_URL,
        cli.model_dir.as_deref(),
        Some(Box::new(move |done, total| {
            progress_seen.store(true, Ordering::Relaxed);
            download_progress(done, total);
        })),
    )?;
    // Terminate the carriage-return progress line, but only if one was
    // ever printed; cached models produce no output at all.
    if downloading.load(Ordering::Relaxed) {
        eprintln!();
    }

    let params = DetectorParams {
        min_face_size: cli.min_face_size,
        scale_step: cli.scale_step,
        window_step: cli.window_step,
        score_thresh: cli.score_thresh,
    };
    Ok(Box::new(CascadeDetector::new(&model_path, params)?))
}

fn has_video_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| VIDEO_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

fn download_progress(downloaded: u64, total: u64) {
    if total > 0 {
        let pct = (downloaded as f64 / total as f64 * 100.0) as u32;
        eprint!("\rDownloading face detection model... {pct}%");
    } else {
        eprint!("\rDownloading face detection model... {downloaded} bytes");
    }
}
