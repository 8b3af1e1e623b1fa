use std::path::PathBuf;
use std::thread;

use crossbeam_channel::{bounded, Receiver};

use facewatch_core::detection::infrastructure::model_resolver;
use facewatch_core::shared::constants::{CASCADE_MODEL_NAME, CASCADE_MODEL_URL};

pub enum ModelMessage {
    Progress(u64, u64),
    Ready(PathBuf),
    Failed(String),
}

/// Resolves the cascade model on a background thread at startup so the
/// Start button never blocks on a download. The UI polls the returned
/// channel from its timer subscription.
pub fn spawn() -> Receiver<ModelMessage> {
    let (tx, rx) = bounded::<ModelMessage>(16);
    let progress_tx = tx.clone();

    thread::spawn(move || {
        let result = model_resolver::resolve(
            CASCADE_MODEL_NAME,
            CASCADE_MODEL_URL,
            None,
            Some(Box::new(move |downloaded, total| {
                // Dropped messages are fine: only the latest matters.
                let _ = progress_tx.try_send(ModelMessage::Progress(downloaded, total));
            })),
        );
        let message = match result {
            Ok(path) => ModelMessage::Ready(path),
            Err(e) => ModelMessage::Failed(e.to_string()),
        };
        let _ = tx.send(message);
    });

    rx
}
