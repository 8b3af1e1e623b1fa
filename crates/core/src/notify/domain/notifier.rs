/// Domain interface for the detection side effect.
///
/// Fire-and-forget: the session logs a failure and moves on. Nothing
/// downstream depends on delivery.
pub trait Notifier: Send {
    fn notify(&self) -> Result<(), Box<dyn std::error::Error>>;
}

/// Notifier that does nothing.
///
/// Used by the CLI's `--no-notify` mode and by tests where the side
/// effect is irrelevant.
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self) -> Result<(), Box<dyn std::error::Error>> {
        Ok(())
    }
}
