pub mod notification_gate;
pub mod notifier;
