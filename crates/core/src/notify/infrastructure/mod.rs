pub mod push_notifier;
