pub mod watch_session;
