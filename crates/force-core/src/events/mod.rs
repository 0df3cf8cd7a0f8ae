//! Notifications
//!
//! Sinks that receive user-facing notifications, and the JSONL logger that
//! persists them.

pub mod logger;
pub mod sink;

pub use logger::NotificationLogger;
pub use sink::{deliver, Alert, NotificationOutbox, NotificationSink, NotifyError};
