//! Notification Logger
//!
//! Append-only JSONL notification log.

use bevy_ecs::prelude::*;
use force_events::{generate_notification_id, Notification, SimTimestamp};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use super::sink::{Alert, NotificationSink, NotifyError};

/// Resource for logging notifications to a JSONL file
#[derive(Resource)]
pub struct NotificationLogger {
    writer: Option<BufWriter<File>>,
    logged: u64,
    next_sequence: u64,
}

impl NotificationLogger {
    /// Create a new logger writing to the specified path
    pub fn new(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;

        Ok(Self {
            writer: Some(BufWriter::new(file)),
            logged: 0,
            next_sequence: 1,
        })
    }

    /// Create a logger that discards notifications
    pub fn null() -> Self {
        Self {
            writer: None,
            logged: 0,
            next_sequence: 1,
        }
    }

    pub fn logged(&self) -> u64 {
        self.logged
    }

    /// Log a notification to the file
    pub fn log(&mut self, notification: &Notification) -> Result<(), NotifyError> {
        self.logged += 1;
        if let Some(ref mut writer) = self.writer {
            let line = notification.to_jsonl()?;
            writeln!(writer, "{}", line)?;
        }
        Ok(())
    }

    pub fn log_batch(&mut self, notifications: &[Notification]) -> Result<(), NotifyError> {
        for notification in notifications {
            self.log(notification)?;
        }
        Ok(())
    }

    /// Flush the buffer to disk
    pub fn flush(&mut self) -> std::io::Result<()> {
        if let Some(ref mut writer) = self.writer {
            writer.flush()?;
        }
        Ok(())
    }
}

impl NotificationSink for NotificationLogger {
    fn notify(&mut self, alert: Alert, at: SimTimestamp) -> Result<(), NotifyError> {
        let id = generate_notification_id(self.next_sequence);
        self.next_sequence += 1;
        self.log(&alert.into_notification(id, at))
    }
}

impl Drop for NotificationLogger {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            tracing::warn!("Failed to flush notification logger: {}", e);
        }
    }
}
