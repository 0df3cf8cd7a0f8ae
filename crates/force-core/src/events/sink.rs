//! Notification Sinks
//!
//! Progression code raises [`Alert`]s; a sink stamps them with an id and
//! timestamp and delivers them. Delivery is fire-and-forget: a failing sink
//! is logged by [`deliver`] and never interrupts the caller.

use bevy_ecs::prelude::*;
use force_events::{
    generate_notification_id, Notification, NotificationKind, PawnRef, Severity, SimTimestamp,
};
use thiserror::Error;

/// Errors a sink may report
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notification sink is closed")]
    Closed,
    #[error("failed to write notification: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode notification: {0}")]
    Encode(#[from] serde_json::Error),
}

/// A notification request before the sink assigns identity and time.
#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    pub kind: NotificationKind,
    pub pawn: PawnRef,
    pub severity: Severity,
    pub value: Option<f64>,
}

impl Alert {
    pub fn new(kind: NotificationKind, pawn: PawnRef) -> Self {
        Self {
            kind,
            pawn,
            severity: kind.default_severity(),
            value: None,
        }
    }

    pub fn with_value(mut self, value: f64) -> Self {
        self.value = Some(value);
        self
    }

    /// Turns the alert into a full notification record.
    pub fn into_notification(self, notification_id: String, at: SimTimestamp) -> Notification {
        let mut notification = Notification::new(notification_id, at, self.kind, self.pawn)
            .with_severity(self.severity);
        notification.value = self.value;
        notification
    }
}

/// Anything that accepts notifications
pub trait NotificationSink {
    fn notify(&mut self, alert: Alert, at: SimTimestamp) -> Result<(), NotifyError>;
}

/// Sends an alert, logging and swallowing any sink failure.
pub fn deliver<S: NotificationSink + ?Sized>(sink: &mut S, alert: Alert, tick: u64) {
    let kind = alert.kind;
    let pawn_id = alert.pawn.pawn_id.clone();
    if let Err(e) = sink.notify(alert, SimTimestamp::at(tick)) {
        tracing::warn!("Dropped {:?} notification for {}: {}", kind, pawn_id, e);
    }
}

/// In-memory sink drained once per tick by the driver
#[derive(Resource, Debug, Default)]
pub struct NotificationOutbox {
    pending: Vec<Notification>,
    next_sequence: u64,
}

impl NotificationOutbox {
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
            next_sequence: 1,
        }
    }

    pub fn drain(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.pending)
    }

    pub fn pending(&self) -> &[Notification] {
        &self.pending
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }
}

impl NotificationSink for NotificationOutbox {
    fn notify(&mut self, alert: Alert, at: SimTimestamp) -> Result<(), NotifyError> {
        let sequence = self.next_sequence.max(1);
        self.next_sequence = sequence + 1;
        self.pending
            .push(alert.into_notification(generate_notification_id(sequence), at));
        Ok(())
    }
}

impl NotificationSink for Vec<Notification> {
    fn notify(&mut self, alert: Alert, at: SimTimestamp) -> Result<(), NotifyError> {
        let id = generate_notification_id(self.len() as u64 + 1);
        self.push(alert.into_notification(id, at));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ClosedSink;

    impl NotificationSink for ClosedSink {
        fn notify(&mut self, _alert: Alert, _at: SimTimestamp) -> Result<(), NotifyError> {
            Err(NotifyError::Closed)
        }
    }

    fn alert() -> Alert {
        Alert::new(
            NotificationKind::SensitivityAwakened,
            PawnRef::new("pawn_0001", "Kira", "player_colony"),
        )
    }

    #[test]
    fn test_outbox_assigns_sequential_ids() {
        let mut outbox = NotificationOutbox::new();
        deliver(&mut outbox, alert(), 10);
        deliver(&mut outbox, alert().with_value(2.0), 20);

        let notes = outbox.drain();
        assert_eq!(notes.len(), 2);
        assert_eq!(notes[0].notification_id, "note_00000001");
        assert_eq!(notes[1].notification_id, "note_00000002");
        assert_eq!(notes[1].timestamp.tick, 20);
        assert_eq!(notes[1].value, Some(2.0));
        assert!(outbox.is_empty());
    }

    #[test]
    fn test_default_outbox_starts_at_one() {
        let mut outbox = NotificationOutbox::default();
        deliver(&mut outbox, alert(), 0);
        assert_eq!(outbox.pending()[0].notification_id, "note_00000001");
    }

    #[test]
    fn test_failing_sink_is_swallowed() {
        let mut sink = ClosedSink;
        // Must not panic or propagate
        deliver(&mut sink, alert(), 5);
    }

    #[test]
    fn test_vec_sink() {
        let mut notes: Vec<Notification> = Vec::new();
        deliver(&mut notes, alert(), 1);
        assert_eq!(notes[0].message_key, "force.message.sensitivity_awakened");
        assert_eq!(notes[0].severity, Severity::Positive);
    }
}
