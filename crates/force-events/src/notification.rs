//! Notification Types
//!
//! User-facing notifications raised by the simulation: Force awakenings,
//! level gains, appearance changes and ritual results. Each record carries a
//! translation message key rather than rendered text.

use serde::{Deserialize, Serialize};

use crate::timestamp::SimTimestamp;

/// How the notification should be presented to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Positive,
    Neutral,
    Negative,
}

/// What happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    SensitivityAwakened,
    LevelGained,
    MaximumLevelReached,
    AppearanceCopied,
    AppearanceRestored,
    RitualConcluded,
}

impl NotificationKind {
    /// Translation key for the message body.
    pub fn message_key(&self) -> &'static str {
        match self {
            NotificationKind::SensitivityAwakened => "force.message.sensitivity_awakened",
            NotificationKind::LevelGained => "force.message.level_gained",
            NotificationKind::MaximumLevelReached => "force.message.maximum_level_reached",
            NotificationKind::AppearanceCopied => "force.message.appearance_copied",
            NotificationKind::AppearanceRestored => "force.message.appearance_restored",
            NotificationKind::RitualConcluded => "force.message.ritual_concluded",
        }
    }

    /// Default presentation for this kind.
    pub fn default_severity(&self) -> Severity {
        match self {
            NotificationKind::SensitivityAwakened
            | NotificationKind::LevelGained
            | NotificationKind::MaximumLevelReached => Severity::Positive,
            _ => Severity::Neutral,
        }
    }
}

/// Identity of the pawn a notification is about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PawnRef {
    pub pawn_id: String,
    pub name: String,
    pub faction: String,
}

impl PawnRef {
    pub fn new(
        pawn_id: impl Into<String>,
        name: impl Into<String>,
        faction: impl Into<String>,
    ) -> Self {
        Self {
            pawn_id: pawn_id.into(),
            name: name.into(),
            faction: faction.into(),
        }
    }
}

/// A single notification as handed to a sink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub notification_id: String,
    pub timestamp: SimTimestamp,
    pub kind: NotificationKind,
    pub message_key: String,
    pub pawn: PawnRef,
    pub severity: Severity,
    /// Optional numeric argument for the message (new level, ritual quality).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
}

impl Notification {
    /// Builds a notification using the kind's message key and default severity.
    pub fn new(
        notification_id: impl Into<String>,
        timestamp: SimTimestamp,
        kind: NotificationKind,
        pawn: PawnRef,
    ) -> Self {
        Self {
            notification_id: notification_id.into(),
            timestamp,
            kind,
            message_key: kind.message_key().to_string(),
            pawn,
            severity: kind.default_severity(),
            value: None,
        }
    }

    pub fn with_value(mut self, value: f64) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Serializes the notification as a single JSON line.
    pub fn to_jsonl(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes a notification from a JSON line.
    pub fn from_jsonl(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }
}

/// Generates a notification ID with the given sequence number.
pub fn generate_notification_id(sequence: u64) -> String {
    format!("note_{:08}", sequence)
}
