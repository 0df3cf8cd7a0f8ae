//! Shared clock and notification types for the Force progression simulation.
//!
//! This crate contains pure data structures with no simulation logic.
//! `force-core` depends on it for timestamps and the records it hands to
//! notification sinks.

pub mod notification;
pub mod timestamp;

// Re-export timestamp types
pub use timestamp::{
    Season, SimDate, SimTimestamp, DAYS_PER_SEASON, SEASONS_PER_YEAR,
    TICKS_PER_DAY, TICKS_PER_HOUR, TICKS_PER_YEAR,
};

// Re-export notification types
pub use notification::{
    generate_notification_id, Notification, NotificationKind, PawnRef, Severity,
};
