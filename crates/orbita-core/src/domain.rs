//! Read-only domain models exposed to orbits.
//!
//! These are snapshots the host's query handlers return. Orbits never
//! mutate them; writes to host data are not part of the sandboxed surface.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::UserId;

/// Completion state of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Not started.
    Open,
    /// Actively being worked.
    InProgress,
    /// Completed.
    Done,
}

/// A task belonging to a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskItem {
    /// Stable task identifier.
    pub id: String,
    /// Short title.
    pub title: String,
    /// Completion state.
    pub status: TaskStatus,
    /// Optional due date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due: Option<DateTime<Utc>>,
    /// Optional project grouping.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    /// Free-form tags.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

/// Recurrence cadence of a habit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HabitCadence {
    /// Once per day.
    Daily,
    /// Once per week.
    Weekly,
    /// Once per month.
    Monthly,
}

/// A recurring habit and its completion streak.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Habit {
    /// Stable habit identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// How often the habit recurs.
    pub cadence: HabitCadence,
    /// Consecutive completions at the current cadence.
    pub streak: u32,
    /// When the habit was last completed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_completed: Option<DateTime<Utc>>,
}

/// A block of committed time on the user's schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleBlock {
    /// Stable block identifier.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Block start.
    pub start: DateTime<Utc>,
    /// Block end.
    pub end: DateTime<Utc>,
    /// Optional category (focus, errand, break, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// A meeting on the user's calendar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meeting {
    /// Stable meeting identifier.
    pub id: String,
    /// Meeting title.
    pub title: String,
    /// Meeting start.
    pub start: DateTime<Utc>,
    /// Meeting end.
    pub end: DateTime<Utc>,
    /// Attendee display names or addresses.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attendees: Vec<String>,
    /// Optional location or call link.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// An item awaiting triage in the user's inbox.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InboxItem {
    /// Stable item identifier.
    pub id: String,
    /// Where the item came from (mail, chat, capture, ...).
    pub source: String,
    /// Subject or first line.
    pub subject: String,
    /// When the item arrived.
    pub received_at: DateTime<Utc>,
    /// Whether the user has seen it.
    pub read: bool,
}

/// Profile of the host user an orbit is acting for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// The user's identifier.
    pub id: UserId,
    /// Display name.
    pub display_name: String,
    /// Optional contact address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// IANA timezone name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_serde_round_trip() {
        let task = TaskItem {
            id: "t-1".into(),
            title: "Write weekly review".into(),
            status: TaskStatus::Open,
            due: None,
            project: Some("planning".into()),
            tags: vec!["review".into()],
        };
        let json = serde_json::to_string(&task).unwrap();
        let back: TaskItem = serde_json::from_str(&json).unwrap();
        assert_eq!(back, task);
    }

    #[test]
    fn task_status_serializes_snake_case() {
        let json = serde_json::to_string(&TaskStatus::InProgress).unwrap();
        assert_eq!(json, "\"in_progress\"");
    }

    #[test]
    fn optional_fields_are_omitted() {
        let item = InboxItem {
            id: "i-1".into(),
            source: "mail".into(),
            subject: "hello".into(),
            received_at: Utc::now(),
            read: false,
        };
        let json = serde_json::to_string(&item).unwrap();
        let back: InboxItem = serde_json::from_str(&json).unwrap();
        assert_eq!(back, item);
    }
}
