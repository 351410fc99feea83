//! Activity metadata and lifecycle status.
//!
//! An `Activity` is the shared context every participation machine for that
//! activity consults: its schedule, capacity, and current status. The status
//! is stored, but "ended" is fundamentally a clock fact — read paths surface
//! it lazily through [`Activity::sync_clock`] rather than mutating on every
//! query.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Advance notice, in hours, an organizer must give before cancelling.
pub const CANCEL_NOTICE_HOURS: i64 = 12;

/// Newtype for activity identity to prevent mixing with other id strings.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ActivityId(pub String);

impl fmt::Display for ActivityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ActivityId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ActivityId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Newtype for viewer/user identity.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for UserId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Lifecycle status of an activity.
///
/// `Cancelled` is terminal for every viewer at once; `Ended` still allows
/// withdrawal, organizer review, and rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityStatus {
    /// Accepting applications.
    Open,
    /// Capacity reached; applications refused until a slot frees up.
    Full,
    /// The scheduled end time has passed.
    Ended,
    /// Called off by the organizer.
    Cancelled,
}

impl fmt::Display for ActivityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Full => write!(f, "full"),
            Self::Ended => write!(f, "ended"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// An activity's metadata as the participation core sees it.
///
/// Exactly one organizer per activity; the organizer is fixed at creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub id: ActivityId,
    pub title: String,
    pub organizer: UserId,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    /// Maximum accepted participants; `None` means unlimited.
    pub max_participants: Option<u32>,
    pub status: ActivityStatus,
}

impl Activity {
    pub fn is_ended(&self) -> bool {
        matches!(self.status, ActivityStatus::Ended)
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self.status, ActivityStatus::Cancelled)
    }

    pub fn is_full(&self) -> bool {
        matches!(self.status, ActivityStatus::Full)
    }

    /// True while the activity can take new applications.
    pub fn accepts_applications(&self) -> bool {
        matches!(self.status, ActivityStatus::Open)
    }

    /// Lazily mark an open or full activity ended once its end time passes.
    ///
    /// Returns true if the status changed. Cancelled activities stay
    /// cancelled; an already-ended activity is left alone.
    pub fn sync_clock(&mut self, now: DateTime<Utc>) -> bool {
        match self.status {
            ActivityStatus::Open | ActivityStatus::Full if now >= self.ends_at => {
                self.status = ActivityStatus::Ended;
                true
            }
            _ => false,
        }
    }

    /// Apply an organizer edit. Only the fields present in the patch change.
    pub fn apply_edit(&mut self, edit: ActivityEdit) {
        if let Some(title) = edit.title {
            self.title = title;
        }
        if let Some(starts_at) = edit.starts_at {
            self.starts_at = starts_at;
        }
        if let Some(ends_at) = edit.ends_at {
            self.ends_at = ends_at;
        }
        if let Some(max_participants) = edit.max_participants {
            self.max_participants = Some(max_participants);
        }
    }
}

/// Fields an organizer may change on an existing activity.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ActivityEdit {
    pub title: Option<String>,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub max_participants: Option<u32>,
}
