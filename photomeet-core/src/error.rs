//! Domain error taxonomy.
//!
//! Every operation returns one of these to the caller for local, user-visible
//! handling (disabling a button, showing a message). None of them is fatal to
//! the process, and all operations are deterministic: a repeated call either
//! idempotently succeeds or re-fails with the same error.

use std::fmt;

use thiserror::Error;

use crate::activity::ActivityId;

/// What kind of record a lookup failed to find.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Activity,
    Application,
    Participant,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Activity => write!(f, "activity"),
            Self::Application => write!(f, "application"),
            Self::Participant => write!(f, "participant"),
        }
    }
}

/// Why a guard refused an otherwise well-formed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IneligibilityReason {
    /// Rating requested before the activity ended.
    NotYetEnded,
    /// Rating requested on a cancelled activity, which never ends normally.
    ActivityCancelled,
    /// Rating requested by a viewer who is not a joined member.
    NotMember,
    /// A viewer tried to rate themselves.
    SelfRating,
    /// The activity has reached its participant capacity.
    ActivityFull,
    /// Cancellation requested inside the advance-notice window.
    TooCloseToStart,
}

impl fmt::Display for IneligibilityReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotYetEnded => write!(f, "the activity has not ended yet"),
            Self::ActivityCancelled => write!(f, "the activity was cancelled"),
            Self::NotMember => write!(f, "only joined members may rate"),
            Self::SelfRating => write!(f, "participants cannot rate themselves"),
            Self::ActivityFull => write!(f, "the activity is full"),
            Self::TooCloseToStart => write!(f, "too close to the start time"),
        }
    }
}

/// Errors surfaced by participation, review, and rating operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// The action is not legal from the viewer's current participation state.
    #[error("{action} is not allowed from the {state} state")]
    InvalidState {
        action: &'static str,
        state: &'static str,
    },

    /// A referenced activity, application, or participant does not exist.
    #[error("{kind} {id} not found")]
    NotFound { kind: Resource, id: String },

    /// The activity is ended or cancelled and no longer accepts this change.
    #[error("activity {id} is closed to further changes")]
    ActivityEnded { id: ActivityId },

    /// A guard condition for the requested action failed.
    #[error("not eligible: {reason}")]
    NotEligible { reason: IneligibilityReason },

    /// Rating score outside the accepted 1..=5 range.
    #[error("score {score} is out of range (must be 1-5)")]
    ScoreRange { score: u8 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_state_display() {
        let err = DomainError::InvalidState {
            action: "submit_application",
            state: "joined",
        };
        assert_eq!(
            format!("{}", err),
            "submit_application is not allowed from the joined state"
        );
    }

    #[test]
    fn test_not_found_display() {
        let err = DomainError::NotFound {
            kind: Resource::Application,
            id: "app-9".to_string(),
        };
        assert_eq!(format!("{}", err), "application app-9 not found");
    }

    #[test]
    fn test_not_eligible_display() {
        let err = DomainError::NotEligible {
            reason: IneligibilityReason::NotYetEnded,
        };
        assert_eq!(
            format!("{}", err),
            "not eligible: the activity has not ended yet"
        );
    }

    #[test]
    fn test_score_range_display() {
        let err = DomainError::ScoreRange { score: 9 };
        assert_eq!(format!("{}", err), "score 9 is out of range (must be 1-5)");
    }
}
