//! State types for the participation state machine.
//!
//! This module defines the explicit state machine for one viewer's
//! relationship to one activity. Following the principle of "make illegal
//! states unrepresentable", the four valid relationships are an enum; the
//! loosely-typed role strings of a UI layer never enter the core.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The explicit state machine for one viewer's participation in an activity.
///
/// `Organizer` is reachable only as the initial state for the activity's
/// creator: no transition enters it and no transition leaves it. An organizer
/// is never also a participant in this model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticipationState {
    /// Non-participant; the default relationship to any activity.
    #[default]
    Idle,

    /// Application submitted, awaiting the organizer's decision.
    ///
    /// A rejected applicant also stays here: rejection changes the stored
    /// application, not the viewer's state, so the record remains visible
    /// and the viewer may withdraw it.
    Applied,

    /// Application accepted; the viewer is a member of the activity.
    Joined,

    /// The activity's creator. Fixed for the activity's lifetime.
    Organizer,
}

impl ParticipationState {
    /// Lowercase state name for error messages and logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Applied => "applied",
            Self::Joined => "joined",
            Self::Organizer => "organizer",
        }
    }

    /// The role this state presents to the surrounding UI.
    pub fn role(&self) -> Role {
        match self {
            Self::Idle => Role::NonParticipant,
            Self::Applied => Role::Applicant,
            Self::Joined => Role::Member,
            Self::Organizer => Role::Organizer,
        }
    }

    pub fn is_organizer(&self) -> bool {
        matches!(self, Self::Organizer)
    }

    pub fn is_joined(&self) -> bool {
        matches!(self, Self::Joined)
    }
}

impl fmt::Display for ParticipationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A viewer's role as the presentation layer sees it.
///
/// Pure read model derived from [`ParticipationState`]; never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    NonParticipant,
    Applicant,
    Member,
    Organizer,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonParticipant => write!(f, "non-participant"),
            Self::Applicant => write!(f, "applicant"),
            Self::Member => write!(f, "member"),
            Self::Organizer => write!(f, "organizer"),
        }
    }
}

impl From<ParticipationState> for Role {
    fn from(state: ParticipationState) -> Self {
        state.role()
    }
}
