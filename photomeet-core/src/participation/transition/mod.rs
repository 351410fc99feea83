//! Pure participation transition function.
//!
//! The transition function takes the current state, an event, and the
//! activity's metadata, and returns either the new state plus a list of
//! effects, or a domain error for the caller to render. It has NO side
//! effects - it is pure and deterministic.
//!
//! Each state has its own handler module with co-located tests:
//! - `idle`: non-participant transitions
//! - `applied`: applicant transitions
//! - `joined`: member transitions
//! - `organizer`: the fixed creator state

mod applied;
mod idle;
mod joined;
mod organizer;

use crate::activity::Activity;
use crate::error::DomainError;
use crate::participation::effect::Effect;
use crate::participation::event::ParticipationEvent;
use crate::participation::state::ParticipationState;

/// Result of a participation transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// The state after the transition.
    pub state: ParticipationState,
    /// Effects for the session to apply.
    pub effects: Vec<Effect>,
}

impl Transition {
    pub fn new(state: ParticipationState, effects: Vec<Effect>) -> Self {
        Self { state, effects }
    }

    pub fn no_change(state: ParticipationState) -> Self {
        Self {
            state,
            effects: vec![],
        }
    }
}

/// Pure participation transition function.
///
/// Guard failures come back as [`DomainError`]s; events that merely have
/// nothing to do (repeated acceptance, misrouted review outcomes) are
/// absorbed with a log effect rather than an error.
pub fn transition(
    state: ParticipationState,
    event: ParticipationEvent,
    activity: &Activity,
) -> Result<Transition, DomainError> {
    match &state {
        ParticipationState::Idle => idle::handle(state, event, activity),
        ParticipationState::Applied => applied::handle(state, event, activity),
        ParticipationState::Joined => joined::handle(state, event, activity),
        ParticipationState::Organizer => organizer::handle(state, event, activity),
    }
}
