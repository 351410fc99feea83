//! Organizer state transitions.

use super::Transition;
use crate::activity::Activity;
use crate::error::DomainError;
use crate::participation::effect::{Effect, LogLevel};
use crate::participation::event::ParticipationEvent;
use crate::participation::state::ParticipationState;

/// Handle transitions from the Organizer state.
///
/// The organizer's relationship to their own activity never changes: they
/// cannot apply, withdraw, or be decided on. Organizer operations (listing
/// applicants, deciding, editing, cancelling) are session operations guarded
/// on this state, not machine transitions.
pub fn handle(
    state: ParticipationState,
    event: ParticipationEvent,
    _activity: &Activity,
) -> Result<Transition, DomainError> {
    match (&state, event) {
        // An organizer cannot apply to their own activity
        (ParticipationState::Organizer, ParticipationEvent::ApplyRequested { .. }) => {
            Err(DomainError::InvalidState {
                action: "submit_application",
                state: state.name(),
            })
        }

        (ParticipationState::Organizer, ParticipationEvent::WithdrawRequested) => {
            Err(DomainError::InvalidState {
                action: "cancel_application",
                state: state.name(),
            })
        }

        // Review outcomes never target the organizer; there is no
        // application of theirs to decide.
        (_, event) => Ok(Transition::new(
            state,
            vec![Effect::Log {
                level: LogLevel::Warn,
                message: format!("Unhandled event {:?} in state {:?}", event, state),
            }],
        )),
    }
}
