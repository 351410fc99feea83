//! Applied state transitions.

use super::Transition;
use crate::activity::Activity;
use crate::error::DomainError;
use crate::participation::effect::{Effect, LogLevel};
use crate::participation::event::ParticipationEvent;
use crate::participation::state::ParticipationState;

/// Handle transitions from the Applied state.
///
/// The viewer has an application on file. They can withdraw it; the
/// organizer's decision arrives as an external event via the session.
pub fn handle(
    state: ParticipationState,
    event: ParticipationEvent,
    activity: &Activity,
) -> Result<Transition, DomainError> {
    match (&state, event) {
        // Duplicate application refused
        (ParticipationState::Applied, ParticipationEvent::ApplyRequested { .. }) => {
            Err(DomainError::InvalidState {
                action: "submit_application",
                state: state.name(),
            })
        }

        // Withdraw -> Idle, remove the record
        (ParticipationState::Applied, ParticipationEvent::WithdrawRequested) => {
            if activity.is_cancelled() {
                return Err(DomainError::ActivityEnded {
                    id: activity.id.clone(),
                });
            }
            Ok(Transition::new(
                ParticipationState::Idle,
                vec![Effect::WithdrawApplication],
            ))
        }

        // Acceptance promotes the applicant to member
        (ParticipationState::Applied, ParticipationEvent::Accepted) => {
            Ok(Transition::new(ParticipationState::Joined, vec![]))
        }

        // Rejection lives on the stored application; the machine stays put
        // so the viewer can still see and withdraw the rejected application.
        (ParticipationState::Applied, ParticipationEvent::Rejected) => {
            Ok(Transition::no_change(state))
        }

        (_, event) => Ok(Transition::new(
            state,
            vec![Effect::Log {
                level: LogLevel::Warn,
                message: format!("Unhandled event {:?} in state {:?}", event, state),
            }],
        )),
    }
}
