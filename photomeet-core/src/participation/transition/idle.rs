//! Idle state transitions.

use super::Transition;
use crate::activity::Activity;
use crate::error::{DomainError, IneligibilityReason};
use crate::participation::effect::{Effect, LogLevel};
use crate::participation::event::ParticipationEvent;
use crate::participation::state::ParticipationState;

/// Handle transitions from the Idle state.
///
/// Idle is the rest state for any viewer with no standing toward the
/// activity. The only legal viewer action here is applying to join.
pub fn handle(
    state: ParticipationState,
    event: ParticipationEvent,
    activity: &Activity,
) -> Result<Transition, DomainError> {
    match (&state, event) {
        // Apply while the activity is open -> Applied, record the application
        (ParticipationState::Idle, ParticipationEvent::ApplyRequested { message }) => {
            if activity.is_ended() || activity.is_cancelled() {
                return Err(DomainError::ActivityEnded {
                    id: activity.id.clone(),
                });
            }
            if activity.is_full() {
                return Err(DomainError::NotEligible {
                    reason: IneligibilityReason::ActivityFull,
                });
            }
            Ok(Transition::new(
                ParticipationState::Applied,
                vec![Effect::RecordApplication { message }],
            ))
        }

        // No application on file to withdraw
        (ParticipationState::Idle, ParticipationEvent::WithdrawRequested) => {
            Err(DomainError::InvalidState {
                action: "cancel_application",
                state: state.name(),
            })
        }

        // Review outcomes can only target a viewer with an application on
        // file; one arriving here means the store and machine disagree.
        (_, event) => Ok(Transition::new(
            state,
            vec![Effect::Log {
                level: LogLevel::Warn,
                message: format!("Unhandled event {:?} in state {:?}", event, state),
            }],
        )),
    }
}
