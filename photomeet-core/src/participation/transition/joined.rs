//! Joined state transitions.

use super::Transition;
use crate::activity::Activity;
use crate::error::DomainError;
use crate::participation::effect::{Effect, LogLevel};
use crate::participation::event::ParticipationEvent;
use crate::participation::state::ParticipationState;

/// Handle transitions from the Joined state.
///
/// Members have no viewer-triggered transitions: membership can only move
/// when the organizer revisits the decision. Rating an ended activity is a
/// session operation gated on this state, not a transition out of it.
pub fn handle(
    state: ParticipationState,
    event: ParticipationEvent,
    _activity: &Activity,
) -> Result<Transition, DomainError> {
    match (&state, event) {
        (ParticipationState::Joined, ParticipationEvent::ApplyRequested { .. }) => {
            Err(DomainError::InvalidState {
                action: "submit_application",
                state: state.name(),
            })
        }

        // Members cannot withdraw; only a pending application can be pulled
        (ParticipationState::Joined, ParticipationEvent::WithdrawRequested) => {
            Err(DomainError::InvalidState {
                action: "cancel_application",
                state: state.name(),
            })
        }

        // Repeated acceptance is a no-op
        (ParticipationState::Joined, ParticipationEvent::Accepted) => Ok(Transition::new(
            state,
            vec![Effect::Log {
                level: LogLevel::Info,
                message: "Ignoring repeated Accepted event in Joined state".to_string(),
            }],
        )),

        // The organizer re-decided an earlier acceptance: membership is
        // revoked and the viewer drops back to Applied, with the stored
        // application now rejected.
        (ParticipationState::Joined, ParticipationEvent::Rejected) => Ok(Transition::new(
            ParticipationState::Applied,
            vec![Effect::Log {
                level: LogLevel::Info,
                message: "Membership revoked by organizer re-decision".to_string(),
            }],
        )),

        (_, event) => Ok(Transition::new(
            state,
            vec![Effect::Log {
                level: LogLevel::Warn,
                message: format!("Unhandled event {:?} in state {:?}", event, state),
            }],
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::{ActivityId, ActivityStatus, UserId};
    use chrono::{TimeZone, Utc};

    fn open_activity() -> Activity {
        Activity {
            id: ActivityId::from("act-1"),
            title: "Harbor walk".to_string(),
            organizer: UserId::from("mira"),
            starts_at: Utc.with_ymd_and_hms(2030, 6, 7, 17, 30, 0).unwrap(),
            ends_at: Utc.with_ymd_and_hms(2030, 6, 7, 20, 0, 0).unwrap(),
            max_participants: Some(4),
            status: ActivityStatus::Open,
        }
    }

    #[test]
    fn test_member_cannot_apply_again() {
        let err = handle(
            ParticipationState::Joined,
            ParticipationEvent::ApplyRequested {
                message: "again".to_string(),
            },
            &open_activity(),
        )
        .unwrap_err();

        assert!(matches!(err, DomainError::InvalidState { .. }));
    }

    #[test]
    fn test_member_cannot_withdraw() {
        let err = handle(
            ParticipationState::Joined,
            ParticipationEvent::WithdrawRequested,
            &open_activity(),
        )
        .unwrap_err();

        assert_eq!(
            err,
            DomainError::InvalidState {
                action: "cancel_application",
                state: "joined",
            }
        );
    }

    #[test]
    fn test_repeated_acceptance_is_noop() {
        let result = handle(
            ParticipationState::Joined,
            ParticipationEvent::Accepted,
            &open_activity(),
        )
        .unwrap();

        assert_eq!(result.state, ParticipationState::Joined);
        assert!(matches!(
            &result.effects[0],
            Effect::Log {
                level: LogLevel::Info,
                ..
            }
        ));
    }

    #[test]
    fn test_rejection_revokes_membership() {
        let result = handle(
            ParticipationState::Joined,
            ParticipationEvent::Rejected,
            &open_activity(),
        )
        .unwrap();

        assert_eq!(result.state, ParticipationState::Applied);
    }
}
