//! Review engine: organizer decisions over the applicant store.
//!
//! The engine owns the applicant store and the "currently focused" applicant
//! used for detail display. Deciding an application mutates only the stored
//! record; the cross-component consequence (advancing the applicant's
//! participation machine) is raised as a [`ReviewEvent`] for the session to
//! apply - the engine signals it, it never performs it.

use serde::{Deserialize, Serialize};

use crate::activity::UserId;
use crate::error::{DomainError, Resource};
use crate::review::store::{
    ApplicantStore, Application, ApplicationId, ApplicationStatus, StatusCounts,
};

/// The organizer's verdict on one application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Accepted,
    Rejected,
}

impl Decision {
    pub fn as_status(self) -> ApplicationStatus {
        match self {
            Self::Accepted => ApplicationStatus::Accepted,
            Self::Rejected => ApplicationStatus::Rejected,
        }
    }
}

/// Cross-component fallout of a decision, raised for the session to apply.
///
/// Events are emitted only when the stored status actually changed, so a
/// repeated identical decision emits nothing - at most logically-once per
/// status change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewEvent {
    /// The application flipped to accepted; the applicant's participation
    /// machine must be advanced to Joined before their next action.
    ApplicantAccepted {
        application: ApplicationId,
        applicant: UserId,
    },

    /// The application flipped to rejected. For a pending applicant this is
    /// informational; for an already-joined member it revokes membership.
    ApplicantRejected {
        application: ApplicationId,
        applicant: UserId,
    },
}

/// What a decision did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionOutcome {
    /// Stored status after the decision.
    pub status: ApplicationStatus,
    /// Raised only when the stored status actually changed.
    pub event: Option<ReviewEvent>,
}

/// Organizer-facing review surface over one activity's applications.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewEngine {
    store: ApplicantStore,
    selected: Option<ApplicationId>,
}

impl ReviewEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// All applications in submission order.
    pub fn applicants(&self) -> &[Application] {
        self.store.list()
    }

    /// Focus an applicant for detail display.
    pub fn select(&mut self, id: &ApplicationId) -> Result<&Application, DomainError> {
        let record = self.store.get(id).ok_or_else(|| DomainError::NotFound {
            kind: Resource::Application,
            id: id.to_string(),
        })?;
        self.selected = Some(record.id.clone());
        Ok(record)
    }

    /// The currently focused applicant, if any.
    pub fn selected(&self) -> Option<&Application> {
        self.selected.as_ref().and_then(|id| self.store.get(id))
    }

    /// Decide an application.
    ///
    /// Idempotent: deciding into the current status succeeds without an
    /// event. Re-deciding across terminal statuses is allowed and emits the
    /// matching event so membership follows the flipped decision.
    pub fn decide(
        &mut self,
        id: &ApplicationId,
        decision: Decision,
    ) -> Result<DecisionOutcome, DomainError> {
        let record = self.store.get_mut(id).ok_or_else(|| DomainError::NotFound {
            kind: Resource::Application,
            id: id.to_string(),
        })?;

        let target = decision.as_status();
        if record.status == target {
            return Ok(DecisionOutcome {
                status: target,
                event: None,
            });
        }

        record.status = target;
        let event = match decision {
            Decision::Accepted => ReviewEvent::ApplicantAccepted {
                application: record.id.clone(),
                applicant: record.applicant.clone(),
            },
            Decision::Rejected => ReviewEvent::ApplicantRejected {
                application: record.id.clone(),
                applicant: record.applicant.clone(),
            },
        };

        Ok(DecisionOutcome {
            status: target,
            event: Some(event),
        })
    }

    /// Status totals, derived on read.
    pub fn counts(&self) -> StatusCounts {
        self.store.counts()
    }

    pub fn accepted_count(&self) -> usize {
        self.store.accepted_count()
    }

    /// Accepted applicants in submission order.
    pub fn accepted_applicants(&self) -> impl Iterator<Item = &UserId> {
        self.store.accepted_applicants()
    }

    pub fn application_of(&self, applicant: &UserId) -> Option<&Application> {
        self.store.by_applicant(applicant)
    }

    /// Record a new application (driven by a participation effect).
    pub(crate) fn record_application(&mut self, applicant: UserId, message: String) -> ApplicationId {
        self.store.append(applicant, message)
    }

    /// Remove an applicant's record (driven by a participation effect).
    ///
    /// Clears the focus if the focused applicant withdrew.
    pub(crate) fn withdraw_application(&mut self, applicant: &UserId) -> Option<Application> {
        let withdrawn = self.store.withdraw(applicant)?;
        if self.selected.as_ref() == Some(&withdrawn.id) {
            self.selected = None;
        }
        Some(withdrawn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine_with_applicants() -> ReviewEngine {
        let mut engine = ReviewEngine::new();
        engine.record_application(UserId::from("kai"), "one".to_string());
        engine.record_application(UserId::from("noor"), "two".to_string());
        engine.record_application(UserId::from("tomek"), "three".to_string());
        engine
    }

    #[test]
    fn test_select_focuses_applicant() {
        let mut engine = engine_with_applicants();

        let record = engine.select(&ApplicationId::from("app-2")).unwrap();
        assert_eq!(record.applicant, UserId::from("noor"));

        let selected = engine.selected().unwrap();
        assert_eq!(selected.id, ApplicationId::from("app-2"));
    }

    #[test]
    fn test_select_unknown_id_fails() {
        let mut engine = engine_with_applicants();

        let err = engine.select(&ApplicationId::from("unknown-id")).unwrap_err();

        assert_eq!(
            err,
            DomainError::NotFound {
                kind: Resource::Application,
                id: "unknown-id".to_string(),
            }
        );
    }

    #[test]
    fn test_decide_accept_emits_event_once() {
        let mut engine = engine_with_applicants();
        let id = ApplicationId::from("app-3");

        let first = engine.decide(&id, Decision::Accepted).unwrap();
        assert_eq!(first.status, ApplicationStatus::Accepted);
        assert!(matches!(
            first.event,
            Some(ReviewEvent::ApplicantAccepted { .. })
        ));

        // Idempotent repeat: same status, no second event
        let second = engine.decide(&id, Decision::Accepted).unwrap();
        assert_eq!(second.status, ApplicationStatus::Accepted);
        assert!(second.event.is_none());
    }

    #[test]
    fn test_re_decision_flips_status_and_emits() {
        let mut engine = engine_with_applicants();
        let id = ApplicationId::from("app-3");

        engine.decide(&id, Decision::Accepted).unwrap();
        let flipped = engine.decide(&id, Decision::Rejected).unwrap();

        assert_eq!(flipped.status, ApplicationStatus::Rejected);
        assert!(matches!(
            flipped.event,
            Some(ReviewEvent::ApplicantRejected { .. })
        ));
    }

    #[test]
    fn test_decide_unknown_id_fails() {
        let mut engine = engine_with_applicants();

        let err = engine
            .decide(&ApplicationId::from("unknown-id"), Decision::Accepted)
            .unwrap_err();

        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[test]
    fn test_withdrawal_clears_focus() {
        let mut engine = engine_with_applicants();
        engine.select(&ApplicationId::from("app-2")).unwrap();

        engine.withdraw_application(&UserId::from("noor"));

        assert!(engine.selected().is_none());
    }

    #[test]
    fn test_withdrawal_keeps_unrelated_focus() {
        let mut engine = engine_with_applicants();
        engine.select(&ApplicationId::from("app-1")).unwrap();

        engine.withdraw_application(&UserId::from("noor"));

        assert_eq!(
            engine.selected().map(|record| record.id.clone()),
            Some(ApplicationId::from("app-1"))
        );
    }

    #[test]
    fn test_counts_follow_decisions() {
        let mut engine = engine_with_applicants();
        engine
            .decide(&ApplicationId::from("app-1"), Decision::Accepted)
            .unwrap();
        engine
            .decide(&ApplicationId::from("app-2"), Decision::Rejected)
            .unwrap();

        let counts = engine.counts();
        assert_eq!(counts.pending, 1);
        assert_eq!(counts.accepted, 1);
        assert_eq!(counts.rejected, 1);
    }
}
