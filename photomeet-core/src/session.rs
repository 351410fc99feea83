//! Per-activity session: the aggregate that runs the machines.
//!
//! One `ActivitySession` owns everything scoped to a single activity: the
//! activity metadata, one participation machine per viewer, the review
//! engine, and the rating gate. Each operation runs the pure transition,
//! applies the returned effects, persists the new state, and routes review
//! events into the affected machines - all before returning, so a viewer can
//! never observe a stale state after an organizer decision.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::activity::{Activity, ActivityEdit, ActivityStatus, UserId, CANCEL_NOTICE_HOURS};
use crate::error::{DomainError, IneligibilityReason};
use crate::participation::{
    transition, Effect, LogLevel, ParticipationEvent, ParticipationState, Role,
};
use crate::rating::{Rating, RatingGate};
use crate::review::{
    Application, ApplicationId, ApplicationStatus, Decision, ReviewEngine, ReviewEvent,
    StatusCounts,
};

/// What the surrounding UI may expose for one viewer right now.
///
/// Computed on demand from the machine state, the stored application, and
/// the activity status - never stored, so it cannot drift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ActionSet {
    /// "Apply to join" is live.
    pub can_apply: bool,
    /// "Cancel application" is live.
    pub can_withdraw: bool,
    /// "Rate participants" is live.
    pub can_rate: bool,
    /// Organizer management surface (review, edit, cancel) is live.
    pub can_manage: bool,
    /// Inert "applied" marker.
    pub applied_badge: bool,
    /// Inert "not selected" marker for a rejected application.
    pub rejected_badge: bool,
    /// Inert "joined" marker while the activity is still running.
    pub joined_badge: bool,
}

/// One activity's world: machines, review engine, rating gate.
#[derive(Debug, Clone)]
pub struct ActivitySession {
    activity: Activity,
    states: HashMap<UserId, ParticipationState>,
    review: ReviewEngine,
    ratings: RatingGate,
}

impl ActivitySession {
    /// Create the session for an activity, seeding its creator as the
    /// organizer. This is the only way the Organizer state is ever entered.
    pub fn new(activity: Activity) -> Self {
        let mut states = HashMap::new();
        states.insert(activity.organizer.clone(), ParticipationState::Organizer);
        let ratings = RatingGate::new(activity.id.clone());
        Self {
            activity,
            states,
            review: ReviewEngine::new(),
            ratings,
        }
    }

    pub fn activity(&self) -> &Activity {
        &self.activity
    }

    pub(crate) fn activity_mut(&mut self) -> &mut Activity {
        &mut self.activity
    }

    /// The viewer's current participation state; Idle if never seen.
    pub fn state(&self, viewer: &UserId) -> ParticipationState {
        self.states.get(viewer).copied().unwrap_or_default()
    }

    /// The viewer's role as the presentation layer sees it.
    pub fn role(&self, viewer: &UserId) -> Role {
        self.state(viewer).role()
    }

    pub fn is_ended(&self) -> bool {
        self.activity.is_ended()
    }

    pub fn is_cancelled(&self) -> bool {
        self.activity.is_cancelled()
    }

    // =========================================================================
    // Viewer operations
    // =========================================================================

    /// Submit an application to join.
    ///
    /// Fails with `InvalidState` unless the viewer is Idle, `ActivityEnded`
    /// once the activity is over, and `NotEligible` while it is full.
    pub fn submit_application(
        &mut self,
        viewer: &UserId,
        message: impl Into<String>,
    ) -> Result<(), DomainError> {
        self.process_event(
            viewer,
            ParticipationEvent::ApplyRequested {
                message: message.into(),
            },
        )
    }

    /// Withdraw the viewer's application, removing its record.
    ///
    /// Fails with `InvalidState` unless the viewer is Applied.
    pub fn cancel_application(&mut self, viewer: &UserId) -> Result<(), DomainError> {
        self.process_event(viewer, ParticipationEvent::WithdrawRequested)
    }

    // =========================================================================
    // Organizer operations
    // =========================================================================

    /// Applications in submission order. Organizer only.
    pub fn applicants(&self, viewer: &UserId) -> Result<&[Application], DomainError> {
        self.require_organizer(viewer, "list_applicants")?;
        Ok(self.review.applicants())
    }

    /// Derived status totals for badges. Organizer only.
    pub fn counts(&self, viewer: &UserId) -> Result<StatusCounts, DomainError> {
        self.require_organizer(viewer, "count_applicants")?;
        Ok(self.review.counts())
    }

    /// Focus one applicant for detail display. Organizer only.
    pub fn select_applicant(
        &mut self,
        viewer: &UserId,
        id: &ApplicationId,
    ) -> Result<&Application, DomainError> {
        self.require_organizer(viewer, "select_applicant")?;
        self.review.select(id)
    }

    /// The currently focused applicant, if any. Organizer only.
    pub fn selected_applicant(
        &self,
        viewer: &UserId,
    ) -> Result<Option<&Application>, DomainError> {
        self.require_organizer(viewer, "selected_applicant")?;
        Ok(self.review.selected())
    }

    /// Decide an application and immediately apply the fallout to the
    /// applicant's machine.
    ///
    /// An acceptance that actually changes the stored status advances the
    /// applicant to Joined before this call returns; a rejection of a
    /// joined member revokes membership the same way.
    pub fn decide(
        &mut self,
        viewer: &UserId,
        id: &ApplicationId,
        decision: Decision,
    ) -> Result<ApplicationStatus, DomainError> {
        self.require_organizer(viewer, "decide")?;
        if self.activity.is_cancelled() {
            return Err(DomainError::ActivityEnded {
                id: self.activity.id.clone(),
            });
        }

        let outcome = self.review.decide(id, decision)?;
        info!(
            activity = %self.activity.id,
            application = %id,
            status = %outcome.status,
            "application decided"
        );
        if let Some(event) = outcome.event {
            self.apply_review_event(event);
        }
        self.sync_capacity();
        Ok(outcome.status)
    }

    /// Apply an organizer edit to the activity metadata.
    pub fn edit_activity(
        &mut self,
        viewer: &UserId,
        edit: ActivityEdit,
    ) -> Result<(), DomainError> {
        self.require_organizer(viewer, "edit_activity")?;
        if self.activity.is_cancelled() {
            return Err(DomainError::ActivityEnded {
                id: self.activity.id.clone(),
            });
        }
        self.activity.apply_edit(edit);
        info!(activity = %self.activity.id, "activity edited");
        self.sync_capacity();
        Ok(())
    }

    /// Cancel the activity for every viewer at once. Terminal.
    ///
    /// Refused inside the advance-notice window: participants get at least
    /// [`CANCEL_NOTICE_HOURS`] of warning before a planned activity
    /// disappears.
    pub fn cancel_activity(
        &mut self,
        viewer: &UserId,
        now: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        self.require_organizer(viewer, "cancel_activity")?;
        if self.activity.is_cancelled() || self.activity.is_ended() {
            return Err(DomainError::ActivityEnded {
                id: self.activity.id.clone(),
            });
        }
        if now + Duration::hours(CANCEL_NOTICE_HOURS) > self.activity.starts_at {
            return Err(DomainError::NotEligible {
                reason: IneligibilityReason::TooCloseToStart,
            });
        }
        self.activity.status = ActivityStatus::Cancelled;
        info!(activity = %self.activity.id, "activity cancelled");
        Ok(())
    }

    // =========================================================================
    // Rating
    // =========================================================================

    /// Submit (or overwrite) a rating for a co-participant.
    pub fn request_rating(
        &mut self,
        viewer: &UserId,
        ratee: &UserId,
        score: u8,
        comment: Option<String>,
    ) -> Result<(), DomainError> {
        let state = self.state(viewer);
        let roster = self.roster(viewer);
        self.ratings
            .submit(viewer, ratee, score, comment, &state, &self.activity, &roster)?;
        info!(
            activity = %self.activity.id,
            rater = %viewer,
            ratee = %ratee,
            score,
            "rating recorded"
        );
        Ok(())
    }

    /// Whether `viewer` may rate right now; the error says why not.
    pub fn rating_eligibility(&self, viewer: &UserId) -> Result<(), DomainError> {
        RatingGate::eligibility(&self.state(viewer), &self.activity)
    }

    /// Identities `viewer` may rate: the organizer plus accepted members,
    /// minus the viewer themselves. Organizer first, then submission order.
    pub fn roster(&self, viewer: &UserId) -> Vec<UserId> {
        let mut roster = vec![self.activity.organizer.clone()];
        roster.extend(self.review.accepted_applicants().cloned());
        roster.retain(|member| member != viewer);
        roster
    }

    /// Ratees `viewer` has already rated, for per-ratee "rated" markers.
    pub fn rated_by(&self, viewer: &UserId) -> Vec<&UserId> {
        self.ratings
            .given(viewer)
            .map(|rating| &rating.ratee)
            .collect()
    }

    /// All stored ratings in first-submission order.
    pub fn ratings(&self) -> &[Rating] {
        self.ratings.ratings()
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Joined members according to the machines, sorted for determinism.
    ///
    /// Always agrees with the store's accepted applications: both views are
    /// updated inside the same decide call.
    pub fn members(&self) -> Vec<UserId> {
        let mut members: Vec<UserId> = self
            .states
            .iter()
            .filter(|(_, state)| state.is_joined())
            .map(|(viewer, _)| viewer.clone())
            .collect();
        members.sort();
        members
    }

    /// Derived action visibility for one viewer.
    pub fn actions(&self, viewer: &UserId) -> ActionSet {
        let state = self.state(viewer);
        let activity = &self.activity;
        let mut actions = ActionSet::default();
        match state {
            ParticipationState::Idle => {
                actions.can_apply = activity.accepts_applications();
            }
            ParticipationState::Applied => {
                let rejected = self
                    .review
                    .application_of(viewer)
                    .is_some_and(|application| application.status == ApplicationStatus::Rejected);
                if rejected {
                    actions.rejected_badge = true;
                } else {
                    actions.can_withdraw = !activity.is_cancelled();
                    actions.applied_badge = true;
                }
            }
            ParticipationState::Joined => {
                if activity.is_ended() {
                    actions.can_rate = true;
                } else if !activity.is_cancelled() {
                    actions.joined_badge = true;
                }
            }
            ParticipationState::Organizer => {
                actions.can_manage = true;
            }
        }
        actions
    }

    /// Surface "ended" lazily from the clock.
    pub fn sync_clock(&mut self, now: DateTime<Utc>) {
        if self.activity.sync_clock(now) {
            info!(activity = %self.activity.id, "activity ended (end time passed)");
        }
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Run one event through a viewer's machine and apply the results.
    fn process_event(
        &mut self,
        viewer: &UserId,
        event: ParticipationEvent,
    ) -> Result<(), DomainError> {
        let state = self.state(viewer);
        info!(
            activity = %self.activity.id,
            viewer = %viewer,
            state = %state,
            event = %event.log_summary(),
            "processing participation event"
        );

        let result = transition(state, event, &self.activity)?;
        for effect in result.effects {
            self.apply_effect(viewer, effect);
        }
        if result.state != state {
            info!(
                activity = %self.activity.id,
                viewer = %viewer,
                from = %state,
                to = %result.state,
                "participation state changed"
            );
        }
        self.states.insert(viewer.clone(), result.state);
        self.sync_capacity();
        Ok(())
    }

    fn apply_effect(&mut self, viewer: &UserId, effect: Effect) {
        match effect {
            Effect::RecordApplication { message } => {
                let id = self.review.record_application(viewer.clone(), message);
                debug!(activity = %self.activity.id, application = %id, "application recorded");
            }
            Effect::WithdrawApplication => match self.review.withdraw_application(viewer) {
                Some(application) => {
                    debug!(
                        activity = %self.activity.id,
                        application = %application.id,
                        "application withdrawn"
                    );
                }
                None => {
                    warn!(
                        activity = %self.activity.id,
                        viewer = %viewer,
                        "no application on file to withdraw"
                    );
                }
            },
            Effect::Log { level, message } => match level {
                LogLevel::Debug => {
                    debug!(activity = %self.activity.id, viewer = %viewer, "{}", message)
                }
                LogLevel::Info => {
                    info!(activity = %self.activity.id, viewer = %viewer, "{}", message)
                }
                LogLevel::Warn => {
                    warn!(activity = %self.activity.id, viewer = %viewer, "{}", message)
                }
                LogLevel::Error => {
                    error!(activity = %self.activity.id, viewer = %viewer, "{}", message)
                }
            },
        }
    }

    /// Route a review event into the affected viewer's machine.
    ///
    /// Runs before the decide call returns, so the viewer's next action is
    /// always evaluated against the decided state.
    fn apply_review_event(&mut self, event: ReviewEvent) {
        let (applicant, machine_event) = match event {
            ReviewEvent::ApplicantAccepted { applicant, .. } => {
                (applicant, ParticipationEvent::Accepted)
            }
            ReviewEvent::ApplicantRejected { applicant, .. } => {
                (applicant, ParticipationEvent::Rejected)
            }
        };
        if let Err(err) = self.process_event(&applicant, machine_event) {
            // The stored status changed but the machine refused; keep going
            // and let the next read surface the mismatch.
            error!(
                activity = %self.activity.id,
                applicant = %applicant,
                error = %err,
                "failed to apply review outcome"
            );
        }
    }

    fn require_organizer(&self, viewer: &UserId, action: &'static str) -> Result<(), DomainError> {
        let state = self.state(viewer);
        if state.is_organizer() {
            Ok(())
        } else {
            Err(DomainError::InvalidState {
                action,
                state: state.name(),
            })
        }
    }

    /// Keep Open/Full in step with the accepted count.
    ///
    /// Self-healing in both directions: an acceptance can fill the activity,
    /// and a withdrawal or revocation can reopen it.
    fn sync_capacity(&mut self) {
        let max = match self.activity.max_participants {
            Some(max) => max as usize,
            None => return,
        };
        let accepted = self.review.accepted_count();
        match self.activity.status {
            ActivityStatus::Open if accepted >= max => {
                self.activity.status = ActivityStatus::Full;
                info!(activity = %self.activity.id, accepted, "activity is now full");
            }
            ActivityStatus::Full if accepted < max => {
                self.activity.status = ActivityStatus::Open;
                info!(activity = %self.activity.id, accepted, "activity reopened");
            }
            _ => {}
        }
    }
}
