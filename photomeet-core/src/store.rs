//! The session store: every live activity, addressed by id.
//!
//! `SessionStore` is the single entry point an embedding application talks
//! to. Every operation names the activity it targets and the viewer it acts
//! for; the store resolves the session and delegates. Lookups of unknown
//! activities fail with `NotFound` rather than panicking.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::info;

use crate::activity::{Activity, ActivityEdit, ActivityId, UserId};
use crate::error::{DomainError, Resource};
use crate::participation::Role;
use crate::rating::Rating;
use crate::review::{Application, ApplicationId, ApplicationStatus, Decision, StatusCounts};
use crate::session::{ActionSet, ActivitySession};

/// All activity sessions, keyed by activity id.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    sessions: HashMap<ActivityId, ActivitySession>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an activity and seed its organizer.
    ///
    /// Registering an id twice replaces the earlier session wholesale; ids
    /// are expected to be unique upstream.
    pub fn create_activity(&mut self, activity: Activity) {
        info!(activity = %activity.id, organizer = %activity.organizer, "activity created");
        let id = activity.id.clone();
        self.sessions.insert(id, ActivitySession::new(activity));
    }

    /// Activities in id order, for stable listings.
    pub fn activities(&self) -> Vec<&Activity> {
        let mut activities: Vec<&Activity> = self
            .sessions
            .values()
            .map(|session| session.activity())
            .collect();
        activities.sort_by(|a, b| a.id.cmp(&b.id));
        activities
    }

    pub fn session(&self, id: &ActivityId) -> Result<&ActivitySession, DomainError> {
        self.sessions.get(id).ok_or_else(|| DomainError::NotFound {
            kind: Resource::Activity,
            id: id.to_string(),
        })
    }

    pub fn session_mut(&mut self, id: &ActivityId) -> Result<&mut ActivitySession, DomainError> {
        self.sessions
            .get_mut(id)
            .ok_or_else(|| DomainError::NotFound {
                kind: Resource::Activity,
                id: id.to_string(),
            })
    }

    // =========================================================================
    // Delegated operations
    // =========================================================================

    pub fn current_role(&self, id: &ActivityId, viewer: &UserId) -> Result<Role, DomainError> {
        Ok(self.session(id)?.role(viewer))
    }

    pub fn is_ended(&self, id: &ActivityId) -> Result<bool, DomainError> {
        Ok(self.session(id)?.is_ended())
    }

    pub fn is_cancelled(&self, id: &ActivityId) -> Result<bool, DomainError> {
        Ok(self.session(id)?.is_cancelled())
    }

    pub fn actions(&self, id: &ActivityId, viewer: &UserId) -> Result<ActionSet, DomainError> {
        Ok(self.session(id)?.actions(viewer))
    }

    pub fn submit_application(
        &mut self,
        id: &ActivityId,
        viewer: &UserId,
        message: impl Into<String>,
    ) -> Result<(), DomainError> {
        self.session_mut(id)?.submit_application(viewer, message)
    }

    pub fn cancel_application(
        &mut self,
        id: &ActivityId,
        viewer: &UserId,
    ) -> Result<(), DomainError> {
        self.session_mut(id)?.cancel_application(viewer)
    }

    pub fn applicants(
        &self,
        id: &ActivityId,
        viewer: &UserId,
    ) -> Result<&[Application], DomainError> {
        self.session(id)?.applicants(viewer)
    }

    pub fn counts(&self, id: &ActivityId, viewer: &UserId) -> Result<StatusCounts, DomainError> {
        self.session(id)?.counts(viewer)
    }

    pub fn select_applicant(
        &mut self,
        id: &ActivityId,
        viewer: &UserId,
        application: &ApplicationId,
    ) -> Result<&Application, DomainError> {
        self.session_mut(id)?.select_applicant(viewer, application)
    }

    pub fn decide(
        &mut self,
        id: &ActivityId,
        viewer: &UserId,
        application: &ApplicationId,
        decision: Decision,
    ) -> Result<ApplicationStatus, DomainError> {
        self.session_mut(id)?.decide(viewer, application, decision)
    }

    pub fn request_rating(
        &mut self,
        id: &ActivityId,
        viewer: &UserId,
        ratee: &UserId,
        score: u8,
        comment: Option<String>,
    ) -> Result<(), DomainError> {
        self.session_mut(id)?
            .request_rating(viewer, ratee, score, comment)
    }

    pub fn rating_eligibility(
        &self,
        id: &ActivityId,
        viewer: &UserId,
    ) -> Result<(), DomainError> {
        self.session(id)?.rating_eligibility(viewer)
    }

    pub fn rated_by(&self, id: &ActivityId, viewer: &UserId) -> Result<Vec<&UserId>, DomainError> {
        Ok(self.session(id)?.rated_by(viewer))
    }

    pub fn ratings(&self, id: &ActivityId) -> Result<&[Rating], DomainError> {
        Ok(self.session(id)?.ratings())
    }

    pub fn roster(&self, id: &ActivityId, viewer: &UserId) -> Result<Vec<UserId>, DomainError> {
        Ok(self.session(id)?.roster(viewer))
    }

    pub fn members(&self, id: &ActivityId) -> Result<Vec<UserId>, DomainError> {
        Ok(self.session(id)?.members())
    }

    pub fn edit_activity(
        &mut self,
        id: &ActivityId,
        viewer: &UserId,
        edit: ActivityEdit,
    ) -> Result<(), DomainError> {
        self.session_mut(id)?.edit_activity(viewer, edit)
    }

    pub fn cancel_activity(
        &mut self,
        id: &ActivityId,
        viewer: &UserId,
        now: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        self.session_mut(id)?.cancel_activity(viewer, now)
    }

    /// Sweep every session against the clock, surfacing "ended" lazily.
    pub fn sync_clock(&mut self, now: DateTime<Utc>) {
        for session in self.sessions.values_mut() {
            session.sync_clock(now);
        }
    }
}
