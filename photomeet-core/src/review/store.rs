//! Applicant records for one activity's review session.
//!
//! The store is ordered: `list` always returns applications in submission
//! order, and withdrawal preserves the order of the remaining records.
//! Status totals are derived on read, never maintained as counters.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::activity::UserId;

/// Newtype for application identity.
///
/// Ids are minted sequentially per activity ("app-1", "app-2", ...) so the
/// organizer-facing review surface has stable, human-readable handles.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApplicationId(pub String);

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ApplicationId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ApplicationId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Status of one application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    /// Awaiting the organizer's decision.
    Pending,
    /// Accepted; the applicant is a member.
    Accepted,
    /// Rejected; the record is retained, not removed.
    Rejected,
}

impl ApplicationStatus {
    pub fn is_decided(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Accepted => write!(f, "accepted"),
            Self::Rejected => write!(f, "rejected"),
        }
    }
}

/// One request to join an activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Application {
    pub id: ApplicationId,
    pub applicant: UserId,
    pub message: String,
    pub status: ApplicationStatus,
}

/// Derived status totals for badge display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct StatusCounts {
    pub pending: usize,
    pub accepted: usize,
    pub rejected: usize,
}

impl StatusCounts {
    pub fn total(&self) -> usize {
        self.pending + self.accepted + self.rejected
    }
}

/// Ordered store of applications for one activity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicantStore {
    records: Vec<Application>,
    next_seq: u64,
}

impl ApplicantStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a pending application, minting its id.
    ///
    /// Uniqueness per applicant is the participation machine's job (a viewer
    /// can only apply from Idle); the store just records.
    pub fn append(&mut self, applicant: UserId, message: String) -> ApplicationId {
        self.next_seq += 1;
        let id = ApplicationId(format!("app-{}", self.next_seq));
        self.records.push(Application {
            id: id.clone(),
            applicant,
            message,
            status: ApplicationStatus::Pending,
        });
        id
    }

    /// Remove an applicant's record, returning it if one existed.
    pub fn withdraw(&mut self, applicant: &UserId) -> Option<Application> {
        let index = self
            .records
            .iter()
            .position(|record| &record.applicant == applicant)?;
        Some(self.records.remove(index))
    }

    pub fn get(&self, id: &ApplicationId) -> Option<&Application> {
        self.records.iter().find(|record| &record.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: &ApplicationId) -> Option<&mut Application> {
        self.records.iter_mut().find(|record| &record.id == id)
    }

    pub fn by_applicant(&self, applicant: &UserId) -> Option<&Application> {
        self.records
            .iter()
            .find(|record| &record.applicant == applicant)
    }

    /// All applications in submission order.
    pub fn list(&self) -> &[Application] {
        &self.records
    }

    /// Status totals, derived on read.
    pub fn counts(&self) -> StatusCounts {
        let mut counts = StatusCounts::default();
        for record in &self.records {
            match record.status {
                ApplicationStatus::Pending => counts.pending += 1,
                ApplicationStatus::Accepted => counts.accepted += 1,
                ApplicationStatus::Rejected => counts.rejected += 1,
            }
        }
        counts
    }

    pub fn accepted_count(&self) -> usize {
        self.records
            .iter()
            .filter(|record| record.status == ApplicationStatus::Accepted)
            .count()
    }

    /// Accepted applicants in submission order.
    pub fn accepted_applicants(&self) -> impl Iterator<Item = &UserId> {
        self.records
            .iter()
            .filter(|record| record.status == ApplicationStatus::Accepted)
            .map(|record| &record.applicant)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
