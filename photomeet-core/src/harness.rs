//! Demo controls that bypass the clock.
//!
//! Walkthroughs and manual tests need to reach the "ended" phase without
//! waiting for a real end time to pass. `DemoControls` flips activity
//! status directly, outside the domain rules, and is the only place allowed
//! to do so. Nothing in the domain layer calls into this module.

use tracing::{info, warn};

use crate::activity::{ActivityId, ActivityStatus};
use crate::error::DomainError;
use crate::store::SessionStore;

/// Out-of-band switches for demos. Wraps a store borrow; create one,
/// flip what you need, drop it.
pub struct DemoControls<'a> {
    store: &'a mut SessionStore,
}

impl<'a> DemoControls<'a> {
    pub fn new(store: &'a mut SessionStore) -> Self {
        Self { store }
    }

    /// Force an activity into the ended phase regardless of its end time.
    ///
    /// Cancelled activities stay cancelled: cancellation is terminal even
    /// for the demo harness.
    pub fn force_ended(&mut self, id: &ActivityId) -> Result<(), DomainError> {
        let session = self.store.session_mut(id)?;
        let activity = session.activity_mut();
        if activity.is_cancelled() {
            warn!(activity = %id, "not forcing end: activity is cancelled");
            return Ok(());
        }
        activity.status = ActivityStatus::Ended;
        info!(activity = %id, "forced into ended phase");
        Ok(())
    }

    /// Reset an activity to open, undoing a forced end between demo runs.
    pub fn reopen(&mut self, id: &ActivityId) -> Result<(), DomainError> {
        let session = self.store.session_mut(id)?;
        session.activity_mut().status = ActivityStatus::Open;
        info!(activity = %id, "reopened");
        Ok(())
    }
}
