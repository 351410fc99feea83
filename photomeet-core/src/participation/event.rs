//! Events that drive participation transitions.
//!
//! Events are inputs to the pure transition function. Viewer actions arrive
//! directly from the presentation layer; review outcomes arrive from the
//! review engine via the session, never from the viewer.

/// All events that can drive one viewer's participation machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParticipationEvent {
    // =========================================================================
    // Viewer actions
    // =========================================================================
    /// Viewer asked to join the activity with an application message.
    ApplyRequested { message: String },

    /// Viewer withdrew their application.
    WithdrawRequested,

    // =========================================================================
    // Review outcomes (external)
    // =========================================================================
    /// The organizer accepted this viewer's application.
    Accepted,

    /// The organizer rejected this viewer's application.
    ///
    /// Reaching a `Joined` machine this revokes membership (a re-decision of
    /// an earlier acceptance); reaching an `Applied` machine it leaves the
    /// state alone, since rejection lives on the stored application.
    Rejected,
}

impl ParticipationEvent {
    /// Returns a summary of the event suitable for logging.
    ///
    /// Avoids logging the application message itself, which is free text
    /// supplied by the viewer.
    pub fn log_summary(&self) -> String {
        match self {
            Self::ApplyRequested { message } => {
                format!("ApplyRequested {{ message_len: {} }}", message.len())
            }
            Self::WithdrawRequested => "WithdrawRequested".to_string(),
            Self::Accepted => "Accepted".to_string(),
            Self::Rejected => "Rejected".to_string(),
        }
    }
}
