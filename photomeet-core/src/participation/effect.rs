//! Effects (side effects as data).
//!
//! Effects describe what should happen as a result of a participation
//! transition. They are pure data - the session applies them to the applicant
//! store and the log. This separation keeps the transition function testable
//! without a live store.

use serde::{Deserialize, Serialize};

/// All effects that can be produced by participation transitions.
///
/// Effects are scoped to the viewer whose machine produced them; the session
/// supplies that identity when applying them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    /// Append a pending application for this viewer to the applicant store.
    RecordApplication { message: String },

    /// Remove this viewer's application from the applicant store.
    WithdrawApplication,

    /// Structured log line from the pure transition layer.
    Log { level: LogLevel, message: String },
}

/// Log level for Log effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effect_equality() {
        let a = Effect::RecordApplication {
            message: "hi".to_string(),
        };
        let b = Effect::RecordApplication {
            message: "hi".to_string(),
        };
        assert_eq!(a, b);
        assert_ne!(a, Effect::WithdrawApplication);
    }
}
