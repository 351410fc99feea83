//! Explicit state machine for one viewer's participation in an activity.
//!
//! This module implements a pure functional state machine. The design
//! separates:
//! - **State**: the viewer's standing (`ParticipationState`)
//! - **Events**: what happened (`ParticipationEvent`)
//! - **Effects**: what to do (`Effect`)
//! - **Transition**: pure function `(State, Event, &Activity) -> Result<(State, Vec<Effect>)>`
//!
//! The session applies effects to the applicant store and the log.

pub mod effect;
pub mod event;
pub mod state;
pub mod transition;

pub use effect::*;
pub use event::*;
pub use state::*;
pub use transition::*;
