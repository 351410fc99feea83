//! Organizer review: the applicant record store and the decision engine.
//!
//! Scoped per activity. The engine owns the store; the session owns the
//! engine and routes the cross-component fallout of decisions into the
//! affected viewers' participation machines.

pub mod engine;
pub mod store;

pub use engine::*;
pub use store::*;
