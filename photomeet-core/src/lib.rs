pub mod activity;
pub mod error;
pub mod harness;
pub mod participation;
pub mod rating;
pub mod review;
pub mod session;
pub mod store;

pub use activity::*;
pub use error::*;
pub use harness::*;
pub use participation::*;
pub use rating::*;
pub use review::*;
pub use session::*;
pub use store::*;
