//! Use cases - session coordination.
//!
//! - `routing` - authorization table and the message router
//! - `session` - membership changes and DM role notifications

pub mod routing;
pub mod session;

pub use routing::{Delivery, MessageRouter, RouteError};
pub use session::MembershipCoordinator;
