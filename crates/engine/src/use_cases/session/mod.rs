//! Session use cases.
//!
//! Membership changes and the DM role notifications they trigger.

mod membership;
pub mod role_assignment;

pub use membership::{Admission, MembershipCoordinator};
