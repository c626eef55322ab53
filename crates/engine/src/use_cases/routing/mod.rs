//! Inbound event routing.
//!
//! `table` holds the per-event authorization and target rules, `router`
//! applies them to the session registry and plans the outbound
//! [`Delivery`] list.

mod delivery;
mod error;
mod router;
pub mod table;

pub use delivery::Delivery;
pub use error::RouteError;
pub use router::MessageRouter;
pub use table::{Authorization, EventKind, RoutingRule, SessionMutation, TargetSelector};
