//! TableRelay domain.
//!
//! Pure session state for tabletop rooms: who is in a room, who holds the DM
//! role, and the scene and token state the DM last published. Nothing here
//! performs I/O; mutations return event values the engine turns into
//! outbound messages.

pub mod aggregates;
pub mod error;
pub mod events;
pub mod ids;
pub mod value_objects;

pub use aggregates::{DmSlot, RoleError, Session};
pub use error::DomainError;
pub use events::{Departure, DmTransition, MembershipUpdate};
pub use ids::ConnectionId;
pub use value_objects::{SessionCode, TokenRecord, MAX_SESSION_CODE_LENGTH, SESSION_CODE_ALPHABET};
