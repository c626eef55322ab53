//! Domain Events
//!
//! Return types from aggregate mutations, communicating what happened when
//! session state was modified. The engine maps them onto outbound protocol
//! messages; the domain never talks to the transport.

pub mod session_events;

pub use session_events::*;
