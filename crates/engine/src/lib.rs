//! TableRelay Engine library.
//!
//! Server-side session coordination for tabletop clients: short join codes,
//! one DM per session, and role-aware relaying of table events.
//!
//! ## Structure
//!
//! - `stores/` - Session registry and join-code allocation
//! - `use_cases/` - Membership, DM role transitions and the routing table
//! - `infrastructure/` - Settings and ports for external dependencies
//! - `api/` - HTTP and WebSocket entry points
//! - `app` - Application composition

pub mod api;
pub mod app;
pub mod infrastructure;
pub mod stores;
pub mod use_cases;

pub use app::App;
