//! In-memory state storage modules.
//!
//! All coordinator state is process-resident:
//! - `SessionRegistry` - live sessions and the connection → session index
//! - `SessionCodeAllocator` - collision-free session codes

pub mod code_allocator;
pub mod session;

pub use code_allocator::SessionCodeAllocator;
pub use session::SessionRegistry;
