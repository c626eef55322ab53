//! Port traits for infrastructure boundaries.
//!
//! The engine keeps no external stores; the only seam is randomness, so tests
//! can force session-code collisions deterministically.

// =============================================================================
// Testability Ports
// =============================================================================

#[cfg_attr(test, mockall::automock)]
pub trait RandomPort: Send + Sync {
    /// Uniformly distributed integer in `min..=max`.
    fn gen_range(&self, min: u32, max: u32) -> u32;
}
