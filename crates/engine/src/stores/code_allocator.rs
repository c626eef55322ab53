//! Session code allocation.

use std::sync::Arc;

use tablerelay_domain::{SessionCode, SESSION_CODE_ALPHABET};

use crate::infrastructure::ports::RandomPort;

/// Draws short base-36 session codes until one is not in use.
pub struct SessionCodeAllocator {
    random: Arc<dyn RandomPort>,
    length: usize,
}

impl SessionCodeAllocator {
    pub fn new(random: Arc<dyn RandomPort>, length: usize) -> Self {
        Self {
            random,
            length: length.max(1),
        }
    }

    /// Allocate a code for which `is_taken` returns false.
    ///
    /// Every draw is re-checked; the loop has no retry bound.
    pub fn allocate(&self, is_taken: impl Fn(&SessionCode) -> bool) -> SessionCode {
        let mut attempts: u32 = 0;
        loop {
            attempts = attempts.saturating_add(1);
            match SessionCode::new(self.draw()) {
                Ok(code) if !is_taken(&code) => {
                    if attempts > 1 {
                        tracing::debug!(attempts, session_code = %code, "Session code allocated after collision");
                    }
                    return code;
                }
                Ok(code) => {
                    tracing::debug!(session_code = %code, "Session code collision, redrawing");
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Generated session code rejected, redrawing");
                }
            }
        }
    }

    fn draw(&self) -> String {
        let max = (SESSION_CODE_ALPHABET.len() - 1) as u32;
        (0..self.length)
            .map(|_| {
                let index = self.random.gen_range(0, max).min(max) as usize;
                SESSION_CODE_ALPHABET[index] as char
            })
            .collect()
    }
}
