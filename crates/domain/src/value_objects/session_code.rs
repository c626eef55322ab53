//! Session code value object
//!
//! A session code is the short, human-shareable key players type in to join a
//! game room. Codes are lowercase base-36 and are compared verbatim.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Characters a generated session code is drawn from (base-36, lowercase).
pub const SESSION_CODE_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Upper bound on accepted code length.
pub const MAX_SESSION_CODE_LENGTH: usize = 32;

/// A validated session code (non-empty, <=32 chars, lowercase base-36)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SessionCode(String);

impl SessionCode {
    /// Create a new validated session code.
    ///
    /// Surrounding whitespace is trimmed; the code is otherwise taken verbatim,
    /// so an uppercase code never matches a live session.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if:
    /// - The code is empty after trimming
    /// - The code exceeds 32 characters
    /// - The code contains anything other than `0-9` and `a-z`
    pub fn new(code: impl Into<String>) -> Result<Self, DomainError> {
        let code = code.into();
        let trimmed = code.trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation("Session code cannot be empty"));
        }
        if trimmed.len() > MAX_SESSION_CODE_LENGTH {
            return Err(DomainError::validation(format!(
                "Session code cannot exceed {} characters",
                MAX_SESSION_CODE_LENGTH
            )));
        }
        if !trimmed.bytes().all(|b| SESSION_CODE_ALPHABET.contains(&b)) {
            return Err(DomainError::validation(
                "Session code may only contain lowercase letters and digits",
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for SessionCode {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl TryFrom<&str> for SessionCode {
    type Error = DomainError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<SessionCode> for String {
    fn from(code: SessionCode) -> String {
        code.0
    }
}
