//! Value objects - Immutable objects defined by their attributes

mod session_code;
mod token;

pub use session_code::{SessionCode, MAX_SESSION_CODE_LENGTH, SESSION_CODE_ALPHABET};
pub use token::TokenRecord;
