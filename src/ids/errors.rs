//! # Codec Errors

use thiserror::Error;

/// Result type for identifier conversions
pub type CodecResult<T> = Result<T, CodecError>;

/// Identifier codec errors
///
/// All variants are reported to callers as invalid arguments.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// Input contained a character outside `0-9a-z`
    #[error("invalid base-36 character {character:?} in identifier {input:?}")]
    InvalidCharacter { input: String, character: char },

    /// Nothing left to decode
    #[error("identifier is empty")]
    Empty,

    /// Negative integers have no external form
    #[error("cannot encode negative identifier {0}")]
    Negative(i64),

    /// Decoded value does not fit in 64 bits
    #[error("identifier {0:?} is out of range")]
    Overflow(String),
}
