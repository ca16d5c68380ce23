//! # Base-36 Codec
//!
//! Alphabet is `0-9a-z`. Decoding is case-insensitive; encoding always
//! produces lowercase.

use super::errors::{CodecError, CodecResult};

const ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Length of a type prefix such as `t3_`
const PREFIX_LEN: usize = 3;

/// Type prefixes used in fullnames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdPrefix {
    /// `t1_`
    Comment,
    /// `t3_`
    Submission,
    /// `t5_`
    Subreddit,
}

impl IdPrefix {
    /// The prefix text, including the trailing underscore
    pub fn as_str(&self) -> &'static str {
        match self {
            IdPrefix::Comment => "t1_",
            IdPrefix::Submission => "t3_",
            IdPrefix::Subreddit => "t5_",
        }
    }
}

/// Encode a non-negative integer as base-36.
pub fn encode(n: i64) -> CodecResult<String> {
    if n < 0 {
        return Err(CodecError::Negative(n));
    }
    Ok(encode_unsigned(n as u64))
}

/// Encode an unsigned integer as base-36. Zero encodes to `"0"`.
pub fn encode_unsigned(mut n: u64) -> String {
    if n == 0 {
        return "0".to_string();
    }

    let mut digits = Vec::with_capacity(13);
    while n > 0 {
        digits.push(ALPHABET[(n % 36) as usize]);
        n /= 36;
    }
    digits.reverse();

    // Alphabet is ASCII
    digits.into_iter().map(char::from).collect()
}

/// Decode a base-36 string.
pub fn decode(s: &str) -> CodecResult<u64> {
    if s.is_empty() {
        return Err(CodecError::Empty);
    }

    let mut value: u64 = 0;
    for c in s.chars() {
        let digit = c
            .to_digit(36)
            .ok_or_else(|| CodecError::InvalidCharacter {
                input: s.to_string(),
                character: c,
            })?;
        value = value
            .checked_mul(36)
            .and_then(|v| v.checked_add(u64::from(digit)))
            .ok_or_else(|| CodecError::Overflow(s.to_string()))?;
    }

    Ok(value)
}

/// Remove a matching type prefix (case-insensitive) if present.
///
/// Returns the input unchanged when none of `expected` match.
pub fn strip_prefix<'a>(s: &'a str, expected: &[IdPrefix]) -> &'a str {
    let Some(head) = s.get(..PREFIX_LEN) else {
        return s;
    };

    if expected
        .iter()
        .any(|prefix| head.eq_ignore_ascii_case(prefix.as_str()))
    {
        &s[PREFIX_LEN..]
    } else {
        s
    }
}

/// Attach a type prefix to an already-encoded identifier.
pub fn with_prefix(id: &str, prefix: IdPrefix) -> String {
    format!("{}{}", prefix.as_str(), id)
}

/// Decode an identifier that may be written as a fullname (`t3_abc`) or a
/// bare base-36 id (`abc`).
pub fn decode_fullname(s: &str, expected: IdPrefix) -> CodecResult<u64> {
    decode(strip_prefix(s.trim(), &[expected]))
}
