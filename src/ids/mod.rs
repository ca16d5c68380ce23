//! # Identifier Codec
//!
//! Converts between the compact base-36 identifiers seen by API callers and
//! the integer identifiers stored by the backends.
//!
//! Externally an identifier may carry a type prefix (`t1_` comment,
//! `t3_` submission, `t5_` community). Prefixes are stripped before decoding
//! and re-applied after encoding.

pub mod codec;
pub mod errors;

pub use codec::{decode, decode_fullname, encode, encode_unsigned, strip_prefix, with_prefix, IdPrefix};
pub use errors::{CodecError, CodecResult};
