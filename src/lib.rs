//! Bencode decoding for the Rusbit tools.
//!
//! [`decode`] turns a byte source into a [`BValue`] tree. Documents must have
//! a dictionary at the root; anything after the closing `e` of that root is
//! ignored unless [`DecodeOptions::require_eof`] is set. Every failure comes
//! back as a [`DecodeError`] carrying the byte offset and key path where it
//! happened; the decoder never prints, logs, or aborts.
//!
//! ```
//! use rusbit_bencode::{decode_bytes, BValue};
//!
//! let value = decode_bytes(b"d4:spaml1:a1:bee").unwrap();
//! let spam = value.get(b"spam").and_then(BValue::as_list).unwrap();
//! assert_eq!(spam[0].as_str(), Some("a"));
//! ```

pub mod bencode;
pub mod config;

// Re-export commonly used types for easier testing
pub use bencode::*;
pub use config::{ConfigError, DecodeOptions, DEFAULT_CONFIG_PATH};
