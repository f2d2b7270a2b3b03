pub mod bvalue;
pub mod cursor;
pub mod decode;
pub mod error;
pub mod json;

pub use bvalue::BValue;   // re-export
pub use decode::{decode, decode_bytes, decode_file, decode_value, decode_with, Decoder};
pub use error::{DecodeError, ErrorKind, KeyPath, PathSegment};   // re-export
pub use json::bvalue_to_json;   // re-export
