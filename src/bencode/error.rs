use std::fmt;
use thiserror::Error;

/// What went wrong while decoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    #[error("malformed number")]
    MalformedNumber,

    #[error("unexpected token {} at depth {depth}", show_byte(.byte))]
    UnexpectedToken { byte: u8, depth: usize },

    #[error("truncated input")]
    TruncatedInput,

    #[error("document must begin with a dictionary, found {}", show_byte(.byte))]
    InvalidRoot { byte: u8 },

    #[error("nesting deeper than {max} levels")]
    NestingTooDeep { max: usize },

    #[error("duplicate dictionary key")]
    DuplicateKey,

    #[error("dictionary keys out of order")]
    UnsortedKey,

    #[error("trailing data after root value")]
    TrailingData,

    #[error("i/o error: {0}")]
    Io(std::io::ErrorKind),
}

fn show_byte(byte: &u8) -> String {
    let byte = *byte;
    if byte.is_ascii_graphic() {
        format!("'{}'", byte as char)
    } else {
        format!("0x{:02x}", byte)
    }
}

/// One step from the root to the element being decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Key(Vec<u8>),
    Index(usize),
}

/// Container keys and list indices leading to a failure, root first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyPath(pub Vec<PathSegment>);

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "<root>");
        }
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                PathSegment::Index(idx) => write!(f, "[{}]", idx)?,
                PathSegment::Key(key) => {
                    if i > 0 {
                        write!(f, ".")?;
                    }
                    match std::str::from_utf8(key) {
                        Ok(s) => write!(f, "{}", s)?,
                        Err(_) => write!(f, "<{}>", hex::encode(key))?,
                    }
                }
            }
        }
        Ok(())
    }
}

/// A decode failure with the offset and path it happened at.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at offset {offset} (path {path})")]
pub struct DecodeError {
    pub kind: ErrorKind,
    pub offset: u64,
    pub path: KeyPath,
}
