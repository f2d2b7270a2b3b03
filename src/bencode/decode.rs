use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use super::cursor::ByteCursor;
use super::error::{DecodeError, ErrorKind, KeyPath, PathSegment};
use crate::bencode::bvalue::BValue;
use crate::config::DecodeOptions;

/// Decode a bencoded document whose root must be a dictionary.
///
/// Bytes following the root dictionary are left unread and ignored unless
/// `require_eof` is set (see [`decode_with`]).
pub fn decode<R: Read>(source: R) -> Result<BValue, DecodeError> {
    decode_with(source, &DecodeOptions::default())
}

pub fn decode_with<R: Read>(source: R, options: &DecodeOptions) -> Result<BValue, DecodeError> {
    Decoder::with_options(source, *options).decode_root()
}

/// Decode a single value of any kind, e.g. a fragment such as `i42e`.
pub fn decode_value<R: Read>(source: R, options: &DecodeOptions) -> Result<BValue, DecodeError> {
    Decoder::with_options(source, *options).decode_value()
}

pub fn decode_bytes(input: &[u8]) -> Result<BValue, DecodeError> {
    decode(input)
}

/// Open `path` and decode it as a document. A failure to open the file is
/// reported as an `Io` error at offset 0.
pub fn decode_file<P: AsRef<Path>>(
    path: P,
    options: &DecodeOptions,
) -> Result<BValue, DecodeError> {
    let file = File::open(path).map_err(|e| DecodeError {
        kind: ErrorKind::Io(e.kind()),
        offset: 0,
        path: KeyPath::default(),
    })?;
    decode_with(file, options)
}

/// Recursive-descent bencode decoder over a byte source.
pub struct Decoder<R> {
    cursor: ByteCursor<R>,
    options: DecodeOptions,
    depth: usize,
    path: Vec<PathSegment>,
}

impl<R: Read> Decoder<R> {
    pub fn new(source: R) -> Self {
        Self::with_options(source, DecodeOptions::default())
    }

    pub fn with_options(source: R, options: DecodeOptions) -> Self {
        Decoder {
            cursor: ByteCursor::new(source),
            options,
            depth: 0,
            path: Vec::new(),
        }
    }

    /// Bytes consumed so far.
    pub fn offset(&self) -> u64 {
        self.cursor.offset()
    }

    pub fn decode_root(&mut self) -> Result<BValue, DecodeError> {
        self.reset();
        let start = self.cursor.offset();
        match self.next_byte()? {
            Some(b'd') => {}
            Some(byte) => return Err(self.error_at(start, ErrorKind::InvalidRoot { byte })),
            None => return Err(self.error_at(start, ErrorKind::TruncatedInput)),
        }
        let root = self.decode_dict()?;
        self.finish()?;
        Ok(root)
    }

    pub fn decode_value(&mut self) -> Result<BValue, DecodeError> {
        self.reset();
        let value = self.decode_next()?;
        self.finish()?;
        Ok(value)
    }

    // a previous failed call may have left its depth and path behind
    fn reset(&mut self) {
        self.depth = 0;
        self.path.clear();
    }

    fn finish(&mut self) -> Result<(), DecodeError> {
        if self.options.require_eof && self.peek_byte()?.is_some() {
            return Err(self.error_here(ErrorKind::TrailingData));
        }
        Ok(())
    }

    fn decode_next(&mut self) -> Result<BValue, DecodeError> {
        let start = self.cursor.offset();
        match self.next_byte()? {
            Some(b'i') => self.read_number(b'e', true).map(BValue::Integer),
            Some(b'l') => self.decode_list(),
            Some(b'd') => self.decode_dict(),
            // '-' is let through so the length reader rejects it as a number
            Some(byte @ (b'0'..=b'9' | b'-')) => {
                self.cursor.push_back(byte);
                self.read_string().map(BValue::ByteString)
            }
            Some(byte) => {
                let depth = self.depth;
                Err(self.error_at(start, ErrorKind::UnexpectedToken { byte, depth }))
            }
            None => Err(self.error_at(start, ErrorKind::TruncatedInput)),
        }
    }

    fn decode_list(&mut self) -> Result<BValue, DecodeError> {
        self.enter()?;
        let mut items = Vec::new();

        loop {
            match self.peek_byte()? {
                Some(b'e') => {
                    self.next_byte()?;
                    break;
                }
                Some(_) => {}
                None => return Err(self.error_here(ErrorKind::TruncatedInput)),
            }

            self.path.push(PathSegment::Index(items.len()));
            let item = self.decode_next()?;
            self.path.pop();
            items.push(item);
        }

        self.depth -= 1;
        Ok(BValue::List(items))
    }

    fn decode_dict(&mut self) -> Result<BValue, DecodeError> {
        self.enter()?;
        let mut map = BTreeMap::new();
        let mut last_key: Option<Vec<u8>> = None;

        loop {
            let key_start = self.cursor.offset();
            match self.next_byte()? {
                Some(b'e') => break,
                Some(byte @ (b'0'..=b'9' | b'-')) => self.cursor.push_back(byte),
                Some(byte) => {
                    let kind = ErrorKind::UnexpectedToken { byte, depth: self.depth };
                    return Err(self.error_at(key_start, kind));
                }
                None => return Err(self.error_at(key_start, ErrorKind::TruncatedInput)),
            }

            let key = self.read_string()?;
            self.path.push(PathSegment::Key(key.clone()));

            if let Some(prev) = &last_key {
                if key == *prev {
                    return Err(self.error_at(key_start, ErrorKind::DuplicateKey));
                }
                if key < *prev {
                    return Err(self.error_at(key_start, ErrorKind::UnsortedKey));
                }
            }

            let value = self.decode_next()?;
            self.path.pop();

            if self.options.strict_keys {
                last_key = Some(key.clone());
            }
            // later duplicates overwrite earlier ones
            map.insert(key, value);
        }

        self.depth -= 1;
        Ok(BValue::Dict(map))
    }

    fn read_string(&mut self) -> Result<Vec<u8>, DecodeError> {
        let start = self.cursor.offset();
        let len = self.read_number(b':', false)?;
        let len = usize::try_from(len)
            .map_err(|_| self.error_at(start, ErrorKind::MalformedNumber))?;

        match self.cursor.read_exact(len) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                Err(self.error_here(ErrorKind::TruncatedInput))
            }
            Err(e) => Err(self.io_error(e)),
        }
    }

    /// Read a base-10 number up to and including `terminator`. A leading '-'
    /// is only accepted when `signed`.
    fn read_number(&mut self, terminator: u8, signed: bool) -> Result<i64, DecodeError> {
        let start = self.cursor.offset();
        let mut negative = false;
        let mut leading_zero = false;
        let mut digits = 0usize;
        let mut value: i64 = 0;

        loop {
            let at = self.cursor.offset();
            let byte = match self.next_byte()? {
                Some(b) => b,
                None => return Err(self.error_at(at, ErrorKind::TruncatedInput)),
            };

            match byte {
                b if b == terminator => break,
                b'-' if signed && at == start => negative = true,
                b'0'..=b'9' => {
                    if digits == 0 && byte == b'0' {
                        leading_zero = true;
                    }
                    let digit = i64::from(byte - b'0');
                    // accumulate negatives downwards so i64::MIN fits
                    value = value
                        .checked_mul(10)
                        .and_then(|v| {
                            if negative {
                                v.checked_sub(digit)
                            } else {
                                v.checked_add(digit)
                            }
                        })
                        .ok_or_else(|| self.error_at(start, ErrorKind::MalformedNumber))?;
                    digits += 1;
                }
                _ => return Err(self.error_at(at, ErrorKind::MalformedNumber)),
            }
        }

        if digits == 0 {
            return Err(self.error_at(start, ErrorKind::MalformedNumber));
        }
        let non_canonical = (leading_zero && digits > 1) || (negative && value == 0);
        if self.options.canonical_integers && non_canonical {
            return Err(self.error_at(start, ErrorKind::MalformedNumber));
        }
        Ok(value)
    }

    fn enter(&mut self) -> Result<(), DecodeError> {
        if self.depth >= self.options.max_depth {
            // the container's tag byte has already been consumed
            let tag_offset = self.cursor.offset().saturating_sub(1);
            let max = self.options.max_depth;
            return Err(self.error_at(tag_offset, ErrorKind::NestingTooDeep { max }));
        }
        self.depth += 1;
        Ok(())
    }

    fn next_byte(&mut self) -> Result<Option<u8>, DecodeError> {
        self.cursor.next_byte().map_err(|e| self.io_error(e))
    }

    fn peek_byte(&mut self) -> Result<Option<u8>, DecodeError> {
        self.cursor.peek_byte().map_err(|e| self.io_error(e))
    }

    fn io_error(&self, err: io::Error) -> DecodeError {
        self.error_here(ErrorKind::Io(err.kind()))
    }

    fn error_here(&self, kind: ErrorKind) -> DecodeError {
        self.error_at(self.cursor.offset(), kind)
    }

    fn error_at(&self, offset: u64, kind: ErrorKind) -> DecodeError {
        DecodeError {
            kind,
            offset,
            path: KeyPath(self.path.clone()),
        }
    }
}
