use std::io::{self, BufRead, BufReader, Read};

// Upper bound on what `read_exact` reserves before any bytes arrive, so a
// bogus length prefix cannot force a huge allocation.
const PREALLOC_LIMIT: usize = 64 * 1024;

/// Sequential byte reader with one byte of push-back.
///
/// Tracks the absolute offset of the next unread byte, which is what decode
/// errors report.
pub struct ByteCursor<R> {
    reader: BufReader<R>,
    pushed: Option<u8>,
    offset: u64,
}

impl<R: Read> ByteCursor<R> {
    pub fn new(source: R) -> Self {
        ByteCursor {
            reader: BufReader::new(source),
            pushed: None,
            offset: 0,
        }
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Consume one byte. `None` means end of input.
    pub fn next_byte(&mut self) -> io::Result<Option<u8>> {
        if let Some(byte) = self.pushed.take() {
            self.offset += 1;
            return Ok(Some(byte));
        }

        let byte = match self.reader.fill_buf()?.first() {
            Some(&b) => b,
            None => return Ok(None),
        };
        self.reader.consume(1);
        self.offset += 1;
        Ok(Some(byte))
    }

    pub fn peek_byte(&mut self) -> io::Result<Option<u8>> {
        if let Some(byte) = self.pushed {
            return Ok(Some(byte));
        }
        Ok(self.reader.fill_buf()?.first().copied())
    }

    /// Return the byte just read to the front of the stream.
    ///
    /// # Panics
    ///
    /// If a pushed-back byte is still pending.
    pub fn push_back(&mut self, byte: u8) {
        assert!(
            self.pushed.is_none(),
            "push_back called twice without an intervening next_byte"
        );
        self.pushed = Some(byte);
        self.offset = self.offset.saturating_sub(1);
    }

    /// Read exactly `len` bytes, failing with `UnexpectedEof` if the source
    /// runs dry first.
    pub fn read_exact(&mut self, len: usize) -> io::Result<Vec<u8>> {
        let mut out = Vec::with_capacity(len.min(PREALLOC_LIMIT));
        if len > 0 {
            if let Some(byte) = self.pushed.take() {
                out.push(byte);
                self.offset += 1;
            }
        }

        while out.len() < len {
            let chunk = self.reader.fill_buf()?;
            if chunk.is_empty() {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    format!("wanted {} bytes, source ended after {}", len, out.len()),
                ));
            }
            let take = chunk.len().min(len - out.len());
            out.extend_from_slice(&chunk[..take]);
            self.reader.consume(take);
            self.offset += take as u64;
        }
        Ok(out)
    }
}
