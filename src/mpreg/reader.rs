use std::io::Read;

use super::error::MpregError;
use crate::common::io::{MAX_CHUNK_SIZE, read_full};

/// A chunk can end with at most 3 bytes of an unfinished UTF-8 sequence.
const MAX_CARRY: usize = 3;

/// Decodes a byte stream into chars, reading `chunk_size` bytes at a time.
///
/// Chunk boundaries may split a multi-byte sequence. The unfinished tail is
/// carried to the front of the next read instead of being decoded early, so
/// the chars yielded never depend on where the boundaries fell.
pub struct CharReader<R> {
    inner: R,
    name: String,
    chunk_size: usize,
    /// Carried bytes in `raw[..carry]`, fresh bytes land after them.
    raw: Vec<u8>,
    carry: usize,
    /// Decoded text of the current chunk and the position within it.
    text: String,
    cursor: usize,
    /// Input offset of `raw[0]`.
    offset: u64,
    chars_read: u64,
    done: bool,
}

impl<R: Read> CharReader<R> {
    /// `chunk_size` is clamped to `1..=MAX_CHUNK_SIZE`.
    pub fn new(inner: R, name: impl Into<String>, chunk_size: usize) -> Self {
        let chunk_size = chunk_size.clamp(1, MAX_CHUNK_SIZE);
        CharReader {
            inner,
            name: name.into(),
            chunk_size,
            raw: vec![0u8; chunk_size + MAX_CARRY],
            carry: 0,
            text: String::with_capacity(chunk_size),
            cursor: 0,
            offset: 0,
            chars_read: 0,
            done: false,
        }
    }

    /// Number of chars handed out so far.
    pub fn chars_read(&self) -> u64 {
        self.chars_read
    }

    fn encoding_error(&self, at: usize) -> MpregError {
        MpregError::EncodingError {
            name: self.name.clone(),
            offset: self.offset + at as u64,
        }
    }

    /// Read and decode the next chunk. Returns `Ok(false)` at end of input.
    fn fill(&mut self) -> Result<bool, MpregError> {
        self.text.clear();
        self.cursor = 0;
        // A chunk made only of an unfinished sequence decodes to nothing; keep reading.
        while self.text.is_empty() {
            let window = self.carry..self.carry + self.chunk_size;
            let n = read_full(&mut self.inner, &mut self.raw[window])
                .map_err(|e| MpregError::from_read(&self.name, self.offset, e))?;
            if n == 0 {
                if self.carry > 0 {
                    // Input ended inside a multi-byte sequence.
                    return Err(self.encoding_error(0));
                }
                return Ok(false);
            }

            let len = self.carry + n;
            let valid = match std::str::from_utf8(&self.raw[..len]) {
                Ok(s) => {
                    self.text.push_str(s);
                    len
                }
                Err(e) if e.error_len().is_none() => {
                    let valid = e.valid_up_to();
                    match std::str::from_utf8(&self.raw[..valid]) {
                        Ok(s) => self.text.push_str(s),
                        Err(e) => return Err(self.encoding_error(e.valid_up_to())),
                    }
                    valid
                }
                Err(e) => return Err(self.encoding_error(e.valid_up_to())),
            };

            self.raw.copy_within(valid..len, 0);
            self.carry = len - valid;
            self.offset += valid as u64;
        }
        Ok(true)
    }
}

impl<R: Read> Iterator for CharReader<R> {
    type Item = Result<char, MpregError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(c) = self.text[self.cursor..].chars().next() {
                self.cursor += c.len_utf8();
                self.chars_read += 1;
                return Some(Ok(c));
            }
            if self.done {
                return None;
            }
            match self.fill() {
                Ok(true) => {}
                Ok(false) => {
                    self.done = true;
                    return None;
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
    }
}
