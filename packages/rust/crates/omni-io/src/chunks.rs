//! Line-aligned chunked reading.
//!
//! Splits a byte stream into chunks of roughly `chunk_size` bytes. Each chunk
//! except the last ends on a `\n`, so text matched within a single line never
//! straddles two chunks. A line longer than `chunk_size` becomes one
//! oversized chunk.

use std::io::{ErrorKind, Read};

use memchr::memrchr;

use crate::error::IoError;

/// Default chunk size (64 KiB).
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Iterator over line-aligned chunks of a reader.
pub struct LineChunks<R> {
    reader: R,
    chunk_size: usize,
    carry: Vec<u8>,
    done: bool,
}

impl<R: Read> LineChunks<R> {
    /// Wrap `reader`, producing chunks of at least `chunk_size` bytes where possible.
    ///
    /// A `chunk_size` of zero is treated as 1.
    pub fn new(reader: R, chunk_size: usize) -> Self {
        Self {
            reader,
            chunk_size: chunk_size.max(1),
            carry: Vec::new(),
            done: false,
        }
    }

    fn split_at_last_newline(&mut self) -> Option<Vec<u8>> {
        let pos = memrchr(b'\n', &self.carry)?;
        let rest = self.carry.split_off(pos + 1);
        Some(std::mem::replace(&mut self.carry, rest))
    }
}

impl<R: Read> Iterator for LineChunks<R> {
    type Item = Result<Vec<u8>, IoError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let mut buf = vec![0u8; self.chunk_size];
        loop {
            let n = match self.reader.read(&mut buf) {
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.done = true;
                    return Some(Err(IoError::System(e)));
                }
            };

            if n == 0 {
                self.done = true;
                if self.carry.is_empty() {
                    return None;
                }
                return Some(Ok(std::mem::take(&mut self.carry)));
            }

            self.carry.extend_from_slice(&buf[..n]);
            if self.carry.len() < self.chunk_size {
                continue;
            }
            if let Some(chunk) = self.split_at_last_newline() {
                return Some(Ok(chunk));
            }
        }
    }
}
