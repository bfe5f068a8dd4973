//! Buffered, non-blocking source reader.
//!
//! The reader owns a fixed working buffer that is refilled in place from the
//! byte source whenever the cursor reaches the logical end. "No data" is an
//! ordinary outcome, not an error: a poll cycle that finds the source empty
//! simply produces no new key.

use std::io;

use tracing::{trace, warn};

/// A byte channel that can be drained without blocking.
pub trait ByteSource {
    /// Read whatever is available right now into `buf`. `Ok(0)` means no
    /// data is available this cycle.
    fn read_available(&mut self, buf: &mut [u8]) -> io::Result<usize>;
}

pub struct SourceReader<S> {
    source: S,
    buf: Vec<u8>,
    cursor: usize,
    len: usize,
    read_error_warned: bool,
}

impl<S: ByteSource> SourceReader<S> {
    pub fn new(source: S, capacity: usize) -> Self {
        Self {
            source,
            buf: vec![0; capacity],
            cursor: 0,
            len: 0,
            read_error_warned: false,
        }
    }

    /// Replace the buffer contents with fresh bytes from the source. The
    /// region is zero-filled first and the logical length is set to exactly
    /// the number of bytes read, so a short read can never expose bytes left
    /// over from an earlier fill.
    ///
    /// Returns false if no data was available. A transport-level read
    /// failure is recoverable: it is logged and treated as an empty read.
    fn refill(&mut self) -> bool {
        self.buf.fill(0);
        self.cursor = 0;
        match self.source.read_available(&mut self.buf) {
            Ok(n) => {
                self.len = n;
                if n > 0 {
                    trace!("refilled {n} bytes from source");
                    self.read_error_warned = false;
                }
                n > 0
            }
            Err(e) => {
                if !self.read_error_warned {
                    warn!("source read failed, treating as no data: {e}");
                    self.read_error_warned = true;
                }
                self.len = 0;
                false
            }
        }
    }

    /// Advance past the current byte and return it, refilling first if the
    /// buffer is exhausted. `None` means the source has nothing for us this
    /// cycle.
    pub fn next(&mut self) -> Option<u8> {
        if self.cursor >= self.len && !self.refill() {
            return None;
        }
        let byte = self.buf[self.cursor];
        self.cursor += 1;
        Some(byte)
    }

    /// Look at the next byte without consuming it. May refill, so a
    /// disambiguation peek works across a buffer boundary when more input
    /// has already arrived.
    pub fn peek(&mut self) -> Option<u8> {
        if self.cursor >= self.len && !self.refill() {
            return None;
        }
        Some(self.buf[self.cursor])
    }

    /// Consume the byte a previous [`peek`](Self::peek) returned.
    pub fn consume(&mut self) {
        debug_assert!(self.cursor < self.len);
        if self.cursor < self.len {
            self.cursor += 1;
        }
    }
}
