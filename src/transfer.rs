//! Chunked transfer state machine for the panel DMA link.
//!
//! The transport enforces a maximum single-transfer length smaller than one
//! full frame, so a frame goes out as a short sequence of chunks. This module
//! is the pure bookkeeping half: it owns no hardware and hands out pixel
//! ranges. The panel driver maps each range to one DMA write and feeds every
//! completion back via [`ChunkedTransfer::chunk_complete`].
//!
//! Only one transfer is ever in flight; [`ChunkedTransfer::begin`] while busy
//! is refused rather than corrupting the in-flight state.

use core::ops::Range;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TransferError {
    /// A transfer is already in flight.
    Busy,
    /// Zero-length transfer request.
    Empty,
}

/// Chunk sequencer: idle, or chunk `k` of `ceil(total / max_chunk)` in flight.
pub struct ChunkedTransfer {
    max_chunk: usize,
    total: usize,
    next_offset: usize,
    in_flight: bool,
}

impl ChunkedTransfer {
    /// `max_chunk` is the transport's maximum single-transfer length in
    /// pixels (see `config::MAX_CHUNK_PIXELS` for the frame link).
    pub const fn new(max_chunk: usize) -> Self {
        Self {
            max_chunk,
            total: 0,
            next_offset: 0,
            in_flight: false,
        }
    }

    /// Start a transfer of `total` pixels. Returns the first chunk range.
    pub fn begin(&mut self, total: usize) -> Result<Range<usize>, TransferError> {
        if self.in_flight {
            return Err(TransferError::Busy);
        }
        if total == 0 {
            return Err(TransferError::Empty);
        }
        self.total = total;
        self.in_flight = true;
        let first = total.min(self.max_chunk);
        self.next_offset = first;
        Ok(0..first)
    }

    /// One chunk completed. Returns the next chunk range, or `None` once the
    /// final chunk is done and the link is idle again.
    pub fn chunk_complete(&mut self) -> Option<Range<usize>> {
        if !self.in_flight {
            return None;
        }
        if self.next_offset >= self.total {
            self.in_flight = false;
            return None;
        }
        let start = self.next_offset;
        let end = self.total.min(start + self.max_chunk);
        self.next_offset = end;
        Some(start..end)
    }

    /// Abandon the in-flight transfer after a transport error. The link is
    /// idle afterwards; the chunk already handed out must not be retried.
    pub fn abort(&mut self) {
        self.in_flight = false;
        self.next_offset = 0;
        self.total = 0;
    }

    #[inline]
    pub const fn is_busy(&self) -> bool {
        self.in_flight
    }
}
