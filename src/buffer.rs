//! A bump-allocating cursor over a caller-owned `&mut [u8]`.
//!
//! Every phase of canonicalization and signing writes forward through
//! one of these. There is never a heap allocation behind it: capacity
//! is fixed at construction and every write bounds-checks against what
//! remains.

use crate::error::{Result, SigV4Error};

/// A forward-writing cursor into a fixed byte buffer.
pub struct Cursor<'buf> {
    buf: &'buf mut [u8],
    pos: usize,
}

impl<'buf> Cursor<'buf> {
    /// Wraps `buf`, starting at position 0.
    pub fn new(buf: &'buf mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Bytes written so far.
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Bytes of capacity not yet written.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Total buffer capacity.
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Appends `data`, failing with [`SigV4Error::InsufficientMemory`] if
    /// it does not fit in the remaining capacity.
    pub fn write(&mut self, data: &[u8]) -> Result<()> {
        if data.len() > self.remaining() {
            tracing::debug!(needed = data.len(), remaining = self.remaining(), "cursor write exceeds remaining capacity");
            return Err(SigV4Error::InsufficientMemory);
        }
        let end = self.pos + data.len();
        self.buf[self.pos..end].copy_from_slice(data);
        self.pos = end;
        Ok(())
    }

    /// Appends a single byte.
    pub fn write_u8(&mut self, byte: u8) -> Result<()> {
        self.write(&[byte])
    }

    /// Returns a mutable view of `[at, at+len)`, without moving the
    /// cursor. Used for writing into scratch positions ahead of the
    /// cursor (payload hash, HMAC key ping-pong slots).
    pub fn slice_mut(&mut self, at: usize, len: usize) -> Result<&mut [u8]> {
        let end = at.checked_add(len).ok_or_else(|| {
            tracing::debug!(at, len, "slice_mut bounds overflow");
            SigV4Error::InsufficientMemory
        })?;
        if end > self.buf.len() {
            tracing::debug!(at, len, capacity = self.buf.len(), "slice_mut exceeds buffer capacity");
            return Err(SigV4Error::InsufficientMemory);
        }
        Ok(&mut self.buf[at..end])
    }

    /// Read-only view of `[at, at+len)`.
    pub fn slice(&self, at: usize, len: usize) -> Result<&[u8]> {
        let end = at.checked_add(len).ok_or_else(|| {
            tracing::debug!(at, len, "slice bounds overflow");
            SigV4Error::InsufficientMemory
        })?;
        if end > self.buf.len() {
            tracing::debug!(at, len, capacity = self.buf.len(), "slice exceeds buffer capacity");
            return Err(SigV4Error::InsufficientMemory);
        }
        Ok(&self.buf[at..end])
    }

    /// Splits the buffer into a read-only view of `[read_at, read_at+read_len)`
    /// and a mutable view of `[write_at, end)`.
    ///
    /// Requires `write_at >= read_at + read_len` (the write region must
    /// start at or after the end of the read region) — the only shape
    /// this library ever needs, since scratch regions are always laid
    /// out forward of what they derive from.
    pub fn split_read_write(
        &mut self,
        read_at: usize,
        read_len: usize,
        write_at: usize,
    ) -> Result<(&[u8], &mut [u8])> {
        let read_end = read_at.checked_add(read_len).ok_or_else(|| {
            tracing::debug!(read_at, read_len, "split_read_write read-range overflow");
            SigV4Error::InsufficientMemory
        })?;
        if read_end > self.buf.len() || write_at > self.buf.len() || write_at < read_end {
            tracing::debug!(
                read_at,
                read_len,
                write_at,
                capacity = self.buf.len(),
                "split_read_write bounds or ordering violated"
            );
            return Err(SigV4Error::InsufficientMemory);
        }
        let (left, right) = self.buf.split_at_mut(write_at);
        Ok((&left[read_at..read_end], right))
    }

    /// Moves `len` bytes from `src` to `dst` within the buffer, tolerant
    /// of overlap (`memmove` semantics via `copy_within`).
    pub fn relocate(&mut self, src: usize, dst: usize, len: usize) -> Result<()> {
        let src_end = src.checked_add(len).ok_or_else(|| {
            tracing::debug!(src, len, "relocate source-range overflow");
            SigV4Error::InsufficientMemory
        })?;
        let dst_end = dst.checked_add(len).ok_or_else(|| {
            tracing::debug!(dst, len, "relocate destination-range overflow");
            SigV4Error::InsufficientMemory
        })?;
        if src_end > self.buf.len() || dst_end > self.buf.len() {
            tracing::debug!(src, dst, len, capacity = self.buf.len(), "relocate exceeds buffer capacity");
            return Err(SigV4Error::InsufficientMemory);
        }
        self.buf.copy_within(src..src_end, dst);
        Ok(())
    }

    /// Rewinds the cursor to `pos`, e.g. before overwriting the
    /// canonical request with the string-to-sign.
    pub fn seek(&mut self, pos: usize) -> Result<()> {
        if pos > self.buf.len() {
            tracing::debug!(pos, capacity = self.buf.len(), "seek target past buffer capacity");
            return Err(SigV4Error::InsufficientMemory);
        }
        self.pos = pos;
        Ok(())
    }

    /// The written prefix `[0, pos)`.
    pub fn written(&self) -> &[u8] {
        &self.buf[..self.pos]
    }
}
