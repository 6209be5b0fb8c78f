//! Bounds-checked reader over an immutable byte buffer.
//!
//! A [`Cursor`] owns a read position and an area bound (`end`). Nothing it
//! hands out ever reaches past `end`, and every length taken from the input
//! is compared against the remaining area before any arithmetic on it.
//! Child areas ([`Cursor::sub_area`]) share the buffer but carry a tighter
//! bound, which is how block and segment isolation is enforced.

use byteorder::{BigEndian, ByteOrder};

use crate::error::DecodeError;

/// Width of every size field in the format.
pub(crate) const SIZE_FIELD_BYTES: usize = 8;

#[derive(Debug, Clone)]
pub(crate) struct Cursor<'a> {
    buf: &'a [u8],
    pos: usize,
    end: usize,
}

impl<'a> Cursor<'a> {
    /// Cursor over the whole buffer.
    pub(crate) fn new(buf: &'a [u8]) -> Self {
        Self {
            buf,
            pos: 0,
            end: buf.len(),
        }
    }

    pub(crate) fn offset(&self) -> usize {
        self.pos
    }

    pub(crate) fn end(&self) -> usize {
        self.end
    }

    pub(crate) fn remaining(&self) -> usize {
        self.end - self.pos
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.pos == self.end
    }

    pub(crate) fn file_size(&self) -> u64 {
        self.buf.len() as u64
    }

    /// Reads a big-endian `u64`.
    ///
    /// # Errors
    ///
    /// [`DecodeError::AreaTooSmall`] if fewer than 8 bytes remain in the area.
    pub(crate) fn read_u64_be(&mut self, field: &'static str) -> Result<u64, DecodeError> {
        if self.remaining() < SIZE_FIELD_BYTES {
            return Err(self.area_too_small(field));
        }
        let value = BigEndian::read_u64(&self.buf[self.pos..self.pos + SIZE_FIELD_BYTES]);
        self.pos += SIZE_FIELD_BYTES;
        Ok(value)
    }

    /// Reads a size field and checks that the area it describes fits in
    /// what remains after it.
    ///
    /// # Errors
    ///
    /// [`DecodeError::AreaTooSmall`] if the field itself is truncated,
    /// [`DecodeError::PointsOutsideArea`] if the declared size is too large.
    /// The cursor does not move on failure.
    pub(crate) fn read_size(&mut self, field: &'static str) -> Result<u64, DecodeError> {
        let start = self.pos;
        let size = self.read_u64_be(field)?;
        if size > self.remaining() as u64 {
            self.pos = start;
            return Err(self.points_outside_area(field));
        }
        Ok(size)
    }

    /// Reads bytes up to the next NUL and steps past the NUL.
    ///
    /// # Errors
    ///
    /// [`DecodeError::PointsOutsideArea`] if no NUL is found before the area
    /// bound.
    pub(crate) fn read_cstring(&mut self, field: &'static str) -> Result<&'a [u8], DecodeError> {
        let area = &self.buf[self.pos..self.end];
        match area.iter().position(|&b| b == 0) {
            Some(len) => {
                self.pos += len + 1;
                Ok(&area[..len])
            }
            None => Err(self.points_outside_area(field)),
        }
    }

    /// Takes the next `len` bytes as a raw slice.
    pub(crate) fn read_slice(
        &mut self,
        len: u64,
        field: &'static str,
    ) -> Result<&'a [u8], DecodeError> {
        if len > self.remaining() as u64 {
            return Err(self.points_outside_area(field));
        }
        // `len` fits in the remaining area, so it fits in usize.
        let len = len as usize;
        let slice = &self.buf[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    /// Splits off the next `len` bytes as a child cursor bounded to exactly
    /// that area, and advances past them.
    pub(crate) fn sub_area(&mut self, len: u64, field: &'static str) -> Result<Cursor<'a>, DecodeError> {
        let start = self.pos;
        let slice = self.read_slice(len, field)?;
        Ok(Cursor {
            buf: self.buf,
            pos: start,
            end: start + slice.len(),
        })
    }

    /// Consumes a line ending in `delim`, scanning at most `max_scan` bytes.
    /// Returns the line without the delimiter, or `None` if the delimiter
    /// isn't found in range; the cursor does not move in that case.
    pub(crate) fn read_until(&mut self, delim: u8, max_scan: usize) -> Option<&'a [u8]> {
        let scan_end = self.end.min(self.pos.saturating_add(max_scan));
        let area = &self.buf[self.pos..scan_end];
        let len = area.iter().position(|&b| b == delim)?;
        self.pos += len + 1;
        Some(&area[..len])
    }

    /// Fails unless the area is empty or its last byte is NUL. Strings in a
    /// block can then never run into the next block.
    pub(crate) fn check_nul_terminated(&self, field: &'static str) -> Result<(), DecodeError> {
        if self.end > self.pos && self.buf[self.end - 1] != 0 {
            return Err(DecodeError::MissingTerminator {
                field,
                offset: (self.end - 1) as u64,
            });
        }
        Ok(())
    }

    /// Fails if any bytes of the area are left unread.
    pub(crate) fn finish(&self, area: &'static str) -> Result<(), DecodeError> {
        if !self.is_empty() {
            return Err(DecodeError::UnusedBytes {
                area,
                remaining: self.remaining() as u64,
                offset: self.pos as u64,
                end_offset: self.end as u64,
            });
        }
        Ok(())
    }

    fn area_too_small(&self, field: &'static str) -> DecodeError {
        DecodeError::AreaTooSmall {
            field,
            offset: self.pos as u64,
            end_offset: self.end as u64,
            file_size: self.file_size(),
        }
    }

    fn points_outside_area(&self, field: &'static str) -> DecodeError {
        DecodeError::PointsOutsideArea {
            field,
            offset: self.pos as u64,
            end_offset: self.end as u64,
            file_size: self.file_size(),
        }
    }
}
