// MIT License
//
// Copyright (c) 2025 Takatoshi Kondo
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.

/// Errors that can occur when reading from a [`Cursor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorError {
    /// Attempted to read beyond the end of the data.
    UnexpectedEof,
}

/// A positioned reader over an in-memory byte slice.
///
/// Packet decoders consume a buffer through `read_exact`/`read_u8` here
/// rather than destructively popping bytes off a growable `Vec`, so the same
/// buffer can be re-parsed or inspected for diagnostics without having been
/// consumed by the first parse attempt.
pub struct Cursor<'a> {
    inner: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    #[inline]
    pub fn new(inner: &'a [u8]) -> Self {
        Cursor { inner, pos: 0 }
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn remaining_slice(&self) -> &'a [u8] {
        &self.inner[self.pos.min(self.inner.len())..]
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.inner.len().saturating_sub(self.pos)
    }

    /// Reads exactly `count` bytes, advancing the position.
    #[inline]
    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8], CursorError> {
        if self.pos.saturating_add(count) > self.inner.len() {
            return Err(CursorError::UnexpectedEof);
        }
        let data = &self.inner[self.pos..self.pos + count];
        self.pos += count;
        Ok(data)
    }

    #[inline]
    pub fn read_u8(&mut self) -> Result<u8, CursorError> {
        Ok(self.read_bytes(1)?[0])
    }

    /// Reads a big-endian `u16`.
    #[inline]
    pub fn read_u16_be(&mut self) -> Result<u16, CursorError> {
        let b = self.read_bytes(2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    /// Reads a length-prefixed UTF-8 string: a two-byte big-endian length
    /// followed by that many raw bytes.
    pub fn read_mqtt_string(&mut self) -> Result<String, CursorError> {
        let len = self.read_u16_be()? as usize;
        let bytes = self.read_bytes(len)?;
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }

    /// Fills `buf` completely or fails.
    pub fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), CursorError> {
        let data = self.read_bytes(buf.len())?;
        buf.copy_from_slice(data);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_bytes_and_advances_position() {
        let mut cursor = Cursor::new(b"hello world");
        assert_eq!(cursor.read_bytes(5).unwrap(), b"hello");
        assert_eq!(cursor.position(), 5);
        assert_eq!(cursor.remaining_slice(), b" world");
    }

    #[test]
    fn read_exact_past_end_is_unexpected_eof() {
        let mut cursor = Cursor::new(b"hi");
        let mut buf = [0u8; 10];
        assert_eq!(cursor.read_exact(&mut buf), Err(CursorError::UnexpectedEof));
    }

    #[test]
    fn reads_length_prefixed_mqtt_string() {
        let mut cursor = Cursor::new(&[0x00, 0x03, b'a', b'b', b'c'][..]);
        assert_eq!(cursor.read_mqtt_string().unwrap(), "abc");
    }
}
