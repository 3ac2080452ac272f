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

use arrayvec::ArrayVec;
use std::convert::TryFrom;
use std::fmt;

/// MQTT's Remaining Length field: a 1-4 byte variable-length integer. Each
/// byte carries 7 bits of the value, LSB-first, with the high bit set on
/// every byte but the last.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableByteInteger {
    encoded: ArrayVec<u8, 4>,
}

impl VariableByteInteger {
    /// Largest value a 4-byte Remaining Length field can represent.
    pub const MAX: u32 = 268_435_455;

    /// Encode `value` into 1-4 bytes. `None` if `value > MAX`.
    pub fn from_u32(mut value: u32) -> Option<Self> {
        if value > Self::MAX {
            return None;
        }
        let mut buf = ArrayVec::<u8, 4>::new();
        loop {
            let mut byte = (value % 128) as u8;
            value /= 128;
            if value > 0 {
                byte |= 0x80;
            }
            buf.push(byte);
            if value == 0 {
                break;
            }
        }
        Some(Self { encoded: buf })
    }

    pub fn to_u32(&self) -> u32 {
        let mut multiplier = 1u32;
        let mut result = 0u32;
        for &b in &self.encoded {
            result += u32::from(b & 0x7F) * multiplier;
            multiplier = multiplier.saturating_mul(128);
        }
        result
    }

    pub fn size(&self) -> usize {
        self.encoded.len()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.encoded
    }

    /// Decode a Remaining Length field from the start of `buf`.
    ///
    /// Returns `(value, bytes_consumed)`, or `None` if `buf` doesn't contain
    /// a complete, well-formed encoding (either it runs out before the
    /// terminating byte, or exceeds the 4-byte maximum length).
    pub fn decode(buf: &[u8]) -> Option<(u32, usize)> {
        let mut multiplier = 1u32;
        let mut value = 0u32;

        for (i, &b) in buf.iter().take(4).enumerate() {
            value = value.checked_add(u32::from(b & 0x7F) * multiplier)?;
            if value > Self::MAX {
                return None;
            }
            if (b & 0x80) == 0 {
                return Some((value, i + 1));
            }
            multiplier = multiplier.checked_mul(128)?;
        }
        None
    }
}

impl fmt::Display for VariableByteInteger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_u32())
    }
}

impl From<VariableByteInteger> for u32 {
    fn from(vbi: VariableByteInteger) -> Self {
        vbi.to_u32()
    }
}

impl TryFrom<u32> for VariableByteInteger {
    type Error = &'static str;
    fn try_from(value: u32) -> Result<Self, Self::Error> {
        VariableByteInteger::from_u32(value).ok_or("Remaining Length value too large")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(value: u32, expected_bytes: &[u8]) {
        let vbi = VariableByteInteger::from_u32(value).unwrap();
        assert_eq!(vbi.as_bytes(), expected_bytes);
        let (decoded, consumed) = VariableByteInteger::decode(vbi.as_bytes()).unwrap();
        assert_eq!(decoded, value);
        assert_eq!(consumed, expected_bytes.len());
    }

    #[test]
    fn encodes_boundary_values() {
        roundtrip(0, &[0x00]);
        roundtrip(127, &[0x7F]);
        roundtrip(128, &[0x80, 0x01]);
        roundtrip(16383, &[0xFF, 0x7F]);
        roundtrip(16384, &[0x80, 0x80, 0x01]);
        roundtrip(2_097_151, &[0xFF, 0xFF, 0x7F]);
        roundtrip(2_097_152, &[0x80, 0x80, 0x80, 0x01]);
        roundtrip(VariableByteInteger::MAX, &[0xFF, 0xFF, 0xFF, 0x7F]);
    }

    #[test]
    fn rejects_values_above_max() {
        assert!(VariableByteInteger::from_u32(VariableByteInteger::MAX + 1).is_none());
    }

    #[test]
    fn decode_reports_none_on_truncated_input() {
        assert_eq!(VariableByteInteger::decode(&[0x80, 0x80, 0x80]), None);
    }
}
