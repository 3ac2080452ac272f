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

/// A parsed CONNACK's relevant fields. The session-present flag (byte 2, bit
/// 0) is not consumed by this client since it never resumes sessions, but is
/// kept for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Connack {
    pub session_present: bool,
    pub return_code: u8,
}

impl Connack {
    pub fn is_accepted(&self) -> bool {
        self.return_code == 0
    }
}

/// Parse a 4-byte CONNACK buffer: `[fixed-header-byte, remaining-length,
/// session-present-byte, return-code]`. The caller is expected to have
/// already consumed the fixed header and Remaining Length during framing;
/// this parses only the 2-byte variable header passed in `body`.
pub fn parse_variable_header(body: &[u8]) -> Option<Connack> {
    if body.len() != 2 {
        return None;
    }
    Some(Connack {
        session_present: body[0] & 0x01 != 0,
        return_code: body[1],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepted_connack_has_zero_return_code() {
        let connack = parse_variable_header(&[0x00, 0x00]).unwrap();
        assert!(connack.is_accepted());
        assert!(!connack.session_present);
    }

    #[test]
    fn refused_connack_reports_return_code() {
        let connack = parse_variable_header(&[0x00, 0x05]).unwrap();
        assert!(!connack.is_accepted());
        assert_eq!(connack.return_code, 5);
    }
}
