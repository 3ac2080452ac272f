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

/// A parsed SUBACK: the message id it acknowledges, plus one granted-QoS (or
/// failure, `0x80`) byte per filter in the originating SUBSCRIBE.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suback {
    pub packet_id: u16,
    pub return_codes: Vec<u8>,
}

/// Parse a SUBACK variable header + payload. Fails only if the body is
/// shorter than the minimum 3 bytes (2-byte packet id + at least one
/// return code); the caller is responsible for checking that
/// `return_codes.len()` matches the number of filters it subscribed under
/// this packet id.
pub fn decode(body: &[u8]) -> Option<Suback> {
    if body.len() < 3 {
        return None;
    }
    let packet_id = u16::from_be_bytes([body[0], body[1]]);
    let return_codes = body[2..].to_vec();
    Some(Suback {
        packet_id,
        return_codes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_single_filter_suback() {
        let suback = decode(&[0x00, 0x01, 0x01]).unwrap();
        assert_eq!(suback.packet_id, 1);
        assert_eq!(suback.return_codes, vec![0x01]);
    }

    #[test]
    fn rejects_body_without_return_codes() {
        assert_eq!(decode(&[0x00, 0x01]), None);
    }
}
