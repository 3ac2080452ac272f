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

/// Build a full PUBACK packet: fixed header `0x40 0x02` plus the 2-byte
/// packet id being acknowledged.
///
/// Used both for outbound acknowledgement of an inbound QoS 1 PUBLISH, and
/// conceptually mirrors the inbound PUBACK this client parses for its own
/// pending publishes (see [`decode`]).
pub fn encode(packet_id: u16) -> Vec<u8> {
    let mut packet = Vec::with_capacity(4);
    packet.push(0x40);
    packet.push(0x02);
    packet.extend_from_slice(&packet_id.to_be_bytes());
    packet
}

/// Parse the 2-byte variable header of an inbound PUBACK into its packet id.
pub fn decode(body: &[u8]) -> Option<u16> {
    if body.len() != 2 {
        return None;
    }
    Some(u16::from_be_bytes([body[0], body[1]]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_puback() {
        assert_eq!(encode(5), vec![0x40, 0x02, 0x00, 0x05]);
    }

    #[test]
    fn decodes_puback_body() {
        assert_eq!(decode(&[0x00, 0x05]), Some(5));
        assert_eq!(decode(&[0x00]), None);
    }
}
