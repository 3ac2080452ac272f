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

use super::VariableByteInteger;

/// Build a full UNSUBSCRIBE packet for a single topic filter.
///
/// `dup` sets bit 3 of the fixed-header flags nibble on retransmission; the
/// reserved bit 1 MUST still be set per the MQTT spec, giving `0xA2` /
/// `0xAA`.
pub fn encode(packet_id: u16, topic_filter: &str, dup: bool) -> Vec<u8> {
    let mut variable_and_payload = Vec::new();
    variable_and_payload.extend_from_slice(&packet_id.to_be_bytes());
    variable_and_payload.extend_from_slice(&(topic_filter.len() as u16).to_be_bytes());
    variable_and_payload.extend_from_slice(topic_filter.as_bytes());

    let first_byte = 0xA2 | ((dup as u8) << 3);

    let remaining_length = VariableByteInteger::from_u32(variable_and_payload.len() as u32)
        .expect("UNSUBSCRIBE payload never exceeds the Remaining Length maximum in practice");

    let mut packet = Vec::with_capacity(1 + remaining_length.size() + variable_and_payload.len());
    packet.push(first_byte);
    packet.extend_from_slice(remaining_length.as_bytes());
    packet.extend_from_slice(&variable_and_payload);
    packet
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_unsubscribe() {
        let bytes = encode(3, "a", false);
        assert_eq!(bytes, vec![0xA2, 0x05, 0x00, 0x03, 0x00, 0x01, b'a']);
    }

    #[test]
    fn sets_dup_bit_on_retransmit() {
        let bytes = encode(3, "a", true);
        assert_eq!(bytes[0], 0xAA);
    }
}
