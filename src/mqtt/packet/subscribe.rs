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

use super::{Qos, VariableByteInteger};

/// Build a full SUBSCRIBE packet for a single topic filter.
///
/// The MQTT spec requires bit 1 of the fixed-header flags nibble to be set
/// on SUBSCRIBE; at qos 0 the flags byte is therefore `0x82`, not `0x80`.
pub fn encode(packet_id: u16, topic_filter: &str, qos: Qos) -> Vec<u8> {
    let mut variable_and_payload = Vec::new();
    variable_and_payload.extend_from_slice(&packet_id.to_be_bytes());
    variable_and_payload.extend_from_slice(&(topic_filter.len() as u16).to_be_bytes());
    variable_and_payload.extend_from_slice(topic_filter.as_bytes());
    variable_and_payload.push(qos.as_u8());

    let remaining_length = VariableByteInteger::from_u32(variable_and_payload.len() as u32)
        .expect("SUBSCRIBE payload never exceeds the Remaining Length maximum in practice");

    let mut packet = Vec::with_capacity(1 + remaining_length.size() + variable_and_payload.len());
    packet.push(0x82);
    packet.extend_from_slice(remaining_length.as_bytes());
    packet.extend_from_slice(&variable_and_payload);
    packet
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sets_mandatory_reserved_bit() {
        let bytes = encode(1, "t", Qos::AtMostOnce);
        assert_eq!(bytes[0], 0x82);
    }

    #[test]
    fn encodes_packet_id_filter_and_qos() {
        let bytes = encode(7, "a/b", Qos::AtLeastOnce);
        assert_eq!(
            bytes,
            vec![0x82, 0x08, 0x00, 0x07, 0x00, 0x03, b'a', b'/', b'b', 0x01]
        );
    }
}
