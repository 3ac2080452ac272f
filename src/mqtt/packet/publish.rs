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
use crate::mqtt::common::cursor::{Cursor, CursorError};

/// Build a full PUBLISH packet.
///
/// `packet_id` must be `Some` for qos >= 1 and `None` for qos 0; callers are
/// responsible for allocating the id before calling this (the codec has no
/// allocator of its own).
pub fn encode(
    topic: &str,
    payload: &[u8],
    qos: Qos,
    retain: bool,
    dup: bool,
    packet_id: Option<u16>,
) -> Vec<u8> {
    let mut variable_and_payload = Vec::new();
    variable_and_payload.extend_from_slice(&(topic.len() as u16).to_be_bytes());
    variable_and_payload.extend_from_slice(topic.as_bytes());
    if let Some(id) = packet_id {
        variable_and_payload.extend_from_slice(&id.to_be_bytes());
    }
    variable_and_payload.extend_from_slice(payload);

    let first_byte = 0x30
        | (retain as u8)
        | (qos.as_u8() << 1)
        | ((dup as u8) << 3);

    let remaining_length = VariableByteInteger::from_u32(variable_and_payload.len() as u32)
        .expect("PUBLISH payload never exceeds the Remaining Length maximum in practice");

    let mut packet = Vec::with_capacity(1 + remaining_length.size() + variable_and_payload.len());
    packet.push(first_byte);
    packet.extend_from_slice(remaining_length.as_bytes());
    packet.extend_from_slice(&variable_and_payload);
    packet
}

/// A decoded inbound PUBLISH.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Publish {
    pub topic: String,
    pub payload: Vec<u8>,
    pub qos: Qos,
    pub retain: bool,
    pub dup: bool,
    pub packet_id: Option<u16>,
}

/// Parse the variable header + payload of a PUBLISH given the fixed-header
/// first byte (for the DUP/QoS/RETAIN bits) and the remaining-length-sized
/// body.
pub fn decode(first_byte: u8, body: &[u8]) -> Result<Publish, CursorError> {
    let retain = first_byte & 0x01 != 0;
    let qos_bits = (first_byte >> 1) & 0x03;
    let dup = (first_byte >> 3) & 0x01 != 0;
    let qos = Qos::try_from(qos_bits).unwrap_or(Qos::AtMostOnce);

    let mut cursor = Cursor::new(body);
    let topic = cursor.read_mqtt_string()?;
    let packet_id = if qos != Qos::AtMostOnce {
        Some(cursor.read_u16_be()?)
    } else {
        None
    };
    let payload = cursor.remaining_slice().to_vec();

    Ok(Publish {
        topic,
        payload,
        qos,
        retain,
        dup,
        packet_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_qos0_publish() {
        let bytes = encode("a/b", b"hi", Qos::AtMostOnce, false, false, None);
        assert_eq!(
            bytes,
            vec![0x30, 0x07, 0x00, 0x03, b'a', b'/', b'b', b'h', b'i']
        );
    }

    #[test]
    fn encodes_qos1_retained_publish_with_packet_id() {
        let bytes = encode("x", b"y", Qos::AtLeastOnce, true, false, Some(5));
        assert_eq!(bytes, vec![0x33, 0x06, 0x00, 0x01, b'x', 0x00, 0x05, b'y']);
    }

    #[test]
    fn decodes_qos0_inbound_publish() {
        let body = [0x00, 0x03, b't', b'/', b'1', b'H', b'i'];
        let publish = decode(0x30, &body).unwrap();
        assert_eq!(publish.topic, "t/1");
        assert_eq!(publish.payload, b"Hi");
        assert_eq!(publish.qos, Qos::AtMostOnce);
        assert_eq!(publish.packet_id, None);
    }

    #[test]
    fn decodes_qos1_inbound_publish_with_packet_id() {
        let body = [0x00, 0x01, b'x', 0x00, 0x07, b'y'];
        let publish = decode(0x32, &body).unwrap();
        assert_eq!(publish.packet_id, Some(7));
        assert_eq!(publish.payload, b"y");
    }
}
