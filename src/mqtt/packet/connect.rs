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

use super::{Qos, VariableByteInteger, PROTOCOL_LEVEL, PROTOCOL_NAME};
use crate::mqtt::connection::settings::LastWill;

fn push_mqtt_string(buf: &mut Vec<u8>, s: &str) {
    buf.extend_from_slice(&(s.len() as u16).to_be_bytes());
    buf.extend_from_slice(s.as_bytes());
}

/// Build a full CONNECT packet: fixed header followed by the variable header
/// and payload.
///
/// Connection-flags byte bit layout (bit 0 is reserved, always 0):
/// bit 1 clean-session, bit 2 will-flag, bits 3-4 will-qos, bit 5
/// will-retain, bit 6 password-present, bit 7 username-present.
#[allow(clippy::too_many_arguments)]
pub fn encode(
    client_id: &str,
    clean_session: bool,
    keep_alive_seconds: u16,
    will: Option<&LastWill>,
    username: Option<&str>,
    password: Option<&str>,
) -> Vec<u8> {
    let mut variable_and_payload = Vec::new();

    push_mqtt_string(&mut variable_and_payload, PROTOCOL_NAME);
    variable_and_payload.push(PROTOCOL_LEVEL);

    let mut flags = 0u8;
    if clean_session {
        flags |= 0b0000_0010;
    }
    if let Some(w) = will {
        flags |= 0b0000_0100;
        flags |= (w.qos.as_u8() & 0x03) << 3;
        if w.retain {
            flags |= 0b0010_0000;
        }
    }
    if password.is_some() {
        flags |= 0b0100_0000;
    }
    if username.is_some() {
        flags |= 0b1000_0000;
    }
    variable_and_payload.push(flags);
    variable_and_payload.extend_from_slice(&keep_alive_seconds.to_be_bytes());

    push_mqtt_string(&mut variable_and_payload, client_id);
    if let Some(w) = will {
        push_mqtt_string(&mut variable_and_payload, &w.topic);
        variable_and_payload.extend_from_slice(&(w.message.len() as u16).to_be_bytes());
        variable_and_payload.extend_from_slice(&w.message);
    }
    if let Some(u) = username {
        push_mqtt_string(&mut variable_and_payload, u);
    }
    if let Some(p) = password {
        // Remaining-length contribution is the byte length of `p`, summed
        // numerically with the rest of the payload below -- not string
        // concatenation.
        variable_and_payload.extend_from_slice(&(p.len() as u16).to_be_bytes());
        variable_and_payload.extend_from_slice(p.as_bytes());
    }

    let remaining_length = VariableByteInteger::from_u32(variable_and_payload.len() as u32)
        .expect("CONNECT payload never exceeds the Remaining Length maximum");

    let mut packet = Vec::with_capacity(1 + remaining_length.size() + variable_and_payload.len());
    packet.push(0x10);
    packet.extend_from_slice(remaining_length.as_bytes());
    packet.extend_from_slice(&variable_and_payload);
    packet
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_minimal_connect() {
        let bytes = encode("abc", false, 10, None, None, None);
        assert_eq!(
            bytes,
            vec![
                0x10, 0x0F, 0x00, 0x04, b'M', b'Q', b'T', b'T', 0x04, 0x00, 0x00, 0x0A, 0x00,
                0x03, b'a', b'b', b'c'
            ]
        );
    }

    #[test]
    fn sets_clean_session_bit() {
        let bytes = encode("x", true, 0, None, None, None);
        assert_eq!(bytes[9], 0b0000_0010);
    }

    #[test]
    fn sets_username_and_password_bits() {
        let bytes = encode("x", false, 0, None, Some("u"), Some("p"));
        assert_eq!(bytes[9], 0b1100_0000);
    }

    #[test]
    fn sets_will_bits() {
        let will = LastWill {
            topic: "a/b".to_string(),
            message: b"bye".to_vec(),
            qos: Qos::AtLeastOnce,
            retain: true,
        };
        let bytes = encode("x", false, 0, Some(&will), None, None);
        // will flag | will-qos(1)<<3 | will-retain
        assert_eq!(bytes[9], 0b0010_1100);
    }
}
