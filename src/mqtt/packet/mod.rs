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

//! The MQTT 3.1.1 wire codec: fixed header, Remaining Length, length-prefixed
//! strings, and the per-packet-type builders/parsers.

pub mod connack;
pub mod connect;
pub mod disconnect;
pub mod packet_type;
pub mod pingreq;
pub mod pingresp;
pub mod puback;
pub mod publish;
pub mod qos;
pub mod suback;
pub mod subscribe;
pub mod unsuback;
pub mod unsubscribe;
pub mod variable_byte_integer;

pub use packet_type::PacketType;
pub use qos::Qos;
pub use variable_byte_integer::VariableByteInteger;

/// Protocol name advertised in CONNECT: MQTT 3.1.1, not the legacy `MQIsdp`.
pub const PROTOCOL_NAME: &str = "MQTT";
/// Protocol level byte advertised in CONNECT for MQTT 3.1.1.
pub const PROTOCOL_LEVEL: u8 = 0x04;
