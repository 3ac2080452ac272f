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

use crate::mqtt::packet::Qos;
use derive_builder::Builder;
use getset::Getters;

/// The broker-published message a client's ungraceful disconnect triggers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LastWill {
    pub topic: String,
    pub message: Vec<u8>,
    pub qos: Qos,
    pub retain: bool,
}

/// Connection-wide configuration, assembled via [`ConnectionSettingsBuilder`]
/// rather than a long positional constructor argument list.
#[derive(Debug, Clone, Builder, Getters)]
#[builder(setter(into, strip_option), default)]
#[getset(get = "pub")]
pub struct ConnectionSettings {
    /// Advertised in CONNECT; maximum idle time before a PINGREQ must be sent.
    #[builder(default = "10")]
    keep_alive_seconds: u16,

    /// The underlying socket's read timeout.
    #[builder(default = "5")]
    socket_timeout_seconds: u64,

    /// Age beyond which pending publishes/unsubscribes are retransmitted.
    #[builder(default = "10")]
    resend_timeout_seconds: u64,

    /// Whether the stream is configured blocking for full-packet reads.
    #[builder(default = "true")]
    block_socket: bool,

    /// Last Will and Testament, published by the broker on ungraceful disconnect.
    last_will: Option<LastWill>,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        ConnectionSettingsBuilder::default()
            .build()
            .expect("all fields have defaults")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_applies_documented_defaults() {
        let settings = ConnectionSettingsBuilder::default().build().unwrap();
        assert_eq!(*settings.keep_alive_seconds(), 10);
        assert_eq!(*settings.socket_timeout_seconds(), 5);
        assert_eq!(*settings.resend_timeout_seconds(), 10);
        assert!(*settings.block_socket());
        assert!(settings.last_will().is_none());
    }

    #[test]
    fn builder_overrides_fields() {
        let settings = ConnectionSettingsBuilder::default()
            .keep_alive_seconds(30u16)
            .build()
            .unwrap();
        assert_eq!(*settings.keep_alive_seconds(), 30);
    }
}
