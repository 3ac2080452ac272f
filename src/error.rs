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

//! The error taxonomy consumed by every fallible entry point of the client.

use derive_builder::UninitializedFieldError;
use std::io;
use thiserror::Error;

/// Which handshake/acknowledgement exchange a protocol violation was observed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AckContext {
    /// A CONNACK arrived outside of the initial handshake, or the handshake
    /// CONNACK itself was malformed/refused.
    Connect,
    /// A PUBACK referenced a message id with no matching pending publish.
    Publish,
    /// A SUBACK's acknowledgement-list length didn't match the number of
    /// filters registered under its message id.
    Subscribe,
}

impl std::fmt::Display for AckContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Connect => "CONNECT/CONNACK",
            Self::Publish => "PUBLISH/PUBACK",
            Self::Subscribe => "SUBSCRIBE/SUBACK",
        };
        f.write_str(s)
    }
}

/// The error type returned by every fallible operation on [`crate::mqtt::client::MqttClient`].
#[derive(Debug, Error)]
pub enum MqttError {
    /// The transport could not be opened, or the CONNACK was refused/malformed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// An outgoing write failed, was short, or the socket was closed.
    #[error("failed to send data: {0}")]
    TxData(#[source] io::Error),

    /// A read failed or the stream closed while decoding a packet.
    #[error("failed to receive data: {0}")]
    RxData(#[source] io::Error),

    /// A protocol acknowledgement arrived that the session state did not expect.
    #[error("unexpected acknowledgement during {0}")]
    UnexpectedAck(AckContext),

    /// The packet-identifier allocator has no free ids (all 65535 in flight).
    #[error("packet identifier space exhausted")]
    PacketIdentifiersExhausted,

    /// A connection-settings builder was used without a required field set.
    #[error("incomplete connection settings: {0}")]
    IncompleteSettings(String),
}

impl From<UninitializedFieldError> for MqttError {
    fn from(e: UninitializedFieldError) -> Self {
        MqttError::IncompleteSettings(e.to_string())
    }
}
