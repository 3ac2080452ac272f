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

//! The byte transport: reads and writes on a connected TCP or TLS stream.
//!
//! This module has no knowledge of MQTT framing; it only moves bytes.

pub mod tcp;
#[cfg(feature = "tls")]
pub mod tls;

use crate::error::MqttError;
use std::io::{self, Read, Write};
use std::time::Duration;

/// A connected byte stream, abstracted so the core can drive either a plain
/// [`std::net::TcpStream`] or a `rustls`-wrapped one identically.
pub trait Transport {
    /// Write the entire buffer. A short write or any I/O error is a protocol
    /// error, not a retry opportunity: the caller has no way to resume a
    /// partially-sent MQTT packet.
    fn write_all(&mut self, bytes: &[u8]) -> Result<(), MqttError>;

    /// Read into `buf`.
    ///
    /// - `blocking = false`: a single best-effort read of up to `buf.len()`
    ///   bytes. May return 0 without reaching end-of-stream (e.g. a read
    ///   timeout elapsed with nothing available). Returns the number of
    ///   bytes read.
    /// - `blocking = true`: loop until `buf.len()` bytes have been
    ///   accumulated or end-of-stream is reached. Returns the number of
    ///   bytes actually read, which is `buf.len()` unless the stream closed
    ///   early.
    fn read(&mut self, buf: &mut [u8], blocking: bool) -> Result<usize, MqttError>;

    /// Configure the underlying socket's read timeout. `None` disables the
    /// timeout (indefinite blocking reads).
    fn set_read_timeout(&mut self, timeout: Option<Duration>) -> Result<(), MqttError>;

    /// Configure the underlying socket's blocking mode (the `block_socket`
    /// connection setting). When `false`, the OS-level socket never blocks at
    /// all and every [`Transport::read`] call -- blocking or not -- is a
    /// single best-effort attempt; callers that disable this are responsible
    /// for re-polling `step()` until a full packet has arrived.
    fn set_blocking(&mut self, block_socket: bool) -> Result<(), MqttError>;

    /// Shut down the writable half of the stream, signaling end-of-stream to
    /// the peer without closing the file descriptor outright.
    fn shutdown_write(&mut self) -> Result<(), MqttError>;
}

/// Shared non-blocking/blocking read loop used by every [`Transport`] impl:
/// each concrete transport only needs to supply a `std::io::Read`.
pub(crate) fn read_from<R: Read>(
    stream: &mut R,
    buf: &mut [u8],
    blocking: bool,
) -> Result<usize, MqttError> {
    if !blocking {
        return match stream.read(buf) {
            Ok(n) => Ok(n),
            Err(e) if e.kind() == io::ErrorKind::WouldBlock || e.kind() == io::ErrorKind::TimedOut => {
                Ok(0)
            }
            Err(e) => Err(MqttError::RxData(e)),
        };
    }

    let mut filled = 0;
    while filled < buf.len() {
        match stream.read(&mut buf[filled..]) {
            Ok(0) => break, // end of stream
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(MqttError::RxData(e)),
        }
    }
    Ok(filled)
}

pub(crate) fn write_all_to<W: Write>(stream: &mut W, bytes: &[u8]) -> Result<(), MqttError> {
    stream.write_all(bytes).map_err(MqttError::TxData)
}

/// Parse an endpoint URL of the form `tcp://host:port` or `tls://host:port`.
/// Returns `(scheme, host, port)`.
pub fn parse_endpoint(url: &str) -> Result<(&str, &str, u16), MqttError> {
    let (scheme, rest) = url
        .split_once("://")
        .ok_or_else(|| MqttError::ConnectionFailed(format!("malformed endpoint: {url}")))?;
    let (host, port) = rest
        .rsplit_once(':')
        .ok_or_else(|| MqttError::ConnectionFailed(format!("missing port in endpoint: {url}")))?;
    let port: u16 = port
        .parse()
        .map_err(|_| MqttError::ConnectionFailed(format!("invalid port in endpoint: {url}")))?;
    Ok((scheme, host, port))
}
