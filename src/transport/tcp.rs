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

use super::{read_from, write_all_to, Transport};
use crate::error::MqttError;
use std::net::TcpStream;
use std::time::Duration;

/// A plain, unencrypted TCP transport.
pub struct TcpTransport {
    stream: TcpStream,
}

impl TcpTransport {
    pub fn connect(host: &str, port: u16) -> Result<Self, MqttError> {
        let stream = TcpStream::connect((host, port)).map_err(|e| {
            MqttError::ConnectionFailed(format!("tcp connect to {host}:{port} failed: {e}"))
        })?;
        stream.set_nodelay(true).map_err(MqttError::TxData)?;
        Ok(Self { stream })
    }
}

impl Transport for TcpTransport {
    fn write_all(&mut self, bytes: &[u8]) -> Result<(), MqttError> {
        write_all_to(&mut self.stream, bytes)
    }

    fn read(&mut self, buf: &mut [u8], blocking: bool) -> Result<usize, MqttError> {
        read_from(&mut self.stream, buf, blocking)
    }

    fn set_read_timeout(&mut self, timeout: Option<Duration>) -> Result<(), MqttError> {
        self.stream.set_read_timeout(timeout).map_err(MqttError::RxData)
    }

    fn set_blocking(&mut self, block_socket: bool) -> Result<(), MqttError> {
        self.stream
            .set_nonblocking(!block_socket)
            .map_err(MqttError::RxData)
    }

    fn shutdown_write(&mut self) -> Result<(), MqttError> {
        self.stream
            .shutdown(std::net::Shutdown::Write)
            .map_err(MqttError::TxData)
    }
}
