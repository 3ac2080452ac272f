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
use rustls::pki_types::{CertificateDer, ServerName};
use rustls::{ClientConfig, ClientConnection, RootCertStore, StreamOwned};
use std::fs::File;
use std::io::BufReader;
use std::net::TcpStream;
use std::sync::Arc;
use std::time::Duration;

/// A TLS transport wrapping a `TcpStream` in a synchronous `rustls`
/// connection. Peer verification uses an optional PEM CA bundle; when none is
/// supplied, the platform's default `webpki-roots`-less empty store is used,
/// which in practice means connecting without a trust anchor will fail
/// certificate verification unless a CA file is provided.
pub struct TlsTransport {
    stream: StreamOwned<ClientConnection, TcpStream>,
}

impl TlsTransport {
    pub fn connect(host: &str, port: u16, ca_file: Option<&str>) -> Result<Self, MqttError> {
        let tcp = TcpStream::connect((host, port)).map_err(|e| {
            MqttError::ConnectionFailed(format!("tcp connect to {host}:{port} failed: {e}"))
        })?;
        tcp.set_nodelay(true).map_err(MqttError::TxData)?;

        let mut roots = RootCertStore::empty();
        if let Some(path) = ca_file {
            let file = File::open(path).map_err(|e| {
                MqttError::ConnectionFailed(format!("failed to open CA file {path}: {e}"))
            })?;
            let mut reader = BufReader::new(file);
            let certs: Vec<CertificateDer<'static>> = rustls_pemfile::certs(&mut reader)
                .collect::<Result<_, _>>()
                .map_err(|e| {
                    MqttError::ConnectionFailed(format!("failed to parse CA file {path}: {e}"))
                })?;
            for cert in certs {
                roots.add(cert).map_err(|e| {
                    MqttError::ConnectionFailed(format!("invalid CA certificate: {e}"))
                })?;
            }
        }

        let config = ClientConfig::builder()
            .with_root_certificates(roots)
            .with_no_client_auth();

        let server_name = ServerName::try_from(host.to_string()).map_err(|e| {
            MqttError::ConnectionFailed(format!("invalid server name {host}: {e}"))
        })?;

        let conn = ClientConnection::new(Arc::new(config), server_name).map_err(|e| {
            MqttError::ConnectionFailed(format!("tls handshake setup failed: {e}"))
        })?;

        Ok(Self {
            stream: StreamOwned::new(conn, tcp),
        })
    }
}

impl Transport for TlsTransport {
    fn write_all(&mut self, bytes: &[u8]) -> Result<(), MqttError> {
        write_all_to(&mut self.stream, bytes)
    }

    fn read(&mut self, buf: &mut [u8], blocking: bool) -> Result<usize, MqttError> {
        read_from(&mut self.stream, buf, blocking)
    }

    fn set_read_timeout(&mut self, timeout: Option<Duration>) -> Result<(), MqttError> {
        self.stream
            .get_ref()
            .set_read_timeout(timeout)
            .map_err(MqttError::RxData)
    }

    fn set_blocking(&mut self, block_socket: bool) -> Result<(), MqttError> {
        self.stream
            .get_ref()
            .set_nonblocking(!block_socket)
            .map_err(MqttError::RxData)
    }

    fn shutdown_write(&mut self) -> Result<(), MqttError> {
        self.stream
            .get_ref()
            .shutdown(std::net::Shutdown::Write)
            .map_err(MqttError::TxData)
    }
}
