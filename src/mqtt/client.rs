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

//! The connection handshake, the operation surface, and the cooperative
//! event loop.

use crate::client_id;
use crate::clock::{Clock, SystemClock};
use crate::error::{AckContext, MqttError};
use crate::logger::{Context as LogContext, Logger, TracingLogger};
use crate::mqtt::connection::{ConnectionSettings, InMemoryStore, SessionStore};
use crate::mqtt::packet::{self, connack, packet_type::PacketType, puback, suback, unsuback, Qos, VariableByteInteger};
use crate::transport::tcp::TcpTransport;
#[cfg(feature = "tls")]
use crate::transport::tls::TlsTransport;
use crate::transport::Transport;
use std::time::Duration;

/// The outcome of a single [`MqttClient::step`] iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// A packet was read and dispatched, or a timer fired.
    DidWork,
    /// No data was available; the caller may sleep before trying again.
    Idle,
}

/// A single-threaded, cooperative MQTT 3.1.1 client.
///
/// Owns exactly one byte transport, the packet-identifier allocator, the
/// connection settings, and the keep-alive timestamp. See the crate docs for
/// the overall architecture.
pub struct MqttClient {
    transport: Box<dyn Transport>,
    client_id: String,
    store: Box<dyn SessionStore>,
    logger: Box<dyn Logger>,
    clock: Box<dyn Clock>,
    packet_ids: crate::mqtt::common::value_allocator::ValueAllocator,
    settings: ConnectionSettings,
    last_ping_at: u64,
    last_sweep_at: u64,
}

impl MqttClient {
    /// Construct a client and eagerly open the transport.
    ///
    /// `ca_file` selects TLS: when `Some`, the connection is wrapped in
    /// `rustls` (requires the `tls` feature, which is enabled by default);
    /// when `None`, a plain TCP stream is used.
    pub fn new(
        host: &str,
        port: u16,
        client_id: Option<String>,
        ca_file: Option<String>,
        store: Option<Box<dyn SessionStore>>,
        logger: Option<Box<dyn Logger>>,
    ) -> Result<Self, MqttError> {
        #[cfg(feature = "tls")]
        let transport: Box<dyn Transport> = match ca_file.as_deref() {
            Some(ca) => Box::new(TlsTransport::connect(host, port, Some(ca))?),
            None => Box::new(TcpTransport::connect(host, port)?),
        };
        #[cfg(not(feature = "tls"))]
        let transport: Box<dyn Transport> = {
            let _ = ca_file;
            Box::new(TcpTransport::connect(host, port)?)
        };

        Ok(Self {
            transport,
            client_id: client_id.unwrap_or_else(client_id::generate),
            store: store.unwrap_or_else(|| Box::new(InMemoryStore::new())),
            logger: logger.unwrap_or_else(|| Box::new(TracingLogger)),
            clock: Box::new(SystemClock::new()),
            packet_ids: crate::mqtt::common::value_allocator::ValueAllocator::packet_ids(),
            settings: ConnectionSettings::default(),
            last_ping_at: 0,
            last_sweep_at: 0,
        })
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Perform the CONNECT/CONNACK handshake.
    ///
    /// On success the connection settings are adopted and `last_ping_at` is
    /// reset to now. On failure, no session state is mutated.
    pub fn connect(
        &mut self,
        username: Option<&str>,
        password: Option<&str>,
        settings: ConnectionSettings,
        clean_session: bool,
    ) -> Result<(), MqttError> {
        self.transport
            .set_read_timeout(Some(Duration::from_secs(*settings.socket_timeout_seconds())))?;
        self.transport.set_blocking(*settings.block_socket())?;

        let packet = packet::connect::encode(
            &self.client_id,
            clean_session,
            *settings.keep_alive_seconds(),
            settings.last_will().as_ref(),
            username,
            password,
        );
        self.transport.write_all(&packet)?;

        let mut buf = [0u8; 4];
        let n = self.transport.read(&mut buf, true)?;
        if n != 4 {
            return Err(MqttError::ConnectionFailed(format!(
                "truncated CONNACK: expected 4 bytes, got {n}"
            )));
        }
        let connack = connack::parse_variable_header(&buf[2..4])
            .filter(|_| buf[0] >> 4 == PacketType::Connack as u8)
            .filter(|c| c.is_accepted());
        if connack.is_none() {
            return Err(MqttError::ConnectionFailed(format!(
                "CONNACK refused or malformed: {buf:02X?}"
            )));
        }

        self.settings = settings;
        self.last_ping_at = self.clock.now_seconds();
        self.last_sweep_at = self.last_ping_at;
        self.logger.info(
            "connected",
            &LogContext::new().with("client_id", &self.client_id),
        );
        Ok(())
    }

    /// Publish an application message. For qos >= 1, a pending-publish
    /// record is registered before transmission; the event loop retires it
    /// on a matching PUBACK and retransmits it if one doesn't arrive.
    pub fn publish(
        &mut self,
        topic: &str,
        payload: &[u8],
        qos: Qos,
        retain: bool,
    ) -> Result<(), MqttError> {
        let packet_id = if qos != Qos::AtMostOnce {
            let id = self
                .packet_ids
                .allocate()
                .ok_or(MqttError::PacketIdentifiersExhausted)?;
            let now = self.clock.now_seconds();
            self.store
                .add_pending_publish(id, topic, payload, qos, retain, now);
            Some(id)
        } else {
            None
        };

        let packet = packet::publish::encode(topic, payload, qos, retain, false, packet_id);
        self.transport.write_all(&packet)?;
        self.last_ping_at = self.clock.now_seconds();
        Ok(())
    }

    /// Subscribe to a topic filter (which may contain `+`/`#` wildcards).
    /// `handler` is invoked for every inbound PUBLISH whose topic matches.
    pub fn subscribe(
        &mut self,
        topic_filter: &str,
        qos: Qos,
        handler: Box<dyn FnMut(&str, &[u8]) + Send>,
    ) -> Result<(), MqttError> {
        let message_id = self
            .packet_ids
            .allocate()
            .ok_or(MqttError::PacketIdentifiersExhausted)?;
        self.store
            .add_subscription(topic_filter, qos, message_id, handler);

        let packet = packet::subscribe::encode(message_id, topic_filter, qos);
        self.transport.write_all(&packet)?;
        self.last_ping_at = self.clock.now_seconds();
        Ok(())
    }

    /// Unsubscribe from a topic filter previously passed to [`Self::subscribe`].
    pub fn unsubscribe(&mut self, topic_filter: &str) -> Result<(), MqttError> {
        let message_id = self
            .packet_ids
            .allocate()
            .ok_or(MqttError::PacketIdentifiersExhausted)?;
        let now = self.clock.now_seconds();
        self.store
            .add_pending_unsubscribe(message_id, topic_filter, now);

        let packet = packet::unsubscribe::encode(message_id, topic_filter, false);
        self.transport.write_all(&packet)?;
        self.last_ping_at = self.clock.now_seconds();
        Ok(())
    }

    pub fn ping(&mut self) -> Result<(), MqttError> {
        self.transport.write_all(&packet::pingreq::PACKET)?;
        self.last_ping_at = self.clock.now_seconds();
        Ok(())
    }

    /// Send DISCONNECT and shut down the writable half of the stream.
    pub fn disconnect(&mut self) -> Result<(), MqttError> {
        self.transport.write_all(&packet::disconnect::PACKET)?;
        self.transport.shutdown_write()
    }

    /// Best-effort `disconnect()` followed by releasing the transport.
    pub fn close(&mut self) {
        let _ = self.disconnect();
    }

    /// Run one iteration of the event loop: a best-effort 1-byte read, full
    /// packet dispatch if one was started, and the keep-alive/retransmit
    /// timer sweep.
    pub fn step(&mut self) -> Result<StepOutcome, MqttError> {
        let mut first_byte = [0u8; 1];
        let n = self.transport.read(&mut first_byte, false)?;
        let outcome = if n == 0 {
            StepOutcome::Idle
        } else {
            self.handle_incoming_packet(first_byte[0])?;
            self.last_ping_at = self.clock.now_seconds();
            StepOutcome::DidWork
        };
        self.run_periodic_tasks()?;
        Ok(outcome)
    }

    /// Drive [`Self::step`] until it returns an error. When `allow_sleep` is
    /// true, an `Idle` outcome sleeps 100 ms before the next iteration;
    /// otherwise the loop spins.
    pub fn run(&mut self, allow_sleep: bool) -> Result<(), MqttError> {
        loop {
            if self.step()? == StepOutcome::Idle && allow_sleep {
                std::thread::sleep(Duration::from_millis(100));
            }
        }
    }

    fn read_remaining_length(&mut self) -> Result<u32, MqttError> {
        let mut encoded = [0u8; 4];
        for i in 0..4 {
            let mut byte = [0u8; 1];
            let n = self.transport.read(&mut byte, true)?;
            if n == 0 {
                return Err(MqttError::RxData(std::io::Error::new(
                    std::io::ErrorKind::UnexpectedEof,
                    "stream closed while reading remaining length",
                )));
            }
            encoded[i] = byte[0];
            if byte[0] & 0x80 == 0 {
                let (value, _) = VariableByteInteger::decode(&encoded[..=i]).ok_or_else(|| {
                    MqttError::RxData(std::io::Error::new(
                        std::io::ErrorKind::InvalidData,
                        "malformed remaining length",
                    ))
                })?;
                return Ok(value);
            }
        }
        Err(MqttError::RxData(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            "remaining length exceeds 4 bytes",
        )))
    }

    fn handle_incoming_packet(&mut self, first_byte: u8) -> Result<(), MqttError> {
        let remaining_length = self.read_remaining_length()? as usize;
        let mut body = vec![0u8; remaining_length];
        let n = self.transport.read(&mut body, true)?;
        if n != remaining_length {
            return Err(MqttError::RxData(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "stream closed mid-packet",
            )));
        }

        let packet_type = PacketType::from_first_byte(first_byte);
        match packet_type {
            Some(PacketType::Connack) => Err(MqttError::UnexpectedAck(AckContext::Connect)),
            Some(PacketType::Publish) => self.handle_publish(first_byte, &body),
            Some(PacketType::Puback) => self.handle_puback(&body),
            Some(PacketType::Suback) => self.handle_suback(&body),
            Some(PacketType::Unsuback) => self.handle_unsuback(&body),
            Some(PacketType::Pingreq) => self.transport.write_all(&packet::pingresp::PACKET),
            Some(PacketType::Pingresp) => {
                self.last_ping_at = self.clock.now_seconds();
                Ok(())
            }
            _ => {
                self.logger.debug(
                    "ignoring unsupported or malformed packet type",
                    &LogContext::new().with("first_byte", format!("{first_byte:#04x}")),
                );
                Ok(())
            }
        }
    }

    fn handle_publish(&mut self, first_byte: u8, body: &[u8]) -> Result<(), MqttError> {
        let publish = packet::publish::decode(first_byte, body).map_err(|_| {
            MqttError::RxData(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                "malformed PUBLISH",
            ))
        })?;
        self.store
            .dispatch_matching(&publish.topic, &publish.payload);

        // QoS 1 inbound publishes are acknowledged; QoS 2 is out of scope.
        if publish.qos == Qos::AtLeastOnce {
            if let Some(id) = publish.packet_id {
                self.transport.write_all(&puback::encode(id))?;
            }
        }
        Ok(())
    }

    fn handle_puback(&mut self, body: &[u8]) -> Result<(), MqttError> {
        let message_id = puback::decode(body).ok_or_else(|| {
            MqttError::RxData(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                "malformed PUBACK",
            ))
        })?;
        if !self.store.remove_pending_publish(message_id) {
            return Err(MqttError::UnexpectedAck(AckContext::Publish));
        }
        self.packet_ids.deallocate(message_id);
        Ok(())
    }

    fn handle_suback(&mut self, body: &[u8]) -> Result<(), MqttError> {
        let suback = suback::decode(body).ok_or_else(|| {
            MqttError::RxData(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                "malformed SUBACK",
            ))
        })?;
        let expected = self
            .store
            .subscription_count_for_message_id(suback.packet_id);
        if expected != suback.return_codes.len() {
            return Err(MqttError::UnexpectedAck(AckContext::Subscribe));
        }
        for &code in &suback.return_codes {
            self.store.set_acknowledged_qos(suback.packet_id, code);
        }
        Ok(())
    }

    fn handle_unsuback(&mut self, body: &[u8]) -> Result<(), MqttError> {
        let message_id = unsuback::decode(body).ok_or_else(|| {
            MqttError::RxData(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                "malformed UNSUBACK",
            ))
        })?;
        if !self.store.remove_pending_unsubscribe(message_id) {
            // The source reuses the Publish tag for this exchange; preserved here.
            return Err(MqttError::UnexpectedAck(AckContext::Publish));
        }
        self.packet_ids.deallocate(message_id);
        Ok(())
    }

    fn run_periodic_tasks(&mut self) -> Result<(), MqttError> {
        let now = self.clock.now_seconds();

        if now.saturating_sub(self.last_ping_at) > *self.settings.keep_alive_seconds() as u64 {
            self.ping()?;
        }

        if now != self.last_sweep_at {
            self.last_sweep_at = now;
            self.resend_pending_publishes(now)?;
            self.resend_pending_unsubscribes(now)?;
        }
        Ok(())
    }

    fn resend_pending_publishes(&mut self, now: u64) -> Result<(), MqttError> {
        let threshold = now.saturating_sub(*self.settings.resend_timeout_seconds());
        for pending in self.store.pending_publishes_last_sent_before(threshold) {
            let packet = packet::publish::encode(
                &pending.topic,
                &pending.payload,
                pending.qos,
                pending.retain,
                true,
                Some(pending.message_id),
            );
            self.transport.write_all(&packet)?;
            self.store.mark_publish_resent(pending.message_id, now);
        }
        Ok(())
    }

    fn resend_pending_unsubscribes(&mut self, now: u64) -> Result<(), MqttError> {
        let threshold = now.saturating_sub(*self.settings.resend_timeout_seconds());
        for pending in self.store.pending_unsubscribes_last_sent_before(threshold) {
            let packet = packet::unsubscribe::encode(pending.message_id, &pending.topic_filter, true);
            self.transport.write_all(&packet)?;
            self.store.mark_unsubscribe_resent(pending.message_id, now);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mqtt::connection::store::{PendingPublish, PendingUnsubscribe, Subscription};
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    /// An in-memory transport that plays back a fixed inbound byte stream and
    /// records every outbound write, so the event loop can be exercised
    /// without a real socket.
    struct FakeTransport {
        inbound: VecDeque<u8>,
        pub writes: Rc<RefCell<Vec<Vec<u8>>>>,
    }

    impl FakeTransport {
        fn new(inbound: Vec<u8>) -> Self {
            Self {
                inbound: inbound.into(),
                writes: Rc::new(RefCell::new(Vec::new())),
            }
        }
    }

    impl Transport for FakeTransport {
        fn write_all(&mut self, bytes: &[u8]) -> Result<(), MqttError> {
            self.writes.borrow_mut().push(bytes.to_vec());
            Ok(())
        }

        fn read(&mut self, buf: &mut [u8], _blocking: bool) -> Result<usize, MqttError> {
            let mut n = 0;
            while n < buf.len() {
                match self.inbound.pop_front() {
                    Some(b) => {
                        buf[n] = b;
                        n += 1;
                    }
                    None => break,
                }
            }
            Ok(n)
        }

        fn set_read_timeout(&mut self, _timeout: Option<Duration>) -> Result<(), MqttError> {
            Ok(())
        }

        fn set_blocking(&mut self, _block_socket: bool) -> Result<(), MqttError> {
            Ok(())
        }

        fn shutdown_write(&mut self) -> Result<(), MqttError> {
            Ok(())
        }
    }

    struct FixedClock(RefCell<u64>);

    impl Clock for FixedClock {
        fn now_seconds(&self) -> u64 {
            *self.0.borrow()
        }
    }

    fn test_client(inbound: Vec<u8>) -> (MqttClient, Rc<RefCell<Vec<Vec<u8>>>>) {
        let transport = FakeTransport::new(inbound);
        let writes = transport.writes.clone();
        let client = MqttClient {
            transport: Box::new(transport),
            client_id: "test".to_string(),
            store: Box::new(InMemoryStore::new()),
            logger: Box::new(crate::logger::NoopLogger),
            clock: Box::new(FixedClock(RefCell::new(0))),
            packet_ids: crate::mqtt::common::value_allocator::ValueAllocator::packet_ids(),
            settings: ConnectionSettings::default(),
            last_ping_at: 0,
            last_sweep_at: 0,
        };
        (client, writes)
    }

    #[test]
    fn step_dispatches_inbound_publish_to_matching_subscription() {
        let (mut client, _writes) = test_client(vec![
            0x30, 0x07, 0x00, 0x03, b't', b'/', b'1', b'H', b'i',
        ]);
        let seen = Rc::new(RefCell::new(None));
        let seen_clone = seen.clone();
        client
            .store
            .add_subscription("t/1", Qos::AtMostOnce, 1, Box::new(move |topic, payload| {
                *seen_clone.borrow_mut() = Some((topic.to_string(), payload.to_vec()));
            }));

        let outcome = client.step().unwrap();
        assert_eq!(outcome, StepOutcome::DidWork);
        let seen = seen.borrow();
        assert_eq!(seen.as_ref().unwrap().0, "t/1");
        assert_eq!(seen.as_ref().unwrap().1, b"Hi");
    }

    #[test]
    fn step_removes_pending_publish_on_matching_puback() {
        let (mut client, _writes) = test_client(vec![0x40, 0x02, 0x00, 0x05]);
        client.store.add_pending_publish(5, "a", b"x", Qos::AtLeastOnce, false, 0);
        client.packet_ids.deallocate(5); // pretend 5 was already handed out
        let _ = client.packet_ids.allocate(); // re-occupy a slot so dealloc below is meaningful
        client.step().unwrap();
        assert_eq!(client.store.pending_publishes_last_sent_before(100).len(), 0);
    }

    #[test]
    fn unmatched_puback_is_unexpected_ack() {
        let (mut client, _writes) = test_client(vec![0x40, 0x02, 0x00, 0x09]);
        let err = client.step().unwrap_err();
        assert!(matches!(err, MqttError::UnexpectedAck(AckContext::Publish)));
    }

    #[test]
    fn idle_step_returns_idle_with_empty_stream() {
        let (mut client, _writes) = test_client(vec![]);
        assert_eq!(client.step().unwrap(), StepOutcome::Idle);
    }

    #[allow(dead_code)]
    fn silence_unused_import_warnings(
        _p: Option<PendingPublish>,
        _u: Option<PendingUnsubscribe>,
        _s: Option<Subscription>,
    ) {
    }
}
