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

//! # mqtt-client-core
//!
//! A single-threaded, cooperative MQTT 3.1.1 client.
//!
//! This crate owns one TCP (or TLS) byte stream and drives it through a
//! hand-rolled packet codec and session state machine: it publishes
//! application messages, subscribes to topic filters (including `+`/`#`
//! wildcards), delivers matching inbound publishes to application-supplied
//! handlers, and keeps the connection alive with periodic PINGREQ packets.
//! There are no background threads and no async runtime: all progress
//! happens on the thread that calls [`mqtt::client::MqttClient::run`] (or
//! drives [`mqtt::client::MqttClient::step`] itself).
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use mqtt_client_core::mqtt::client::MqttClient;
//! use mqtt_client_core::mqtt::connection::settings::ConnectionSettingsBuilder;
//! use mqtt_client_core::mqtt::packet::qos::Qos;
//!
//! # fn main() -> Result<(), mqtt_client_core::error::MqttError> {
//! let mut client = MqttClient::new("localhost", 1883, None, None, None, None)?;
//! let settings = ConnectionSettingsBuilder::default().build().unwrap();
//! client.connect(None, None, settings, true)?;
//!
//! client.subscribe(
//!     "sensors/+/temperature",
//!     Qos::AtLeastOnce,
//!     Box::new(|topic, payload| {
//!         println!("{topic}: {} bytes", payload.len());
//!     }),
//! )?;
//!
//! client.publish("sensors/room1/temperature", b"21.5", Qos::AtMostOnce, false)?;
//! client.run(true)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`transport`] - the byte transport: blocking/non-blocking reads and
//!   writes on a connected TCP or TLS stream.
//! - [`mqtt::packet`] - the wire codec: remaining-length VarInt, length-prefixed
//!   strings, and the CONNECT/PUBLISH/SUBSCRIBE/... packet builders and
//!   parsers.
//! - [`mqtt::connection`] - the session store, connection settings, and the
//!   topic-filter wildcard matcher.
//! - [`mqtt::client`] - the connection handshake, the operation surface
//!   (`publish`/`subscribe`/`unsubscribe`/`ping`/`disconnect`), and the event
//!   loop.
//! - [`logger`], [`clock`], [`client_id`] - the collaborator capabilities the
//!   core consumes rather than owning directly.
//!
//! ## Non-goals
//!
//! MQTT 5.0 properties, broker-side behavior, shared subscriptions, QoS 2
//! exactly-once delivery, automatic reconnect, TLS certificate *management*
//! (this crate accepts a pre-built CA bundle, nothing more), clustering,
//! persistence across process restarts, and message queueing beyond the
//! in-flight retransmit set.

pub mod clock;
pub mod client_id;
pub mod error;
pub mod logger;
pub mod mqtt;
pub mod transport;

pub use error::MqttError;
