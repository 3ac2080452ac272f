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

use super::matcher::filter_matches_topic;
use crate::mqtt::packet::Qos;
use indexmap::IndexMap;

/// A QoS >= 1 publish awaiting its PUBACK.
#[derive(Debug, Clone)]
pub struct PendingPublish {
    pub message_id: u16,
    pub topic: String,
    pub payload: Vec<u8>,
    pub qos: Qos,
    pub retain: bool,
    pub last_sent_at: u64,
    pub sending_attempts: u32,
}

/// An UNSUBSCRIBE awaiting its UNSUBACK.
#[derive(Debug, Clone)]
pub struct PendingUnsubscribe {
    pub message_id: u16,
    pub topic_filter: String,
    pub last_sent_at: u64,
    pub sending_attempts: u32,
}

/// A registered topic subscription. `handler` is invoked synchronously from
/// the event loop for every inbound PUBLISH whose topic matches `topic_filter`.
pub struct Subscription {
    pub topic_filter: String,
    pub qos: Qos,
    pub message_id: u16,
    pub acknowledged_qos: Option<u8>,
    pub handler: Box<dyn FnMut(&str, &[u8]) + Send>,
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("topic_filter", &self.topic_filter)
            .field("qos", &self.qos)
            .field("message_id", &self.message_id)
            .field("acknowledged_qos", &self.acknowledged_qos)
            .finish()
    }
}

/// The session-state collaborator: pending publishes/unsubscribes keyed by
/// message id, plus the list of live subscriptions. Consulted and mutated
/// only from the client's own thread.
pub trait SessionStore {
    fn add_pending_publish(
        &mut self,
        message_id: u16,
        topic: &str,
        payload: &[u8],
        qos: Qos,
        retain: bool,
        now: u64,
    );
    fn remove_pending_publish(&mut self, message_id: u16) -> bool;
    fn pending_publishes_last_sent_before(&self, threshold: u64) -> Vec<PendingPublish>;
    fn mark_publish_resent(&mut self, message_id: u16, now: u64);

    fn add_pending_unsubscribe(&mut self, message_id: u16, topic_filter: &str, now: u64);
    fn remove_pending_unsubscribe(&mut self, message_id: u16) -> bool;
    fn pending_unsubscribes_last_sent_before(&self, threshold: u64) -> Vec<PendingUnsubscribe>;
    fn mark_unsubscribe_resent(&mut self, message_id: u16, now: u64);

    fn add_subscription(
        &mut self,
        topic_filter: &str,
        qos: Qos,
        message_id: u16,
        handler: Box<dyn FnMut(&str, &[u8]) + Send>,
    );
    fn set_acknowledged_qos(&mut self, message_id: u16, qos: u8) -> usize;
    fn subscription_count_for_message_id(&self, message_id: u16) -> usize;
    fn dispatch_matching(&mut self, topic: &str, payload: &[u8]);
}

/// The default [`SessionStore`]: a pair of insertion-ordered maps keyed by
/// message id, plus a `Vec` of subscriptions, mirroring the teacher's
/// `IndexMap`-backed packet store.
#[derive(Default)]
pub struct InMemoryStore {
    pending_publishes: IndexMap<u16, PendingPublish>,
    pending_unsubscribes: IndexMap<u16, PendingUnsubscribe>,
    subscriptions: Vec<Subscription>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for InMemoryStore {
    fn add_pending_publish(
        &mut self,
        message_id: u16,
        topic: &str,
        payload: &[u8],
        qos: Qos,
        retain: bool,
        now: u64,
    ) {
        self.pending_publishes.insert(
            message_id,
            PendingPublish {
                message_id,
                topic: topic.to_string(),
                payload: payload.to_vec(),
                qos,
                retain,
                last_sent_at: now,
                sending_attempts: 1,
            },
        );
    }

    fn remove_pending_publish(&mut self, message_id: u16) -> bool {
        self.pending_publishes.shift_remove(&message_id).is_some()
    }

    fn pending_publishes_last_sent_before(&self, threshold: u64) -> Vec<PendingPublish> {
        self.pending_publishes
            .values()
            .filter(|p| p.last_sent_at < threshold)
            .cloned()
            .collect()
    }

    fn mark_publish_resent(&mut self, message_id: u16, now: u64) {
        if let Some(p) = self.pending_publishes.get_mut(&message_id) {
            p.last_sent_at = now;
            p.sending_attempts += 1;
        }
    }

    fn add_pending_unsubscribe(&mut self, message_id: u16, topic_filter: &str, now: u64) {
        self.pending_unsubscribes.insert(
            message_id,
            PendingUnsubscribe {
                message_id,
                topic_filter: topic_filter.to_string(),
                last_sent_at: now,
                sending_attempts: 1,
            },
        );
    }

    fn remove_pending_unsubscribe(&mut self, message_id: u16) -> bool {
        self.pending_unsubscribes.shift_remove(&message_id).is_some()
    }

    fn pending_unsubscribes_last_sent_before(&self, threshold: u64) -> Vec<PendingUnsubscribe> {
        self.pending_unsubscribes
            .values()
            .filter(|u| u.last_sent_at < threshold)
            .cloned()
            .collect()
    }

    fn mark_unsubscribe_resent(&mut self, message_id: u16, now: u64) {
        if let Some(u) = self.pending_unsubscribes.get_mut(&message_id) {
            u.last_sent_at = now;
            u.sending_attempts += 1;
        }
    }

    fn add_subscription(
        &mut self,
        topic_filter: &str,
        qos: Qos,
        message_id: u16,
        handler: Box<dyn FnMut(&str, &[u8]) + Send>,
    ) {
        self.subscriptions.push(Subscription {
            topic_filter: topic_filter.to_string(),
            qos,
            message_id,
            acknowledged_qos: None,
            handler,
        });
    }

    fn set_acknowledged_qos(&mut self, message_id: u16, qos: u8) -> usize {
        let mut count = 0;
        for sub in self.subscriptions.iter_mut() {
            if sub.message_id == message_id {
                sub.acknowledged_qos = Some(qos);
                count += 1;
            }
        }
        count
    }

    fn subscription_count_for_message_id(&self, message_id: u16) -> usize {
        self.subscriptions
            .iter()
            .filter(|s| s.message_id == message_id)
            .count()
    }

    fn dispatch_matching(&mut self, topic: &str, payload: &[u8]) {
        for sub in self.subscriptions.iter_mut() {
            if filter_matches_topic(&sub.topic_filter, topic) {
                (sub.handler)(topic, payload);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_publish_round_trips() {
        let mut store = InMemoryStore::new();
        store.add_pending_publish(1, "a/b", b"x", Qos::AtLeastOnce, false, 0);
        assert_eq!(store.pending_publishes_last_sent_before(1).len(), 1);
        assert!(store.remove_pending_publish(1));
        assert!(!store.remove_pending_publish(1));
    }

    #[test]
    fn resend_bumps_attempts_and_timestamp() {
        let mut store = InMemoryStore::new();
        store.add_pending_publish(1, "a/b", b"x", Qos::AtLeastOnce, false, 0);
        store.mark_publish_resent(1, 100);
        let pending = store.pending_publishes_last_sent_before(200);
        assert_eq!(pending[0].last_sent_at, 100);
        assert_eq!(pending[0].sending_attempts, 2);
    }

    #[test]
    fn dispatch_invokes_matching_subscription_handler() {
        use std::sync::{Arc, Mutex};
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();
        let mut store = InMemoryStore::new();
        store.add_subscription(
            "sensors/+/temp",
            Qos::AtMostOnce,
            1,
            Box::new(move |topic, payload| {
                seen_clone
                    .lock()
                    .unwrap()
                    .push((topic.to_string(), payload.to_vec()));
            }),
        );
        store.dispatch_matching("sensors/room1/temp", b"21");
        store.dispatch_matching("sensors/room1/hum", b"50");
        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, "sensors/room1/temp");
    }
}
