// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event fan-out to per-node subscribers.
//!
//! Re-architected per the redesign note in spec.md §9: callback-registration
//! channels become an explicit `Subscribe(sink) -> SubscriptionId` capability
//! with non-blocking, per-subscriber bounded delivery and drop accounting,
//! rather than a shared mutable callback list. Grounded on the teacher's
//! `EventBus` fan-out shape (`oj-daemon/src/engine/mod.rs`), generalized from
//! a single in-process bus to a registry keyed by subscription key (node
//! name here).

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use sg_core::Event;
use tokio::sync::mpsc;

use crate::DEFAULT_CHANNEL_CAPACITY;

sg_core::define_id! {
    /// Opaque token returned by [`Notifier::subscribe`], used to unsubscribe
    /// or inspect drop counts later.
    pub struct SubscriptionId("sub-");
}

struct Subscriber {
    key: String,
    sink: mpsc::Sender<Event>,
    dropped: AtomicU64,
}

/// Registry of per-node event subscribers. `notify` delivers non-blockingly:
/// a full sink drops the event for that subscriber only, recording the loss,
/// never blocking other subscribers or the caller.
#[derive(Default)]
pub struct Notifier {
    subscribers: Mutex<HashMap<SubscriptionId, Subscriber>>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new subscriber for `key` (a node name) and returns its
    /// receiving end plus the token used to `unsubscribe` later.
    pub fn subscribe(&self, key: impl Into<String>) -> (SubscriptionId, mpsc::Receiver<Event>) {
        let (tx, rx) = mpsc::channel(DEFAULT_CHANNEL_CAPACITY);
        let id = SubscriptionId::new();
        self.subscribers.lock().insert(
            id,
            Subscriber {
                key: key.into(),
                sink: tx,
                dropped: AtomicU64::new(0),
            },
        );
        (id, rx)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.subscribers.lock().remove(&id);
    }

    /// Delivers `event` to every subscriber registered under `key`.
    /// Per-subscriber order is preserved by `mpsc`'s FIFO guarantee; a full
    /// sink drops the event for that subscriber and increments its counter.
    pub fn notify(&self, key: &str, event: Event) {
        let subscribers = self.subscribers.lock();
        for subscriber in subscribers.values().filter(|s| s.key == key) {
            if subscriber.sink.try_send(event.clone()).is_err() {
                subscriber.dropped.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    /// Number of events dropped for `id` due to sink saturation, or `None`
    /// if `id` is not currently registered.
    pub fn dropped_count(&self, id: SubscriptionId) -> Option<u64> {
        self.subscribers
            .lock()
            .get(&id)
            .map(|s| s.dropped.load(Ordering::Relaxed))
    }
}

#[cfg(test)]
#[path = "notifier_tests.rs"]
mod tests;
