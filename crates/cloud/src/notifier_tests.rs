// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use sg_core::{Event, EventBody, EventType};
use chrono::Utc;

fn event(event_type: EventType) -> Event {
    Event::new(event_type, Utc::now(), EventBody::empty())
}

#[tokio::test]
async fn subscriber_receives_events_for_its_key() {
    let notifier = Notifier::new();
    let (_id, mut rx) = notifier.subscribe("W023");

    notifier.notify("W023", event(EventType::GoalAdded));

    let received = rx.recv().await.unwrap();
    assert_eq!(received.event_type, EventType::GoalAdded);
}

#[tokio::test]
async fn subscriber_does_not_receive_events_for_other_keys() {
    let notifier = Notifier::new();
    let (_id, mut rx) = notifier.subscribe("W023");

    notifier.notify("W099", event(EventType::GoalAdded));

    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn unsubscribe_stops_delivery() {
    let notifier = Notifier::new();
    let (id, mut rx) = notifier.subscribe("W023");
    notifier.unsubscribe(id);

    notifier.notify("W023", event(EventType::GoalAdded));

    assert!(rx.try_recv().is_err());
    assert_eq!(notifier.dropped_count(id), None);
}

#[tokio::test]
async fn multiple_subscribers_on_same_key_each_receive() {
    let notifier = Notifier::new();
    let (_id1, mut rx1) = notifier.subscribe("W023");
    let (_id2, mut rx2) = notifier.subscribe("W023");

    notifier.notify("W023", event(EventType::GoalUpdated));

    assert!(rx1.try_recv().is_ok());
    assert!(rx2.try_recv().is_ok());
}

#[tokio::test]
async fn full_sink_increments_dropped_count_without_blocking() {
    let notifier = Notifier::new();
    let (id, mut rx) = notifier.subscribe("W023");

    for _ in 0..(DEFAULT_CHANNEL_CAPACITY + 5) {
        notifier.notify("W023", event(EventType::GoalUpdated));
    }

    assert!(notifier.dropped_count(id).unwrap() > 0);
    // Draining still yields the events that did make it through.
    assert!(rx.try_recv().is_ok());
}

#[tokio::test]
async fn dropped_count_is_none_for_unknown_subscription() {
    let notifier = Notifier::new();
    let (id, _rx) = notifier.subscribe("W023");
    notifier.unsubscribe(id);
    assert_eq!(notifier.dropped_count(id), None);
}
