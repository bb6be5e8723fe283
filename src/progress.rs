//! Progress bus: per-scan synchronous, ordered, non-buffering subscriber
//! fan-out (§4.7, §9). Deliberately not channel-based — a channel would
//! buffer events for a subscriber that's fallen behind, and a late
//! subscriber must see nothing rather than a backlog.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::model::ProgressEvent;

pub type SubscriberId = u64;
type Callback = Box<dyn Fn(&ProgressEvent) + Send + Sync>;

pub struct ProgressBus {
    next_id: AtomicU64,
    subscribers: Mutex<Vec<(SubscriberId, Callback)>>,
}

impl ProgressBus {
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            next_id: AtomicU64::new(0),
            subscribers: Mutex::new(Vec::new()),
        })
    }

    /// Attaches `callback`; returns an id that can be passed to
    /// [`Self::unsubscribe`]. Idempotent: unsubscribing twice is a no-op.
    pub fn subscribe(&self, callback: impl Fn(&ProgressEvent) + Send + Sync + 'static) -> SubscriberId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.subscribers.lock().push((id, Box::new(callback)));
        id
    }

    pub fn unsubscribe(&self, id: SubscriberId) {
        self.subscribers.lock().retain(|(existing, _)| *existing != id);
    }

    /// Invokes every current subscriber synchronously, in subscription
    /// order. A subscriber removed concurrently with this call either sees
    /// the event or doesn't, but never sees an event pushed after its
    /// removal completed.
    pub fn publish(&self, event: ProgressEvent) {
        let subscribers = self.subscribers.lock();
        for (_, callback) in subscribers.iter() {
            callback(&event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn delivers_in_subscription_order() {
        let bus = ProgressBus::new();
        let order = Arc::new(Mutex::new(Vec::new()));
        let o1 = order.clone();
        bus.subscribe(move |_| o1.lock().push(1));
        let o2 = order.clone();
        bus.subscribe(move |_| o2.lock().push(2));

        bus.publish(ProgressEvent::new("crawling", "go", 0));
        assert_eq!(*order.lock(), vec![1, 2]);
    }

    #[test]
    fn unsubscribed_listener_receives_nothing_further() {
        let bus = ProgressBus::new();
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        let id = bus.subscribe(move |_| { c.fetch_add(1, Ordering::Relaxed); });

        bus.publish(ProgressEvent::new("crawling", "go", 0));
        bus.unsubscribe(id);
        bus.publish(ProgressEvent::new("crawling", "go again", 10));

        assert_eq!(count.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn unsubscribe_is_idempotent() {
        let bus = ProgressBus::new();
        let id = bus.subscribe(|_| {});
        bus.unsubscribe(id);
        bus.unsubscribe(id);
    }
}
