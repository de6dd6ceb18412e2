use crate::events::event::Event;
use crate::events::sink::EventSink;

/// Handle returned by [`EventBus::subscribe`], used to unregister.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Registry of event subscribers with explicit registration and
/// unregistration.
///
/// Dispatch fans each event out to every subscriber in registration
/// order. An empty bus is a valid no-op target.
#[derive(Default)]
pub struct EventBus {
    subscribers: Vec<(SubscriptionId, Box<dyn EventSink>)>,
    next_id: u64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, sink: Box<dyn EventSink>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, sink));
        id
    }

    /// Removes a subscriber. Returns `false` if the id was never
    /// registered or was already removed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    pub fn dispatch(&mut self, events: &[Event]) {
        for event in events {
            for (_, sink) in &mut self.subscribers {
                sink.on_event(event);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::event::EyeState;
    use std::sync::{Arc, Mutex};

    struct RecordingSink {
        seen: Arc<Mutex<Vec<Event>>>,
    }

    impl EventSink for RecordingSink {
        fn on_event(&mut self, event: &Event) {
            self.seen.lock().unwrap().push(*event);
        }
    }

    fn recording_pair() -> (Box<RecordingSink>, Arc<Mutex<Vec<Event>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        (
            Box::new(RecordingSink { seen: seen.clone() }),
            seen,
        )
    }

    #[test]
    fn test_dispatch_reaches_all_subscribers() {
        let mut bus = EventBus::new();
        let (a, seen_a) = recording_pair();
        let (b, seen_b) = recording_pair();
        bus.subscribe(a);
        bus.subscribe(b);

        bus.dispatch(&[Event::HeadLost]);

        assert_eq!(seen_a.lock().unwrap().len(), 1);
        assert_eq!(seen_b.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_dispatch_preserves_event_order() {
        let mut bus = EventBus::new();
        let (sink, seen) = recording_pair();
        bus.subscribe(sink);

        let events = [
            Event::HeadDetected { x: 1.0, y: 1.0 },
            Event::EyeStateChanged(EyeState::Open),
        ];
        bus.dispatch(&events);

        assert_eq!(*seen.lock().unwrap(), events.to_vec());
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let mut bus = EventBus::new();
        let (sink, seen) = recording_pair();
        let id = bus.subscribe(sink);

        assert!(bus.unsubscribe(id));
        bus.dispatch(&[Event::HeadLost]);

        assert!(seen.lock().unwrap().is_empty());
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn test_unsubscribe_unknown_id_returns_false() {
        let mut bus = EventBus::new();
        let (sink, _) = recording_pair();
        let id = bus.subscribe(sink);
        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
    }

    #[test]
    fn test_dispatch_on_empty_bus_is_noop() {
        let mut bus = EventBus::new();
        bus.dispatch(&[Event::HeadLost]);
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn test_ids_are_unique_across_subscriptions() {
        let mut bus = EventBus::new();
        let (a, _) = recording_pair();
        let (b, _) = recording_pair();
        let id_a = bus.subscribe(a);
        let id_b = bus.subscribe(b);
        assert_ne!(id_a, id_b);
    }
}
