//! In process fan out of game events to every subscribed observer.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Mutex, PoisonError};

use serde::Serialize;

/// A state change worth telling observers about, with its complete payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    pub name: &'static str,
    pub payload: serde_json::Value,
}

impl Event {
    pub const MOVE_MADE: &'static str = "move_made";
    pub const MOVE_UNDONE: &'static str = "move_undone";
    pub const GAME_RESET: &'static str = "game_reset";

    /// Serializes `payload` into a new event.
    pub fn new<T: Serialize>(name: &'static str, payload: &T) -> serde_json::Result<Self> {
        Ok(Self {
            name,
            payload: serde_json::to_value(payload)?,
        })
    }
}

/// Hub holds one sender per subscriber.
/// Subscribers that hang up are dropped on the next publish.
#[derive(Debug, Default)]
pub struct Hub {
    subscribers: Mutex<Vec<Sender<Event>>>,
}

impl Hub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self) -> Receiver<Event> {
        let (sender, receiver) = mpsc::channel();
        self.lock().push(sender);
        receiver
    }

    /// Sends `event` to every live subscriber, returning how many received it.
    pub fn publish(&self, event: Event) -> usize {
        let mut subscribers = self.lock();
        subscribers.retain(|subscriber| subscriber.send(event.clone()).is_ok());
        log::trace!("published {} to {} subscribers", event.name, subscribers.len());
        subscribers.len()
    }

    pub fn subscriber_count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Sender<Event>>> {
        self.subscribers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn every_subscriber_receives_events() {
        let hub = Hub::new();
        let first = hub.subscribe();
        let second = hub.subscribe();

        let event = Event::new(Event::MOVE_MADE, &json!({ "message": "e4" })).unwrap();
        assert_eq!(hub.publish(event.clone()), 2);
        assert_eq!(first.recv().unwrap(), event);
        assert_eq!(second.recv().unwrap(), event);
    }

    #[test]
    fn hung_up_subscribers_are_dropped() {
        let hub = Hub::new();
        let kept = hub.subscribe();
        drop(hub.subscribe());

        let event = Event::new(Event::GAME_RESET, &json!({ "success": true })).unwrap();
        assert_eq!(hub.publish(event), 1);
        assert_eq!(hub.subscriber_count(), 1);
        assert_eq!(kept.try_recv().unwrap().name, "game_reset");
    }
}
