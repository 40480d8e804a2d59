//! Long-tail update bus: per-topic broadcast channels keyed by the parent
//! keyword. Slow subscribers lag and drop updates rather than back-pressure
//! the analysis.

use crate::types::LongTailUpdate;
use parking_lot::Mutex;
use std::collections::HashMap;
use tokio::sync::broadcast;

const TOPIC_CAPACITY: usize = 64;

#[derive(Default)]
pub struct LongTailBus {
    topics: Mutex<HashMap<String, broadcast::Sender<LongTailUpdate>>>,
}

impl LongTailBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to updates for a parent keyword.
    pub fn subscribe(&self, topic: &str) -> broadcast::Receiver<LongTailUpdate> {
        let mut topics = self.topics.lock();
        topics
            .entry(topic.to_string())
            .or_insert_with(|| broadcast::channel(TOPIC_CAPACITY).0)
            .subscribe()
    }

    /// Publish an update; a topic nobody subscribed to drops it. Returns
    /// the number of subscribers reached.
    pub fn publish(&self, topic: &str, update: LongTailUpdate) -> usize {
        let topics = self.topics.lock();
        match topics.get(topic) {
            Some(sender) => sender.send(update).unwrap_or(0),
            None => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn update(parent: &str, analysed: usize) -> LongTailUpdate {
        LongTailUpdate {
            parent_keyword: parent.to_string(),
            analysed_count: analysed,
            ..LongTailUpdate::default()
        }
    }

    #[tokio::test]
    async fn topics_are_independent() {
        let bus = LongTailBus::new();
        let mut rust = bus.subscribe("rust");
        let mut go = bus.subscribe("go");

        bus.publish("rust", update("rust", 1));
        assert_eq!(rust.recv().await.unwrap().parent_keyword, "rust");
        assert!(go.try_recv().is_err());
    }

    #[test]
    fn publishing_without_subscribers_is_a_no_op() {
        let bus = LongTailBus::new();
        assert_eq!(bus.publish("nobody", update("nobody", 1)), 0);
    }

    #[tokio::test]
    async fn lagged_subscribers_drop_rather_than_block() {
        let bus = LongTailBus::new();
        let mut rx = bus.subscribe("rust");
        for i in 0..(TOPIC_CAPACITY + 8) {
            bus.publish("rust", update("rust", i));
        }
        // The first receive reports the lag; later updates still arrive.
        assert!(matches!(
            rx.recv().await,
            Err(broadcast::error::RecvError::Lagged(_))
        ));
        assert!(rx.recv().await.is_ok());
    }
}
