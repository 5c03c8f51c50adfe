//! Broadcast hub for publishing events to subscriber channels.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::mpsc;

use super::subscription::Subscription;
use crate::types::{ChangeEvent, Message, Topic};

/// Identifier for an active subscription.
pub type SubscriptionId = u64;

/// Delivery state for one subscriber.
struct SubscriberEntry {
    topic: Topic,
    sender: mpsc::UnboundedSender<ChangeEvent>,
}

/// Process-wide publish/subscribe hub.
///
/// Constructed explicitly (no global state) and shared via `Arc` between
/// the mutation pipeline and the front-ends. Publishing is non-blocking:
/// events go into each subscriber's unbounded channel, and an event
/// published while no subscriber is registered on its topic is discarded.
pub struct Broadcaster {
    /// Active subscribers keyed by subscription id.
    subscribers: RwLock<HashMap<SubscriptionId, SubscriberEntry>>,
    /// Index of subscription ids by topic.
    topic_index: RwLock<HashMap<Topic, Vec<SubscriptionId>>>,
    /// Next subscription id.
    next_id: AtomicU64,
}

impl Broadcaster {
    /// Create a new hub with no subscribers.
    pub fn new() -> Self {
        Self {
            subscribers: RwLock::new(HashMap::new()),
            topic_index: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Register a new subscriber on a topic.
    ///
    /// Takes the shared handle so the returned [`Subscription`] can
    /// deregister itself on drop. It yields events published from this
    /// point forward; earlier events are not replayed.
    pub fn subscribe(self: Arc<Self>, topic: Topic) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let (sender, receiver) = mpsc::unbounded_channel();

        self.subscribers
            .write()
            .insert(id, SubscriberEntry { topic, sender });
        self.topic_index.write().entry(topic).or_default().push(id);

        tracing::debug!(subscription_id = id, ?topic, "subscription created");

        Subscription::new(id, topic, receiver, self)
    }

    /// Remove a subscriber and its topic-index slot.
    ///
    /// Unknown ids are ignored, so dropping a subscription after `close`
    /// is harmless.
    pub fn unsubscribe(&self, id: SubscriptionId) {
        let entry = self.subscribers.write().remove(&id);
        let Some(entry) = entry else { return };

        let mut index = self.topic_index.write();
        if let Some(ids) = index.get_mut(&entry.topic) {
            ids.retain(|&s| s != id);
            if ids.is_empty() {
                index.remove(&entry.topic);
            }
        }

        tracing::debug!(subscription_id = id, topic = ?entry.topic, "subscription removed");
    }

    /// Deliver an event to every subscriber currently registered on `topic`.
    ///
    /// Subscribers whose receiving half is gone are pruned here, so an
    /// abandoned registration never outlives the next publish on its topic.
    pub fn publish(&self, topic: Topic, message: &Message) {
        let ids = self.topic_index.read().get(&topic).cloned();
        let Some(ids) = ids else {
            return; // No subscribers for this topic.
        };

        let mut dead = Vec::new();
        {
            let subscribers = self.subscribers.read();
            for id in ids {
                if let Some(entry) = subscribers.get(&id) {
                    let event = ChangeEvent {
                        topic,
                        message: message.clone(),
                    };
                    if entry.sender.send(event).is_err() {
                        dead.push(id);
                    }
                }
            }
        }

        for id in dead {
            self.unsubscribe(id);
        }

        tracing::trace!(?topic, message_id = message.id, "published change event");
    }

    /// Number of active subscriptions across all topics.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.read().len()
    }

    /// Tear down every subscription, ending all subscriber streams.
    ///
    /// Live [`Subscription::recv`](super::Subscription::recv) calls return
    /// `None` once their channel drains. Used for clean shutdown.
    pub fn close(&self) {
        let ids: Vec<SubscriptionId> = self.subscribers.read().keys().copied().collect();
        for id in ids {
            self.unsubscribe(id);
        }
        tracing::debug!("broadcaster closed");
    }
}

impl Default for Broadcaster {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(id: u64) -> Message {
        Message {
            id,
            content: format!("m{}", id),
            word: None,
        }
    }

    #[tokio::test]
    async fn test_subscribe_receives_published_event() {
        let hub = Arc::new(Broadcaster::new());
        let mut sub = hub.clone().subscribe(Topic::MessageAdded);

        hub.publish(Topic::MessageAdded, &message(1));

        let event = sub.recv().await.unwrap();
        assert_eq!(event.topic, Topic::MessageAdded);
        assert_eq!(event.message, message(1));
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_is_discarded() {
        let hub = Arc::new(Broadcaster::new());
        hub.publish(Topic::MessageAdded, &message(1));

        // A later subscriber must not see the earlier event.
        let mut sub = hub.clone().subscribe(Topic::MessageAdded);
        assert_eq!(sub.try_recv(), None);
    }

    #[tokio::test]
    async fn test_topics_are_independent() {
        let hub = Arc::new(Broadcaster::new());
        let mut added = hub.clone().subscribe(Topic::MessageAdded);
        let mut updated = hub.clone().subscribe(Topic::MessageUpdated);

        hub.publish(Topic::MessageUpdated, &message(7));

        assert_eq!(added.try_recv(), None);
        let event = updated.recv().await.unwrap();
        assert_eq!(event.message.id, 7);
    }

    #[tokio::test]
    async fn test_every_subscriber_gets_its_own_copy() {
        let hub = Arc::new(Broadcaster::new());
        let mut first = hub.clone().subscribe(Topic::MessageAdded);
        let mut second = hub.clone().subscribe(Topic::MessageAdded);

        hub.publish(Topic::MessageAdded, &message(1));

        assert_eq!(first.recv().await.unwrap().message.id, 1);
        assert_eq!(second.recv().await.unwrap().message.id, 1);
    }

    #[tokio::test]
    async fn test_events_arrive_in_publish_order() {
        let hub = Arc::new(Broadcaster::new());
        let mut sub = hub.clone().subscribe(Topic::MessageAdded);

        for id in 1..=5 {
            hub.publish(Topic::MessageAdded, &message(id));
        }

        for id in 1..=5 {
            assert_eq!(sub.recv().await.unwrap().message.id, id);
        }
    }

    #[tokio::test]
    async fn test_drop_deregisters_subscription() {
        let hub = Arc::new(Broadcaster::new());
        let sub = hub.clone().subscribe(Topic::MessageAdded);
        assert_eq!(hub.subscriber_count(), 1);

        drop(sub);
        assert_eq!(hub.subscriber_count(), 0);

        // Publishing afterwards is a no-op, not an error.
        hub.publish(Topic::MessageAdded, &message(1));
    }

    #[tokio::test]
    async fn test_close_ends_subscriber_streams() {
        let hub = Arc::new(Broadcaster::new());
        let mut sub = hub.clone().subscribe(Topic::MessageAdded);

        hub.publish(Topic::MessageAdded, &message(1));
        hub.close();

        // The event already in flight is still delivered, then the
        // stream ends.
        assert_eq!(sub.recv().await.unwrap().message.id, 1);
        assert_eq!(sub.recv().await, None);
        assert_eq!(hub.subscriber_count(), 0);
    }
}
