//! Subscriber-side handles over broadcast channels.

use std::sync::Arc;

use tokio::sync::mpsc;

use super::broadcaster::{Broadcaster, SubscriptionId};
use crate::types::{ChangeEvent, MessageId, Topic};

/// A live event stream registered on the [`Broadcaster`].
///
/// Yields events in publish order for the subscription's lifetime. Dropping
/// the handle deregisters the subscriber, so a disconnected consumer stops
/// receiving deliveries promptly.
pub struct Subscription {
    id: SubscriptionId,
    topic: Topic,
    receiver: mpsc::UnboundedReceiver<ChangeEvent>,
    broadcaster: Arc<Broadcaster>,
}

impl Subscription {
    pub(super) fn new(
        id: SubscriptionId,
        topic: Topic,
        receiver: mpsc::UnboundedReceiver<ChangeEvent>,
        broadcaster: Arc<Broadcaster>,
    ) -> Self {
        Self {
            id,
            topic,
            receiver,
            broadcaster,
        }
    }

    /// This subscription's id.
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// The topic this subscription is registered on.
    pub fn topic(&self) -> Topic {
        self.topic
    }

    /// Wait for the next event.
    ///
    /// Returns `None` once the hub has been closed and the channel drained.
    pub async fn recv(&mut self) -> Option<ChangeEvent> {
        self.receiver.recv().await
    }

    /// Take the next already-delivered event without waiting.
    pub fn try_recv(&mut self) -> Option<ChangeEvent> {
        self.receiver.try_recv().ok()
    }

    /// Narrow this stream with a predicate.
    ///
    /// Events failing the predicate are consumed and discarded; they still
    /// advance the subscriber's position and are never replayed.
    pub fn filtered<F>(self, predicate: F) -> FilteredSubscription<F>
    where
        F: Fn(&ChangeEvent) -> bool,
    {
        FilteredSubscription {
            inner: self,
            predicate,
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.broadcaster.unsubscribe(self.id);
    }
}

/// A predicate-narrowed view over a [`Subscription`].
///
/// This is a wrapping consumer loop, not a separate registration: the
/// underlying subscription receives every event on its topic and the
/// non-matching ones are dropped here.
pub struct FilteredSubscription<F> {
    inner: Subscription,
    predicate: F,
}

impl<F> FilteredSubscription<F>
where
    F: Fn(&ChangeEvent) -> bool,
{
    /// Wait for the next event matching the predicate.
    pub async fn recv(&mut self) -> Option<ChangeEvent> {
        while let Some(event) = self.inner.recv().await {
            if (self.predicate)(&event) {
                return Some(event);
            }
        }
        None
    }

    /// Take the next already-delivered matching event without waiting.
    pub fn try_recv(&mut self) -> Option<ChangeEvent> {
        while let Some(event) = self.inner.try_recv() {
            if (self.predicate)(&event) {
                return Some(event);
            }
        }
        None
    }

    /// The wrapped subscription's id.
    pub fn id(&self) -> SubscriptionId {
        self.inner.id()
    }
}

/// Predicate for "updates to message X" subscriptions.
///
/// Purely numeric: callers convert any textual id argument to [`MessageId`]
/// before subscribing, so a type mismatch is rejected at the boundary
/// instead of silently matching nothing.
pub fn matches_message_id(event: &ChangeEvent, id: MessageId) -> bool {
    event.message.id == id
}
