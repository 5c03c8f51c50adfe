//! Mutation executor: the single write path for both front-ends.

use std::sync::Arc;

use crate::error::Error;
use crate::pubsub::Broadcaster;
use crate::store::MessageStore;
use crate::types::{Message, MessageId, Topic};

/// Executes write operations against the store and publishes the result.
///
/// Every front-end routes its writes through this component, so each
/// successful mutation produces exactly one published event system-wide.
/// The store persists before `publish` is called, so a subscriber never
/// observes an event whose underlying state is not yet durable.
pub struct MutationExecutor {
    store: Arc<MessageStore>,
    broadcaster: Arc<Broadcaster>,
}

impl MutationExecutor {
    /// Create an executor over the given store and hub.
    pub fn new(store: Arc<MessageStore>, broadcaster: Arc<Broadcaster>) -> Self {
        Self { store, broadcaster }
    }

    /// Append a message and notify `MessageAdded` subscribers.
    ///
    /// No event is published if the store write fails.
    pub fn create_message(
        &self,
        content: impl Into<String>,
        word: Option<String>,
    ) -> Result<Message, Error> {
        let message = self.store.create(content, word)?;
        self.broadcaster.publish(Topic::MessageAdded, &message);
        Ok(message)
    }

    /// Merge fields into an existing message and notify `MessageUpdated`
    /// subscribers.
    ///
    /// `NotFound` propagates to the caller and no event is published.
    pub fn update_message(
        &self,
        id: MessageId,
        content: Option<String>,
        word: Option<String>,
    ) -> Result<Message, Error> {
        let message = self.store.update(id, content, word)?;
        self.broadcaster.publish(Topic::MessageUpdated, &message);
        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn executor(dir: &tempfile::TempDir) -> (MutationExecutor, Arc<Broadcaster>) {
        let store = Arc::new(MessageStore::open(dir.path().join("messages.json")).unwrap());
        let broadcaster = Arc::new(Broadcaster::new());
        (
            MutationExecutor::new(store, broadcaster.clone()),
            broadcaster,
        )
    }

    #[tokio::test]
    async fn test_create_publishes_exactly_once() {
        let dir = tempfile::tempdir().unwrap();
        let (executor, hub) = executor(&dir);
        let mut added = hub.clone().subscribe(Topic::MessageAdded);
        let mut updated = hub.clone().subscribe(Topic::MessageUpdated);

        let message = executor.create_message("hello", None).unwrap();

        let event = added.try_recv().unwrap();
        assert_eq!(event.topic, Topic::MessageAdded);
        assert_eq!(event.message, message);
        assert_eq!(added.try_recv(), None);
        assert_eq!(updated.try_recv(), None);
    }

    #[tokio::test]
    async fn test_update_publishes_exactly_once() {
        let dir = tempfile::tempdir().unwrap();
        let (executor, hub) = executor(&dir);
        executor.create_message("hello", None).unwrap();

        let mut added = hub.clone().subscribe(Topic::MessageAdded);
        let mut updated = hub.clone().subscribe(Topic::MessageUpdated);

        let message = executor
            .update_message(1, None, Some("greeting".to_string()))
            .unwrap();

        let event = updated.try_recv().unwrap();
        assert_eq!(event.topic, Topic::MessageUpdated);
        assert_eq!(event.message, message);
        assert_eq!(updated.try_recv(), None);
        assert_eq!(added.try_recv(), None);
    }

    #[tokio::test]
    async fn test_failed_update_publishes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let (executor, hub) = executor(&dir);
        let mut added = hub.clone().subscribe(Topic::MessageAdded);
        let mut updated = hub.clone().subscribe(Topic::MessageUpdated);

        let err = executor
            .update_message(99, Some("x".to_string()), None)
            .unwrap_err();

        assert!(matches!(err, Error::NotFound(99)));
        assert_eq!(added.try_recv(), None);
        assert_eq!(updated.try_recv(), None);
    }
}
