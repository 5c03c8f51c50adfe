//! Message and change-event types.

use serde::{Deserialize, Serialize};

/// Identifier assigned to a message at creation time.
pub type MessageId = u64;

/// A single message in the collection.
///
/// `word` is optional and omitted from serialized form when absent, so the
/// data file round-trips absence rather than writing an explicit null.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Unique id, assigned at insertion, immutable afterwards.
    pub id: MessageId,
    /// Message body. Required at creation, mutable afterwards.
    pub content: String,
    /// Optional annotation, mutable afterwards.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word: Option<String>,
}

/// Topics a change event can be published on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    /// A new message was appended to the collection.
    MessageAdded,
    /// An existing message was mutated in place.
    MessageUpdated,
}

/// A change notification fanned out to subscribers.
///
/// Events are transient: never stored, only forwarded live. A subscriber
/// that connects after an event misses it permanently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent {
    /// Topic the event was published on.
    pub topic: Topic,
    /// Full snapshot of the message at the time of the change.
    pub message: Message,
}
