//! Durable message store.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use parking_lot::RwLock;

use crate::error::Error;
use crate::types::{Message, MessageId};

/// Authoritative, durable holder of the message collection.
///
/// The collection is kept in memory and rewritten to the data file in full
/// after every mutation. A single writer lock covers the whole
/// read-modify-persist cycle, so concurrent mutations never interleave and
/// the file always reflects one complete state. Reads share the lock's read
/// side and may run concurrently with each other.
pub struct MessageStore {
    messages: RwLock<Vec<Message>>,
    data_path: PathBuf,
}

impl MessageStore {
    /// Open a store backed by the given data file.
    ///
    /// A missing file means an empty collection; any other read or decode
    /// failure propagates.
    pub fn open(data_path: impl Into<PathBuf>) -> Result<Self, Error> {
        let data_path = data_path.into();
        let messages: Vec<Message> = match fs::read(&data_path) {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };

        tracing::debug!(
            path = %data_path.display(),
            count = messages.len(),
            "message store opened"
        );

        Ok(Self {
            messages: RwLock::new(messages),
            data_path,
        })
    }

    /// Full snapshot of the collection in insertion order.
    pub fn list(&self) -> Vec<Message> {
        self.messages.read().clone()
    }

    /// Look up a single message by id.
    pub fn get(&self, id: MessageId) -> Option<Message> {
        self.messages.read().iter().find(|m| m.id == id).cloned()
    }

    /// Number of messages in the collection.
    pub fn len(&self) -> usize {
        self.messages.read().len()
    }

    /// Whether the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.messages.read().is_empty()
    }

    /// Append a new message and persist the collection.
    ///
    /// The id is the collection length plus one at the moment of insertion.
    /// That rule is only sound while no delete operation exists.
    pub fn create(
        &self,
        content: impl Into<String>,
        word: Option<String>,
    ) -> Result<Message, Error> {
        let mut messages = self.messages.write();

        let message = Message {
            id: messages.len() as MessageId + 1,
            content: content.into(),
            word,
        };
        messages.push(message.clone());

        if let Err(e) = self.persist(&messages) {
            // Failed writes must leave no trace in the collection.
            messages.pop();
            return Err(e);
        }

        Ok(message)
    }

    /// Merge the supplied fields into an existing message and persist.
    ///
    /// Omitted fields keep their prior values. `content` can be cleared by
    /// supplying an empty string; `word` cannot be cleared at all, matching
    /// the partial-update contract.
    pub fn update(
        &self,
        id: MessageId,
        content: Option<String>,
        word: Option<String>,
    ) -> Result<Message, Error> {
        let mut messages = self.messages.write();

        let index = messages
            .iter()
            .position(|m| m.id == id)
            .ok_or(Error::NotFound(id))?;
        let previous = messages[index].clone();

        if let Some(content) = content {
            messages[index].content = content;
        }
        if let Some(word) = word {
            messages[index].word = Some(word);
        }
        let updated = messages[index].clone();

        if let Err(e) = self.persist(&messages) {
            messages[index] = previous;
            return Err(e);
        }

        Ok(updated)
    }

    /// Overwrite the data file with the full collection.
    fn persist(&self, messages: &[Message]) -> Result<(), Error> {
        let bytes = serde_json::to_vec_pretty(messages)?;
        fs::write(&self.data_path, bytes)?;
        Ok(())
    }
}
