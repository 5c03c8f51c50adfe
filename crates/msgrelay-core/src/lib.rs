//! msgrelay core - message store, mutation pipeline, and pub-sub fan-out.
//!
//! This crate owns the authoritative message collection and the change
//! notification hub. Front-ends perform writes through [`MutationExecutor`]
//! so every successful mutation produces exactly one published event.

pub mod error;
pub mod mutation;
pub mod pubsub;
pub mod store;
pub mod types;

pub use error::Error;
pub use mutation::MutationExecutor;
pub use pubsub::{matches_message_id, Broadcaster, FilteredSubscription, Subscription};
pub use store::MessageStore;
pub use types::{ChangeEvent, Message, MessageId, Topic};
