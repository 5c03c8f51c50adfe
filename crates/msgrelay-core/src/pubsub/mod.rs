//! Pub-sub infrastructure for change notifications.
//!
//! Publishers (store mutations) are decoupled from consumers: each
//! subscriber owns an independent channel, so a slow consumer never blocks
//! the publisher or other subscribers, and teardown on disconnect is a
//! local operation.

mod broadcaster;
mod subscription;

pub use broadcaster::{Broadcaster, SubscriptionId};
pub use subscription::{matches_message_id, FilteredSubscription, Subscription};
