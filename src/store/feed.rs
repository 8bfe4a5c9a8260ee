//! Live feed: the create and update subscriptions, polled together

use crate::domain::Todo;
use crate::gateway::Subscription;

#[derive(Debug, Clone, PartialEq)]
pub enum FeedEvent {
    Created(Todo),
    Updated(Todo),
}

/// Both subscriptions for one store. Dropping the feed unsubscribes.
#[derive(Debug)]
pub struct LiveFeed {
    created: Subscription,
    updated: Subscription,
}

impl LiveFeed {
    pub fn new(created: Subscription, updated: Subscription) -> Self {
        Self { created, updated }
    }

    /// Next event from either stream, None once both have ended.
    pub async fn next(&mut self) -> Option<FeedEvent> {
        tokio::select! {
            Some(todo) = self.created.next() => Some(FeedEvent::Created(todo)),
            Some(todo) = self.updated.next() => Some(FeedEvent::Updated(todo)),
            else => None,
        }
    }

    /// Stop both streams. Events already buffered are still yielded.
    pub fn unsubscribe(&mut self) {
        self.created.unsubscribe();
        self.updated.unsubscribe();
    }

    pub fn is_unsubscribed(&self) -> bool {
        self.created.is_cancelled() && self.updated.is_cancelled()
    }
}
