//! Cancellable event streams
//!
//! A subscription is the receiving half of an unbounded channel. The
//! gateway keeps the sending half and drops it once the receiver is gone.

use tokio::sync::mpsc;

use crate::domain::Todo;

/// Receiving side, owned by the consumer
#[derive(Debug)]
pub struct Subscription {
    rx: mpsc::UnboundedReceiver<Todo>,
    cancelled: bool,
}

/// Publishing side, owned by the gateway
#[derive(Debug, Clone)]
pub struct SubscriptionSender {
    tx: mpsc::UnboundedSender<Todo>,
}

impl Subscription {
    pub fn channel() -> (SubscriptionSender, Subscription) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            SubscriptionSender { tx },
            Subscription {
                rx,
                cancelled: false,
            },
        )
    }

    /// Next delivered todo. None once the stream has ended.
    ///
    /// Todos already buffered when `unsubscribe` was called are still
    /// returned before None.
    pub async fn next(&mut self) -> Option<Todo> {
        self.rx.recv().await
    }

    /// Stop further delivery. Idempotent.
    pub fn unsubscribe(&mut self) {
        if !self.cancelled {
            self.cancelled = true;
            self.rx.close();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}

impl SubscriptionSender {
    /// Returns false once the subscriber has gone away
    pub fn deliver(&self, todo: Todo) -> bool {
        self.tx.send(todo).is_ok()
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}
