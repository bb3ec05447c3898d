use std::sync::Arc;

use futures::stream::{self, Stream};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

/// A complete result set at one point in time.
#[derive(Debug)]
pub struct Snapshot<R> {
    pub version: u64,
    pub items: Arc<Vec<R>>,
}

impl<R> Clone for Snapshot<R> {
    fn clone(&self) -> Self {
        Self {
            version: self.version,
            items: Arc::clone(&self.items),
        }
    }
}

impl<R> Snapshot<R> {
    pub fn items(&self) -> &[R] {
        &self.items
    }
}

/// Publisher side of a live query. Every `publish` replaces the whole set.
pub struct LiveQuery<R> {
    tx: watch::Sender<Snapshot<R>>,
}

impl<R: Clone + Send + Sync + 'static> LiveQuery<R> {
    pub fn new(initial: Vec<R>) -> Self {
        let (tx, _rx) = watch::channel(Snapshot {
            version: 0,
            items: Arc::new(initial),
        });
        Self { tx }
    }

    /// Replace the result set and wake subscribers. Returns the new version.
    pub fn publish(&self, items: Vec<R>) -> u64 {
        let items = Arc::new(items);
        let mut version = 0;
        self.tx.send_modify(|snap| {
            snap.version += 1;
            snap.items = items;
            version = snap.version;
        });
        version
    }

    pub fn current(&self) -> Snapshot<R> {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> Subscription<R> {
        Subscription {
            rx: self.tx.subscribe(),
            cancel: CancellationToken::new(),
            primed: false,
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

/// Consumer side of a live query.
///
/// Bursts of publishes between two `next()` calls collapse to the latest
/// snapshot; each snapshot is complete, so nothing is lost by skipping.
pub struct Subscription<R> {
    rx: watch::Receiver<Snapshot<R>>,
    cancel: CancellationToken,
    primed: bool,
}

impl<R: Clone + Send + Sync + 'static> Subscription<R> {
    /// Next snapshot, or `None` once cancelled or the publisher is gone.
    pub async fn next(&mut self) -> Option<Snapshot<R>> {
        if self.cancel.is_cancelled() {
            return None;
        }
        if !self.primed {
            self.primed = true;
            return Some(self.rx.borrow_and_update().clone());
        }

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => None,
            changed = self.rx.changed() => match changed {
                Ok(()) if !self.cancel.is_cancelled() => Some(self.rx.borrow_and_update().clone()),
                _ => None,
            },
        }
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Handle that cancels this subscription from elsewhere.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn into_stream(self) -> impl Stream<Item = Snapshot<R>> + Send + 'static {
        stream::unfold(self, |mut sub| async move {
            let snap = sub.next().await?;
            Some((snap, sub))
        })
    }
}
