// ── Reactive state streams ──
//
// Subscription handles for observable state (fetch state, session state,
// pagination, alerts). UI bridges consume these.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures_core::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

/// A subscription to one piece of observable state.
///
/// Provides both point-in-time snapshot access and change notification
/// via [`changed()`](Self::changed) or by converting to a `Stream`.
pub struct StateStream<T: Clone + Send + Sync + 'static> {
    current: T,
    receiver: watch::Receiver<T>,
}

impl<T: Clone + Send + Sync + 'static> StateStream<T> {
    pub(crate) fn new(mut receiver: watch::Receiver<T>) -> Self {
        let current = receiver.borrow_and_update().clone();
        Self { current, receiver }
    }

    /// The value seen by the last `changed()` call (or at creation).
    pub fn current(&self) -> &T {
        &self.current
    }

    /// The latest value (may have changed since creation).
    pub fn latest(&self) -> T {
        self.receiver.borrow().clone()
    }

    /// Wait for the next change, returning the new value.
    /// Returns `None` if the owner has been dropped.
    pub async fn changed(&mut self) -> Option<T> {
        self.receiver.changed().await.ok()?;
        let value = self.receiver.borrow_and_update().clone();
        self.current = value.clone();
        Some(value)
    }

    /// Convert into a `Stream` for use with `StreamExt` combinators.
    pub fn into_stream(self) -> StateWatchStream<T> {
        StateWatchStream {
            inner: WatchStream::new(self.receiver),
        }
    }
}

/// `Stream` adapter backed by a `watch::Receiver`.
///
/// Yields the current value first, then each new value.
pub struct StateWatchStream<T: Clone + Send + Sync + 'static> {
    inner: WatchStream<T>,
}

impl<T: Clone + Send + Sync + 'static> Stream for StateWatchStream<T> {
    type Item = T;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use futures_util::StreamExt;

    #[tokio::test]
    async fn stream_yields_current_then_updates() {
        let (tx, rx) = watch::channel(1_u32);
        let handle = StateStream::new(rx);
        assert_eq!(*handle.current(), 1);

        let mut stream = handle.into_stream();
        assert_eq!(stream.next().await, Some(1));

        tx.send_replace(2);
        assert_eq!(stream.next().await, Some(2));

        drop(tx);
        assert_eq!(stream.next().await, None);
    }

    #[tokio::test]
    async fn changed_tracks_latest_value() {
        let (tx, rx) = watch::channel("a".to_string());
        let mut handle = StateStream::new(rx);

        tx.send_replace("b".into());
        assert_eq!(handle.latest(), "b");
        assert_eq!(handle.current(), "a");

        assert_eq!(handle.changed().await.unwrap(), "b");
        assert_eq!(handle.current(), "b");
    }
}
