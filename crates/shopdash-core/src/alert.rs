// ── Alert sink ──
//
// One banner at a time. Mutations publish their outcome here; the UI
// renders whatever the sink currently holds.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use strum::{Display, EnumString};
use tokio::sync::watch;
use tracing::trace;

use crate::stream::StateStream;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum AlertKind {
    #[default]
    Success,
    Error,
}

/// A user-visible notification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Alert {
    pub active: bool,
    pub message: String,
    pub kind: AlertKind,
    /// Dismiss on its own after the sink's delay.
    pub auto_close: bool,
}

impl Alert {
    /// Active success alert that closes itself.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            active: true,
            message: message.into(),
            kind: AlertKind::Success,
            auto_close: true,
        }
    }

    /// Active error alert that stays until dismissed.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            active: true,
            message: message.into(),
            kind: AlertKind::Error,
            auto_close: false,
        }
    }
}

/// Holds the current alert. Cheaply cloneable; clones share state.
#[derive(Clone)]
pub struct AlertSink {
    inner: Arc<AlertInner>,
}

struct AlertInner {
    state: watch::Sender<Alert>,
    /// Bumped on every `show`; a timer only dismisses its own alert.
    generation: AtomicU64,
    auto_close_after: Duration,
}

impl AlertSink {
    pub fn new(auto_close_after: Duration) -> Self {
        let (state, _) = watch::channel(Alert::default());
        Self {
            inner: Arc::new(AlertInner {
                state,
                generation: AtomicU64::new(0),
                auto_close_after,
            }),
        }
    }

    pub fn current(&self) -> Alert {
        self.inner.state.borrow().clone()
    }

    pub fn subscribe(&self) -> StateStream<Alert> {
        StateStream::new(self.inner.state.subscribe())
    }

    /// Replace the current alert.
    ///
    /// Auto-closing alerts spawn a timer on the current Tokio runtime.
    pub fn show(&self, alert: Alert) {
        let generation = self.inner.generation.fetch_add(1, Ordering::AcqRel) + 1;
        let auto_close = alert.auto_close && alert.active;
        trace!(kind = %alert.kind, generation, "showing alert");
        self.inner.state.send_replace(alert);

        if auto_close {
            let weak = Arc::downgrade(&self.inner);
            let delay = self.inner.auto_close_after;
            tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                close_if_current(&weak, generation);
            });
        }
    }

    /// Close the current alert (the banner's close button).
    pub fn dismiss(&self) {
        self.inner.state.send_if_modified(|alert| {
            let was_active = alert.active;
            alert.active = false;
            was_active
        });
    }
}

fn close_if_current(weak: &Weak<AlertInner>, generation: u64) {
    let Some(inner) = weak.upgrade() else {
        return;
    };
    inner.state.send_if_modified(|alert| {
        if inner.generation.load(Ordering::Acquire) != generation || !alert.active {
            return false;
        }
        alert.active = false;
        true
    });
}
