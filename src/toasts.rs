//! Toasts
//!
//! Short-lived notification messages. A [`ToastQueue`] is created by the caller and handed to
//! whatever needs to raise or display toasts; each toast retracts itself once its duration
//! has elapsed.

use std::{sync::Arc, time::Duration};

use slotmap::{SlotMap, new_key_type};
use tokio::{runtime::Handle, sync::watch, time::sleep};
use tracing::{trace, warn};

/// How long a toast stays up when no duration is given.
pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_secs(3);

new_key_type! {
    /// Toast Key
    pub struct ToastKey;
}

/// A message currently on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    key: ToastKey,
    message: String,
    duration: Duration,
}

impl Toast {
    /// Returns the key used to dismiss this toast.
    pub fn key(&self) -> ToastKey {
        self.key
    }

    /// Returns the message text.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns how long the toast stays up.
    pub fn duration(&self) -> Duration {
        self.duration
    }
}

#[derive(Debug)]
struct ToastState {
    keys: SlotMap<ToastKey, ()>,
    active: Vec<Toast>,
}

/// Queue of active toasts, observable through [`ToastQueue::subscribe`].
///
/// Cloning the queue yields another handle to the same toasts.
#[derive(Debug, Clone)]
pub struct ToastQueue {
    state: Arc<watch::Sender<ToastState>>,
    default_duration: Duration,
}

impl Default for ToastQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl ToastQueue {
    /// Create an empty queue using the standard three second duration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_default_duration(DEFAULT_TOAST_DURATION)
    }

    /// Create an empty queue with a custom default duration.
    #[must_use]
    pub fn with_default_duration(default_duration: Duration) -> Self {
        let (sender, _receiver) = watch::channel(ToastState {
            keys: SlotMap::with_key(),
            active: Vec::new(),
        });

        Self {
            state: Arc::new(sender),
            default_duration,
        }
    }

    /// Show `message` for `duration`, or the queue's default duration when `None`.
    ///
    /// The retraction is scheduled on the current tokio runtime. Outside a runtime the toast
    /// stays up until it is dismissed.
    pub fn show(&self, message: impl Into<String>, duration: Option<Duration>) -> ToastKey {
        let duration = duration.unwrap_or(self.default_duration);
        let message = message.into();
        let mut key = ToastKey::default();

        self.state.send_modify(|state| {
            key = state.keys.insert(());

            state.active.push(Toast {
                key,
                message,
                duration,
            });
        });

        trace!(?key, ?duration, "toast shown");

        let Ok(runtime) = Handle::try_current() else {
            warn!(?key, "no tokio runtime, toast will not retract on its own");

            return key;
        };

        let queue = self.clone();

        runtime.spawn(async move {
            sleep(duration).await;
            queue.dismiss(key);
        });

        key
    }

    /// Retract a toast early. Does nothing if it has already gone.
    pub fn dismiss(&self, key: ToastKey) {
        self.state.send_if_modified(|state| {
            if state.keys.remove(key).is_none() {
                return false;
            }

            state.active.retain(|toast| toast.key != key);

            trace!(?key, "toast dismissed");

            true
        });
    }

    /// The toasts currently on screen, oldest first.
    #[must_use]
    pub fn active(&self) -> Vec<Toast> {
        self.state.borrow().active.clone()
    }

    /// Watch the active toasts. The receiver is notified whenever a toast is shown or retracted.
    #[must_use]
    pub fn subscribe(&self) -> ToastReceiver {
        ToastReceiver {
            inner: self.state.subscribe(),
        }
    }
}

/// Observer of a [`ToastQueue`].
#[derive(Debug)]
pub struct ToastReceiver {
    inner: watch::Receiver<ToastState>,
}

impl ToastReceiver {
    /// Wait for the active toasts to change and return them.
    ///
    /// Returns `None` once every handle to the queue has been dropped.
    pub async fn changed(&mut self) -> Option<Vec<Toast>> {
        self.inner.changed().await.ok()?;

        Some(self.inner.borrow_and_update().active.clone())
    }

    /// The toasts currently on screen, oldest first.
    #[must_use]
    pub fn active(&self) -> Vec<Toast> {
        self.inner.borrow().active.clone()
    }
}
