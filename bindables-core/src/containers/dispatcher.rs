//! Dispatcher Implementation
//!
//! A dispatcher is a typed publish/subscribe channel with no stored state.
//! Values exist only for the duration of a `dispatch` call: each subscriber
//! sees the value by reference and nothing is retained afterwards.
//!
//! Dispatch walks a snapshot of the subscriber list, so a subscriber may
//! unsubscribe itself, add new subscribers or dispose the whole dispatcher
//! while a dispatch is in flight without disturbing the pass.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use super::listener::{notify_event, register_event, EventListeners, ListenerId};
use super::Disposable;

/// Counter for generating unique dispatcher IDs.
static DISPATCHER_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Generate a new unique dispatcher ID.
fn next_dispatcher_id() -> u64 {
    DISPATCHER_ID_COUNTER.fetch_add(1, Ordering::Relaxed)
}

/// A typed publish/subscribe channel.
///
/// # Example
///
/// ```rust,ignore
/// let dispatcher = BindableDispatcher::new();
///
/// dispatcher.subscribe(|message: &String| println!("{message}"));
/// dispatcher.dispatch("hello".to_string());
/// ```
pub struct BindableDispatcher<T>
where
    T: Send + Sync + 'static,
{
    inner: Arc<DispatcherInner<T>>,
}

struct DispatcherInner<T> {
    /// Unique identifier for this dispatcher.
    id: u64,

    /// Subscribers invoked on every dispatch, in registration order.
    subscribers: RwLock<EventListeners<T>>,
}

impl<T> BindableDispatcher<T>
where
    T: Send + Sync + 'static,
{
    /// Create a new dispatcher with no subscribers.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(DispatcherInner {
                id: next_dispatcher_id(),
                subscribers: RwLock::new(EventListeners::new()),
            }),
        }
    }

    /// Get the dispatcher's unique ID.
    pub fn id(&self) -> u64 {
        self.inner.id
    }

    /// Register a subscriber invoked on every subsequent dispatch.
    pub fn subscribe<F>(&self, callback: F) -> ListenerId
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        register_event(&self.inner.subscribers, callback)
    }

    /// Remove a subscriber. Unknown ids are ignored.
    pub fn unsubscribe(&self, listener: ListenerId) {
        self.inner
            .subscribers
            .write()
            .retain(|subscriber| subscriber.id != listener);
    }

    /// Deliver `value` to every current subscriber, in registration order.
    ///
    /// A panicking subscriber propagates to the caller; subscribers later
    /// in the pass are not invoked.
    pub fn dispatch(&self, value: T) {
        notify_event(&self.inner.subscribers, &value);
    }

    /// Drop all subscribers. The dispatcher remains usable afterwards;
    /// subsequent dispatches simply reach nobody.
    pub fn dispose(&self) {
        tracing::trace!(dispatcher = self.inner.id, "disposing dispatcher");
        self.inner.subscribers.write().clear();
    }

    /// Get the number of current subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.read().len()
    }
}

impl<T> Default for BindableDispatcher<T>
where
    T: Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for BindableDispatcher<T>
where
    T: Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> fmt::Debug for BindableDispatcher<T>
where
    T: Send + Sync + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindableDispatcher")
            .field("id", &self.inner.id)
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

impl<T> Disposable for BindableDispatcher<T>
where
    T: Send + Sync + 'static,
{
    fn dispose(&self) {
        BindableDispatcher::dispose(self);
    }
}
