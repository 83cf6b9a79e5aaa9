//! Listener Identity and Fan-Out
//!
//! Every listener registration in this crate hands back an opaque
//! [`ListenerId`]. The id is the whole handle: callbacks live behind shared
//! pointers and cannot be compared for identity, so a unique token minted
//! at registration time is what `unregister` matches on.
//!
//! The module also provides the shared fan-out helpers. Notification always
//! walks a snapshot of the listener collection taken under a short lock.
//! A callback that registers, unregisters or disposes during the pass
//! mutates the live collection without disturbing the pass in flight, and
//! no lock is held while user code runs.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use smallvec::SmallVec;

/// Unique identifier for a registered listener.
///
/// Uses an atomic counter to ensure uniqueness across threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

impl ListenerId {
    /// Generate a new unique listener ID.
    pub fn new() -> Self {
        static LISTENER_ID_COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(LISTENER_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for ListenerId {
    fn default() -> Self {
        Self::new()
    }
}

/// A registered callback on an event-carrying channel.
pub(crate) struct EventListener<E> {
    pub(crate) id: ListenerId,
    pub(crate) callback: Arc<dyn Fn(&E) + Send + Sync>,
}

impl<E> Clone for EventListener<E> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            callback: Arc::clone(&self.callback),
        }
    }
}

/// A registered callback on a payload-free update channel.
pub(crate) struct UpdateListener {
    pub(crate) id: ListenerId,
    pub(crate) callback: Arc<dyn Fn() + Send + Sync>,
}

impl Clone for UpdateListener {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            callback: Arc::clone(&self.callback),
        }
    }
}

/// Listener collections are small in practice; keep the common case inline.
pub(crate) type EventListeners<E> = SmallVec<[EventListener<E>; 2]>;
pub(crate) type UpdateListeners = SmallVec<[UpdateListener; 2]>;

/// Append an event listener and return its id.
pub(crate) fn register_event<E, F>(listeners: &RwLock<EventListeners<E>>, callback: F) -> ListenerId
where
    F: Fn(&E) + Send + Sync + 'static,
{
    let id = ListenerId::new();
    listeners.write().push(EventListener {
        id,
        callback: Arc::new(callback),
    });
    id
}

/// Append an update listener and return its id.
pub(crate) fn register_update<F>(listeners: &RwLock<UpdateListeners>, callback: F) -> ListenerId
where
    F: Fn() + Send + Sync + 'static,
{
    let id = ListenerId::new();
    listeners.write().push(UpdateListener {
        id,
        callback: Arc::new(callback),
    });
    id
}

/// Invoke every event listener with `event`, in registration order.
///
/// Works over a snapshot so the lock is released before any callback runs.
pub(crate) fn notify_event<E>(listeners: &RwLock<EventListeners<E>>, event: &E) {
    let snapshot: EventListeners<E> = listeners.read().clone();
    for listener in &snapshot {
        (listener.callback)(event);
    }
}

/// Invoke every update listener, in registration order.
pub(crate) fn notify_update(listeners: &RwLock<UpdateListeners>) {
    let snapshot: UpdateListeners = listeners.read().clone();
    for listener in &snapshot {
        (listener.callback)();
    }
}
