//! Observable Containers
//!
//! This module implements the container family: bindables, bindable lists,
//! bindable maps, and dispatchers. Each wraps a piece of state (or, for the
//! dispatcher, no state at all) and pushes change notifications to
//! registered listeners synchronously, on the mutating call.
//!
//! # Concepts
//!
//! ## Bindable
//!
//! A Bindable holds a single value and a remembered default. Listeners
//! receive the previous and the new value on every change. Two bindables
//! can be bound so they mirror each other; chains of bindings propagate
//! transitively.
//!
//! ## BindableList
//!
//! A BindableList is an ordered sequence with four listener channels: item
//! added, item removed, item changed (index overwrite), and a payload-free
//! update channel that fires once per mutation.
//!
//! ## BindableMap
//!
//! A BindableMap is a key-unique mapping with three listener channels:
//! entry set, entry removed, and the same payload-free update channel.
//!
//! ## BindableDispatcher
//!
//! A dispatcher is pure publish/subscribe: no stored value, just a typed
//! channel from `dispatch` calls to subscribers.
//!
//! # Implementation Notes
//!
//! Every container is a cheap `Clone` handle over `Arc`-shared state;
//! clones observe and mutate the same container. Notification never holds
//! a lock while user code runs: each fan-out snapshots the listener
//! collection first, so callbacks may re-enter the container freely.
//!
//! Containers do not catch panics. A panicking callback unwinds to the
//! caller of the mutating operation, leaving later listeners in the same
//! pass uninvoked.
//!
//! Disposal is explicit. Dropping the last handle frees the state, but
//! only `dispose` detaches listeners and bindings.

mod bindable;
mod dispatcher;
mod list;
mod listener;
mod map;

pub use bindable::{Bindable, ValueChanged};
pub use dispatcher::BindableDispatcher;
pub use list::{BindableList, ItemAdded, ItemChanged, ItemRemoved, ListListenerHandle};
pub use listener::ListenerId;
pub use map::{BindableMap, EntryRemoved, EntrySet, MapListenerHandle};

/// Lifecycle seam shared by every container. The pool stores its tracked
/// containers behind this trait so one disposal pass can cover all kinds.
pub trait Disposable: Send + Sync {
    /// Detach all listeners (and, for bindables, the outgoing binding).
    /// Idempotent; the container itself remains usable.
    fn dispose(&self);
}
