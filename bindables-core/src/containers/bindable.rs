//! Bindable Implementation
//!
//! A Bindable is the fundamental observable container. It holds a single
//! value, remembers the default it was constructed with, and notifies
//! registered listeners whenever the value is replaced.
//!
//! # How Notification Works
//!
//! 1. `set` stores the new value under a short write lock.
//!
//! 2. Listeners are invoked with a change event carrying the previous and
//!    the new value, in registration order, over a snapshot of the listener
//!    collection. No lock is held while a callback runs, so callbacks may
//!    freely read the bindable, register further listeners or dispose it.
//!
//! 3. One-shot listeners registered via `value_changed_once` are removed
//!    right after their own invocation.
//!
//! # How Binding Works
//!
//! `a.bind_to(&b)` makes `a` mirror `b` in both directions:
//!
//! 1. `a` immediately adopts `b`'s current value (listeners on `a` fire).
//!
//! 2. A guard listener on `b` forwards every later change of `b` into `a`
//!    through an internal path that updates `a`'s value and fires `a`'s
//!    listeners without consulting `a`'s own binding, so nothing echoes
//!    back to `b`.
//!
//! 3. Setting `a` first applies the change locally, then forwards it to
//!    `b` through `b`'s public setter. Chains (`a -> b -> c`) therefore
//!    propagate transitively.
//!
//! The binding holds only a weak reference to its target, and the target
//! holds the guard listener. Neither side keeps the other alive.
//!
//! # Thread Safety
//!
//! The value and the listener collection are each behind their own lock.
//! Notification order across concurrent writers is unspecified; within a
//! single thread it is deterministic.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use smallvec::SmallVec;

use crate::error::{BindableError, Result};

use super::listener::ListenerId;
use super::Disposable;

/// Counter for generating unique bindable IDs.
static BINDABLE_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Generate a new unique bindable ID.
fn next_bindable_id() -> u64 {
    BINDABLE_ID_COUNTER.fetch_add(1, Ordering::Relaxed)
}

/// Event passed to value listeners: the previous and the new value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueChanged<T> {
    pub old: T,
    pub new: T,
}

/// A registered value listener. `once` marks listeners that self-remove
/// after their first invocation on a real value change.
struct ChangeListener<T> {
    id: ListenerId,
    once: bool,
    callback: Arc<dyn Fn(&ValueChanged<T>) + Send + Sync>,
}

impl<T> Clone for ChangeListener<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            once: self.once,
            callback: Arc::clone(&self.callback),
        }
    }
}

type ChangeListeners<T> = SmallVec<[ChangeListener<T>; 2]>;

/// An outgoing binding: the mirrored target plus the guard listener this
/// instance registered on it.
struct Binding<T> {
    target: Weak<BindableInner<T>>,
    guard: ListenerId,
}

struct BindableInner<T> {
    /// Unique identifier for this bindable.
    id: u64,

    /// The value the bindable was constructed with. Immutable.
    default_value: T,

    /// The current value.
    value: RwLock<T>,

    /// Value listeners, in registration order.
    listeners: RwLock<ChangeListeners<T>>,

    /// At most one outgoing binding at a time.
    binding: RwLock<Option<Binding<T>>>,
}

/// An observable container holding a single value of type T.
///
/// Cloning a `Bindable` produces a second handle to the same container:
/// both see the same value, listeners and binding.
///
/// # Example
///
/// ```rust,ignore
/// let health = Bindable::new(20.0);
///
/// health.value_changed(|event| {
///     println!("{} -> {}", event.old, event.new);
/// });
///
/// health.set(15.5);
/// assert_eq!(health.get(), 15.5);
///
/// health.reset_to_default();
/// assert_eq!(health.get(), 20.0);
/// ```
pub struct Bindable<T>
where
    T: Clone + Send + Sync + 'static,
{
    inner: Arc<BindableInner<T>>,
}

impl<T> Bindable<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Create a new bindable. `default_value` becomes both the initial
    /// value and the value `reset_to_default` restores.
    pub fn new(default_value: T) -> Self {
        Self {
            inner: Arc::new(BindableInner {
                id: next_bindable_id(),
                default_value: default_value.clone(),
                value: RwLock::new(default_value),
                listeners: RwLock::new(ChangeListeners::new()),
                binding: RwLock::new(None),
            }),
        }
    }

    fn from_inner(inner: Arc<BindableInner<T>>) -> Self {
        Self { inner }
    }

    /// Get the bindable's unique ID.
    pub fn id(&self) -> u64 {
        self.inner.id
    }

    /// Get a clone of the current value.
    pub fn get(&self) -> T {
        self.inner.value.read().clone()
    }

    /// Get a clone of the default value.
    pub fn default_value(&self) -> T {
        self.inner.default_value.clone()
    }

    /// Replace the value, notify listeners, then forward the change to the
    /// bound target (if any) through its public setter.
    pub fn set(&self, value: T) {
        self.apply_change(value.clone());
        if let Some(target) = self.bound_target() {
            target.set(value);
        }
    }

    /// Replace the value without notifying any listener. The change is
    /// still forwarded, silently, along the binding.
    pub fn set_silently(&self, value: T) {
        *self.inner.value.write() = value.clone();
        if let Some(target) = self.bound_target() {
            target.set_silently(value);
        }
    }

    /// Update the value using a function of the current value.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&T) -> T,
    {
        let new_value = {
            let guard = self.inner.value.read();
            f(&*guard)
        };
        self.set(new_value);
    }

    /// Restore the default value through the notifying path.
    pub fn reset_to_default(&self) {
        self.set(self.inner.default_value.clone());
    }

    /// Restore the default value without notifying any listener.
    pub fn reset_to_default_silently(&self) {
        self.set_silently(self.inner.default_value.clone());
    }

    /// Register a listener invoked on every value change.
    pub fn value_changed<F>(&self, callback: F) -> ListenerId
    where
        F: Fn(&ValueChanged<T>) + Send + Sync + 'static,
    {
        self.register(callback, false)
    }

    /// Register a listener that removes itself after its first invocation
    /// on a value change. `trigger_update` does not consume it.
    pub fn value_changed_once<F>(&self, callback: F) -> ListenerId
    where
        F: Fn(&ValueChanged<T>) + Send + Sync + 'static,
    {
        self.register(callback, true)
    }

    fn register<F>(&self, callback: F, once: bool) -> ListenerId
    where
        F: Fn(&ValueChanged<T>) + Send + Sync + 'static,
    {
        let id = ListenerId::new();
        self.inner.listeners.write().push(ChangeListener {
            id,
            once,
            callback: Arc::new(callback),
        });
        id
    }

    /// Remove a listener. Unknown ids are ignored.
    pub fn unregister(&self, listener: ListenerId) {
        self.inner
            .listeners
            .write()
            .retain(|entry| entry.id != listener);
    }

    /// Re-notify every listener with the current value (old == new).
    /// One-shot listeners survive.
    pub fn trigger_update(&self) {
        self.trigger(false);
    }

    /// Re-notify every listener with the current value (old == new),
    /// consuming one-shot listeners as if a real change had occurred.
    pub fn trigger_update_consuming(&self) {
        self.trigger(true);
    }

    fn trigger(&self, consume_once: bool) {
        let current = self.get();
        let event = ValueChanged {
            old: current.clone(),
            new: current,
        };
        self.notify(&event, consume_once);
    }

    /// Bind this instance to `other` so the two mirror each other.
    ///
    /// This instance immediately adopts `other`'s current value (listeners
    /// fire), then every change on either side is forwarded to the other.
    ///
    /// # Errors
    ///
    /// - [`BindableError::SelfBinding`] if `other` is this instance.
    /// - [`BindableError::AlreadyBound`] if this instance already holds an
    ///   outgoing binding.
    /// - [`BindableError::ReciprocalBinding`] if `other` is already bound
    ///   back to this instance.
    pub fn bind_to(&self, other: &Bindable<T>) -> Result<()> {
        if Arc::ptr_eq(&self.inner, &other.inner) {
            return Err(BindableError::SelfBinding);
        }
        if self.inner.binding.read().is_some() {
            return Err(BindableError::AlreadyBound);
        }
        let reciprocal = other
            .inner
            .binding
            .read()
            .as_ref()
            .and_then(|binding| binding.target.upgrade())
            .is_some_and(|target| Arc::ptr_eq(&target, &self.inner));
        if reciprocal {
            return Err(BindableError::ReciprocalBinding);
        }

        self.install_binding(other);
        tracing::debug!(
            source = self.inner.id,
            target = other.inner.id,
            "established binding"
        );
        Ok(())
    }

    fn install_binding(&self, target: &Bindable<T>) {
        self.apply_change(target.get());

        let weak_self = Arc::downgrade(&self.inner);
        let guard = target.value_changed(move |event| {
            // The owning side may already be gone; forwarding then no-ops.
            if let Some(inner) = weak_self.upgrade() {
                Bindable::from_inner(inner).apply_change(event.new.clone());
            }
        });

        *self.inner.binding.write() = Some(Binding {
            target: Arc::downgrade(&target.inner),
            guard,
        });
    }

    /// Chaining form of `bind_to`, consuming and returning the receiver.
    ///
    /// ```rust,ignore
    /// let mirror = Bindable::new(0).with_bind_to(&source)?;
    /// ```
    pub fn with_bind_to(self, other: &Bindable<T>) -> Result<Self> {
        self.bind_to(other)?;
        Ok(self)
    }

    /// Create a new bindable with the same default value, already bound to
    /// this instance.
    pub fn bound_copy(&self) -> Bindable<T> {
        let copy = Bindable::new(self.inner.default_value.clone());
        // Binding a fresh instance to an existing one cannot fail.
        let _ = copy.bind_to(self);
        copy
    }

    /// Remove this instance's outgoing binding, detaching the guard
    /// listener from the target. No-op when unbound.
    pub fn unbind(&self) {
        let binding = self.inner.binding.write().take();
        if let Some(binding) = binding {
            if let Some(target) = binding.target.upgrade() {
                Bindable::from_inner(target).unregister(binding.guard);
            }
            tracing::debug!(source = self.inner.id, "removed binding");
        }
    }

    /// Whether this instance holds an outgoing binding.
    pub fn is_bound(&self) -> bool {
        self.inner.binding.read().is_some()
    }

    /// The target of this instance's outgoing binding, if it is still
    /// alive. A bound-but-collected target yields `None`.
    pub fn bound_target(&self) -> Option<Bindable<T>> {
        self.inner
            .binding
            .read()
            .as_ref()
            .and_then(|binding| binding.target.upgrade())
            .map(Bindable::from_inner)
    }

    /// Drop all listeners and remove the outgoing binding. The value is
    /// left untouched and the instance remains usable.
    pub fn dispose(&self) {
        tracing::trace!(bindable = self.inner.id, "disposing bindable");
        self.inner.listeners.write().clear();
        self.unbind();
    }

    /// Get the number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.inner.listeners.read().len()
    }

    /// Store `value` and fan out to local listeners. Does not consult the
    /// binding; the guard listener relies on that to avoid echoing changes
    /// back to their origin.
    fn apply_change(&self, value: T) {
        let old = {
            let mut current = self.inner.value.write();
            std::mem::replace(&mut *current, value.clone())
        };
        let event = ValueChanged { old, new: value };
        self.notify(&event, true);
    }

    fn notify(&self, event: &ValueChanged<T>, consume_once: bool) {
        let snapshot: ChangeListeners<T> = self.inner.listeners.read().clone();
        for listener in &snapshot {
            (listener.callback)(event);
            if consume_once && listener.once {
                self.inner
                    .listeners
                    .write()
                    .retain(|entry| entry.id != listener.id);
            }
        }
    }
}

impl<T> Bindable<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    /// Whether the current value equals the default value.
    pub fn is_default(&self) -> bool {
        *self.inner.value.read() == self.inner.default_value
    }
}

impl<T> Default for Bindable<T>
where
    T: Clone + Default + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> Clone for Bindable<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> fmt::Debug for Bindable<T>
where
    T: Clone + Send + Sync + fmt::Debug + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bindable")
            .field("id", &self.inner.id)
            .field("value", &self.get())
            .field("listener_count", &self.listener_count())
            .field("is_bound", &self.is_bound())
            .finish()
    }
}

/// Formats as the current value alone.
impl<T> fmt::Display for Bindable<T>
where
    T: Clone + Send + Sync + fmt::Display + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.inner.value.read(), f)
    }
}

impl<T> Disposable for Bindable<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn dispose(&self) {
        Bindable::dispose(self);
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Mutex;

    #[test]
    fn bindable_get_and_set() {
        let bindable = Bindable::new(727);
        assert_eq!(bindable.get(), 727);

        bindable.set(69);
        assert_eq!(bindable.get(), 69);
    }

    #[test]
    fn bindable_notifies_listeners_with_old_and_new() {
        let bindable = Bindable::new(727);
        let events = Arc::new(Mutex::new(Vec::new()));

        let events_clone = events.clone();
        bindable.value_changed(move |event| {
            events_clone.lock().unwrap().push((event.old, event.new));
        });

        bindable.set(69);
        assert_eq!(*events.lock().unwrap(), vec![(727, 69)]);
    }

    #[test]
    fn bindable_set_silently_fires_nothing() {
        let bindable = Bindable::new(727);
        let call_count = Arc::new(AtomicI32::new(0));

        let call_count_clone = call_count.clone();
        bindable.value_changed(move |_| {
            call_count_clone.fetch_add(1, Ordering::SeqCst);
        });

        bindable.set_silently(69);
        assert_eq!(bindable.get(), 69);
        assert_eq!(call_count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn bindable_update_applies_function() {
        let bindable = Bindable::new(10);
        bindable.update(|v| v + 5);
        assert_eq!(bindable.get(), 15);
    }

    #[test]
    fn bindable_trigger_update_renotifies_current_value() {
        let bindable = Bindable::new(5);
        let events = Arc::new(Mutex::new(Vec::new()));

        let events_clone = events.clone();
        bindable.value_changed(move |event| {
            events_clone.lock().unwrap().push((event.old, event.new));
        });

        bindable.trigger_update();
        assert_eq!(*events.lock().unwrap(), vec![(5, 5)]);
    }

    #[test]
    fn bindable_set_to_equal_value_still_notifies() {
        let bindable = Bindable::new(1);
        let call_count = Arc::new(AtomicI32::new(0));

        let call_count_clone = call_count.clone();
        bindable.value_changed(move |_| {
            call_count_clone.fetch_add(1, Ordering::SeqCst);
        });

        bindable.set(1);
        assert_eq!(call_count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn bindable_unregister_stops_notification() {
        let bindable = Bindable::new(0);
        let call_count = Arc::new(AtomicI32::new(0));

        let call_count_clone = call_count.clone();
        let listener = bindable.value_changed(move |_| {
            call_count_clone.fetch_add(1, Ordering::SeqCst);
        });

        bindable.set(1);
        bindable.unregister(listener);
        bindable.set(2);
        assert_eq!(call_count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn bindable_once_listener_self_removes_after_change() {
        let bindable = Bindable::new(0);
        let call_count = Arc::new(AtomicI32::new(0));

        let call_count_clone = call_count.clone();
        bindable.value_changed_once(move |_| {
            call_count_clone.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(bindable.listener_count(), 1);

        bindable.set(1);
        assert_eq!(call_count.load(Ordering::SeqCst), 1);
        assert_eq!(bindable.listener_count(), 0);

        bindable.set(2);
        assert_eq!(call_count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn bindable_once_listener_survives_trigger_update() {
        let bindable = Bindable::new(0);
        let call_count = Arc::new(AtomicI32::new(0));

        let call_count_clone = call_count.clone();
        bindable.value_changed_once(move |_| {
            call_count_clone.fetch_add(1, Ordering::SeqCst);
        });

        bindable.trigger_update();
        bindable.trigger_update();
        assert_eq!(call_count.load(Ordering::SeqCst), 2);
        assert_eq!(bindable.listener_count(), 1);

        bindable.trigger_update_consuming();
        assert_eq!(call_count.load(Ordering::SeqCst), 3);
        assert_eq!(bindable.listener_count(), 0);
    }

    #[test]
    fn bindable_reset_to_default() {
        let bindable = Bindable::new(20.0);
        let call_count = Arc::new(AtomicI32::new(0));

        let call_count_clone = call_count.clone();
        bindable.value_changed(move |_| {
            call_count_clone.fetch_add(1, Ordering::SeqCst);
        });

        bindable.set(5.5);
        assert!(!bindable.is_default());

        bindable.reset_to_default();
        assert_eq!(bindable.get(), 20.0);
        assert!(bindable.is_default());
        assert_eq!(call_count.load(Ordering::SeqCst), 2);

        bindable.set(3.0);
        bindable.reset_to_default_silently();
        assert_eq!(bindable.get(), 20.0);
        assert_eq!(call_count.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn bindable_clone_shares_state() {
        let first = Bindable::new(0);
        let second = first.clone();

        first.set(42);
        assert_eq!(second.get(), 42);

        second.set(100);
        assert_eq!(first.get(), 100);
        assert_eq!(first.id(), second.id());
    }

    #[test]
    fn bindable_ids_are_unique() {
        let b1 = Bindable::new(0);
        let b2 = Bindable::new(0);
        let b3 = Bindable::new(0);

        assert_ne!(b1.id(), b2.id());
        assert_ne!(b2.id(), b3.id());
        assert_ne!(b1.id(), b3.id());
    }

    #[test]
    fn bindable_display_shows_value() {
        let number = Bindable::new(727);
        let float = Bindable::new(72.7);
        let text = Bindable::new("owo :3".to_string());
        let flag = Bindable::new(true);

        assert_eq!(
            format!("{number} {float} {text} {flag}"),
            "727 72.7 owo :3 true"
        );
    }

    #[test]
    fn bind_to_adopts_target_value() {
        let source = Bindable::new(0);
        let target = Bindable::new(727);
        let events = Arc::new(Mutex::new(Vec::new()));

        let events_clone = events.clone();
        source.value_changed(move |event| {
            events_clone.lock().unwrap().push((event.old, event.new));
        });

        source.bind_to(&target).unwrap();
        assert_eq!(source.get(), 727);
        assert_eq!(*events.lock().unwrap(), vec![(0, 727)]);
        assert!(source.is_bound());
        assert_eq!(target.listener_count(), 1);
    }

    #[test]
    fn bind_to_forwards_target_changes() {
        let source = Bindable::new(0);
        let target = Bindable::new(1);
        source.bind_to(&target).unwrap();

        target.set(99);
        assert_eq!(source.get(), 99);
    }

    #[test]
    fn bind_to_forwards_source_changes_to_target() {
        let source = Bindable::new(0);
        let target = Bindable::new(1);
        let target_calls = Arc::new(AtomicI32::new(0));

        let target_calls_clone = target_calls.clone();
        target.value_changed(move |_| {
            target_calls_clone.fetch_add(1, Ordering::SeqCst);
        });

        source.bind_to(&target).unwrap();
        source.set(55);

        assert_eq!(target.get(), 55);
        assert_eq!(target_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn bind_to_self_is_rejected() {
        let bindable = Bindable::new(0);
        let alias = bindable.clone();
        assert_eq!(bindable.bind_to(&alias), Err(BindableError::SelfBinding));
    }

    #[test]
    fn bind_to_twice_is_rejected() {
        let source = Bindable::new(0);
        let first = Bindable::new(1);
        let second = Bindable::new(2);

        source.bind_to(&first).unwrap();
        assert_eq!(source.bind_to(&second), Err(BindableError::AlreadyBound));
    }

    #[test]
    fn reciprocal_bind_is_rejected() {
        let a = Bindable::new(0);
        let b = Bindable::new(1);

        a.bind_to(&b).unwrap();
        assert_eq!(b.bind_to(&a), Err(BindableError::ReciprocalBinding));
    }

    #[test]
    fn failed_bind_leaves_no_trace() {
        let source = Bindable::new(0);
        let target = Bindable::new(1);
        let other = Bindable::new(2);

        source.bind_to(&target).unwrap();
        let before = other.listener_count();
        assert!(source.bind_to(&other).is_err());

        assert_eq!(other.listener_count(), before);
        assert_eq!(
            source.bound_target().map(|t| t.id()),
            Some(target.id())
        );
    }

    #[test]
    fn unbind_detaches_guard_listener() {
        let source = Bindable::new(0);
        let target = Bindable::new(1);

        source.bind_to(&target).unwrap();
        assert_eq!(target.listener_count(), 1);

        source.unbind();
        assert!(!source.is_bound());
        assert_eq!(target.listener_count(), 0);

        target.set(42);
        assert_eq!(source.get(), 1);
    }

    #[test]
    fn unbind_without_binding_is_noop() {
        let bindable = Bindable::new(0);
        bindable.unbind();
        assert!(!bindable.is_bound());
    }

    #[test]
    fn set_silently_forwards_silently_along_binding() {
        let source = Bindable::new(0);
        let target = Bindable::new(1);
        let target_calls = Arc::new(AtomicI32::new(0));

        let target_calls_clone = target_calls.clone();
        target.value_changed(move |_| {
            target_calls_clone.fetch_add(1, Ordering::SeqCst);
        });

        source.bind_to(&target).unwrap();
        source.set_silently(88);

        assert_eq!(target.get(), 88);
        assert_eq!(target_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn with_bind_to_chains_construction() {
        let source = Bindable::new(727);
        let mirror = Bindable::new(0).with_bind_to(&source).unwrap();

        assert_eq!(mirror.get(), 727);
        source.set(69);
        assert_eq!(mirror.get(), 69);
    }

    #[test]
    fn bound_copy_mirrors_original() {
        let original = Bindable::new(727);
        let copy = original.bound_copy();

        assert_eq!(copy.get(), 727);
        assert_eq!(copy.default_value(), 727);
        assert!(copy.is_bound());
        assert_eq!(copy.bound_target().map(|t| t.id()), Some(original.id()));

        original.set(69);
        assert_eq!(copy.get(), 69);

        copy.set(42);
        assert_eq!(original.get(), 42);
    }

    #[test]
    fn binding_chain_propagates_transitively() {
        let a = Bindable::new(0);
        let b = Bindable::new(0);
        let c = Bindable::new(0);

        b.bind_to(&c).unwrap();
        a.bind_to(&b).unwrap();

        a.set(7);
        assert_eq!(b.get(), 7);
        assert_eq!(c.get(), 7);

        c.set(9);
        assert_eq!(b.get(), 9);
        assert_eq!(a.get(), 9);
    }

    #[test]
    fn dead_target_forwarding_is_noop() {
        let source = Bindable::new(0);
        {
            let target = Bindable::new(1);
            source.bind_to(&target).unwrap();
        }

        assert!(source.is_bound());
        assert!(source.bound_target().is_none());
        source.set(5);
        assert_eq!(source.get(), 5);
    }

    #[test]
    fn dispose_clears_listeners_and_binding() {
        let source = Bindable::new(0);
        let target = Bindable::new(1);
        let call_count = Arc::new(AtomicI32::new(0));

        let call_count_clone = call_count.clone();
        source.value_changed(move |_| {
            call_count_clone.fetch_add(1, Ordering::SeqCst);
        });
        source.bind_to(&target).unwrap();
        assert_eq!(call_count.load(Ordering::SeqCst), 1);

        source.dispose();
        assert_eq!(source.listener_count(), 0);
        assert!(!source.is_bound());
        assert_eq!(target.listener_count(), 0);

        target.set(3);
        source.set(4);
        assert_eq!(call_count.load(Ordering::SeqCst), 1);
        assert_eq!(target.get(), 3);
    }

    #[test]
    fn listener_may_dispose_bindable_mid_notification() {
        let bindable = Bindable::new(0);
        let call_count = Arc::new(AtomicI32::new(0));

        let bindable_inner = bindable.clone();
        let call_count_clone = call_count.clone();
        bindable.value_changed(move |_| {
            call_count_clone.fetch_add(1, Ordering::SeqCst);
            bindable_inner.dispose();
        });

        bindable.set(1);
        assert_eq!(call_count.load(Ordering::SeqCst), 1);

        bindable.set(2);
        assert_eq!(call_count.load(Ordering::SeqCst), 1);
    }
}
