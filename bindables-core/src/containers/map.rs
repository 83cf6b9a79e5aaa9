//! Observable Map Implementation
//!
//! A BindableMap wraps an insertion-ordered map and reports mutations on
//! three channels: entry set, entry removed and a payload-free update
//! channel. `set` fires the set channel before the update channel; `remove`
//! fires the remove channel before the update channel.
//!
//! Unlike list removal, removing an absent key fires nothing.

use std::fmt;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;

use super::listener::{
    notify_event, notify_update, register_event, register_update, EventListeners, ListenerId,
    UpdateListeners,
};
use super::Disposable;

/// Counter for generating unique map IDs.
static MAP_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Generate a new unique map ID.
fn next_map_id() -> u64 {
    MAP_ID_COUNTER.fetch_add(1, Ordering::Relaxed)
}

/// Event for the set channel: a key was inserted or overwritten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntrySet<K, V> {
    pub key: K,
    pub value: V,
}

/// Event for the remove channel: a present key was removed, carrying the
/// value it held.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryRemoved<K, V> {
    pub key: K,
    pub value: V,
}

/// Handle identifying a map listener together with the channel it lives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapListenerHandle {
    Set(ListenerId),
    Remove(ListenerId),
    Update(ListenerId),
}

struct MapInner<K, V> {
    /// Unique identifier for this map.
    id: u64,

    /// The backing storage. Insertion-ordered so iteration and clear are
    /// deterministic.
    entries: RwLock<IndexMap<K, V>>,

    set_listeners: RwLock<EventListeners<EntrySet<K, V>>>,
    remove_listeners: RwLock<EventListeners<EntryRemoved<K, V>>>,
    update_listeners: RwLock<UpdateListeners>,
}

/// An observable map from keys of type K to values of type V.
///
/// Cloning a `BindableMap` produces a second handle to the same container.
///
/// # Example
///
/// ```rust,ignore
/// let scores = BindableMap::new();
///
/// scores.entry_set(|event| println!("{} = {}", event.key, event.value));
/// scores.set("wysi".to_string(), 727);
/// ```
pub struct BindableMap<K, V>
where
    K: Clone + Eq + Hash + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    inner: Arc<MapInner<K, V>>,
}

impl<K, V> BindableMap<K, V>
where
    K: Clone + Eq + Hash + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    /// Create a new, empty map.
    pub fn new() -> Self {
        Self::with_entries(IndexMap::new())
    }

    fn with_entries(entries: IndexMap<K, V>) -> Self {
        Self {
            inner: Arc::new(MapInner {
                id: next_map_id(),
                entries: RwLock::new(entries),
                set_listeners: RwLock::new(EventListeners::new()),
                remove_listeners: RwLock::new(EventListeners::new()),
                update_listeners: RwLock::new(UpdateListeners::new()),
            }),
        }
    }

    /// Get the map's unique ID.
    pub fn id(&self) -> u64 {
        self.inner.id
    }

    /// Insert or overwrite an entry. Fires the set channel, then the
    /// update channel.
    pub fn set(&self, key: K, value: V) {
        self.inner
            .entries
            .write()
            .insert(key.clone(), value.clone());
        notify_event(&self.inner.set_listeners, &EntrySet { key, value });
        notify_update(&self.inner.update_listeners);
    }

    /// Insert or overwrite an entry without firing anything.
    pub fn set_silently(&self, key: K, value: V) {
        self.inner.entries.write().insert(key, value);
    }

    /// Insert an entry only if `key` is absent.
    pub fn add_if_not_present(&self, key: K, value: V) {
        if self.contains_key(&key) {
            return;
        }
        self.set(key, value);
    }

    /// Remove a key. Fires the remove channel with the removed value, then
    /// the update channel. Absent keys fire nothing.
    pub fn remove(&self, key: &K) {
        let removed = self.inner.entries.write().shift_remove(key);
        let Some(value) = removed else {
            return;
        };
        notify_event(
            &self.inner.remove_listeners,
            &EntryRemoved {
                key: key.clone(),
                value,
            },
        );
        notify_update(&self.inner.update_listeners);
    }

    /// Remove a key without firing anything.
    pub fn remove_silently(&self, key: &K) {
        self.inner.entries.write().shift_remove(key);
    }

    /// Remove `key` only if it is present. Equivalent to `remove`; kept as
    /// the intent-revealing spelling.
    pub fn remove_if_present(&self, key: &K) {
        self.remove(key);
    }

    /// Insert every entry from `entries`, firing per-entry events.
    pub fn add_all<I>(&self, entries: I)
    where
        I: IntoIterator<Item = (K, V)>,
    {
        for (key, value) in entries {
            self.set(key, value);
        }
    }

    /// Insert every entry from `entries` without firing anything.
    pub fn add_all_silently<I>(&self, entries: I)
    where
        I: IntoIterator<Item = (K, V)>,
    {
        self.inner.entries.write().extend(entries);
    }

    /// Remove every entry, one at a time, firing per-entry removal events.
    pub fn clear(&self) {
        for key in self.keys() {
            self.remove(&key);
        }
    }

    /// Remove every entry without firing anything.
    pub fn clear_silently(&self) {
        self.inner.entries.write().clear();
    }

    /// Fire the update channel once without mutating anything.
    pub fn trigger_update(&self) {
        notify_update(&self.inner.update_listeners);
    }

    /// Get a clone of the value stored under `key`.
    pub fn get(&self, key: &K) -> Option<V> {
        self.inner.entries.read().get(key).cloned()
    }

    /// Whether `key` is present.
    pub fn contains_key(&self, key: &K) -> bool {
        self.inner.entries.read().contains_key(key)
    }

    /// Get a clone of the current keys, in insertion order.
    pub fn keys(&self) -> Vec<K> {
        self.inner.entries.read().keys().cloned().collect()
    }

    /// Get a clone of the current entries, in insertion order.
    pub fn entries(&self) -> Vec<(K, V)> {
        self.inner
            .entries
            .read()
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    /// Get the number of entries.
    pub fn len(&self) -> usize {
        self.inner.entries.read().len()
    }

    /// Whether the map is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.entries.read().is_empty()
    }

    /// Register a listener on the set channel.
    pub fn entry_set<F>(&self, callback: F) -> MapListenerHandle
    where
        F: Fn(&EntrySet<K, V>) + Send + Sync + 'static,
    {
        MapListenerHandle::Set(register_event(&self.inner.set_listeners, callback))
    }

    /// Register a listener on the remove channel.
    pub fn entry_removed<F>(&self, callback: F) -> MapListenerHandle
    where
        F: Fn(&EntryRemoved<K, V>) + Send + Sync + 'static,
    {
        MapListenerHandle::Remove(register_event(&self.inner.remove_listeners, callback))
    }

    /// Register a listener on the update channel, fired once per mutation.
    pub fn map_updated<F>(&self, callback: F) -> MapListenerHandle
    where
        F: Fn() + Send + Sync + 'static,
    {
        MapListenerHandle::Update(register_update(&self.inner.update_listeners, callback))
    }

    /// Remove a listener from the channel its handle names. Unknown
    /// handles are ignored.
    pub fn unregister(&self, handle: MapListenerHandle) {
        match handle {
            MapListenerHandle::Set(id) => self
                .inner
                .set_listeners
                .write()
                .retain(|entry| entry.id != id),
            MapListenerHandle::Remove(id) => self
                .inner
                .remove_listeners
                .write()
                .retain(|entry| entry.id != id),
            MapListenerHandle::Update(id) => self
                .inner
                .update_listeners
                .write()
                .retain(|entry| entry.id != id),
        }
    }

    /// Drop every listener on every channel. Contents are untouched and
    /// the map remains usable.
    pub fn dispose(&self) {
        tracing::trace!(map = self.inner.id, "disposing map");
        self.inner.set_listeners.write().clear();
        self.inner.remove_listeners.write().clear();
        self.inner.update_listeners.write().clear();
    }

    /// Total listeners across all three channels.
    pub fn listener_count(&self) -> usize {
        self.inner.set_listeners.read().len()
            + self.inner.remove_listeners.read().len()
            + self.inner.update_listeners.read().len()
    }
}

impl<K, V> Default for BindableMap<K, V>
where
    K: Clone + Eq + Hash + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Clone for BindableMap<K, V>
where
    K: Clone + Eq + Hash + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V> FromIterator<(K, V)> for BindableMap<K, V>
where
    K: Clone + Eq + Hash + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::with_entries(iter.into_iter().collect())
    }
}

impl<K, V> fmt::Debug for BindableMap<K, V>
where
    K: Clone + Eq + Hash + Send + Sync + fmt::Debug + 'static,
    V: Clone + Send + Sync + fmt::Debug + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindableMap")
            .field("id", &self.inner.id)
            .field("entries", &*self.inner.entries.read())
            .field("listener_count", &self.listener_count())
            .finish()
    }
}

impl<K, V> Disposable for BindableMap<K, V>
where
    K: Clone + Eq + Hash + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn dispose(&self) {
        BindableMap::dispose(self);
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
