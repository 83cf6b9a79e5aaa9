//! Observable List Implementation
//!
//! A BindableList wraps a `Vec` and reports mutations on four channels:
//!
//! - item added
//! - item removed
//! - item changed (index overwrite)
//! - list updated, a payload-free channel that fires once per mutation
//!
//! Channel ordering per mutation is part of the contract. `add` fires the
//! add channel before the update channel. `remove` fires the update channel
//! before the remove channel. `set_index` fires the update channel before
//! the change channel.
//!
//! Removal notifies by value, not by presence: `remove` fires its events
//! whether or not the item was actually in the list. `remove_if_present`
//! is the checked variant that stays silent on absence.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::{BindableError, Result};

use super::listener::{
    notify_event, notify_update, register_event, register_update, EventListeners, ListenerId,
    UpdateListeners,
};
use super::Disposable;

/// Counter for generating unique list IDs.
static LIST_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Generate a new unique list ID.
fn next_list_id() -> u64 {
    LIST_ID_COUNTER.fetch_add(1, Ordering::Relaxed)
}

/// Event for the add channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemAdded<T> {
    pub item: T,
}

/// Event for the remove channel. Carries the requested item even when it
/// was not present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRemoved<T> {
    pub item: T,
}

/// Event for the change channel: an index overwrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemChanged<T> {
    pub index: usize,
    pub item: T,
}

/// Handle identifying a list listener together with the channel it lives
/// on, so `unregister` knows which collection to search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListListenerHandle {
    Add(ListenerId),
    Remove(ListenerId),
    Change(ListenerId),
    Update(ListenerId),
}

struct ListInner<T> {
    /// Unique identifier for this list.
    id: u64,

    /// The backing storage.
    items: RwLock<Vec<T>>,

    add_listeners: RwLock<EventListeners<ItemAdded<T>>>,
    remove_listeners: RwLock<EventListeners<ItemRemoved<T>>>,
    change_listeners: RwLock<EventListeners<ItemChanged<T>>>,
    update_listeners: RwLock<UpdateListeners>,
}

/// An observable list of values of type T.
///
/// Cloning a `BindableList` produces a second handle to the same container.
///
/// # Example
///
/// ```rust,ignore
/// let players = BindableList::new();
///
/// players.item_added(|event| println!("joined: {}", event.item));
/// players.add("maya".to_string());
/// ```
pub struct BindableList<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    inner: Arc<ListInner<T>>,
}

impl<T> BindableList<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    /// Create a new, empty list.
    pub fn new() -> Self {
        Self::with_items(Vec::new())
    }

    fn with_items(items: Vec<T>) -> Self {
        Self {
            inner: Arc::new(ListInner {
                id: next_list_id(),
                items: RwLock::new(items),
                add_listeners: RwLock::new(EventListeners::new()),
                remove_listeners: RwLock::new(EventListeners::new()),
                change_listeners: RwLock::new(EventListeners::new()),
                update_listeners: RwLock::new(UpdateListeners::new()),
            }),
        }
    }

    /// Get the list's unique ID.
    pub fn id(&self) -> u64 {
        self.inner.id
    }

    /// Append an item. Fires the add channel, then the update channel.
    pub fn add(&self, item: T) {
        self.inner.items.write().push(item.clone());
        notify_event(&self.inner.add_listeners, &ItemAdded { item });
        notify_update(&self.inner.update_listeners);
    }

    /// Append an item only if no equal item is already present.
    pub fn add_if_not_present(&self, item: T) {
        if self.contains(&item) {
            return;
        }
        self.add(item);
    }

    /// Append every item from `items`, firing per-item events.
    pub fn add_all<I>(&self, items: I)
    where
        I: IntoIterator<Item = T>,
    {
        for item in items {
            self.add(item);
        }
    }

    /// Append every item from `items` without firing anything.
    pub fn add_all_silently<I>(&self, items: I)
    where
        I: IntoIterator<Item = T>,
    {
        self.inner.items.write().extend(items);
    }

    /// Remove the first occurrence of `item`. Fires the update channel and
    /// then the remove channel, whether or not the item was present.
    pub fn remove(&self, item: &T) {
        {
            let mut items = self.inner.items.write();
            if let Some(position) = items.iter().position(|existing| existing == item) {
                items.remove(position);
            }
        }
        notify_update(&self.inner.update_listeners);
        notify_event(
            &self.inner.remove_listeners,
            &ItemRemoved { item: item.clone() },
        );
    }

    /// Remove `item` only if it is present; absent items fire nothing.
    pub fn remove_if_present(&self, item: &T) {
        if !self.contains(item) {
            return;
        }
        self.remove(item);
    }

    /// Overwrite the item at `index`. Fires the update channel, then the
    /// change channel with the index and new item.
    ///
    /// # Errors
    ///
    /// [`BindableError::IndexOutOfBounds`] when `index >= len`.
    pub fn set_index(&self, index: usize, item: T) -> Result<()> {
        {
            let mut items = self.inner.items.write();
            let len = items.len();
            if index >= len {
                return Err(BindableError::IndexOutOfBounds { index, len });
            }
            items[index] = item.clone();
        }
        notify_update(&self.inner.update_listeners);
        notify_event(&self.inner.change_listeners, &ItemChanged { index, item });
        Ok(())
    }

    /// Replace the entire contents. Fires the update channel once; the add
    /// and remove channels stay silent.
    pub fn set_values<I>(&self, values: I)
    where
        I: IntoIterator<Item = T>,
    {
        *self.inner.items.write() = values.into_iter().collect();
        notify_update(&self.inner.update_listeners);
    }

    /// Remove every item, one at a time, firing per-item removal events.
    pub fn clear(&self) {
        for item in self.values() {
            self.remove(&item);
        }
    }

    /// Remove every item without firing anything.
    pub fn clear_silently(&self) {
        self.inner.items.write().clear();
    }

    /// Fire the update channel once without mutating anything.
    pub fn trigger_update(&self) {
        notify_update(&self.inner.update_listeners);
    }

    /// Get a clone of the item at `index`, or `None` when out of bounds.
    pub fn get(&self, index: usize) -> Option<T> {
        self.inner.items.read().get(index).cloned()
    }

    /// Get a clone of the current contents.
    pub fn values(&self) -> Vec<T> {
        self.inner.items.read().clone()
    }

    /// Whether an equal item is present.
    pub fn contains(&self, item: &T) -> bool {
        self.inner.items.read().contains(item)
    }

    /// Get the number of items.
    pub fn len(&self) -> usize {
        self.inner.items.read().len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.items.read().is_empty()
    }

    /// Register a listener on the add channel.
    pub fn item_added<F>(&self, callback: F) -> ListListenerHandle
    where
        F: Fn(&ItemAdded<T>) + Send + Sync + 'static,
    {
        ListListenerHandle::Add(register_event(&self.inner.add_listeners, callback))
    }

    /// Register a listener on the remove channel.
    pub fn item_removed<F>(&self, callback: F) -> ListListenerHandle
    where
        F: Fn(&ItemRemoved<T>) + Send + Sync + 'static,
    {
        ListListenerHandle::Remove(register_event(&self.inner.remove_listeners, callback))
    }

    /// Register a listener on the change channel.
    pub fn item_changed<F>(&self, callback: F) -> ListListenerHandle
    where
        F: Fn(&ItemChanged<T>) + Send + Sync + 'static,
    {
        ListListenerHandle::Change(register_event(&self.inner.change_listeners, callback))
    }

    /// Register a listener on the update channel, fired once per mutation.
    pub fn list_updated<F>(&self, callback: F) -> ListListenerHandle
    where
        F: Fn() + Send + Sync + 'static,
    {
        ListListenerHandle::Update(register_update(&self.inner.update_listeners, callback))
    }

    /// Remove a listener from the channel its handle names. Unknown
    /// handles are ignored.
    pub fn unregister(&self, handle: ListListenerHandle) {
        match handle {
            ListListenerHandle::Add(id) => self
                .inner
                .add_listeners
                .write()
                .retain(|entry| entry.id != id),
            ListListenerHandle::Remove(id) => self
                .inner
                .remove_listeners
                .write()
                .retain(|entry| entry.id != id),
            ListListenerHandle::Change(id) => self
                .inner
                .change_listeners
                .write()
                .retain(|entry| entry.id != id),
            ListListenerHandle::Update(id) => self
                .inner
                .update_listeners
                .write()
                .retain(|entry| entry.id != id),
        }
    }

    /// Drop every listener on every channel. Contents are untouched and
    /// the list remains usable.
    pub fn dispose(&self) {
        tracing::trace!(list = self.inner.id, "disposing list");
        self.inner.add_listeners.write().clear();
        self.inner.remove_listeners.write().clear();
        self.inner.change_listeners.write().clear();
        self.inner.update_listeners.write().clear();
    }

    /// Total listeners across all four channels.
    pub fn listener_count(&self) -> usize {
        self.inner.add_listeners.read().len()
            + self.inner.remove_listeners.read().len()
            + self.inner.change_listeners.read().len()
            + self.inner.update_listeners.read().len()
    }
}

impl<T> Default for BindableList<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for BindableList<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> FromIterator<T> for BindableList<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::with_items(iter.into_iter().collect())
    }
}

impl<T> From<Vec<T>> for BindableList<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    fn from(items: Vec<T>) -> Self {
        Self::with_items(items)
    }
}

impl<T> fmt::Debug for BindableList<T>
where
    T: Clone + PartialEq + Send + Sync + fmt::Debug + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindableList")
            .field("id", &self.inner.id)
            .field("values", &*self.inner.items.read())
            .field("listener_count", &self.listener_count())
            .finish()
    }
}

impl<T> Disposable for BindableList<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    fn dispose(&self) {
        BindableList::dispose(self);
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
