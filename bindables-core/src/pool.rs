//! Bindable Pool
//!
//! A pool is an ownership registry for containers. Code that creates many
//! containers for one scope (a player session, a screen, a match) asks the
//! pool to provide them, and tears the whole scope down with one
//! `dispose()` when the scope ends.
//!
//! The pool tracks containers in four kind-specific sets and erases their
//! element types behind [`Disposable`], so disposal needs no knowledge of
//! what each container holds. Containers unregistered early are removed
//! from their set and disposed immediately; the pool's own `dispose` leaves
//! the sets in place, which is harmless since disposal is idempotent.
//!
//! A pool is an ordinary value. There is no global pool and no implicit
//! registration; only containers obtained through `provide_*` are tracked.

use std::fmt;
use std::hash::Hash;

use parking_lot::RwLock;

use crate::containers::{Bindable, BindableDispatcher, BindableList, BindableMap, Disposable};

/// A tracked container: its instance id plus a type-erased handle.
struct PoolEntry {
    id: u64,
    container: Box<dyn Disposable>,
}

impl PoolEntry {
    fn new(id: u64, container: impl Disposable + 'static) -> Self {
        Self {
            id,
            container: Box::new(container),
        }
    }
}

/// An ownership registry that creates containers and disposes of them in
/// bulk.
///
/// # Example
///
/// ```rust,ignore
/// let pool = BindablePool::new();
///
/// let health = pool.provide_bindable(20.0);
/// let players: BindableList<String> = pool.provide_bindable_list();
///
/// // ... session runs ...
///
/// pool.dispose();
/// ```
#[derive(Default)]
pub struct BindablePool {
    bindables: RwLock<Vec<PoolEntry>>,
    lists: RwLock<Vec<PoolEntry>>,
    maps: RwLock<Vec<PoolEntry>>,
    dispatchers: RwLock<Vec<PoolEntry>>,
}

impl BindablePool {
    /// Create a new, empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a tracked [`Bindable`] with the given default value.
    pub fn provide_bindable<T>(&self, default_value: T) -> Bindable<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        let bindable = Bindable::new(default_value);
        tracing::trace!(id = bindable.id(), "pool provided bindable");
        self.bindables
            .write()
            .push(PoolEntry::new(bindable.id(), bindable.clone()));
        bindable
    }

    /// Create a tracked, empty [`BindableList`].
    pub fn provide_bindable_list<T>(&self) -> BindableList<T>
    where
        T: Clone + PartialEq + Send + Sync + 'static,
    {
        self.provide_bindable_list_with(std::iter::empty())
    }

    /// Create a tracked [`BindableList`] seeded through the silent bulk
    /// path (no listener can observe seeding).
    pub fn provide_bindable_list_with<T, I>(&self, initial: I) -> BindableList<T>
    where
        T: Clone + PartialEq + Send + Sync + 'static,
        I: IntoIterator<Item = T>,
    {
        let list = BindableList::new();
        list.add_all_silently(initial);
        tracing::trace!(id = list.id(), "pool provided list");
        self.lists
            .write()
            .push(PoolEntry::new(list.id(), list.clone()));
        list
    }

    /// Create a tracked, empty [`BindableMap`].
    pub fn provide_bindable_map<K, V>(&self) -> BindableMap<K, V>
    where
        K: Clone + Eq + Hash + Send + Sync + 'static,
        V: Clone + Send + Sync + 'static,
    {
        self.provide_bindable_map_with(std::iter::empty())
    }

    /// Create a tracked [`BindableMap`] seeded through the silent bulk
    /// path.
    pub fn provide_bindable_map_with<K, V, I>(&self, entries: I) -> BindableMap<K, V>
    where
        K: Clone + Eq + Hash + Send + Sync + 'static,
        V: Clone + Send + Sync + 'static,
        I: IntoIterator<Item = (K, V)>,
    {
        let map = BindableMap::new();
        map.add_all_silently(entries);
        tracing::trace!(id = map.id(), "pool provided map");
        self.maps.write().push(PoolEntry::new(map.id(), map.clone()));
        map
    }

    /// Create a tracked [`BindableDispatcher`].
    pub fn provide_bindable_dispatcher<T>(&self) -> BindableDispatcher<T>
    where
        T: Send + Sync + 'static,
    {
        let dispatcher = BindableDispatcher::new();
        tracing::trace!(id = dispatcher.id(), "pool provided dispatcher");
        self.dispatchers
            .write()
            .push(PoolEntry::new(dispatcher.id(), dispatcher.clone()));
        dispatcher
    }

    /// Stop tracking `bindable` and dispose it. The container is disposed
    /// whether or not this pool was tracking it.
    pub fn unregister_bindable<T>(&self, bindable: &Bindable<T>)
    where
        T: Clone + Send + Sync + 'static,
    {
        self.bindables
            .write()
            .retain(|entry| entry.id != bindable.id());
        bindable.dispose();
        tracing::trace!(id = bindable.id(), "pool unregistered bindable");
    }

    /// Stop tracking `list` and dispose it.
    pub fn unregister_list<T>(&self, list: &BindableList<T>)
    where
        T: Clone + PartialEq + Send + Sync + 'static,
    {
        self.lists.write().retain(|entry| entry.id != list.id());
        list.dispose();
        tracing::trace!(id = list.id(), "pool unregistered list");
    }

    /// Stop tracking `map` and dispose it.
    pub fn unregister_map<K, V>(&self, map: &BindableMap<K, V>)
    where
        K: Clone + Eq + Hash + Send + Sync + 'static,
        V: Clone + Send + Sync + 'static,
    {
        self.maps.write().retain(|entry| entry.id != map.id());
        map.dispose();
        tracing::trace!(id = map.id(), "pool unregistered map");
    }

    /// Stop tracking `dispatcher` and dispose it.
    pub fn unregister_dispatcher<T>(&self, dispatcher: &BindableDispatcher<T>)
    where
        T: Send + Sync + 'static,
    {
        self.dispatchers
            .write()
            .retain(|entry| entry.id != dispatcher.id());
        dispatcher.dispose();
        tracing::trace!(id = dispatcher.id(), "pool unregistered dispatcher");
    }

    /// Dispose every tracked container. Tracking sets are left in place;
    /// disposing again is a harmless no-op per container.
    pub fn dispose(&self) {
        tracing::debug!(
            bindables = self.tracked_bindables(),
            lists = self.tracked_lists(),
            maps = self.tracked_maps(),
            dispatchers = self.tracked_dispatchers(),
            "disposing pool"
        );
        for entry in self.bindables.read().iter() {
            entry.container.dispose();
        }
        for entry in self.lists.read().iter() {
            entry.container.dispose();
        }
        for entry in self.maps.read().iter() {
            entry.container.dispose();
        }
        for entry in self.dispatchers.read().iter() {
            entry.container.dispose();
        }
    }

    /// Number of tracked bindables.
    pub fn tracked_bindables(&self) -> usize {
        self.bindables.read().len()
    }

    /// Number of tracked lists.
    pub fn tracked_lists(&self) -> usize {
        self.lists.read().len()
    }

    /// Number of tracked maps.
    pub fn tracked_maps(&self) -> usize {
        self.maps.read().len()
    }

    /// Number of tracked dispatchers.
    pub fn tracked_dispatchers(&self) -> usize {
        self.dispatchers.read().len()
    }
}

impl fmt::Debug for BindablePool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindablePool")
            .field("bindables", &self.tracked_bindables())
            .field("lists", &self.tracked_lists())
            .field("maps", &self.tracked_maps())
            .field("dispatchers", &self.tracked_dispatchers())
            .finish()
    }
}
