//! Bindables Core
//!
//! This crate provides observable state containers with synchronous,
//! push-based change notification. It implements:
//!
//! - `Bindable<T>`: a single observable value with a remembered default
//!   and bidirectional binding between instances
//! - `BindableList<T>`: an observable sequence with add/remove/change and
//!   generic-update listener channels
//! - `BindableMap<K, V>`: an observable mapping with set/remove and
//!   generic-update listener channels
//! - `BindableDispatcher<T>`: a stateless typed publish/subscribe channel
//! - `BindablePool`: an ownership registry for scope-wide disposal
//!
//! Notification is synchronous and completes before the mutating call
//! returns. Listener order within a channel is registration order, and
//! every fan-out runs over a snapshot, so callbacks may re-enter the
//! container they are observing.
//!
//! # Architecture
//!
//! The crate is organized into three modules:
//!
//! - `containers`: the four container types and the `Disposable` seam
//! - `pool`: the ownership registry
//! - `error`: the error enum for binding and bounds failures
//!
//! # Example
//!
//! ```rust,ignore
//! use bindables_core::containers::Bindable;
//! use bindables_core::pool::BindablePool;
//!
//! let pool = BindablePool::new();
//!
//! // Create a tracked observable value
//! let health = pool.provide_bindable(20.0);
//!
//! health.value_changed(|event| {
//!     println!("health: {} -> {}", event.old, event.new);
//! });
//!
//! health.set(15.5);
//! // Prints: "health: 20 -> 15.5"
//!
//! // Mirror it into a second cell
//! let display = health.bound_copy();
//! assert_eq!(display.get(), 15.5);
//!
//! // End of scope: drop all listeners at once
//! pool.dispose();
//! ```

pub mod containers;
pub mod error;
pub mod pool;
