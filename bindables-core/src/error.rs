//! Error Types
//!
//! The error surface is deliberately small. Every failure is synchronous
//! and returned directly to the caller of the operation that caused it.
//!
//! Two families exist:
//!
//! - Binding errors, returned by `bind_to` when the requested relation is
//!   invalid (self-binding, re-binding, direct two-instance cycle).
//! - Bounds errors, returned by index-based list operations.
//!
//! Absence is not an error: removing a missing map key is a defined no-op,
//! and unregistering an unknown listener handle is ignored everywhere.

use thiserror::Error;

/// Errors produced by bindable containers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BindableError {
    /// `bind_to` was called with the receiver itself as the target.
    #[error("a bindable cannot be bound to itself")]
    SelfBinding,

    /// `bind_to` was called on an instance that already holds an outgoing
    /// binding. Call `unbind` first.
    #[error("bindable is already bound to another instance")]
    AlreadyBound,

    /// `bind_to` would close a direct two-instance cycle: the target is
    /// already bound back to the receiver. Longer cycles are not detected.
    #[error("target bindable is already bound back to this instance")]
    ReciprocalBinding,

    /// An index-based list operation fell outside the current bounds.
    #[error("index {index} out of bounds for list of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },
}

/// Convenience alias for results produced by this crate.
pub type Result<T> = std::result::Result<T, BindableError>;
