//! Per-screen controllers.
//!
//! A screen owns its form, its [`AttemptHandle`](crate::AttemptHandle) and the
//! read-only data it displays. All methods take `&self` so a renderer can
//! read state while a submit is suspended.

use std::sync::{Mutex, MutexGuard, PoisonError};

pub mod election;
pub mod library;
pub mod token;

pub use election::{ElectionOperation, ElectionScreen, ResultCheck};
pub use library::{LibraryAction, LibraryPage, LibraryScreen};
pub use token::{TokenAction, TokenOperation, TokenScreen};

/// A screen the view switcher can activate and leave.
pub trait Screen: Send + Sync {
    /// Back to the freshly mounted state: attempt `Idle`, form cleared.
    fn reset(&self);
}

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
